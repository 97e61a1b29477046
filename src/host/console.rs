use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::host::types::*;
use crate::host::Host;

/// Terminal host: status on stderr, everything else on stdout, answers from stdin.
pub struct ConsoleHost {
    stdin: Mutex<Lines<BufReader<Stdin>>>,
    /// A status line is on screen without a trailing newline.
    status_open: AtomicBool,
}

impl Default for ConsoleHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self {
            stdin: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            status_open: AtomicBool::new(false),
        }
    }

    fn close_status_line(&self) {
        if self.status_open.swap(false, Ordering::SeqCst) {
            eprintln!();
        }
    }

    async fn read_line(&self) -> Option<String> {
        let mut stdin = self.stdin.lock().await;
        match stdin.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read from stdin");
                None
            }
        }
    }
}

#[async_trait]
impl Host for ConsoleHost {
    async fn status_message(&self, message: &str) {
        // Overwrite the previous status so progress frames animate in place.
        eprint!("\r\x1b[2K{message}");
        let _ = std::io::stderr().flush();
        self.status_open.store(true, Ordering::SeqCst);
    }

    async fn error_message(&self, message: &str) {
        self.close_status_line();
        eprintln!("error: {message}");
    }

    async fn input(&self, request: InputRequest) -> Option<String> {
        self.close_status_line();
        if request.initial.is_empty() {
            print!("{}: ", request.caption);
        } else {
            print!("{} [{}]: ", request.caption, request.initial);
        }
        let _ = std::io::stdout().flush();

        let line = self.read_line().await?;
        if line.is_empty() && !request.initial.is_empty() {
            Some(request.initial)
        } else {
            Some(line)
        }
    }

    async fn pick(&self, items: Vec<PickItem>) -> Option<usize> {
        self.close_status_line();
        for (index, item) in items.iter().enumerate() {
            let mut lines = item.lines.iter();
            println!("{:>3}) {}", index + 1, lines.next().map(String::as_str).unwrap_or(""));
            for extra in lines {
                println!("     {extra}");
            }
        }
        print!("Pick a number (empty to cancel): ");
        let _ = std::io::stdout().flush();

        let line = self.read_line().await?;
        match line.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= items.len() => Some(n - 1),
            _ => None,
        }
    }

    async fn open_scratch(&self, buffer: ScratchBuffer) {
        self.close_status_line();
        println!("==== {} ====", buffer.title);
        println!("{}", buffer.content);
    }

    async fn open_file(&self, path: &Path) {
        self.close_status_line();
        println!("open: {}", path.display());
    }

    async fn close_file(&self, path: &Path) {
        self.close_status_line();
        println!("close: {}", path.display());
    }

    async fn refresh_file(&self, path: &Path) {
        self.close_status_line();
        println!("reload: {}", path.display());
    }

    async fn show_output(&self, panel: &str, text: &str) {
        self.close_status_line();
        tracing::debug!(panel = panel, "Writing output panel");
        println!("{text}");
    }
}
