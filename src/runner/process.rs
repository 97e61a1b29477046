use std::io::{ErrorKind, Read, Write};
use std::process::{Command, Stdio};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::runner::{Invocation, ProcessRunner, RawResult};

/// Runs invocations as real OS processes on the blocking thread pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

fn launch_error(program: &str, error: std::io::Error) -> AppError {
    if error.kind() == ErrorKind::NotFound {
        AppError::ToolNotFound(program.to_string())
    } else {
        AppError::Launch {
            program: program.to_string(),
            message: error.to_string(),
        }
    }
}

/// Spawn, feed stdin, and collect stdout and stderr through one pipe so the
/// two streams keep their chronological interleaving.
fn run_blocking(invocation: &Invocation) -> Result<RawResult> {
    let (mut reader, writer) = std::io::pipe()?;

    // The Command owns copies of the write end; it must be dropped before
    // reading or the reader never sees EOF.
    let mut child = {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(&invocation.env)
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(writer.try_clone()?)
            .stderr(writer);
        command
            .spawn()
            .map_err(|e| launch_error(&invocation.program, e))?
    };

    let stdin = child.stdin.take();
    let mut bytes = Vec::new();

    std::thread::scope(|scope| -> std::io::Result<()> {
        if let (Some(mut pipe), Some(payload)) = (stdin, invocation.stdin.as_deref()) {
            scope.spawn(move || {
                // A process that exits without reading its input is not an error here.
                if let Err(e) = pipe.write_all(payload.as_bytes()) {
                    tracing::debug!(error = %e, "stdin closed early");
                }
            });
        }
        reader.read_to_end(&mut bytes)?;
        Ok(())
    })?;

    let status = child.wait()?;

    Ok(RawResult {
        output: String::from_utf8_lossy(&bytes).into_owned(),
        exit_code: status.code().unwrap_or(-1),
    })
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<RawResult> {
        // Checked up front so a missing folder is not mistaken for a missing tool.
        if !invocation.cwd.is_dir() {
            return Err(AppError::Launch {
                program: invocation.program.clone(),
                message: format!(
                    "working directory does not exist: {}",
                    invocation.cwd.display()
                ),
            });
        }

        let invocation = invocation.clone();
        tracing::debug!(command = %invocation.command_line(), cwd = %invocation.cwd.display(), "Spawning process");

        tokio::task::spawn_blocking(move || run_blocking(&invocation))
            .await
            .map_err(|e| AppError::Internal(format!("Process task panicked: {e}")))?
    }
}
