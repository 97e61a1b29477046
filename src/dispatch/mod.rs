//! The single path every `p4` call takes: build, run, classify, report.

pub mod output;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{AppConfig, ProgressConfig};
use crate::error::{AppError, Result};
use crate::host::{Host, OUTPUT_PANEL};
use crate::progress;
use crate::protocol::classify;
use crate::runner::{Invocation, ProcessRunner, RawResult};

pub use output::format_command_output;

/// Status text shown when a command is classified as failed.
pub const FAILURE_STATUS: &str = "Something went wrong, see console for details";

/// The editor state a dispatch runs against.
///
/// Passed explicitly into every call so concurrent chains can each carry
/// their own active document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentContext {
    pub active_file: Option<PathBuf>,
}

impl DocumentContext {
    pub fn for_file(path: impl Into<PathBuf>) -> Self {
        Self {
            active_file: Some(path.into()),
        }
    }

    pub fn active_folder(&self) -> Option<&Path> {
        self.active_file.as_deref().and_then(Path::parent)
    }
}

/// Per-call knobs for `Dispatcher::dispatch`.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    pub cwd: Option<PathBuf>,
    pub stdin: Option<String>,
    /// Exact `error:` messages that do not fail this call.
    pub allowed_errors: Vec<String>,
    /// Announce the command and echo its output to the output panel.
    pub verbose: bool,
    /// Progress text; defaults to the command line.
    pub status_message: Option<String>,
    /// Argument text that must never be displayed or logged.
    pub secrets: Vec<String>,
}

impl DispatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    pub fn allow_error(mut self, message: impl Into<String>) -> Self {
        self.allowed_errors.push(message.into());
        self
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    pub fn status_message(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secrets.push(secret.into());
        self
    }
}

pub struct Dispatcher {
    runner: Arc<dyn ProcessRunner>,
    host: Arc<dyn Host>,
    binary: String,
    env: BTreeMap<String, String>,
    progress: ProgressConfig,
}

impl Dispatcher {
    pub fn new(config: &AppConfig, runner: Arc<dyn ProcessRunner>, host: Arc<dyn Host>) -> Self {
        Self {
            runner,
            host,
            binary: config.p4.binary.clone(),
            env: config.env_overlay(),
            progress: config.progress.clone(),
        }
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// Explicit `cwd`, else the active file's folder, else the process directory.
    fn working_dir(&self, ctx: &DocumentContext, options: &DispatchOptions) -> Result<PathBuf> {
        if let Some(cwd) = &options.cwd {
            return Ok(cwd.clone());
        }
        if let Some(folder) = ctx.active_folder() {
            return Ok(folder.to_path_buf());
        }
        Ok(std::env::current_dir()?)
    }

    /// Build the full `p4 -s ...` invocation without running it.
    pub fn build(&self, ctx: &DocumentContext, args: &[&str], options: &DispatchOptions) -> Result<Invocation> {
        Ok(Invocation {
            program: self.binary.clone(),
            args: std::iter::once("-s")
                .chain(args.iter().copied())
                .map(String::from)
                .collect(),
            cwd: self.working_dir(ctx, options)?,
            env: self.env.clone(),
            stdin: options.stdin.clone(),
            secrets: options.secrets.clone(),
        })
    }

    /// A command line for the system shell, run with the same environment overlay.
    pub fn shell_invocation(&self, command: String, cwd: PathBuf) -> Invocation {
        #[cfg(windows)]
        let (program, flag) = ("cmd", "/C");
        #[cfg(not(windows))]
        let (program, flag) = ("sh", "-c");

        Invocation {
            program: program.to_string(),
            args: vec![flag.to_string(), command],
            cwd,
            env: self.env.clone(),
            stdin: None,
            secrets: Vec::new(),
        }
    }

    /// Run one invocation on a worker task while a progress reporter animates
    /// `status`. Returns the raw result once both have finished.
    pub async fn execute(&self, invocation: Invocation, status: &str) -> Result<RawResult> {
        let (alive, liveness) = progress::liveness();

        let runner = Arc::clone(&self.runner);
        let worker = tokio::spawn(async move {
            let _alive = alive;
            runner.run(&invocation).await
        });

        let reporter = progress::spawn(
            Arc::clone(&self.host),
            status.to_string(),
            liveness,
            self.progress.tick(),
            self.progress.width,
        );

        let result = worker
            .await
            .map_err(|e| AppError::Internal(format!("Command task panicked: {e}")))?;

        if let Err(e) = reporter.await {
            tracing::warn!(error = %e, "Progress reporter stopped abnormally");
        }

        result
    }

    /// Tell the error surface that a program could not be started.
    pub async fn report_launch_failure(&self, error: &AppError) {
        match error {
            AppError::ToolNotFound(program) => {
                self.host
                    .error_message(&format!(
                        "Perforce: '{program}' was not found. Install the p4 command-line client or set p4.binary."
                    ))
                    .await;
            }
            AppError::Launch { program, message } => {
                self.host
                    .error_message(&format!("Perforce: failed to launch '{program}': {message}"))
                    .await;
            }
            _ => {}
        }
    }

    /// Clear the shared output panel and show `text`.
    pub async fn show_panel(&self, text: &str) {
        self.host.show_output(OUTPUT_PANEL, text).await;
    }

    /// Run `p4 -s <args>` and return its cleaned output.
    ///
    /// A failed command is written to the output panel and returned as
    /// `AppError::CommandFailed`; callers should not report it again.
    pub async fn dispatch(&self, ctx: &DocumentContext, args: &[&str], options: DispatchOptions) -> Result<String> {
        let invocation = self.build(ctx, args, &options)?;
        let command = invocation.command_line();
        let status = options
            .status_message
            .clone()
            .unwrap_or_else(|| command.clone());

        if options.verbose {
            self.host.status_message(&status).await;
        }

        tracing::debug!(command = %command, cwd = %invocation.cwd.display(), "Dispatching p4 command");

        let raw = match self.execute(invocation, &status).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(command = %command, error = %e, "Failed to run p4");
                self.report_launch_failure(&e).await;
                return Err(e);
            }
        };

        let classified = classify(&raw, &options.allowed_errors);

        if !classified.success {
            tracing::warn!(
                command = %command,
                exit_code = raw.exit_code,
                "p4 command failed"
            );
            self.show_panel(&format_command_output(&command, &classified.message))
                .await;
            self.host.status_message(FAILURE_STATUS).await;
            return Err(AppError::CommandFailed {
                command,
                output: classified.message,
            });
        }

        tracing::debug!(command = %command, "p4 command succeeded");

        if options.verbose {
            self.show_panel(&format_command_output(&command, &classified.message))
                .await;
        }

        Ok(classified.message)
    }
}
