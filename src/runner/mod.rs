pub mod process;
pub mod scripted;

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

pub use process::SystemProcessRunner;
pub use scripted::ScriptedRunner;

/// One fully-built external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Variables layered over the inherited process environment.
    pub env: BTreeMap<String, String>,
    pub stdin: Option<String>,
    /// Argument substrings masked wherever the command line is displayed or logged.
    pub secrets: Vec<String>,
}

const MASK: &str = "********";

impl Invocation {
    /// Space-joined command line, used for status text, logs and the output
    /// surface. Secrets are masked.
    pub fn command_line(&self) -> String {
        let args = self.args.iter().map(|arg| {
            self.secrets
                .iter()
                .filter(|secret| !secret.is_empty())
                .fold(arg.clone(), |acc, secret| acc.replace(secret.as_str(), MASK))
        });
        std::iter::once(self.program.clone())
            .chain(args)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Merged stdout/stderr of a finished process plus its exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResult {
    pub output: String,
    pub exit_code: i32,
}

impl RawResult {
    pub fn new(output: impl Into<String>, exit_code: i32) -> Self {
        Self {
            output: output.into(),
            exit_code,
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the invocation to completion off the calling task.
    ///
    /// Partial output is never returned: the result exists only once the
    /// process has exited.
    async fn run(&self, invocation: &Invocation) -> Result<RawResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_joins_program_and_args() {
        let invocation = Invocation {
            program: "p4".to_string(),
            args: vec!["-s".to_string(), "opened".to_string(), "-c".to_string(), "default".to_string()],
            cwd: PathBuf::from("/tmp"),
            env: BTreeMap::new(),
            stdin: None,
            secrets: Vec::new(),
        };
        assert_eq!(invocation.command_line(), "p4 -s opened -c default");
    }

    #[test]
    fn test_command_line_masks_secrets() {
        let invocation = Invocation {
            program: "p4".to_string(),
            args: vec!["-s".to_string(), "set".to_string(), "P4PASSWD=hunter2".to_string()],
            cwd: PathBuf::from("/tmp"),
            env: BTreeMap::new(),
            stdin: None,
            secrets: vec!["hunter2".to_string(), String::new()],
        };
        assert_eq!(invocation.command_line(), "p4 -s set P4PASSWD=********");
        assert_eq!(invocation.args[2], "P4PASSWD=hunter2");
    }
}
