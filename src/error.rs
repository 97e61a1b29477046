use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Executable not found: {0}")]
    ToolNotFound(String),

    #[error("Failed to launch {program}: {message}")]
    Launch { program: String, message: String },

    /// The command ran but was classified as failed. The command line and
    /// cleaned output have already been written to the output surface.
    #[error("Command failed: {command}")]
    CommandFailed { command: String, output: String },

    #[error("View does not contain a file")]
    NoActiveFile,

    #[error("File is not under the client root")]
    NotUnderClientRoot,

    #[error("Client root is not configured")]
    ClientRootUnknown,

    #[error("Unexpected p4 output: {0}")]
    Parse(String),

    #[error("Workflow error: {0}")]
    Workflow(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the host has already been told about this failure.
    ///
    /// Chain boundaries use this to report every failure exactly once.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            AppError::CommandFailed { .. }
                | AppError::ToolNotFound(_)
                | AppError::Launch { .. }
                | AppError::ClientRootUnknown
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
