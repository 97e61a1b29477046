use std::path::PathBuf;

/// A text prompt shown by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRequest {
    pub caption: String,
    pub initial: String,
}

impl InputRequest {
    pub fn new(caption: impl Into<String>, initial: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            initial: initial.into(),
        }
    }
}

/// One row of a pick-list. The first line is the key the user scans for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub lines: Vec<String>,
}

impl PickItem {
    pub fn single(label: impl Into<String>) -> Self {
        Self {
            lines: vec![label.into()],
        }
    }

    pub fn multi<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn title(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or_default()
    }
}

/// A read-only buffer opened for display only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchBuffer {
    pub title: String,
    pub content: String,
    /// Syntax hint for highlighting, e.g. `Diff`.
    pub syntax: Option<String>,
}

/// Everything a host was asked to do, in order. Used by `RecordingHost`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Status(String),
    Error(String),
    Input(InputRequest),
    Pick(Vec<PickItem>),
    Scratch(ScratchBuffer),
    OpenFile(PathBuf),
    CloseFile(PathBuf),
    RefreshFile(PathBuf),
    Output { panel: String, text: String },
}
