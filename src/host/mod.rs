pub mod console;
pub mod recording;
pub mod types;

use std::path::Path;

use async_trait::async_trait;

use types::*;

pub use console::ConsoleHost;
pub use recording::RecordingHost;

/// Name of the shared output buffer that command failures are written to.
pub const OUTPUT_PANEL: &str = "perforce";

/// The editor surface the workflows talk to.
///
/// Implementations own all rendering; workflows only describe what to show.
#[async_trait]
pub trait Host: Send + Sync {
    /// Show transient text in the status area.
    async fn status_message(&self, message: &str);

    /// Show an error the user must notice.
    async fn error_message(&self, message: &str);

    /// Show a text prompt. `None` when the user cancels.
    async fn input(&self, request: InputRequest) -> Option<String>;

    /// Show a single-select list. `None` when the user cancels.
    async fn pick(&self, items: Vec<PickItem>) -> Option<usize>;

    /// Open a read-only scratch buffer.
    async fn open_scratch(&self, buffer: ScratchBuffer);

    async fn open_file(&self, path: &Path);

    async fn close_file(&self, path: &Path);

    /// Reload a file's view from disk.
    async fn refresh_file(&self, path: &Path);

    /// Clear the named output buffer, write `text` into it and make it visible.
    async fn show_output(&self, panel: &str, text: &str);
}
