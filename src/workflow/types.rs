use std::path::PathBuf;

use crate::protocol::Changelist;

/// A file saved for the first time under the client root, waiting to be
/// opened for add once the save has landed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAdd {
    pub path: PathBuf,
}

/// Terminal result of a successful workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Every step ran and the result was shown.
    Completed,
    /// The user dismissed a prompt or pick-list.
    Cancelled,
    /// The queries succeeded but found nothing to act on.
    NothingFound { message: String },
    /// Settings or file state meant there was nothing to do.
    Skipped { reason: String },
    /// The user's pending changelists, in server order.
    Changelists(Vec<Changelist>),
    ChangelistCreated { number: String },
    AddPending(PendingAdd),
}
