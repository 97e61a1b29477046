use crate::workflow::PendingAdd;

/// Every user-facing operation. Each one runs as a single chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ListPendingChangelists,
    ListCheckedOutFiles,
    Add,
    Checkout,
    Delete,
    Revert,
    Diff,
    GraphicalDiff,
    SelectDiffApplication,
    Rename,
    CreateChangelist,
    Submit,
    MoveToChangelist,
    AddDescriptionLine,
    Shelve,
    Unshelve,
    Login,
    Logout,
    /// The buffer of the active file changed.
    Modified { dirty: bool },
    /// The active file is about to be written.
    PreSave { dirty: bool },
    /// The active file was written; carries what `PreSave` returned.
    PostSave { pending: Option<PendingAdd> },
}

impl Action {
    /// Short name used for chain logging and in-flight tracking.
    pub fn name(&self) -> &'static str {
        match self {
            Action::ListPendingChangelists => "list-pending-changelists",
            Action::ListCheckedOutFiles => "list-checked-out-files",
            Action::Add => "add",
            Action::Checkout => "checkout",
            Action::Delete => "delete",
            Action::Revert => "revert",
            Action::Diff => "diff",
            Action::GraphicalDiff => "graphical-diff",
            Action::SelectDiffApplication => "select-diff-application",
            Action::Rename => "rename",
            Action::CreateChangelist => "create-changelist",
            Action::Submit => "submit",
            Action::MoveToChangelist => "move-to-changelist",
            Action::AddDescriptionLine => "add-description-line",
            Action::Shelve => "shelve",
            Action::Unshelve => "unshelve",
            Action::Login => "login",
            Action::Logout => "logout",
            Action::Modified { .. } => "auto-checkout-on-modified",
            Action::PreSave { .. } => "pre-save",
            Action::PostSave { .. } => "post-save",
        }
    }

    /// Editor event hooks report failures through the warning settings.
    pub fn is_hook(&self) -> bool {
        matches!(
            self,
            Action::Modified { .. } | Action::PreSave { .. } | Action::PostSave { .. }
        )
    }
}
