//! Interpretation of `p4 -s` output: success classification and the
//! record parsers used by workflow steps.

pub mod change_form;
pub mod changes;
pub mod classify;
pub mod info;
pub mod opened;

pub use changes::{parse_pending_changelists, Changelist};
pub use classify::{classify, ClassifiedResult};
pub use info::{P4Info, ServerVersion};
pub use opened::{parse_opened_files, OpenedFile};
