pub mod auto;
pub mod chain;
pub mod changelists;
pub mod create_changelist;
pub mod describe;
pub mod diff_tools;
pub mod file_ops;
pub mod graphical_diff;
pub mod move_to_changelist;
pub mod opened;
pub mod rename;
pub mod session;
pub mod shelve;
pub mod submit;
pub mod types;

use std::ops::ControlFlow;

use crate::host::types::PickItem;
use crate::protocol::Changelist;
use crate::state::AppState;

pub use chain::{Chain, ChainState};
pub use types::{PendingAdd, WorkflowOutcome};

pub const WARNING_PREFIX: &str = "Perforce [warning]: ";

/// Tell the user about a non-fatal problem, honoring the warning settings.
pub async fn warn_user(app: &AppState, message: &str) {
    let behavior = &app.config.behavior;
    if !behavior.warnings_enabled {
        return;
    }
    if behavior.log_warnings_to_status {
        app.host
            .status_message(&format!("{WARNING_PREFIX}{message}"))
            .await;
    } else {
        tracing::warn!("{WARNING_PREFIX}{message}");
    }
}

/// Rows of the form `Changelist <n> - <description>`.
pub(crate) fn changelist_rows(changelists: &[Changelist]) -> Vec<PickItem> {
    changelists
        .iter()
        .map(|cl| PickItem::single(format!("Changelist {}", cl.label())))
        .collect()
}

/// Ask the user to pick one pending changelist.
///
/// Breaks with the terminal outcome when there is nothing to pick or the
/// pick is cancelled.
pub(crate) async fn pick_pending_changelist(
    chain: &mut Chain<'_>,
) -> crate::error::Result<ControlFlow<WorkflowOutcome, Changelist>> {
    let mut changelists = changelists::pending_changelists(chain).await?;
    if changelists.is_empty() {
        let message = "There are no changelists to list.".to_string();
        chain.host().status_message(&message).await;
        return Ok(ControlFlow::Break(WorkflowOutcome::NothingFound { message }));
    }

    match chain.host().pick(changelist_rows(&changelists)).await {
        Some(index) if index < changelists.len() => {
            Ok(ControlFlow::Continue(changelists.swap_remove(index)))
        }
        _ => Ok(ControlFlow::Break(WorkflowOutcome::Cancelled)),
    }
}
