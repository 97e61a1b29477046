pub mod kind;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::dispatch::DocumentContext;
use crate::error::Result;
use crate::state::AppState;
use crate::workflow::shelve::ShelveDirection;
use crate::workflow::{
    auto, create_changelist, describe, diff_tools, file_ops, graphical_diff, move_to_changelist,
    opened, rename, session, shelve, submit, warn_user, Chain, WorkflowOutcome,
};

pub use kind::Action;

async fn execute(chain: &mut Chain<'_>, action: Action) -> Result<WorkflowOutcome> {
    match action {
        Action::ListPendingChangelists => submit::list_pending_changelists(chain).await,
        Action::ListCheckedOutFiles => opened::list_checked_out_files(chain).await,
        Action::Add => file_ops::add(chain).await,
        Action::Checkout => file_ops::checkout(chain).await,
        Action::Delete => file_ops::delete(chain).await,
        Action::Revert => file_ops::revert(chain).await,
        Action::Diff => file_ops::diff(chain).await,
        Action::GraphicalDiff => graphical_diff::graphical_diff(chain).await,
        Action::SelectDiffApplication => diff_tools::select_diff_application(chain).await,
        Action::Rename => rename::rename(chain).await,
        Action::CreateChangelist => create_changelist::create_changelist_interactive(chain).await,
        Action::Submit => submit::submit(chain).await,
        Action::MoveToChangelist => move_to_changelist::move_to_changelist(chain).await,
        Action::AddDescriptionLine => describe::add_description_line(chain).await,
        Action::Shelve => shelve::shelve(chain, ShelveDirection::Shelve).await,
        Action::Unshelve => shelve::shelve(chain, ShelveDirection::Unshelve).await,
        Action::Login => session::login(chain).await,
        Action::Logout => session::logout(chain).await,
        Action::Modified { dirty } => auto::on_modified(chain, dirty).await,
        Action::PreSave { dirty } => auto::on_pre_save(chain, dirty).await,
        Action::PostSave { pending } => auto::on_post_save(chain, pending).await,
    }
}

/// Run one action as a chain and report its failure exactly once.
pub async fn run_action(state: &AppState, ctx: DocumentContext, action: Action) -> Result<WorkflowOutcome> {
    let name = action.name();
    let is_hook = action.is_hook();
    let chain_id = state.begin_chain(name).await;

    tracing::info!(action = name, chain_id = chain_id, "Running action");

    let mut chain = Chain::new(name, state, ctx);
    let result = execute(&mut chain, action).await;
    let result = chain.finish(result);
    let steps = chain.steps();

    state.end_chain(chain_id).await;

    match &result {
        Ok(outcome) => {
            tracing::info!(
                action = name,
                steps = steps,
                outcome = ?outcome,
                "Action completed"
            );
        }
        Err(e) => {
            tracing::error!(
                action = name,
                steps = steps,
                error = %e,
                "Action failed"
            );
            if !e.is_reported() {
                if is_hook {
                    warn_user(state, &e.to_string()).await;
                } else {
                    state.host.status_message(&e.to_string()).await;
                }
            }
        }
    }

    result
}

/// Start an action on its own task. Independent actions run concurrently.
pub fn spawn_action(
    state: Arc<AppState>,
    ctx: DocumentContext,
    action: Action,
) -> JoinHandle<Result<WorkflowOutcome>> {
    tokio::spawn(async move { run_action(&state, ctx, action).await })
}
