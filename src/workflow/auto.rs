//! Editor event hooks: checkout on modify/save, add on first save.

use crate::dispatch::DispatchOptions;
use crate::error::{AppError, Result};
use crate::workflow::changelists::{check_depot_file, path_arg};
use crate::workflow::file_ops::is_writable;
use crate::workflow::{warn_user, Chain, PendingAdd, WorkflowOutcome};

/// Which editor event triggered an auto checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutTrigger {
    Modified,
    Save,
}

fn skipped(reason: &str) -> Result<WorkflowOutcome> {
    Ok(WorkflowOutcome::Skipped {
        reason: reason.to_string(),
    })
}

/// Files outside the client are not ours to touch; say nothing about them.
async fn depot_file_or_skip(chain: &mut Chain<'_>) -> Result<Option<std::path::PathBuf>> {
    match check_depot_file(chain).await {
        Ok(file) => Ok(Some(file)),
        Err(AppError::NoActiveFile | AppError::NotUnderClientRoot) => Ok(None),
        Err(e) => Err(e),
    }
}

async fn auto_checkout(chain: &mut Chain<'_>, trigger: CheckoutTrigger, dirty: bool) -> Result<WorkflowOutcome> {
    let behavior = &chain.config().behavior;
    let enabled = behavior.auto_checkout
        && match trigger {
            CheckoutTrigger::Modified => behavior.auto_checkout_on_modified,
            CheckoutTrigger::Save => behavior.auto_checkout_on_save,
        };
    if !enabled {
        return skipped("auto checkout disabled");
    }
    if !dirty {
        return skipped("buffer is not modified");
    }

    let Some(file) = chain.ctx().active_file.clone() else {
        return skipped("no file");
    };
    if !file.exists() || is_writable(&file) {
        return skipped("file is already writable");
    }

    let Some(file) = depot_file_or_skip(chain).await? else {
        return skipped("file is not under the client root");
    };

    let output = chain
        .run(&["edit", &path_arg(&file)], DispatchOptions::new())
        .await?;
    tracing::info!("Perforce: {output}");
    Ok(WorkflowOutcome::Completed)
}

pub async fn on_modified(chain: &mut Chain<'_>, dirty: bool) -> Result<WorkflowOutcome> {
    auto_checkout(chain, CheckoutTrigger::Modified, dirty).await
}

/// Existing files are checked out; a new file under the client root yields
/// `AddPending`, to be handed back to `on_post_save`.
pub async fn on_pre_save(chain: &mut Chain<'_>, dirty: bool) -> Result<WorkflowOutcome> {
    let Some(file) = chain.ctx().active_file.clone() else {
        return skipped("no file");
    };
    if file.is_file() {
        return auto_checkout(chain, CheckoutTrigger::Save, dirty).await;
    }

    if !chain.config().behavior.auto_add {
        warn_user(chain.app(), "Auto Add disabled").await;
        return skipped("auto add disabled");
    }

    match depot_file_or_skip(chain).await? {
        Some(path) => Ok(WorkflowOutcome::AddPending(PendingAdd { path })),
        None => skipped("file is not under the client root"),
    }
}

pub async fn on_post_save(chain: &mut Chain<'_>, pending: Option<PendingAdd>) -> Result<WorkflowOutcome> {
    let Some(pending) = pending else {
        return skipped("nothing to add");
    };
    if !chain.config().behavior.auto_add {
        return skipped("auto add disabled");
    }

    let output = chain
        .run(&["add", &path_arg(&pending.path)], DispatchOptions::new())
        .await?;
    tracing::info!("Perforce: {output}");
    Ok(WorkflowOutcome::Completed)
}
