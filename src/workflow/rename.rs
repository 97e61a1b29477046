use std::path::{Path, PathBuf};

use crate::dispatch::DispatchOptions;
use crate::error::{AppError, Result};
use crate::host::types::InputRequest;
use crate::protocol::{P4Info, ServerVersion};
use crate::workflow::changelists::{client_root_from, is_under_root, p4_info, path_arg};
use crate::workflow::{Chain, WorkflowOutcome};

/// How a rename is carried out on a given server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameStrategy {
    /// `p4 edit` + `p4 move`.
    Move,
    /// `p4 integrate` + `p4 delete`, for servers without `move`.
    IntegrateDelete,
}

impl RenameStrategy {
    /// Servers that do not report a version get the emulation, which works everywhere.
    pub fn for_server(version: Option<ServerVersion>, threshold: ServerVersion) -> Self {
        match version {
            Some(v) if v >= threshold => RenameStrategy::Move,
            _ => RenameStrategy::IntegrateDelete,
        }
    }
}

fn move_threshold(chain: &Chain<'_>) -> Result<ServerVersion> {
    let raw = &chain.config().p4.move_min_server_version;
    raw.parse().map_err(|_| {
        AppError::Config(format!("p4.move_min_server_version is not YEAR.MINOR: {raw}"))
    })
}

/// A relative answer is taken relative to the file's folder.
fn resolve_target(current: &Path, answer: &str) -> PathBuf {
    let answer = Path::new(answer.trim());
    if answer.is_absolute() {
        answer.to_path_buf()
    } else {
        current
            .parent()
            .map_or_else(|| answer.to_path_buf(), |folder| folder.join(answer))
    }
}

async fn rename_with(
    chain: &mut Chain<'_>,
    strategy: RenameStrategy,
    from: &Path,
    to: &Path,
) -> Result<String> {
    let (from, to) = (path_arg(from), path_arg(to));
    match strategy {
        RenameStrategy::Move => {
            chain.run(&["edit", &from], DispatchOptions::new()).await?;
            chain.run(&["move", &from, &to], DispatchOptions::new()).await
        }
        RenameStrategy::IntegrateDelete => {
            chain
                .run(
                    &["integrate", "-d", "-t", "-Di", "-f", &from, &to],
                    DispatchOptions::new(),
                )
                .await?;
            chain.run(&["delete", &from], DispatchOptions::new()).await
        }
    }
}

/// Prompt for a new name, rename through the server and reopen the view.
pub async fn rename(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let current = chain
        .ctx()
        .active_file
        .clone()
        .ok_or(AppError::NoActiveFile)?;

    let info: P4Info = p4_info(chain).await?;
    let root = client_root_from(chain, &info).await?;
    if !is_under_root(&current, &root) {
        return Err(AppError::NotUnderClientRoot);
    }

    let answer = chain
        .host()
        .input(InputRequest::new("New File Name", current.display().to_string()))
        .await;
    let Some(answer) = answer else {
        return Ok(WorkflowOutcome::Cancelled);
    };

    let target = resolve_target(&current, &answer);
    if answer.trim().is_empty() || target == current {
        return Ok(WorkflowOutcome::Skipped {
            reason: "new name is the same as the current one".to_string(),
        });
    }

    let strategy = RenameStrategy::for_server(info.server_version(), move_threshold(chain)?);
    tracing::info!(
        from = %current.display(),
        to = %target.display(),
        strategy = ?strategy,
        "Renaming file"
    );

    let output = rename_with(chain, strategy, &current, &target).await?;
    tracing::info!("Perforce: {output}");

    chain.host().close_file(&current).await;
    chain.host().open_file(&target).await;
    Ok(WorkflowOutcome::Completed)
}
