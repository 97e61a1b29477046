//! Queries shared by most workflows: who am I, where is my client, what is pending.

use std::path::{Path, PathBuf};

use crate::dispatch::DispatchOptions;
use crate::error::{AppError, Result};
use crate::protocol::{parse_pending_changelists, Changelist, P4Info};
use crate::workflow::Chain;

pub async fn p4_info(chain: &mut Chain<'_>) -> Result<P4Info> {
    chain
        .step(&["info"], DispatchOptions::new(), |output| Ok(P4Info::parse(output)))
        .await
}

/// User name from `p4 info`. A missing user is a parse error.
pub fn user_from(info: &P4Info) -> Result<String> {
    info.user_name()
        .map(str::to_string)
        .ok_or_else(|| AppError::Parse("p4 info did not report a user name".to_string()))
}

pub async fn current_user(chain: &mut Chain<'_>) -> Result<String> {
    let info = p4_info(chain).await?;
    user_from(&info)
}

/// `p4 changes -s pending -u <user>`, in server order.
pub async fn pending_changelists_for(chain: &mut Chain<'_>, user: &str) -> Result<Vec<Changelist>> {
    chain
        .step(
            &["changes", "-s", "pending", "-u", user],
            DispatchOptions::new(),
            |output| Ok(parse_pending_changelists(output)),
        )
        .await
}

/// Resolve the current user, then list their pending changelists.
pub async fn pending_changelists(chain: &mut Chain<'_>) -> Result<Vec<Changelist>> {
    let user = current_user(chain).await?;
    let changelists = pending_changelists_for(chain, &user).await?;
    tracing::debug!(user = %user, count = changelists.len(), "Resolved pending changelists");
    Ok(changelists)
}

/// Client root from `p4 info`. An unconfigured client is reported on the
/// error surface before returning.
pub async fn client_root_from(chain: &Chain<'_>, info: &P4Info) -> Result<PathBuf> {
    match info.client_root() {
        Some(root) => Ok(root),
        None => {
            chain
                .host()
                .error_message("Perforce: Please configure clientspec.")
                .await;
            Err(AppError::ClientRootUnknown)
        }
    }
}

pub async fn client_root(chain: &mut Chain<'_>) -> Result<PathBuf> {
    let info = p4_info(chain).await?;
    client_root_from(chain, &info).await
}

/// Component-wise prefix test, so `/ws-other` is not under `/ws`.
pub fn is_under_root(candidate: &Path, root: &Path) -> bool {
    candidate.starts_with(root)
}

/// The active file, provided it lives under the client root.
pub async fn check_depot_file(chain: &mut Chain<'_>) -> Result<PathBuf> {
    let file = chain
        .ctx()
        .active_file
        .clone()
        .ok_or(AppError::NoActiveFile)?;

    let root = client_root(chain).await?;
    if !is_under_root(&file, &root) {
        tracing::debug!(file = %file.display(), root = %root.display(), "File outside client root");
        return Err(AppError::NotUnderClientRoot);
    }
    Ok(file)
}

/// Path argument as passed on the `p4` command line.
pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
