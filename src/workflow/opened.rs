use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::dispatch::DispatchOptions;
use crate::error::Result;
use crate::host::types::PickItem;
use crate::protocol::classify::NO_OPENED_FILES_ERROR;
use crate::protocol::{parse_opened_files, Changelist, OpenedFile};
use crate::workflow::changelists::{client_root_from, p4_info, pending_changelists_for, user_from};
use crate::workflow::{Chain, WorkflowOutcome};

/// One opened file together with the changelist that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedOutFile {
    pub file: OpenedFile,
    pub changelist: Changelist,
    pub local_path: PathBuf,
}

impl CheckedOutFile {
    fn pick_item(&self) -> PickItem {
        PickItem::multi([
            self.file.file_name().to_string(),
            format!("Changelist: {}", self.changelist.number),
            self.changelist.description.clone(),
            self.local_path.display().to_string(),
        ])
    }
}

/// Per-chain state while walking changelists one `opened` query at a time.
struct CheckedOutScan {
    client_root: PathBuf,
    remaining: VecDeque<Changelist>,
    files: Vec<CheckedOutFile>,
}

impl CheckedOutScan {
    fn new(client_root: PathBuf, pending: Vec<Changelist>) -> Self {
        let mut remaining = VecDeque::with_capacity(pending.len() + 1);
        remaining.push_back(Changelist::default_changelist());
        remaining.extend(pending);
        Self {
            client_root,
            remaining,
            files: Vec::new(),
        }
    }

    fn absorb(&mut self, changelist: &Changelist, opened: Vec<OpenedFile>) {
        let root: &Path = &self.client_root;
        self.files.extend(opened.into_iter().map(|file| CheckedOutFile {
            local_path: file.local_path(root),
            changelist: changelist.clone(),
            file,
        }));
    }
}

/// Every file opened by the current user, the default changelist first.
///
/// A changelist reporting "File(s) not opened on this client." counts as empty.
pub async fn collect_checked_out_files(chain: &mut Chain<'_>) -> Result<Vec<CheckedOutFile>> {
    let info = p4_info(chain).await?;
    let client_root = client_root_from(chain, &info).await?;
    let user = user_from(&info)?;
    let pending = pending_changelists_for(chain, &user).await?;

    let mut scan = CheckedOutScan::new(client_root, pending);
    while let Some(changelist) = scan.remaining.pop_front() {
        let opened = chain
            .step(
                &["opened", "-c", &changelist.number],
                DispatchOptions::new().allow_error(NO_OPENED_FILES_ERROR),
                |output| Ok(parse_opened_files(output)),
            )
            .await?;
        tracing::debug!(changelist = %changelist.number, files = opened.len(), "Collected opened files");
        scan.absorb(&changelist, opened);
    }

    Ok(scan.files)
}

/// Show every checked-out file and open the one picked.
pub async fn list_checked_out_files(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let files = collect_checked_out_files(chain).await?;

    if files.is_empty() {
        let message = "There are no checked out files".to_string();
        chain.app().dispatcher.show_panel(&message).await;
        return Ok(WorkflowOutcome::NothingFound { message });
    }

    let items = files.iter().map(CheckedOutFile::pick_item).collect();
    let picked = chain.host().pick(items).await.and_then(|index| files.get(index));
    match picked {
        Some(file) => {
            chain.host().open_file(&file.local_path).await;
            Ok(WorkflowOutcome::Completed)
        }
        None => Ok(WorkflowOutcome::Cancelled),
    }
}
