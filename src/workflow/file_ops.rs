//! Single-file actions on the active document.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::dispatch::DispatchOptions;
use crate::error::Result;
use crate::host::types::ScratchBuffer;
use crate::workflow::changelists::{check_depot_file, path_arg};
use crate::workflow::{Chain, WorkflowOutcome};

/// `==== //depot/a.c#3 - /ws/a.c ====` with nothing after it.
static DIFF_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^={4}.+={4}$").expect("valid diff header regex"));

pub const DIFF_TITLE: &str = "Perforce Diff";
pub const DIFF_SYNTAX: &str = "Diff";

/// Missing files count as not writable.
pub fn is_writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| !meta.permissions().readonly())
        .unwrap_or(false)
}

pub async fn add(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let file = check_depot_file(chain).await?;
    chain
        .run(&["add", &path_arg(&file)], DispatchOptions::new().verbose())
        .await?;
    Ok(WorkflowOutcome::Completed)
}

pub async fn checkout(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let file = check_depot_file(chain).await?;
    if is_writable(&file) {
        let reason = "File is already writable".to_string();
        chain.host().status_message(&reason).await;
        return Ok(WorkflowOutcome::Skipped { reason });
    }

    let output = chain
        .run(&["edit", &path_arg(&file)], DispatchOptions::new())
        .await?;
    if !is_writable(&file) {
        tracing::warn!(file = %file.display(), "File still read-only after p4 edit");
        chain.app().dispatcher.show_panel(&output).await;
    }
    Ok(WorkflowOutcome::Completed)
}

pub async fn delete(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let file = check_depot_file(chain).await?;
    let output = chain
        .run(&["delete", &path_arg(&file)], DispatchOptions::new())
        .await?;

    if file.exists() {
        chain.app().dispatcher.show_panel(&output).await;
    } else {
        chain.host().close_file(&file).await;
    }
    Ok(WorkflowOutcome::Completed)
}

pub async fn revert(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let file = check_depot_file(chain).await?;
    chain
        .run(&["revert", &path_arg(&file)], DispatchOptions::new())
        .await?;
    chain.host().refresh_file(&file).await;
    Ok(WorkflowOutcome::Completed)
}

pub async fn diff(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let file = check_depot_file(chain).await?;
    let file_arg = path_arg(&file);

    let mut args = vec!["diff"];
    if chain.config().behavior.unified_diff {
        args.push("-du");
    }
    args.push(&file_arg);

    let output = chain.run(&args, DispatchOptions::new()).await?;

    if DIFF_HEADER_RE.is_match(output.trim_end()) {
        chain.app().dispatcher.show_panel("No output").await;
    } else {
        chain
            .host()
            .open_scratch(ScratchBuffer {
                title: DIFF_TITLE.to_string(),
                content: output,
                syntax: Some(DIFF_SYNTAX.to_string()),
            })
            .await;
    }
    Ok(WorkflowOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_diff_matches() {
        assert!(DIFF_HEADER_RE.is_match("==== //depot/a.c#3 - /ws/a.c ===="));
        assert!(!DIFF_HEADER_RE.is_match("==== //depot/a.c#3 - /ws/a.c ====\n3c3\n< a\n---\n> b"));
    }

    #[test]
    fn test_is_writable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        assert!(!is_writable(&path));

        std::fs::write(&path, "x").unwrap();
        assert!(is_writable(&path));

        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&path, perms).unwrap();
        assert!(!is_writable(&path));
    }
}
