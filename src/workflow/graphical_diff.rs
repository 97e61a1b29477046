use std::path::{Path, PathBuf};

use crate::dispatch::DispatchOptions;
use crate::error::Result;
use crate::workflow::changelists::{check_depot_file, path_arg};
use crate::workflow::{Chain, WorkflowOutcome};

/// Placeholder values for a graphical diff command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPaths {
    pub depot_file_path: String,
    pub depot_file_name: String,
    pub file_path: String,
    pub file_name: String,
}

/// Substitute `%depotfile_path`, `%depotfile_name`, `%file_path`, `%file_name`.
pub fn expand_diff_command(template: &str, paths: &DiffPaths) -> String {
    template
        .replace("%depotfile_path", &paths.depot_file_path)
        .replace("%depotfile_name", &paths.depot_file_name)
        .replace("%file_path", &paths.file_path)
        .replace("%file_name", &paths.file_name)
}

/// `p4 print` output without its `//depot/...#rev - ...` header line.
pub fn depot_content(printed: &str, line_separator: &str) -> String {
    printed
        .lines()
        .skip(1)
        .collect::<Vec<_>>()
        .join(line_separator)
}

/// Compare the active file against its depot revision in an external tool.
///
/// The depot copy lives in a temporary directory that is removed once the
/// tool exits.
pub async fn graphical_diff(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let file = check_depot_file(chain).await?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let folder = file.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let separator = chain.config().behavior.end_line_separator.clone();
    let content = chain
        .step(&["print", &path_arg(&file)], DispatchOptions::new(), |printed| {
            Ok(depot_content(printed, &separator))
        })
        .await?;

    let temp_dir = tempfile::Builder::new().prefix("p4bridge").tempdir()?;
    let depot_file_name = format!("depot{file_name}");
    let depot_copy = temp_dir.path().join(&depot_file_name);
    tokio::fs::write(&depot_copy, content).await?;

    let template = chain.app().diff_command().await;
    let command = expand_diff_command(
        &template,
        &DiffPaths {
            depot_file_path: path_arg(&depot_copy),
            depot_file_name,
            file_path: path_arg(&file),
            file_name,
        },
    );

    let dispatcher = &chain.app().dispatcher;
    let invocation = dispatcher.shell_invocation(command, folder);
    let line = invocation.command_line();
    tracing::info!(command = %line, "Launching graphical diff");

    let raw = match dispatcher.execute(invocation, "Launching graphical diff").await {
        Ok(raw) => raw,
        Err(e) => {
            dispatcher.report_launch_failure(&e).await;
            return Err(e);
        }
    };
    if raw.exit_code != 0 {
        tracing::warn!(command = %line, exit_code = raw.exit_code, "Graphical diff tool failed");
        dispatcher
            .show_panel(&crate::dispatch::format_command_output(&line, raw.output.trim_end()))
            .await;
    }

    drop(temp_dir);
    Ok(WorkflowOutcome::Completed)
}
