use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use p4bridge::action::{spawn_action, Action};
use p4bridge::config::AppConfig;
use p4bridge::dispatch::DocumentContext;
use p4bridge::host::ConsoleHost;
use p4bridge::runner::SystemProcessRunner;
use p4bridge::shutdown::{graceful_shutdown, wait_for_shutdown};
use p4bridge::state::AppState;

#[derive(Parser)]
#[command(name = "p4bridge", about = "Run Perforce editor actions from a terminal")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// The file the action applies to, as if it were open in the editor
    #[arg(short, long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    action: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// List your pending changelists
    ListPendingChangelists,
    /// Pick one of your checked-out files
    ListCheckedOutFiles,
    Add,
    Checkout,
    Delete,
    Revert,
    Diff,
    /// Compare against the depot revision in an external diff tool
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
}

impl From<Command> for Action {
    fn from(command: Command) -> Self {
        match command {
            Command::ListPendingChangelists => Action::ListPendingChangelists,
            Command::ListCheckedOutFiles => Action::ListCheckedOutFiles,
            Command::Add => Action::Add,
            Command::Checkout => Action::Checkout,
            Command::Delete => Action::Delete,
            Command::Revert => Action::Revert,
            Command::Diff => Action::Diff,
            Command::GraphicalDiff => Action::GraphicalDiff,
            Command::SelectDiffApplication => Action::SelectDiffApplication,
            Command::Rename => Action::Rename,
            Command::CreateChangelist => Action::CreateChangelist,
            Command::Submit => Action::Submit,
            Command::MoveToChangelist => Action::MoveToChangelist,
            Command::AddDescriptionLine => Action::AddDescriptionLine,
            Command::Shelve => Action::Shelve,
            Command::Unshelve => Action::Unshelve,
            Command::Login => Action::Login,
            Command::Logout => Action::Logout,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing; stdout belongs to the console host
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    let ctx = DocumentContext {
        active_file: cli.file.map(std::path::absolute).transpose()?,
    };
    let action = Action::from(cli.action);

    tracing::info!(
        binary = %config.p4.binary,
        action = action.name(),
        "Starting p4bridge"
    );

    let state = Arc::new(AppState::new(
        config,
        Arc::new(SystemProcessRunner),
        Arc::new(ConsoleHost::new()),
    ));

    let task = spawn_action(Arc::clone(&state), ctx, action);

    tokio::select! {
        joined = task => {
            match joined? {
                Ok(_) => Ok(ExitCode::SUCCESS),
                // Already shown to the user and logged by the chain
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }
        _ = wait_for_shutdown() => {
            graceful_shutdown(&state).await;
            Ok(ExitCode::from(130))
        }
    }
}
