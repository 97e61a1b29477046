use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::host::Host;
use crate::runner::ProcessRunner;

/// Choices made during this run that are not written back to configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub diff_app: Option<String>,
    pub diff_command: Option<String>,
}

/// A chain that has started and not yet reached a terminal state.
#[derive(Debug, Clone)]
pub struct InFlightChain {
    pub id: u64,
    pub name: String,
    pub started: Instant,
}

impl InFlightChain {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub host: Arc<dyn Host>,
    pub dispatcher: Dispatcher,
    pub session: RwLock<Session>,
    in_flight: RwLock<BTreeMap<u64, InFlightChain>>,
    next_chain_id: AtomicU64,
}

impl AppState {
    pub fn new(config: AppConfig, runner: Arc<dyn ProcessRunner>, host: Arc<dyn Host>) -> Self {
        let dispatcher = Dispatcher::new(&config, runner, Arc::clone(&host));
        let session = RwLock::new(Session {
            diff_app: config.diff.selected_app.clone(),
            diff_command: config.diff.command.clone(),
        });

        Self {
            config,
            host,
            dispatcher,
            session,
            in_flight: RwLock::new(BTreeMap::new()),
            next_chain_id: AtomicU64::new(1),
        }
    }

    /// Graphical diff template: the session's selection, else the configured default.
    pub async fn diff_command(&self) -> String {
        self.session
            .read()
            .await
            .diff_command
            .clone()
            .filter(|command| !command.trim().is_empty())
            .unwrap_or_else(|| self.config.diff.default_command.clone())
    }

    pub async fn begin_chain(&self, name: &str) -> u64 {
        let id = self.next_chain_id.fetch_add(1, Ordering::Relaxed);
        self.in_flight.write().await.insert(
            id,
            InFlightChain {
                id,
                name: name.to_string(),
                started: Instant::now(),
            },
        );
        id
    }

    pub async fn end_chain(&self, id: u64) {
        self.in_flight.write().await.remove(&id);
    }

    /// Chains still running, oldest first.
    pub async fn get_in_flight_chains(&self) -> Vec<InFlightChain> {
        self.in_flight.read().await.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::runner::ScriptedRunner;

    fn state(config: AppConfig) -> AppState {
        AppState::new(
            config,
            Arc::new(ScriptedRunner::new()),
            Arc::new(RecordingHost::new()),
        )
    }

    #[tokio::test]
    async fn test_in_flight_chains_are_tracked_until_ended() {
        let state = state(AppConfig::default());

        let first = state.begin_chain("submit").await;
        let second = state.begin_chain("diff").await;
        assert_ne!(first, second);

        let names: Vec<String> = state
            .get_in_flight_chains()
            .await
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["submit", "diff"]);

        state.end_chain(first).await;
        assert_eq!(state.get_in_flight_chains().await.len(), 1);
    }

    #[tokio::test]
    async fn test_diff_command_prefers_session_choice() {
        let state = state(AppConfig::default());
        assert!(state.diff_command().await.starts_with("p4merge"));

        state.session.write().await.diff_command = Some("meld %depotfile_path %file_path".to_string());
        assert_eq!(state.diff_command().await, "meld %depotfile_path %file_path");
    }
}
