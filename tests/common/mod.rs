#![allow(dead_code)]

use std::sync::Arc;

use p4bridge::config::AppConfig;
use p4bridge::host::RecordingHost;
use p4bridge::runner::ScriptedRunner;
use p4bridge::state::AppState;

/// A state wired to a scripted `p4` and a recording host.
pub struct Harness {
    pub runner: Arc<ScriptedRunner>,
    pub host: Arc<RecordingHost>,
    pub state: Arc<AppState>,
}

pub fn harness() -> Harness {
    harness_with(AppConfig::default())
}

pub fn harness_with(config: AppConfig) -> Harness {
    let runner = Arc::new(ScriptedRunner::new());
    let host = Arc::new(RecordingHost::new());
    let state = Arc::new(AppState::new(config, runner.clone(), host.clone()));
    Harness {
        runner,
        host,
        state,
    }
}

/// `p4 -s info` output for `user` with the given client root and server release.
pub fn info_output(user: &str, root: &str, release: &str) -> String {
    format!(
        "info: User name: {user}\n\
         info: Client name: {user}-ws\n\
         info: Client root: {root}\n\
         info: Server version: P4D/LINUX26X86_64/{release}/536738 (2012/10/16)\n\
         exit: 0\n"
    )
}

/// Prefix every line with `info: ` and append the exit marker, as `p4 -s` does.
pub fn tagged(lines: &str) -> String {
    let mut out: String = lines.lines().map(|l| format!("info: {l}\n")).collect();
    out.push_str("exit: 0\n");
    out
}

pub fn args(call: &[&str]) -> Vec<String> {
    call.iter().map(|a| a.to_string()).collect()
}
