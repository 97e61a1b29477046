use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::runner::{Invocation, ProcessRunner, RawResult};

enum Scripted {
    Output(RawResult, Duration),
    ToolNotFound,
}

/// A `ProcessRunner` that answers from canned outputs instead of spawning `p4`.
///
/// Responses are keyed by the arguments after the global `-s` flag, so
/// `respond(&["opened", "-c", "default"], ..)` matches `p4 -s opened -c default`.
/// Repeated responses for one key are served in order; the last one is reused.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Mutex<HashMap<Vec<String>, VecDeque<Scripted>>>,
    calls: Mutex<Vec<Invocation>>,
}

fn key_of(args: &[String]) -> Vec<String> {
    match args.first() {
        Some(flag) if flag == "-s" => args[1..].to_vec(),
        _ => args.to_vec(),
    }
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, args: &[&str], scripted: Scripted) {
        let key = args.iter().map(|a| a.to_string()).collect();
        let mut responses = self.responses.lock().unwrap_or_else(|p| p.into_inner());
        responses.entry(key).or_default().push_back(scripted);
    }

    pub fn respond(&self, args: &[&str], output: &str, exit_code: i32) -> &Self {
        self.push(
            args,
            Scripted::Output(RawResult::new(output, exit_code), Duration::ZERO),
        );
        self
    }

    /// Like `respond`, but the process "runs" for `delay` before exiting.
    pub fn respond_after(&self, args: &[&str], output: &str, exit_code: i32, delay: Duration) -> &Self {
        self.push(args, Scripted::Output(RawResult::new(output, exit_code), delay));
        self
    }

    pub fn tool_missing(&self, args: &[&str]) -> &Self {
        self.push(args, Scripted::ToolNotFound);
        self
    }

    /// Every invocation seen so far, in call order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Argument vectors (without `-s`) of every invocation so far.
    pub fn called_args(&self) -> Vec<Vec<String>> {
        self.calls().iter().map(|c| key_of(&c.args)).collect()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<RawResult> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(invocation.clone());

        let key = key_of(&invocation.args);
        let next = {
            let mut responses = self.responses.lock().unwrap_or_else(|p| p.into_inner());
            match responses.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().map(|s| match s {
                    Scripted::Output(result, delay) => Scripted::Output(result.clone(), *delay),
                    Scripted::ToolNotFound => Scripted::ToolNotFound,
                }),
                None => None,
            }
        };

        match next {
            Some(Scripted::Output(result, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(result)
            }
            Some(Scripted::ToolNotFound) => Err(AppError::ToolNotFound(invocation.program.clone())),
            None => Err(AppError::Internal(format!(
                "no scripted response for: {}",
                invocation.command_line()
            ))),
        }
    }
}
