//! Step-by-step execution of one multi-command workflow.
//!
//! A chain moves through
//! `Idle -> Dispatching(i) -> Parsing(i) -> {Dispatching(i+1) | Succeeded | Failed}`.
//! Step `i + 1` is only issued after step `i` has been parsed, and a failed
//! step ends the chain: nothing is retried.

use std::fmt;

use crate::config::AppConfig;
use crate::dispatch::{DispatchOptions, DocumentContext};
use crate::error::{AppError, Result};
use crate::host::Host;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Idle,
    Dispatching { step: usize },
    Parsing { step: usize },
    Succeeded,
    Failed,
}

impl ChainState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChainState::Succeeded | ChainState::Failed)
    }
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainState::Idle => write!(f, "idle"),
            ChainState::Dispatching { step } => write!(f, "dispatching({step})"),
            ChainState::Parsing { step } => write!(f, "parsing({step})"),
            ChainState::Succeeded => write!(f, "succeeded"),
            ChainState::Failed => write!(f, "failed"),
        }
    }
}

/// One in-flight workflow. Owns its context exclusively.
pub struct Chain<'a> {
    name: &'static str,
    state: ChainState,
    steps: usize,
    app: &'a AppState,
    ctx: DocumentContext,
}

impl<'a> Chain<'a> {
    pub fn new(name: &'static str, app: &'a AppState, ctx: DocumentContext) -> Self {
        Self {
            name,
            state: ChainState::Idle,
            steps: 0,
            app,
            ctx,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Number of commands dispatched so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn app(&self) -> &'a AppState {
        self.app
    }

    pub fn config(&self) -> &'a AppConfig {
        &self.app.config
    }

    pub fn host(&self) -> &'a dyn Host {
        self.app.host.as_ref()
    }

    pub fn ctx(&self) -> &DocumentContext {
        &self.ctx
    }

    fn transition(&mut self, next: ChainState) {
        tracing::debug!(chain = self.name, from = %self.state, to = %next, "Chain transition");
        self.state = next;
    }

    /// Dispatch one command and parse its cleaned output.
    pub async fn step<T, F>(&mut self, args: &[&str], options: DispatchOptions, parse: F) -> Result<T>
    where
        F: FnOnce(&str) -> Result<T>,
    {
        if self.state.is_terminal() {
            return Err(AppError::Workflow(format!(
                "chain '{}' already {}",
                self.name, self.state
            )));
        }

        let step = self.steps;
        self.steps += 1;

        self.transition(ChainState::Dispatching { step });
        let output = match self.app.dispatcher.dispatch(&self.ctx, args, options).await {
            Ok(output) => output,
            Err(e) => {
                self.transition(ChainState::Failed);
                return Err(e);
            }
        };

        self.transition(ChainState::Parsing { step });
        match parse(&output) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(chain = self.name, step = step, error = %e, "Failed to parse p4 output");
                self.transition(ChainState::Failed);
                Err(e)
            }
        }
    }

    /// Dispatch one command and keep its cleaned output as-is.
    pub async fn run(&mut self, args: &[&str], options: DispatchOptions) -> Result<String> {
        self.step(args, options, |output| Ok(output.to_string())).await
    }

    /// Move to the terminal state matching `result`.
    pub fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        if !self.state.is_terminal() {
            let next = if result.is_ok() {
                ChainState::Succeeded
            } else {
                ChainState::Failed
            };
            self.transition(next);
        }
        result
    }
}
