pub mod action;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod progress;
pub mod protocol;
pub mod runner;
pub mod shutdown;
pub mod state;
pub mod workflow;
