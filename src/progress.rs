//! Status-bar activity indicator for a running command.
//!
//! The reporter never touches the command's result. It only watches a
//! liveness signal that the worker drops when it exits.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::host::Host;

/// Held by the worker for as long as it runs.
pub struct AliveGuard {
    _tx: watch::Sender<()>,
}

/// Observes whether the matching `AliveGuard` still exists.
#[derive(Clone)]
pub struct Liveness {
    rx: watch::Receiver<()>,
}

pub fn liveness() -> (AliveGuard, Liveness) {
    let (tx, rx) = watch::channel(());
    (AliveGuard { _tx: tx }, Liveness { rx })
}

impl Liveness {
    pub fn is_alive(&self) -> bool {
        self.rx.has_changed().is_ok()
    }

    /// Resolves once the guard has been dropped.
    pub async fn finished(&mut self) {
        while self.rx.changed().await.is_ok() {}
    }
}

/// Bouncing `[   =    ]` bar.
#[derive(Debug, Clone)]
pub struct PingPong {
    width: usize,
    position: usize,
    forward: bool,
}

impl PingPong {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            position: 0,
            forward: true,
        }
    }

    /// Render the current frame, then move the marker one step.
    pub fn next_frame(&mut self, message: &str) -> String {
        let before = self.position;
        let after = self.width - 1 - before;
        let frame = format!("{message} [{}={}]", " ".repeat(before), " ".repeat(after));

        if self.width > 1 {
            if before == 0 {
                self.forward = true;
            } else if after == 0 {
                self.forward = false;
            }
            if self.forward {
                self.position += 1;
            } else {
                self.position -= 1;
            }
        }

        frame
    }
}

/// Animate `message` in the status area until the worker exits, then leave
/// `message` as the final status.
pub async fn report(
    host: Arc<dyn Host>,
    message: String,
    mut liveness: Liveness,
    tick: Duration,
    width: usize,
) {
    let mut frames = PingPong::new(width);
    let mut ticks = interval_at(Instant::now() + tick, tick);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while liveness.is_alive() {
        tokio::select! {
            biased;
            _ = liveness.finished() => break,
            _ = ticks.tick() => {
                host.status_message(&frames.next_frame(&message)).await;
            }
        }
    }

    host.status_message(&message).await;
}

pub fn spawn(
    host: Arc<dyn Host>,
    message: String,
    liveness: Liveness,
    tick: Duration,
    width: usize,
) -> JoinHandle<()> {
    tokio::spawn(report(host, message, liveness, tick, width))
}
