//! Shutdown fan-out for the front end's long-running tasks.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

/// What ended the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGTERM or Ctrl-C.
    Signal,
    /// The HTTP server stopped on its own.
    ServerExited,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Signal => f.write_str("signal"),
            ShutdownReason::ServerExited => f.write_str("server exited"),
        }
    }
}

/// One-shot stop signal shared by the HTTP server and the config reload task.
///
/// Only the first trigger is broadcast.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
    triggered: AtomicBool,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            triggered: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop every subscriber. Returns false if shutdown was already under way.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        if self.triggered.swap(true, Ordering::AcqRel) {
            return false;
        }
        let listeners = self.tx.send(()).unwrap_or(0);
        tracing::info!(%reason, listeners, "Shutting down");
        true
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
