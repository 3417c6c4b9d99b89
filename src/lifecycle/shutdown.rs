//! Shutdown coordination for the server.

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Coordinator for graceful and forced shutdown.
///
/// Cloned into the accept loop and every connection task. Draining stops
/// new work and lets in-flight requests finish; terminating cuts everything
/// immediately. Terminating implies draining.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    drain: CancellationToken,
    terminate: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a graceful shutdown.
    pub fn drain(&self) {
        self.drain.cancel();
    }

    /// Start a forced shutdown.
    pub fn terminate(&self) {
        self.drain.cancel();
        self.terminate.cancel();
    }

    /// Resolves once a graceful or forced shutdown has started.
    pub fn draining(&self) -> WaitForCancellationFuture<'_> {
        self.drain.cancelled()
    }

    /// Resolves once a forced shutdown has started.
    pub fn terminated(&self) -> WaitForCancellationFuture<'_> {
        self.terminate.cancelled()
    }
}
