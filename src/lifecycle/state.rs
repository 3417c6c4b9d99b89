//! Server lifecycle states.

use std::fmt;

/// State of an [`HttpServer`](crate::http::HttpServer).
///
/// ```text
/// Created ──run──▶ Running ──cancel/close──▶ ShuttingDown ──drained──▶ Closed
///    └──────────────────close──────────────────────────────────────────▲
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    /// Listener bound, not serving yet.
    Created,
    /// Accepting connections.
    Running,
    /// No longer accepting, in-flight connections finishing or being cut.
    ShuttingDown,
    /// Listener released, every connection gone.
    Closed,
}

impl LifecycleState {
    /// Whether moving from `self` to `next` is allowed.
    ///
    /// States only move forward. `Created` may jump straight to `Closed`
    /// when the server is closed before it ever ran.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Created, Running)
                | (Created, Closed)
                | (Running, ShuttingDown)
                | (ShuttingDown, Closed)
        )
    }

    /// Whether the server has finished for good.
    pub fn is_closed(self) -> bool {
        self == LifecycleState::Closed
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Created => "created",
            LifecycleState::Running => "running",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Closed => "closed",
        };
        f.write_str(name)
    }
}
