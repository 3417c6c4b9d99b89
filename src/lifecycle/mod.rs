//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Connect database → Bind listener → Run
//!
//! Shutdown (shutdown.rs):
//!     Run context cancelled → Stop accepting → Drain connections → Closed
//!     close()               → Stop accepting → Cut connections   → Closed
//!
//! Signals (signals.rs):
//!     first SIGTERM/SIGINT  → cancel run context (graceful)
//!     second signal/grace   → close() (forced)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then storage, then listener
//! - Ordered shutdown: stop accept, drain, close database
//! - Shutdown has a grace deadline: forced close after it

pub mod shutdown;
pub mod signals;
pub mod state;

pub use shutdown::Shutdown;
pub use state::LifecycleState;
