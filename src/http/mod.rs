//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, hyper connection, shutdown)
//!     → routes.rs (request id, tracing, metrics, route table)
//!     → middleware/auth.rs (api key gate on /profile)
//!     → handlers.rs (profile lookups)
//!     → response.rs (JSON encoding, error envelope)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;

pub use response::{ApiError, ErrorEnvelope};
pub use server::{AppState, HttpServer, ServerError};
