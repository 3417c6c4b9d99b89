//! Profiles service library.
//!
//! Read-only HTTP API over user profiles stored in MySQL, gated by an api
//! key check.
//!
//! ```text
//! client → net::Listener → http::HttpServer → http::routes
//!        → http::middleware::auth → http::handlers
//!        → users::Service → users::UsersRepository (database::MySqlUsers)
//! ```

pub mod config;
pub mod database;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod users;

pub use config::Config;
pub use http::HttpServer;
pub use lifecycle::LifecycleState;
