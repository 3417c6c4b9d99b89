//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Build the router with all handlers and middleware
//! - Own the listener and every connection task
//! - Serve HTTP/1.1 and HTTP/2 via hyper
//! - Coordinate graceful shutdown (run context) and forced shutdown (close)

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{body::Body, http::Request, Router};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tower::Service as _;

use crate::http::routes::build_router;
use crate::lifecycle::{LifecycleState, Shutdown};
use crate::net::{ConnectionGuard, ConnectionPermit, ConnectionTracker, Listener, ListenerError};
use crate::users;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<users::Service>,
}

/// Error type for the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The accept loop hit an unrecoverable error.
    #[error("http server error: {0}")]
    Accept(#[source] ListenerError),

    /// `run` was called while the server is already serving.
    #[error("http server error: already running")]
    AlreadyRunning,

    /// The listener's local address could not be read.
    #[error("http server error: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// HTTP server exposing user profiles.
pub struct HttpServer {
    router: Router,
    listener: Mutex<Option<Listener>>,
    local_addr: SocketAddr,
    shutdown: Shutdown,
    state: watch::Sender<LifecycleState>,
    connections: ConnectionTracker,
}

impl HttpServer {
    /// Create a server on an already bound listener.
    pub fn new(listener: Listener, users: Arc<users::Service>) -> Result<Self, ServerError> {
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;
        let router = build_router(AppState { users });
        let (state, _) = watch::channel(LifecycleState::Created);

        Ok(Self {
            router,
            listener: Mutex::new(Some(listener)),
            local_addr,
            shutdown: Shutdown::new(),
            state,
            connections: ConnectionTracker::new(),
        })
    }

    /// Serve until `ctx` is cancelled or [`close`](Self::close) is called.
    ///
    /// Cancelling `ctx` stops accepting and waits for in-flight requests.
    /// Returns once the listener is released and every connection is gone.
    /// A server that was closed before it ran returns `Ok(())` at once.
    pub async fn run(&self, ctx: CancellationToken) -> Result<(), ServerError> {
        let listener = {
            let mut slot = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.take() {
                Some(listener) => listener,
                None if self.state().is_closed() => return Ok(()),
                None => return Err(ServerError::AlreadyRunning),
            }
        };

        self.transition(LifecycleState::Running);
        tracing::info!(address = %self.local_addr, "HTTP server starting");

        let ctx = ctx.child_token();
        let ((), served) = tokio::join!(
            self.watch_cancellation(ctx.clone()),
            self.serve(listener, ctx),
        );

        served
    }

    /// Stop immediately: release the listener and cut every connection,
    /// in-flight requests included.
    pub fn close(&self) {
        self.shutdown.terminate();

        let idle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if idle.is_some() {
            // Never ran, nothing else to wait for.
            drop(idle);
            self.transition(LifecycleState::Closed);
        } else {
            self.transition(LifecycleState::ShuttingDown);
        }
        tracing::info!("HTTP server closing");
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Receiver notified on every lifecycle transition.
    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Number of open client connections.
    pub fn active_connections(&self) -> usize {
        self.connections.active_count()
    }

    fn transition(&self, next: LifecycleState) -> bool {
        let changed = self.state.send_if_modified(|state| {
            if state.can_transition_to(next) {
                *state = next;
                true
            } else {
                false
            }
        });
        if changed {
            tracing::debug!(state = %next, "HTTP server state changed");
        }
        changed
    }

    /// Begin a graceful shutdown once the run context is cancelled.
    async fn watch_cancellation(&self, ctx: CancellationToken) {
        ctx.cancelled().await;
        if self.transition(LifecycleState::ShuttingDown) {
            tracing::info!("Run context cancelled, draining connections");
        }
        self.shutdown.drain();
    }

    /// Accept loop. Cancels `ctx` on exit so the watcher finishes too.
    async fn serve(&self, listener: Listener, ctx: CancellationToken) -> Result<(), ServerError> {
        let _stop_watcher = ctx.drop_guard();
        let mut connections = JoinSet::new();

        let result = loop {
            tokio::select! {
                biased;
                _ = self.shutdown.draining() => break Ok(()),
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    log_finished(joined);
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => {
                        let guard = self.connections.track();
                        connections.spawn(serve_connection(
                            stream,
                            peer,
                            permit,
                            guard,
                            self.router.clone(),
                            self.shutdown.clone(),
                        ));
                    }
                    Err(e) if e.is_transient() => {
                        tracing::warn!(error = %e, "Accept failed, continuing");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Accept loop failed");
                        break Err(ServerError::Accept(e));
                    }
                },
            }
        };

        drop(listener);
        self.transition(LifecycleState::ShuttingDown);
        tracing::info!(in_flight = connections.len(), "Listener closed, draining connections");

        // Accept failures drain too; close() has already terminated.
        self.shutdown.drain();
        while let Some(joined) = connections.join_next().await {
            log_finished(joined);
        }

        self.transition(LifecycleState::Closed);
        tracing::info!("HTTP server stopped");
        result
    }
}

/// Serve a single connection until it ends or the server shuts down.
async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    _permit: ConnectionPermit,
    guard: ConnectionGuard,
    router: Router,
    shutdown: Shutdown,
) {
    let service = hyper::service::service_fn(move |request: Request<Incoming>| {
        router.clone().call(request.map(Body::new))
    });

    let builder = auto::Builder::new(TokioExecutor::new());
    let connection = builder.serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    let mut draining = false;
    loop {
        tokio::select! {
            biased;
            _ = shutdown.terminated() => {
                tracing::debug!(connection_id = %guard.id(), peer_addr = %peer, "Connection terminated");
                break;
            }
            _ = shutdown.draining(), if !draining => {
                draining = true;
                connection.as_mut().graceful_shutdown();
            }
            result = connection.as_mut() => {
                if let Err(e) = result {
                    tracing::debug!(connection_id = %guard.id(), peer_addr = %peer, error = %e, "Connection error");
                }
                break;
            }
        }
    }
}

fn log_finished(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            tracing::error!(error = %e, "Connection task panicked");
        }
    }
}
