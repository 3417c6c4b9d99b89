//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use profiles::http::{HttpServer, ServerError};
use profiles::net::Listener;
use profiles::users::{self, ApiKey, RepositoryError, UserProfile, UsersRepository};

/// In-memory users store.
#[derive(Default, Clone)]
pub struct InMemoryUsers {
    pub profiles: Vec<UserProfile>,
    pub keys: Vec<ApiKey>,
    /// Delay applied to profile listings, to keep requests in flight.
    pub list_delay: Option<Duration>,
    /// Make profile lookups fail like a lost database connection.
    pub broken: bool,
    /// Make api key loads fail.
    pub keys_broken: bool,
}

#[async_trait]
impl UsersRepository for InMemoryUsers {
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, RepositoryError> {
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        if self.broken {
            return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
        }
        Ok(self.profiles.clone())
    }

    async fn profile_by_username(&self, user_name: &str) -> Result<UserProfile, RepositoryError> {
        if self.broken {
            return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
        }
        self.profiles
            .iter()
            .find(|p| p.user_name == user_name)
            .cloned()
            .ok_or_else(|| RepositoryError::NoUser(user_name.to_string()))
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, RepositoryError> {
        if self.keys_broken {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.keys.clone())
    }
}

/// Store with user `alice` and api key `k1`.
pub fn alice_store() -> InMemoryUsers {
    InMemoryUsers {
        profiles: vec![UserProfile {
            id: 1,
            user_name: "alice".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            city: "X".into(),
            school: "Y".into(),
        }],
        keys: vec![ApiKey {
            id: 1,
            api_key: "k1".into(),
        }],
        ..Default::default()
    }
}

/// A server running in the background on an ephemeral port.
pub struct TestServer {
    pub server: Arc<HttpServer>,
    pub ctx: CancellationToken,
    pub handle: JoinHandle<Result<(), ServerError>>,
    pub base_url: String,
}

/// Bind an ephemeral port and run a server over `store`.
pub async fn start_server(store: InMemoryUsers) -> TestServer {
    let server = Arc::new(bind_server(store).await);
    let base_url = format!("http://{}", server.local_addr());

    let ctx = CancellationToken::new();
    let handle = tokio::spawn({
        let server = Arc::clone(&server);
        let ctx = ctx.clone();
        async move { server.run(ctx).await }
    });

    TestServer {
        server,
        ctx,
        handle,
        base_url,
    }
}

/// Bind an ephemeral port without starting the server.
pub async fn bind_server(store: InMemoryUsers) -> HttpServer {
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let listener = Listener::from_tcp(tcp, 128);
    HttpServer::new(listener, Arc::new(users::Service::new(store))).unwrap()
}

/// HTTP client without connection pooling or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
