//! Users service: profile lookups and api key authentication.

use thiserror::Error;

use super::{RepositoryError, UserProfile, UsersRepository};

/// Errors surfaced by the users service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Requested user does not exist.
    #[error("user does not exist: {0}")]
    NoUser(String),

    /// Supplied api key is empty or unknown.
    #[error("user unauthenticated error")]
    Unauthenticated,

    /// Any other repository failure.
    #[error("users service error: {0}")]
    Users(#[source] RepositoryError),
}

/// Handles users related logic on top of a repository.
pub struct Service {
    users: Box<dyn UsersRepository>,
}

impl Service {
    /// Create a service that owns the given repository.
    pub fn new(users: impl UsersRepository + 'static) -> Self {
        Self {
            users: Box::new(users),
        }
    }

    /// All user profiles.
    pub async fn user_profiles(&self) -> Result<Vec<UserProfile>, ServiceError> {
        self.users.list_profiles().await.map_err(ServiceError::Users)
    }

    /// Profile of the user with the given username.
    pub async fn profile_by_username(&self, user_name: &str) -> Result<UserProfile, ServiceError> {
        match self.users.profile_by_username(user_name).await {
            Ok(profile) => Ok(profile),
            Err(RepositoryError::NoUser(name)) => Err(ServiceError::NoUser(name)),
            Err(e) => Err(ServiceError::Users(e)),
        }
    }

    /// Check that `api_key` matches one of the stored keys.
    ///
    /// Keys are loaded on every call and compared with a plain linear scan:
    /// no hashing, no constant-time comparison, no rate limiting.
    pub async fn authenticate(&self, api_key: &str) -> Result<(), ServiceError> {
        if api_key.is_empty() {
            return Err(ServiceError::Unauthenticated);
        }

        let keys = self.users.list_api_keys().await.map_err(ServiceError::Users)?;

        if keys.iter().any(|key| key.api_key == api_key) {
            Ok(())
        } else {
            Err(ServiceError::Unauthenticated)
        }
    }
}
