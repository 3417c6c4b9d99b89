//! User profiles domain.
//!
//! # Data Flow
//! ```text
//! HTTP handler / auth middleware
//!     → service.rs (domain errors, api key check)
//!     → UsersRepository (database::users for MySQL)
//!     → UserProfile / ApiKey
//! ```
//!
//! # Design Decisions
//! - Read-only: nothing here writes to the store
//! - The repository is a trait so the service can be exercised without MySQL
//! - Not-found is its own error kind all the way up to the service

pub mod service;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use service::{Service, ServiceError};

/// Public profile of a user, joined from the user, profile and school tables.
///
/// Phone and address are stored alongside the profile but never leave the
/// database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub school: String,
}

/// API key bound to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: i64,
    pub api_key: String,
}

/// Errors reported by a [`UsersRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No user matches the requested username.
    #[error("user does not exist: {0}")]
    NoUser(String),

    /// Connectivity or query failure.
    #[error("users repository error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read access to stored users.
///
/// Dropping a returned future aborts the underlying query.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// All user profiles. Empty when there are no users.
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, RepositoryError>;

    /// Profile of the user with exactly this username.
    async fn profile_by_username(&self, user_name: &str) -> Result<UserProfile, RepositoryError>;

    /// Every API key known to the store.
    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_serializes_with_public_field_names() {
        let profile = UserProfile {
            id: 1,
            user_name: "alice".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            city: "X".into(),
            school: "Y".into(),
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"userName":"alice","firstName":"A","lastName":"B","city":"X","school":"Y"}"#
        );
    }
}
