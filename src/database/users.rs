//! MySQL implementation of the users repository.

use async_trait::async_trait;
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;

use crate::users::{ApiKey, RepositoryError, UserProfile, UsersRepository};

const PROFILES_QUERY: &str = r"SELECT `user`.id, `user`.username, user_profile.first_name,
        user_profile.last_name, user_profile.city, user_data.school
    FROM `user`
    LEFT JOIN user_profile ON `user`.id = user_profile.user_id
    LEFT JOIN user_data ON `user`.id = user_data.user_id";

/// Joined profile row. Profile and school columns are NULL for users
/// without the matching rows.
#[derive(Debug, FromRow)]
struct ProfileRow {
    id: i64,
    username: String,
    first_name: Option<String>,
    last_name: Option<String>,
    city: Option<String>,
    school: Option<String>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            user_name: row.username,
            first_name: row.first_name.unwrap_or_default(),
            last_name: row.last_name.unwrap_or_default(),
            city: row.city.unwrap_or_default(),
            school: row.school.unwrap_or_default(),
        }
    }
}

#[derive(Debug, FromRow)]
struct ApiKeyRow {
    id: i64,
    api_key: String,
}

/// Keeps `row` only when its username is byte-for-byte `user_name`.
///
/// MySQL string comparison pads trailing spaces, so `'alice '` still matches
/// `'alice'` under a binary collation.
fn exact_match(row: Option<ProfileRow>, user_name: &str) -> Result<UserProfile, RepositoryError> {
    row.filter(|row| row.username == user_name)
        .map(UserProfile::from)
        .ok_or_else(|| RepositoryError::NoUser(user_name.to_string()))
}

/// MySQL users repository.
#[derive(Debug, Clone)]
pub struct MySqlUsers {
    pool: MySqlPool,
}

impl MySqlUsers {
    /// Creates a repository on top of the given pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersRepository for MySqlUsers {
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, RepositoryError> {
        let rows: Vec<ProfileRow> = sqlx::query_as(PROFILES_QUERY)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    async fn profile_by_username(&self, user_name: &str) -> Result<UserProfile, RepositoryError> {
        let query = format!("{PROFILES_QUERY}\n    WHERE `user`.username = ?");
        let row: Option<ProfileRow> = sqlx::query_as(&query)
            .bind(user_name)
            .fetch_optional(&self.pool)
            .await?;

        exact_match(row, user_name)
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, RepositoryError> {
        let rows: Vec<ApiKeyRow> = sqlx::query_as("SELECT id, api_key FROM auth")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ApiKey {
                id: row.id,
                api_key: row.api_key,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_joined_rows_become_empty_strings() {
        let profile = UserProfile::from(ProfileRow {
            id: 7,
            username: "eve".into(),
            first_name: Some("E".into()),
            last_name: None,
            city: None,
            school: None,
        });

        assert_eq!(profile.id, 7);
        assert_eq!(profile.user_name, "eve");
        assert_eq!(profile.first_name, "E");
        assert_eq!(profile.last_name, "");
        assert_eq!(profile.school, "");
    }

    fn row(username: &str) -> ProfileRow {
        ProfileRow {
            id: 1,
            username: username.into(),
            first_name: None,
            last_name: None,
            city: None,
            school: None,
        }
    }

    #[test]
    fn lookup_rejects_padded_or_case_folded_matches() {
        let found = exact_match(Some(row("alice")), "alice").unwrap();
        assert_eq!(found.user_name, "alice");

        for query in ["alice ", "ALICE"] {
            let err = exact_match(Some(row("alice")), query).unwrap_err();
            assert!(matches!(err, RepositoryError::NoUser(ref name) if name == query));
        }

        assert!(matches!(
            exact_match(None, "bob"),
            Err(RepositoryError::NoUser(_))
        ));
    }
}
