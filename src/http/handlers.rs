//! Request handlers.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::response::{json, ApiError};
use crate::http::server::AppState;

/// Query parameter selecting a single profile.
pub const USERNAME_PARAM: &str = "username";

/// Value of the first `username` pair, unless it is empty.
fn requested_user(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(name, _)| name == USERNAME_PARAM)
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
}

/// `GET /profile`: one profile when `username` is given, every profile
/// otherwise.
pub async fn get_profile(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    match requested_user(&params) {
        Some(user_name) => {
            let profile = state.users.profile_by_username(user_name).await?;
            Ok(json(StatusCode::OK, &profile))
        }
        None => {
            let profiles = state.users.user_profiles().await?;
            Ok(json(StatusCode::OK, &profiles))
        }
    }
}

/// Fallback for every other path: baseline headers, empty body.
pub async fn app_handler() -> impl IntoResponse {
    [
        (header::CONTENT_TYPE, "text/html; charset=UTF-8"),
        (header::REFERRER_POLICY, "same-origin"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_username_wins() {
        let query = params(&[("username", "alice"), ("username", "bob")]);
        assert_eq!(requested_user(&query), Some("alice"));
    }

    #[test]
    fn empty_or_missing_username_lists() {
        assert_eq!(requested_user(&params(&[])), None);
        assert_eq!(requested_user(&params(&[("username", "")])), None);
        assert_eq!(requested_user(&params(&[("user", "alice")])), None);
    }
}
