//! Response encoding.
//!
//! # Responsibilities
//! - Encode handler results as JSON documents
//! - Map handler errors to status codes and the error envelope
//!
//! # Design Decisions
//! - Bodies are encoded in full before sending, so a response is either a
//!   complete document or empty
//! - Encoding failures are logged; the response keeps its status and
//!   content type with an empty body

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::users::ServiceError;

/// Body of every non-auth error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("users controller error: {0}")]
    Users(#[from] ServiceError),
}

impl ApiError {
    /// Status code sent for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Users(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "could not get profile");
        let envelope = ErrorEnvelope {
            error: self.to_string(),
        };
        json(self.status(), &envelope)
    }
}

/// Encode `value` as a JSON response with the given status.
pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    let body = match serde_json::to_vec(value) {
        Ok(bytes) => Body::from(bytes),
        Err(e) => {
            tracing::error!(error = %e, "failed to write json response");
            Body::empty()
        }
    };

    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::RepositoryError;

    #[test]
    fn every_service_failure_is_a_500() {
        let not_found = ApiError::from(ServiceError::NoUser("bob".into()));
        assert_eq!(not_found.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let broken = ApiError::from(ServiceError::Users(RepositoryError::Database(
            sqlx::Error::PoolClosed,
        )));
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn messages_carry_every_layer() {
        let err = ApiError::from(ServiceError::Users(RepositoryError::Database(
            sqlx::Error::PoolTimedOut,
        )));
        let message = err.to_string();
        assert!(message.starts_with(
            "users controller error: users service error: users repository error:"
        ));
    }

    #[test]
    fn json_sets_content_type() {
        let response = json(StatusCode::OK, &vec![1, 2, 3]);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            HeaderValue::from_static("application/json")
        );
    }
}
