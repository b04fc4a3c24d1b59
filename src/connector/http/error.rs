use std::any::Any;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use super::dto::{ErrorBody, ErrorEnvelope};
use crate::domain::DomainError;

/// Wrapper to make `DomainError` usable as an axum error response.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    /// HTTP status and stable error code for the wrapped error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            DomainError::TeamExists(_) => (StatusCode::BAD_REQUEST, "TEAM_EXISTS"),
            DomainError::PullRequestExists(_) => (StatusCode::CONFLICT, "PR_EXISTS"),
            DomainError::PullRequestMerged(_) => (StatusCode::BAD_REQUEST, "PR_MERGED"),
            DomainError::NotAssigned(_) => (StatusCode::BAD_REQUEST, "NOT_ASSIGNED"),
            DomainError::NoCandidate(_) => (StatusCode::BAD_REQUEST, "NO_CANDIDATE"),
            DomainError::UserInAnotherTeam(_) => (StatusCode::BAD_REQUEST, "USER_IN_ANOTHER_TEAM"),
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DomainError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            DomainError::StorageError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status.is_server_error() {
            error!("Request failed: {}", self.0);
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        envelope(status, code, message)
    }
}

fn envelope(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorEnvelope {
            error: ErrorBody {
                code: code.to_string(),
                message: message.into(),
            },
        }),
    )
        .into_response()
}

/// Gives the bare 408 produced by the timeout layer the usual error body.
pub(super) async fn timeout_envelope(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    warn!("Request timed out");
    envelope(StatusCode::REQUEST_TIMEOUT, "TIMEOUT", "request timed out")
}

/// Response for a handler that panicked.
pub(super) fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    error!("Handler panicked: {}", detail);
    envelope(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "internal server error",
    )
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::invalid_input(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(DomainError::invalid_input(rejection.body_text()))
    }
}
