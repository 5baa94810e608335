use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-level error taxonomy. Every handler error converges here and is
/// rendered as a JSON `{ "message": ... }` body so clients never see a panic
/// or a bare string.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("This email address is already registered.")]
    DuplicateEmail,
    /// Asset host / chat API failure; the upstream message is considered
    /// safe to surface.
    #[error("{0}")]
    Upstream(String),
    #[error("An error occurred on the server.")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

/// Shorthand for wrapping arbitrary errors at handler seams.
pub fn internal<E: Into<anyhow::Error>>(e: E) -> ApiError {
    ApiError::Internal(e.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("no".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Upstream("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_hides_cause_in_message() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to 10.0.0.3"));
        assert_eq!(err.to_string(), "An error occurred on the server.");
    }

    #[test]
    fn upstream_error_surfaces_message() {
        let err = ApiError::Upstream("API Error: quota exceeded".into());
        assert_eq!(err.to_string(), "API Error: quota exceeded");
    }
}
