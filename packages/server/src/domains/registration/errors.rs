//! Registration error taxonomy and its HTTP mapping.
//!
//! Known failure kinds reach the client with their specific status code and a
//! user-safe message. Anything unanticipated is logged server-side with its
//! full chain and collapsed to `internal` with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors raised by the registration handlers
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ResourceExhausted(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    DeadlineExceeded(String),

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl RegistrationError {
    /// Collapse an unexpected failure to `internal`, keeping the source chain
    /// for server-side logging only.
    pub fn internal(message: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Internal {
            message: message.into(),
            source,
        }
    }

    /// Wire status code (the callable protocol's kebab-case error codes).
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid-argument",
            Self::NotFound(_) => "not-found",
            Self::ResourceExhausted(_) => "resource-exhausted",
            Self::PermissionDenied(_) => "permission-denied",
            Self::DeadlineExceeded(_) => "deadline-exceeded",
            Self::Internal { .. } => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ResourceExhausted(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        if let Self::Internal { message, source } = &self {
            // Full detail stays server-side; the client only sees `message`.
            tracing::error!(error = ?source, "{}", message);
        }

        let body = json!({
            "error": {
                "status": self.code(),
                "message": self.to_string(),
            }
        });

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(
            RegistrationError::InvalidArgument("x".into()).code(),
            "invalid-argument"
        );
        assert_eq!(RegistrationError::NotFound("x".into()).code(), "not-found");
        assert_eq!(
            RegistrationError::ResourceExhausted("x".into()).code(),
            "resource-exhausted"
        );
        assert_eq!(
            RegistrationError::PermissionDenied("x".into()).code(),
            "permission-denied"
        );
        assert_eq!(
            RegistrationError::DeadlineExceeded("x".into()).code(),
            "deadline-exceeded"
        );
        assert_eq!(
            RegistrationError::internal("x", anyhow::anyhow!("boom")).code(),
            "internal"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RegistrationError::InvalidArgument("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistrationError::ResourceExhausted("x".into()).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            RegistrationError::DeadlineExceeded("x".into()).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_internal_message_hides_source() {
        let err = RegistrationError::internal(
            "Failed to send verification code",
            anyhow::anyhow!("connection refused (db=10.0.0.3)"),
        );
        assert_eq!(err.to_string(), "Failed to send verification code");
    }
}
