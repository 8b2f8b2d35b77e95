//! Error handling - short human-readable JSON error bodies.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use haiku_core::RepoError;
use haiku_core::ports::GenerationError;
use haiku_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to `{error, details}` responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// A required setting is missing; the message is safe to show.
    Configuration(String),
    /// A collaborator (generation API, KV store) failed.
    Upstream { error: String, details: String },
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Upstream { error, details } => write!(f, "{}: {}", error, details),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) | AppError::Upstream { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => ErrorResponse::new(msg.as_str()),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                ErrorResponse::new(msg.as_str())
            }
            AppError::Upstream { error, details } => {
                tracing::error!(details = %details, "{}", error);
                ErrorResponse::new(error.as_str()).with_details(details.as_str())
            }
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::new("Internal server error")
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(_) => AppError::NotFound("Haiku not found".to_string()),
            RepoError::Store(e) => AppError::Upstream {
                error: "Storage request failed".to_string(),
                details: e.to_string(),
            },
            RepoError::Serialization(msg) => AppError::Internal(msg),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        let details = match err {
            GenerationError::Api { message, .. } => message,
            other => other.to_string(),
        };
        AppError::Upstream {
            error: "Failed to generate haiku".to_string(),
            details,
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use haiku_core::ports::KvError;

    #[test]
    fn test_repo_errors_map_to_status() {
        let not_found: AppError = RepoError::NotFound("haiku_x".to_string()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let store: AppError = RepoError::Store(KvError::Request("timeout".to_string())).into();
        assert_eq!(store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(store, AppError::Upstream { ref details, .. } if details.contains("timeout")));
    }

    #[test]
    fn test_generation_error_keeps_upstream_message() {
        let err: AppError = GenerationError::Api {
            status: 401,
            message: "Invalid API key".to_string(),
        }
        .into();
        match err {
            AppError::Upstream { error, details } => {
                assert_eq!(error, "Failed to generate haiku");
                assert_eq!(details, "Invalid API key");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
