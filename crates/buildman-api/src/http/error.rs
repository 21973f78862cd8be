//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use buildman_types::error::{ChangeError, ImportError, RepositoryError};

use super::response::ApiResponse;

#[derive(Debug)]
pub enum AppError {
    Repository(RepositoryError),
    Change(ChangeError),
    /// Import payload rejected before anything changed.
    Import(ImportError),
    NotFound(String),
    Validation(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<ChangeError> for AppError {
    fn from(e: ChangeError) -> Self {
        AppError::Change(e)
    }
}

impl From<ImportError> for AppError {
    fn from(e: ImportError) -> Self {
        AppError::Import(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                "BUILD_NOT_FOUND",
                format!("Build '{id}' not found"),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Import(e) => (StatusCode::BAD_REQUEST, "IMPORT_REJECTED", e.to_string()),
            AppError::Change(e @ (ChangeError::UnknownFraction(_) | ChangeError::UnknownInventory(_))) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Change(e @ ChangeError::Remote { .. }) => {
                (StatusCode::BAD_GATEWAY, "REMOTE_ERROR", e.to_string())
            }
            AppError::Change(e @ ChangeError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Repository(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::warn!(code, %message, "request failed");
        }
        (status, Json(ApiResponse::failure(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildman_types::error::{ChangeStep, RemoteError};

    #[test]
    fn test_status_mapping() {
        let remote = AppError::Change(ChangeError::Remote {
            step: ChangeStep::Army,
            source: RemoteError::Status {
                path: "/army_apply.php".to_string(),
                status: 500,
            },
        });
        assert_eq!(remote.parts().0, StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::Change(ChangeError::UnknownFraction("99".to_string())).parts().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("b1".to_string()).parts().1, "BUILD_NOT_FOUND");
        assert_eq!(
            AppError::Import(ImportError::NotAnArray).parts(),
            (
                StatusCode::BAD_REQUEST,
                "IMPORT_REJECTED",
                "payload is not an array".to_string()
            )
        );
    }
}
