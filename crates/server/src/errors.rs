use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Unique error codes for client identification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database errors (1xxx)
    DatabaseConnection = 1001,
    DatabaseQuery = 1002,

    // Validation errors (2xxx)
    ValidationFailed = 2001,
    InvalidFormat = 2002,
    MissingField = 2003,

    // Resource errors (4xxx)
    NotFound = 4001,
    InvalidReference = 4002,

    // Import errors (5xxx)
    ImportAborted = 5001,

    // Internal errors (9xxx)
    InternalError = 9001,
    ConfigurationError = 9002,
}

impl ErrorCode {
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// Application error types with HTTP mapping
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    // Resource errors
    #[error("Resource not found: {resource_type} with id {resource_id}")]
    NotFound {
        resource_type: String,
        resource_id: String,
    },

    /// A write referenced an entity that does not exist (e.g. an order
    /// created against an unknown catalog). Client-correctable, hence 400.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    // Import errors
    #[error("Import aborted, no rows were applied: {0}")]
    ImportAborted(String),

    // Database errors
    #[error("Database connection error: {0}")]
    DatabaseConnection(String),

    #[error("Database query error: {0}")]
    Database(#[from] sea_orm::DbErr),

    // Internal errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::InvalidFormat(_) => ErrorCode::InvalidFormat,
            Self::MissingField(_) => ErrorCode::MissingField,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::InvalidReference(_) => ErrorCode::InvalidReference,
            Self::ImportAborted(_) => ErrorCode::ImportAborted,
            Self::DatabaseConnection(_) => ErrorCode::DatabaseConnection,
            Self::Database(_) => ErrorCode::DatabaseQuery,
            Self::Config(_) => ErrorCode::ConfigurationError,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidFormat(_)
            | Self::MissingField(_)
            | Self::InvalidReference(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ImportAborted(_)
            | Self::Database(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(error_code = error_code.as_u16(), %message, error = ?self, "Server error");
        } else {
            tracing::debug!(error_code = error_code.as_u16(), %message, "Client error");
        }

        let body = Json(json!({
            "error": {
                "code": error_code.as_u16(),
                "status": status.as_u16(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Helper macro for creating NotFound errors
#[macro_export]
macro_rules! not_found {
    ($resource_type:expr, $resource_id:expr) => {
        $crate::errors::AppError::NotFound {
            resource_type: $resource_type.to_string(),
            resource_id: $resource_id.to_string(),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::Validation("page must be >= 1".into());
        assert_eq!(err.error_code(), ErrorCode::ValidationFailed);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_invalid_reference_is_client_error() {
        // an order pointed at a missing catalog is correctable by the caller
        let err = AppError::InvalidReference("catalogo_id 99 does not exist".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_macro() {
        let err = not_found!("pedido", "abc-123");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("pedido"));
        assert!(err.to_string().contains("abc-123"));
    }

    #[test]
    fn test_import_aborted_is_server_error() {
        let err = AppError::ImportAborted("row 4 violated a constraint".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
    }
}
