use thiserror::Error;

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client-side error types
///
/// Background sync failures are represented like any other error but are
/// swallowed (logged, never surfaced) by the cart controller; only explicit
/// user actions propagate errors to the caller.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// True for a 404 from the order store — the one failure order-link
    /// resolution treats as "start fresh" rather than an error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = ClientError::Api {
            status: 404,
            message: "Resource not found".into(),
        };
        assert!(err.is_not_found());

        let err = ClientError::Api {
            status: 400,
            message: "bad".into(),
        };
        assert!(!err.is_not_found());
    }
}
