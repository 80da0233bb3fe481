//! Error types for refactoring operations

use thiserror::Error;

/// Everything that can go wrong between loading code and receiving a result
///
/// Each variant maps to one of the user-facing failure classes: transport
/// problems (`Transport`, `Status`, `Decode`), server-side rejections
/// (`Application`), and bad input (`Validation`, `Io`).
#[derive(Error, Debug)]
pub enum RefactorError {
    /// Network failure, timeout or connection refused
    #[error("Could not reach the refactoring service: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("Server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// `success: false` in the response envelope
    #[error("{0}")]
    Application(String),

    /// Input rejected before anything was sent
    #[error("{0}")]
    Validation(String),

    /// Response body was not the expected JSON
    #[error("Invalid response from server: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local file could not be read or written
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl RefactorError {
    /// Build an application error, substituting `fallback` when the server gave no message
    pub fn application(message: Option<String>, fallback: &str) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => RefactorError::Application(m),
            _ => RefactorError::Application(fallback.to_string()),
        }
    }
}

/// Result type for refactoring operations
pub type Result<T> = std::result::Result<T, RefactorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_fallback_message() {
        let err = RefactorError::application(None, "Refactoring failed");
        assert_eq!(err.to_string(), "Refactoring failed");

        let err = RefactorError::application(Some("  ".to_string()), "Refactoring failed");
        assert_eq!(err.to_string(), "Refactoring failed");

        let err = RefactorError::application(Some("Quota exceeded".to_string()), "x");
        assert_eq!(err.to_string(), "Quota exceeded");
    }

    #[test]
    fn test_status_display() {
        let err = RefactorError::Status {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Server returned HTTP 502: Bad Gateway");
    }
}
