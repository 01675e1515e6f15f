//! Errors raised by LLM client implementations

use std::fmt;

/// Errors that can occur while talking to a model backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// API request failed with the given message
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Request timed out after the specified duration (in seconds)
    TimeoutError { seconds: u64 },

    /// Configuration error (unknown provider, bad endpoint, etc.)
    ConfigurationError { message: String },

    /// Generic error for other cases
    Other { message: String },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::ApiError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "API error ({}): {}", code, message)
                } else {
                    write!(f, "API error: {}", message)
                }
            }
            BackendError::TimeoutError { seconds } => {
                write!(f, "Request timed out after {} seconds", seconds)
            }
            BackendError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            BackendError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_status_code() {
        let err = BackendError::ApiError {
            message: "model not found".to_string(),
            status_code: Some(404),
        };
        assert_eq!(err.to_string(), "API error (404): model not found");
    }

    #[test]
    fn test_display_timeout() {
        let err = BackendError::TimeoutError { seconds: 30 };
        assert_eq!(err.to_string(), "Request timed out after 30 seconds");
    }
}
