//! Error types and handling for the gloss bot

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failures of the on-disk glossary store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Store path has no parent directory: {0}")]
    InvalidPath(String),
}

/// Application error types
#[derive(Debug, Serialize)]
pub enum AppError {
    InvalidInput(String),
    StoreError(String),
    ConfigError(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::StoreError(msg) => write!(f, "Store error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Get the error code for MCP and HTTP responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::StoreError(_) => "store_error",
            AppError::ConfigError(_) => "config_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Process exit code used by CLI mode
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) => 1,
            _ => 5,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StoreError(err.to_string())
    }
}

/// Convert anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert serde_json::Error to AppError
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Convert std::io::Error to AppError
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StoreError(err.to_string())
    }
}

/// Convert a failed blocking task to AppError
impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Background task failed: {}", err))
    }
}

/// Reject command text that cannot be a bot command
pub fn validate_command_text(text: &str) -> Result<(), AppError> {
    if text.len() > 4000 {
        return Err(AppError::InvalidInput(
            "Command too long, maximum 4000 bytes".to_string(),
        ));
    }

    if text.chars().any(|c| c == '\0') {
        return Err(AppError::InvalidInput(
            "Command contains a NUL character".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display_and_codes() {
        let err = AppError::InvalidInput("bad".to_string());
        assert_eq!(err.to_string(), "Invalid input: bad");
        assert_eq!(err.error_code(), "invalid_input");
        assert_eq!(err.exit_code(), 1);

        let err = AppError::StoreError("disk full".to_string());
        assert_eq!(err.error_code(), "store_error");
        assert_eq!(err.exit_code(), 5);
        assert_eq!(AppError::Internal("x".to_string()).exit_code(), 5);
    }

    #[test]
    fn test_store_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let store: StoreError = io.into();
        assert!(matches!(store, StoreError::Io(_)));

        let app: AppError = store.into();
        assert_eq!(app.error_code(), "store_error");
        assert!(app.message().contains("denied"));
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::InvalidPath("/".to_string());
        assert_eq!(err.to_string(), "Store path has no parent directory: /");
    }

    #[test]
    fn test_validate_command_text() {
        assert!(validate_command_text("").is_ok());
        assert!(validate_command_text("saws = a system").is_ok());
        assert!(validate_command_text(&"x".repeat(4001)).is_err());
        assert!(validate_command_text("a\0b").is_err());
    }
}
