//! Centralized error handling and classification

use crate::api::error::ApiError;
use crate::logging::LogLevel;

/// Centralized error handler for all network operations
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler;

impl ErrorHandler {
    pub fn new() -> Self {
        Self
    }

    /// Classify error and determine appropriate log level
    pub fn classify_error(&self, error: &ApiError) -> LogLevel {
        match error {
            // Unknown machine - expected when a record disappears
            ApiError::Http { status: 404, .. } => LogLevel::Info,

            // Server errors - temporary issues
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Network issues - usually temporary
            ApiError::Reqwest(_) => LogLevel::Warn,

            // Malformed payloads will not fix themselves
            ApiError::Decode(_) => LogLevel::Error,

            // Other errors
            _ => LogLevel::Warn,
        }
    }

    /// Determine if an error should trigger retry logic
    pub fn should_retry(&self, error: &ApiError) -> bool {
        match error {
            // Retry on network/connection errors
            ApiError::Reqwest(_) => true,
            ApiError::Decode(_) => false,

            // Only server errors are worth repeating
            ApiError::Http { status, .. } => (500..=599).contains(status),
        }
    }
}
