//! Error types module
//!
//! This module provides the core error type used throughout imgpack.
//! Batch, validation and transport failures are unified under `AppError`,
//! and each variant describes its own HTTP presentation through `ErrorMetadata`.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like codec failures
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NO_FILES_PROCESSED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Only POST requests allowed")]
    MethodNotAllowed,

    #[error("Data is empty!")]
    EmptySubmission,

    #[error("No files processed")]
    NoFilesProcessed,

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
///
/// Empty submissions and empty batches are reported failures, not transport errors,
/// so they answer with 200 and let the body carry `success: false`.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::MethodNotAllowed => (
            405,
            "METHOD_NOT_ALLOWED",
            false,
            Some("Submit the form with POST"),
            false,
            LogLevel::Debug,
        ),
        AppError::EmptySubmission => (
            200,
            "EMPTY_SUBMISSION",
            false,
            Some("Attach at least one image under the 'files' field"),
            false,
            LogLevel::Debug,
        ),
        AppError::NoFilesProcessed => (
            200,
            "NO_FILES_PROCESSED",
            false,
            Some("Upload JPEG, PNG, WebP or AVIF images and enable at least one output format"),
            false,
            LogLevel::Debug,
        ),
        AppError::ImageProcessing(_) => (
            422,
            "IMAGE_PROCESSING_ERROR",
            false,
            Some("Check image format and try a different file"),
            false,
            LogLevel::Warn,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Upload fewer or smaller images"),
            false,
            LogLevel::Debug,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MethodNotAllowed => "MethodNotAllowed",
            AppError::EmptySubmission => "EmptySubmission",
            AppError::NoFilesProcessed => "NoFilesProcessed",
            AppError::ImageProcessing(_) => "ImageProcessing",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InternalWithSource { .. } => {
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_failures_use_200() {
        assert_eq!(AppError::EmptySubmission.http_status_code(), 200);
        assert_eq!(AppError::NoFilesProcessed.http_status_code(), 200);
    }

    #[test]
    fn test_method_not_allowed_metadata() {
        let err = AppError::MethodNotAllowed;
        assert_eq!(err.http_status_code(), 405);
        assert_eq!(err.error_code(), "METHOD_NOT_ALLOWED");
        assert_eq!(err.client_message(), "Only POST requests allowed");
    }

    #[test]
    fn test_client_messages_match_form_contract() {
        assert_eq!(AppError::EmptySubmission.client_message(), "Data is empty!");
        assert_eq!(AppError::NoFilesProcessed.client_message(), "No files processed");
    }

    #[test]
    fn test_internal_errors_are_sensitive() {
        let err = AppError::from(anyhow::anyhow!("zip writer exploded"));
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "An internal error occurred");
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let source = anyhow::anyhow!("root cause").context("outer context");
        let err = AppError::from(source);
        let details = err.detailed_message();
        assert!(details.contains("Caused by"));
    }

    #[test]
    fn test_image_processing_is_unprocessable() {
        let err = AppError::ImageProcessing("corrupt data".to_string());
        assert_eq!(err.http_status_code(), 422);
        assert!(!err.is_sensitive());
        assert_eq!(err.error_type(), "ImageProcessing");
    }
}
