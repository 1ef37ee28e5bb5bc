//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that converts into
//! `AppError` (batch errors, multipart failures, `anyhow::Error`) renders through the same
//! status, body and logging path.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imgpack_core::{AppError, ErrorMetadata, LogLevel};
use imgpack_processing::BatchError;
use serde::Serialize;
use utoipa::ToSchema;

/// Failure body. `success` is always `false`; `message` is what the upload form shows.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse (orphan rule: AppError lives in imgpack-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<BatchError> for HttpAppError {
    fn from(err: BatchError) -> Self {
        let app = match err {
            BatchError::NoFilesProcessed => AppError::NoFilesProcessed,
            BatchError::Encode {
                file,
                format,
                source,
            } => AppError::ImageProcessing(format!(
                "Failed to encode {} as {}: {:#}",
                file, format, source
            )),
        };
        HttpAppError(app)
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
        };
        HttpAppError(app)
    }
}

impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Expected a multipart/form-data body: {}",
            rejection.body_text()
        )))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

fn error_body(app_error: &AppError, show_details: bool) -> ErrorResponse {
    ErrorResponse {
        success: false,
        message: app_error.client_message(),
        code: app_error.error_code().to_string(),
        recoverable: app_error.is_recoverable(),
        details: show_details.then(|| app_error.detailed_message()),
        error_type: show_details.then(|| app_error.error_type().to_string()),
        suggested_action: app_error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details only outside production and only for non-sensitive errors.
        let show_details = !is_production_env() && !app_error.is_sensitive();

        (status, Json(error_body(app_error, show_details))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgpack_core::OutputFormat;

    #[test]
    fn test_from_batch_error_no_files() {
        let HttpAppError(app_err) = BatchError::NoFilesProcessed.into();
        assert!(matches!(app_err, AppError::NoFilesProcessed));
    }

    #[test]
    fn test_from_batch_error_encode() {
        let err = BatchError::Encode {
            file: "photo.png".to_string(),
            format: OutputFormat::Avif,
            source: anyhow::anyhow!("bad dimensions"),
        };
        let HttpAppError(app_err) = err.into();
        match app_err {
            AppError::ImageProcessing(msg) => {
                assert!(msg.contains("photo.png"));
                assert!(msg.contains("avif"));
                assert!(msg.contains("bad dimensions"));
            }
            _ => panic!("Expected ImageProcessing variant"),
        }
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let HttpAppError(app_err) = anyhow::anyhow!("zip failed").into();
        assert_eq!(app_err.http_status_code(), 500);
        assert_eq!(app_err.client_message(), "An internal error occurred");
    }

    #[test]
    fn test_error_body_shape() {
        let body = error_body(&AppError::NoFilesProcessed, false);
        let json = serde_json::to_value(&body).expect("serialize");

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "No files processed");
        assert_eq!(json["code"], "NO_FILES_PROCESSED");
        assert_eq!(json["recoverable"], false);
        assert!(json.get("details").is_none());
        assert!(json.get("error_type").is_none());
    }

    #[test]
    fn test_error_body_with_details() {
        let body = error_body(&AppError::InvalidInput("bad boundary".to_string()), true);
        assert_eq!(body.error_type.as_deref(), Some("InvalidInput"));
        assert!(body.details.unwrap().contains("bad boundary"));
    }

    #[test]
    fn test_method_not_allowed_response_status() {
        let response = HttpAppError(AppError::MethodNotAllowed).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
