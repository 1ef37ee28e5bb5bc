use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use imgpack_core::{AppError, Settings};
use imgpack_infra::RequestId;
use imgpack_processing::packager;

use crate::constants::{ENCODE_FAILURES_HEADER, FAILED_ENCODINGS_HEADER, SKIPPED_FILES_HEADER};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::headers::encode_failures_header;
use crate::utils::upload::read_conversion_form;

/// Convert uploaded images and return them as a zip archive
///
/// Every file under `files` with a JPEG, PNG, WebP or AVIF MIME type is encoded into
/// each enabled format (`jpeg`, `webp`, `avif` fields, enabled by presence), optionally
/// resized to `width`, at `quality` (0-100, default 80). Outputs are named
/// `{base}.{format}` and archived in submission order.
///
/// # Errors
/// - `AppError::EmptySubmission` - no file parts (200, `success: false`)
/// - `AppError::NoFilesProcessed` - nothing could be archived (200, `success: false`)
/// - `AppError::InvalidInput` - malformed multipart body
/// - `AppError::PayloadTooLarge` - body over the upload ceiling
/// - `AppError::ImageProcessing` - an encode failed under the abort policy
#[utoipa::path(
    post,
    path = "/api/files",
    tag = "files",
    request_body(
        content_type = "multipart/form-data",
        description = "Fields: files (repeatable file parts), quality, width, jpeg, webp, avif"
    ),
    responses(
        (status = 200, description = "Zip archive of converted images", content_type = "application/zip", body = Vec<u8>,
            headers(
                ("Content-Disposition" = String, description = "attachment; filename=images.zip"),
                ("X-Skipped-Files" = u32, description = "Uploads left out by validation"),
                ("X-Failed-Encodings" = u32, description = "Encodes that failed and were left out"),
                ("X-Encode-Failures" = String, description = "JSON list of {original_filename, format} for the failed encodes")
            )
        ),
        (status = 400, description = "Malformed multipart body", body = ErrorResponse),
        (status = 405, description = "Only POST requests allowed", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 422, description = "Encode failed (abort policy)", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(request_id = tracing::field::Empty))]
pub async fn convert_files(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    if let Some(Extension(id)) = &request_id {
        tracing::Span::current().record("request_id", id.as_str());
    }

    let form = read_conversion_form(multipart?).await?;

    if form.files.is_empty() {
        return Err(AppError::EmptySubmission.into());
    }

    let settings = Settings::from_form_fields(&form.fields);
    tracing::info!(
        files = form.files.len(),
        quality = settings.quality,
        width = ?settings.width,
        formats = ?settings.enabled_formats(),
        "Conversion requested"
    );

    let outcome = state.pipeline.process_batch(&form.files, &settings).await?;

    let archive = packager::package(&outcome.files)?;
    tracing::info!(
        entries = archive.entry_names.len(),
        archive_bytes = archive.len(),
        skipped = outcome.skipped,
        failed_encodings = outcome.failures.len(),
        "Archive ready"
    );

    let failures = encode_failures_header(&outcome.failures)?;
    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", state.config.archive_filename()),
        ),
        (header::CONTENT_LENGTH, archive.len().to_string()),
        (
            HeaderName::from_static(SKIPPED_FILES_HEADER),
            outcome.skipped.to_string(),
        ),
        (
            HeaderName::from_static(FAILED_ENCODINGS_HEADER),
            outcome.failures.len().to_string(),
        ),
        (HeaderName::from_static(ENCODE_FAILURES_HEADER), failures),
    ];

    Ok((StatusCode::OK, headers, archive.bytes).into_response())
}

/// Any method other than POST on the conversion route.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        [(header::ALLOW, "POST")],
        HttpAppError::from(AppError::MethodNotAllowed),
    )
}
