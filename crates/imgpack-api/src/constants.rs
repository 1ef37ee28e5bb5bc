//! API constants

/// Conversion endpoint.
pub const FILES_PATH: &str = "/api/files";

/// OpenAPI document served for the RapiDoc viewer.
pub const OPENAPI_PATH: &str = "/api/openapi.json";

pub const DOCS_PATH: &str = "/docs";

/// Multipart field carrying the uploaded images (repeatable).
pub const FILES_FIELD: &str = "files";

/// Number of uploads left out of the archive by validation.
pub const SKIPPED_FILES_HEADER: &str = "x-skipped-files";

/// Number of (file, format) encodes that failed under the skip policy.
pub const FAILED_ENCODINGS_HEADER: &str = "x-failed-encodings";

/// JSON list of the (file, format) encodes behind `x-failed-encodings`.
pub const ENCODE_FAILURES_HEADER: &str = "x-encode-failures";
