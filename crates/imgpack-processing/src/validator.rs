use imgpack_core::UploadedFile;

/// Source MIME types accepted for conversion.
pub const SUPPORTED_SOURCE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/avif"];

/// Reasons an upload is left out of a batch.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Missing content type")]
    MissingContentType,

    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),
}

/// Strip MIME parameters (e.g. `; charset=binary`) and lowercase.
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

/// Everything before the last `.` of the original filename.
///
/// `photo.png` gives `photo`, `archive.tar.gz` gives `archive.tar`. Names without a dot,
/// dotfiles like `.png` and missing names yield `None`.
pub fn derive_base_name(original_filename: Option<&str>) -> Option<String> {
    let (stem, _extension) = original_filename?.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}

/// Upload validator: MIME allow-list and output base name.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    allowed_content_types: Vec<String>,
}

impl Default for MediaValidator {
    fn default() -> Self {
        Self::new(SUPPORTED_SOURCE_TYPES.iter().map(|s| s.to_string()).collect())
    }
}

impl MediaValidator {
    pub fn new(allowed_content_types: Vec<String>) -> Self {
        Self {
            allowed_content_types,
        }
    }

    /// Validate content type
    pub fn validate_content_type(&self, content_type: Option<&str>) -> Result<(), ValidationError> {
        let content_type = content_type.ok_or(ValidationError::MissingContentType)?;
        let normalized = normalize_mime_type(content_type);

        if !self.allowed_content_types.iter().any(|ct| ct == &normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate an upload and return the base name its outputs are named after.
    pub fn validate_upload(&self, file: &UploadedFile) -> Result<String, ValidationError> {
        self.validate_content_type(file.mime_type.as_deref())?;

        derive_base_name(file.original_filename.as_deref()).ok_or_else(|| {
            ValidationError::InvalidFilename(file.original_filename.clone().unwrap_or_default())
        })
    }
}
