//! Configuration validation
//!
//! Validates configuration at startup to catch misconfigurations early.

use anyhow::Result;
use imgpack_core::Config;

/// Validate critical configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via the CORS_ORIGINS environment variable."
        ));
    }

    if config.max_upload_size_bytes() == 0 {
        return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
    }

    if config.http_concurrency_limit() == 0 {
        return Err(anyhow::anyhow!("HTTP concurrency limit cannot be 0"));
    }

    validate_archive_filename(config.archive_filename())?;

    Ok(())
}

/// The archive name goes verbatim into `Content-Disposition`.
fn validate_archive_filename(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(anyhow::anyhow!("ARCHIVE_FILENAME cannot be empty"));
    }
    if name
        .chars()
        .any(|c| c.is_control() || matches!(c, '"' | ';' | '/' | '\\'))
    {
        return Err(anyhow::anyhow!(
            "ARCHIVE_FILENAME contains forbidden characters: {}",
            name
        ));
    }
    Ok(())
}
