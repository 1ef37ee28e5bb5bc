use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// A single named file inside an archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Sanitize filename for archive entry to prevent path traversal.
/// Extracts only the base name (strips path components like `../`).
pub fn sanitize_archive_filename(filename: &str, fallback: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or(fallback)
        .to_string()
}

/// Create a ZIP archive from entries, in the order given.
///
/// Entry names are written as-is; callers are responsible for uniqueness and sanitization.
pub fn create_zip_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
    use zip::write::{FileOptions, ZipWriter};
    use zip::CompressionMethod;

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        for entry in entries {
            zip.start_file(entry.name.as_str(), options)
                .with_context(|| format!("Failed to add file to ZIP: {}", entry.name))?;
            zip.write_all(&entry.data)
                .with_context(|| format!("Failed to write file data to ZIP: {}", entry.name))?;
        }

        zip.finish().context("Failed to finalize ZIP archive")?;
    }

    tracing::debug!(
        entries = entries.len(),
        archive_bytes = buffer.len(),
        "ZIP archive created"
    );

    Ok(buffer)
}
