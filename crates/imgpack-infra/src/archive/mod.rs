//! Archive creation service
//!
//! This module builds in-memory ZIP archives from named byte buffers.

pub use service::{create_zip_archive, sanitize_archive_filename, ArchiveEntry};

mod service;
