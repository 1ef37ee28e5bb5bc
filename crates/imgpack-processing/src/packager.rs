//! Archive packager: processed files in, zip bytes out.

use anyhow::Result;
use imgpack_core::ProcessedFile;
use imgpack_infra::archive::{create_zip_archive, sanitize_archive_filename, ArchiveEntry};
use std::collections::HashSet;

/// Serialized archive plus the entry names, in archive order.
#[derive(Debug, Clone)]
pub struct ArchivePackage {
    pub bytes: Vec<u8>,
    pub entry_names: Vec<String>,
}

impl ArchivePackage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Entries for every present slot: files in input order, slots in jpeg, webp, avif order.
/// Names are reduced to their final path component and made unique.
pub fn collect_entries(files: &[ProcessedFile]) -> Vec<ArchiveEntry> {
    let mut used = HashSet::new();
    let mut entries = Vec::new();

    for (index, file) in files.iter().enumerate() {
        for output in file.outputs() {
            let fallback = format!("file-{}.{}", index + 1, output.format.extension());
            let name = sanitize_archive_filename(&output.output_file_name, &fallback);
            let name = unique_name(&name, &mut used);
            entries.push(ArchiveEntry::new(name, output.buffer.to_vec()));
        }
    }

    entries
}

/// Build the zip for a finished batch.
pub fn package(files: &[ProcessedFile]) -> Result<ArchivePackage> {
    let entries = collect_entries(files);
    let bytes = create_zip_archive(&entries)?;
    let entry_names = entries.into_iter().map(|e| e.name).collect();

    Ok(ArchivePackage { bytes, entry_names })
}

/// `photo.jpeg`, then `photo-1.jpeg`, `photo-2.jpeg`, ...
fn unique_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) => (stem, Some(extension)),
        None => (name, None),
    };
    let mut counter = 1;
    loop {
        let candidate = match extension {
            Some(extension) => format!("{}-{}.{}", stem, counter, extension),
            None => format!("{}-{}", stem, counter),
        };
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}
