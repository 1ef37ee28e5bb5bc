//! File processor and batch orchestrator.

use futures::future::join_all;
use imgpack_core::{
    BatchOutcome, EncodeFailure, EncodeFailurePolicy, OutputFormat, ProcessedFile, Settings,
    UploadedFile,
};
use std::sync::Arc;

use crate::encoder::FormatEncoder;
use crate::validator::MediaValidator;

/// Batch-level failures.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("No files processed")]
    NoFilesProcessed,

    #[error("Failed to encode {file} as {format}")]
    Encode {
        file: String,
        format: OutputFormat,
        #[source]
        source: anyhow::Error,
    },
}

/// A file that passed validation, with the encodes that failed under the skip policy.
#[derive(Debug)]
pub struct FileOutcome {
    pub file: ProcessedFile,
    pub failures: Vec<EncodeFailure>,
}

/// Runs uploads through validation and every enabled encoder.
#[derive(Clone)]
pub struct ConversionPipeline {
    encoder: Arc<dyn FormatEncoder>,
    validator: MediaValidator,
    policy: EncodeFailurePolicy,
}

impl ConversionPipeline {
    pub fn new(encoder: Arc<dyn FormatEncoder>, policy: EncodeFailurePolicy) -> Self {
        Self {
            encoder,
            validator: MediaValidator::default(),
            policy,
        }
    }

    pub fn policy(&self) -> EncodeFailurePolicy {
        self.policy
    }

    /// Convert one upload into every enabled format.
    ///
    /// `Ok(None)` means the file was skipped (unsupported MIME type or no base name).
    pub async fn process_file(
        &self,
        file: &UploadedFile,
        settings: &Settings,
    ) -> Result<Option<FileOutcome>, BatchError> {
        let base_name = match self.validator.validate_upload(file) {
            Ok(base_name) => base_name,
            Err(e) => {
                tracing::debug!(
                    filename = ?file.original_filename,
                    mime_type = ?file.mime_type,
                    reason = %e,
                    "Skipping upload"
                );
                return Ok(None);
            }
        };
        let original_filename = file
            .original_filename
            .clone()
            .unwrap_or_else(|| base_name.clone());

        let formats = settings.enabled_formats();
        let results = self
            .encoder
            .encode_file(file.data.clone(), settings, &formats, &base_name)
            .await;

        let mut processed = ProcessedFile::new(base_name.clone(), original_filename.clone());
        let mut failures = Vec::new();
        for (format, result) in results {
            match result {
                Ok(output) => processed.insert(output),
                Err(source) => match self.policy {
                    EncodeFailurePolicy::Abort => {
                        return Err(BatchError::Encode {
                            file: original_filename,
                            format,
                            source,
                        });
                    }
                    EncodeFailurePolicy::Skip => {
                        let message = format!("{:#}", source);
                        tracing::warn!(
                            filename = %original_filename,
                            format = %format,
                            error = %message,
                            "Encode failed, leaving format out of the archive"
                        );
                        failures.push(EncodeFailure {
                            original_filename: original_filename.clone(),
                            format,
                            message,
                        });
                    }
                },
            }
        }

        Ok(Some(FileOutcome {
            file: processed,
            failures,
        }))
    }

    /// Convert every upload concurrently and wait for all of them.
    ///
    /// Files keep their submission order. A batch with nothing to archive is
    /// `BatchError::NoFilesProcessed`. Under the abort policy every file still runs
    /// to completion and the first failure in submission order is returned.
    pub async fn process_batch(
        &self,
        files: &[UploadedFile],
        settings: &Settings,
    ) -> Result<BatchOutcome, BatchError> {
        let results = join_all(files.iter().map(|file| self.process_file(file, settings)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let mut outcome = BatchOutcome::default();
        for result in results {
            match result {
                Some(FileOutcome { file, failures }) => {
                    outcome.failures.extend(failures);
                    outcome.files.push(file);
                }
                None => outcome.skipped += 1,
            }
        }

        if outcome.files.iter().all(ProcessedFile::is_empty) {
            tracing::debug!(
                received = files.len(),
                skipped = outcome.skipped,
                failed_encodings = outcome.failures.len(),
                "Batch produced no outputs"
            );
            return Err(BatchError::NoFilesProcessed);
        }

        tracing::info!(
            received = files.len(),
            processed = outcome.files.len(),
            skipped = outcome.skipped,
            failed_encodings = outcome.failures.len(),
            "Batch processed"
        );

        Ok(outcome)
    }
}
