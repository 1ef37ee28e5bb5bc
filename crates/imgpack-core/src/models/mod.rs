//! Domain models for the conversion pipeline

pub mod conversion;
pub mod settings;

pub use conversion::{
    BatchOutcome, EncodeFailure, EncodedOutput, OutputFormat, ProcessedFile, UploadedFile,
};
pub use settings::{Settings, DEFAULT_QUALITY};
