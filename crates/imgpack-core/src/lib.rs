//! imgpack Core Library
//!
//! This crate provides the domain models, settings resolution, error types and
//! configuration shared across all imgpack components.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, EncodeFailurePolicy};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    BatchOutcome, EncodeFailure, EncodedOutput, OutputFormat, ProcessedFile, Settings,
    UploadedFile,
};
