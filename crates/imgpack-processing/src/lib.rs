//! imgpack processing library
//!
//! Upload validation, codec adapters, the per-file processor, the batch
//! orchestrator and the archive packager.

pub mod encoder;
pub mod packager;
pub mod pipeline;
pub mod validator;

#[cfg(feature = "image")]
pub mod compression;
#[cfg(feature = "image")]
pub mod image;

pub use encoder::{FileEncodes, FormatEncoder};
pub use packager::{package, ArchivePackage};
pub use pipeline::{BatchError, ConversionPipeline, FileOutcome};
pub use validator::{derive_base_name, normalize_mime_type, MediaValidator, ValidationError};

#[cfg(feature = "image")]
pub use compression::{CompressionOptions, ImageCompressor};
#[cfg(feature = "image")]
pub use encoder::CodecEncoder;
#[cfg(feature = "image")]
pub use image::{ImageResize, ImageTransformer};
