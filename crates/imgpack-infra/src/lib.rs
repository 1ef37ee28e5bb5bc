//! imgpack Infrastructure Library
//!
//! Shared infrastructure components used by the imgpack service:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - Archive creation

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "archive")]
pub mod archive;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{request_id_middleware, RequestId};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};

#[cfg(feature = "archive")]
pub use archive::{create_zip_archive, ArchiveEntry};
