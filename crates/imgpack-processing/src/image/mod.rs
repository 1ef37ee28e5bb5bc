//! Image decoding, resizing and re-encoding.

pub mod resize;
pub mod transformer;

pub use resize::ImageResize;
pub use transformer::ImageTransformer;
