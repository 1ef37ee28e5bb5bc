pub mod headers;
pub mod upload;
