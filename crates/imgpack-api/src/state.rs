//! Application state shared by handlers.

use imgpack_core::Config;
use imgpack_processing::{CodecEncoder, ConversionPipeline, FormatEncoder};
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub pipeline: ConversionPipeline,
}

impl AppState {
    /// State backed by the real codecs.
    pub fn new(config: Config) -> Self {
        let encoder = Arc::new(CodecEncoder::new(config.avif_speed()));
        Self::with_encoder(config, encoder)
    }

    /// State with a caller-supplied encoder.
    pub fn with_encoder(config: Config, encoder: Arc<dyn FormatEncoder>) -> Self {
        let pipeline = ConversionPipeline::new(encoder, config.encode_failure_policy());
        Self { config, pipeline }
    }
}
