//! Format encoder seam between the pipeline and the codecs.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::join_all;
use imgpack_core::{EncodedOutput, OutputFormat, Settings};

/// Per-format results of one file, in the order the formats were requested.
pub type FileEncodes = Vec<(OutputFormat, Result<EncodedOutput>)>;

/// Turns one source image into one output format.
#[async_trait]
pub trait FormatEncoder: Send + Sync {
    /// Encode `data` as `format`, naming the result `{base_name}.{extension}`.
    async fn encode(
        &self,
        data: Bytes,
        settings: &Settings,
        format: OutputFormat,
        base_name: &str,
    ) -> Result<EncodedOutput>;

    /// Encode one file into every format in `formats`, concurrently.
    ///
    /// Waits for every format before returning.
    async fn encode_file(
        &self,
        data: Bytes,
        settings: &Settings,
        formats: &[OutputFormat],
        base_name: &str,
    ) -> FileEncodes {
        let encodes = formats.iter().map(|&format| {
            let data = data.clone();
            async move { (format, self.encode(data, settings, format, base_name).await) }
        });
        join_all(encodes).await
    }
}

/// Encoder backed by the `image`, `mozjpeg`, `webp` and `ravif` codecs.
#[cfg(feature = "image")]
#[derive(Debug, Clone, Copy)]
pub struct CodecEncoder {
    avif_speed: u8,
}

#[cfg(feature = "image")]
impl CodecEncoder {
    pub fn new(avif_speed: u8) -> Self {
        Self { avif_speed }
    }
}

#[cfg(feature = "image")]
#[async_trait]
impl FormatEncoder for CodecEncoder {
    async fn encode(
        &self,
        data: Bytes,
        settings: &Settings,
        format: OutputFormat,
        base_name: &str,
    ) -> Result<EncodedOutput> {
        use anyhow::Context;

        let settings = *settings;
        let avif_speed = self.avif_speed;
        let buffer = tokio::task::spawn_blocking(move || {
            crate::image::ImageTransformer::convert(&data, format, &settings, avif_speed)
        })
        .await
        .context("Encoder task failed")??;

        Ok(EncodedOutput {
            output_file_name: format.output_file_name(base_name),
            format,
            buffer,
        })
    }

    /// Decodes and resizes once, then runs each format on its own blocking thread.
    async fn encode_file(
        &self,
        data: Bytes,
        settings: &Settings,
        formats: &[OutputFormat],
        base_name: &str,
    ) -> FileEncodes {
        use crate::image::ImageTransformer;
        use anyhow::{anyhow, Context};
        use std::sync::Arc;

        if formats.is_empty() {
            return Vec::new();
        }

        let prepared_settings = *settings;
        let prepared = tokio::task::spawn_blocking(move || {
            ImageTransformer::prepare(&data, &prepared_settings)
        })
        .await
        .context("Decoder task failed")
        .and_then(|result| result);

        let img = match prepared {
            Ok(img) => Arc::new(img),
            Err(e) => {
                let message = format!("{:#}", e);
                return formats
                    .iter()
                    .map(|&format| (format, Err(anyhow!("{}", message))))
                    .collect();
            }
        };

        let avif_speed = self.avif_speed;
        let encodes = formats.iter().map(|&format| {
            let img = Arc::clone(&img);
            let settings = *settings;
            async move {
                let result = tokio::task::spawn_blocking(move || {
                    ImageTransformer::encode(&img, format, &settings, avif_speed)
                })
                .await
                .context("Encoder task failed")
                .and_then(|result| result)
                .map(|buffer| EncodedOutput {
                    output_file_name: format.output_file_name(base_name),
                    format,
                    buffer,
                });
                (format, result)
            }
        });
        join_all(encodes).await
    }
}
