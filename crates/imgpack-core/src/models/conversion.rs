use bytes::Bytes;
use serde::Serialize;
use std::fmt;

/// Output format produced by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    WebP,
    Avif,
}

impl OutputFormat {
    /// Every format, in archive order.
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpeg, OutputFormat::WebP, OutputFormat::Avif];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Avif => "image/avif",
        }
    }

    /// `{base_name}.{extension}`
    pub fn output_file_name(self, base_name: &str) -> String {
        format!("{}.{}", base_name, self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One uploaded file as handed over by the HTTP layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    pub original_filename: Option<String>,
    pub mime_type: Option<String>,
}

impl UploadedFile {
    pub fn new(
        data: impl Into<Bytes>,
        original_filename: Option<String>,
        mime_type: Option<String>,
    ) -> Self {
        Self {
            data: data.into(),
            original_filename,
            mime_type,
        }
    }
}

/// Encoded buffer for a single (file, format) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    pub output_file_name: String,
    pub format: OutputFormat,
    pub buffer: Bytes,
}

/// Per-file conversion result. A slot is `None` when its format was not produced.
#[derive(Debug, Clone, Default)]
pub struct ProcessedFile {
    pub base_name: String,
    pub original_filename: String,
    pub jpeg: Option<EncodedOutput>,
    pub webp: Option<EncodedOutput>,
    pub avif: Option<EncodedOutput>,
}

impl ProcessedFile {
    pub fn new(base_name: impl Into<String>, original_filename: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            original_filename: original_filename.into(),
            ..Self::default()
        }
    }

    pub fn slot(&self, format: OutputFormat) -> Option<&EncodedOutput> {
        match format {
            OutputFormat::Jpeg => self.jpeg.as_ref(),
            OutputFormat::WebP => self.webp.as_ref(),
            OutputFormat::Avif => self.avif.as_ref(),
        }
    }

    /// Place an output in the slot matching its format.
    pub fn insert(&mut self, output: EncodedOutput) {
        let slot = match output.format {
            OutputFormat::Jpeg => &mut self.jpeg,
            OutputFormat::WebP => &mut self.webp,
            OutputFormat::Avif => &mut self.avif,
        };
        *slot = Some(output);
    }

    /// Present outputs in fixed format order (jpeg, webp, avif).
    pub fn outputs(&self) -> impl Iterator<Item = &EncodedOutput> {
        OutputFormat::ALL.into_iter().filter_map(|f| self.slot(f))
    }

    pub fn is_empty(&self) -> bool {
        self.outputs().next().is_none()
    }
}

/// A (file, format) encode that failed and was left out of the archive.
///
/// Serializes as `{"original_filename", "format"}`; the codec message stays in the logs.
#[derive(Debug, Clone, Serialize)]
pub struct EncodeFailure {
    pub original_filename: String,
    pub format: OutputFormat,
    #[serde(skip)]
    pub message: String,
}

/// Everything a finished batch hands to the packager.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub files: Vec<ProcessedFile>,
    /// Files dropped by validation (unsupported MIME type, no base name).
    pub skipped: usize,
    pub failures: Vec<EncodeFailure>,
}
