//! Response header values built from batch results

use anyhow::Context;
use imgpack_core::EncodeFailure;

/// JSON list of `{original_filename, format}` for the encodes left out of the archive.
///
/// Non-ASCII characters are written as `\uXXXX` escapes so the value is always a
/// valid header.
pub fn encode_failures_header(failures: &[EncodeFailure]) -> anyhow::Result<String> {
    let json = serde_json::to_string(failures).context("Failed to serialize encode failures")?;
    Ok(ascii_json(&json))
}

fn ascii_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use imgpack_core::OutputFormat;
    use serde_json::Value;

    fn failure(name: &str, format: OutputFormat) -> EncodeFailure {
        EncodeFailure {
            original_filename: name.to_string(),
            format,
            message: "codec error".to_string(),
        }
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(encode_failures_header(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_lists_file_and_format() {
        let value = encode_failures_header(&[failure("photo.png", OutputFormat::Avif)]).unwrap();
        assert_eq!(value, r#"[{"original_filename":"photo.png","format":"avif"}]"#);
    }

    #[test]
    fn test_non_ascii_names_stay_valid_headers() {
        let value = encode_failures_header(&[failure("café 📷.png", OutputFormat::WebP)]).unwrap();
        assert!(HeaderValue::from_str(&value).is_ok());

        let parsed: Value = serde_json::from_str(&value).unwrap();
        assert_eq!(parsed[0]["original_filename"], "café 📷.png");
        assert_eq!(parsed[0]["format"], "webp");
    }
}
