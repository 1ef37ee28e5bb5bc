use std::collections::HashMap;

use super::OutputFormat;

pub const DEFAULT_QUALITY: u8 = 80;

pub const FIELD_QUALITY: &str = "quality";
pub const FIELD_WIDTH: &str = "width";
pub const FIELD_JPEG: &str = "jpeg";
pub const FIELD_WEBP: &str = "webp";
pub const FIELD_AVIF: &str = "avif";

/// Conversion settings shared read-only by every file of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub quality: u8,
    /// Target width in pixels; `None` keeps the original dimensions.
    pub width: Option<u32>,
    pub use_jpeg: bool,
    pub use_webp: bool,
    pub use_avif: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            width: None,
            use_jpeg: false,
            use_webp: false,
            use_avif: false,
        }
    }
}

impl Settings {
    /// Resolve settings from raw form fields. Never fails: malformed input falls back to defaults.
    pub fn from_form_fields(fields: &HashMap<String, String>) -> Self {
        let quality = fields
            .get(FIELD_QUALITY)
            .and_then(|v| parse_leading_int(v))
            .unwrap_or(DEFAULT_QUALITY as i64)
            .clamp(0, 100) as u8;

        let width = fields
            .get(FIELD_WIDTH)
            .filter(|v| !v.is_empty())
            .and_then(|v| parse_leading_int(v))
            .map(|w| w.clamp(1, u32::MAX as i64) as u32);

        Self {
            quality,
            width,
            use_jpeg: fields.contains_key(FIELD_JPEG),
            use_webp: fields.contains_key(FIELD_WEBP),
            use_avif: fields.contains_key(FIELD_AVIF),
        }
    }

    pub fn is_enabled(&self, format: OutputFormat) -> bool {
        match format {
            OutputFormat::Jpeg => self.use_jpeg,
            OutputFormat::WebP => self.use_webp,
            OutputFormat::Avif => self.use_avif,
        }
    }

    /// Enabled formats in archive order (jpeg, webp, avif).
    pub fn enabled_formats(&self) -> Vec<OutputFormat> {
        OutputFormat::ALL
            .into_iter()
            .filter(|f| self.is_enabled(*f))
            .collect()
    }
}

/// Lenient integer parse: leading whitespace, optional sign, then the leading run of digits.
/// `"85abc"` is 85, `"3.7"` is 3, `"abc"` is `None`. Saturates instead of overflowing.
fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add((b - b'0') as i64)
    });
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_empty() {
        let settings = Settings::from_form_fields(&HashMap::new());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.quality, 80);
        assert!(settings.enabled_formats().is_empty());
    }

    #[test]
    fn test_quality_clamped() {
        assert_eq!(Settings::from_form_fields(&fields(&[("quality", "150")])).quality, 100);
        assert_eq!(Settings::from_form_fields(&fields(&[("quality", "-20")])).quality, 0);
        assert_eq!(Settings::from_form_fields(&fields(&[("quality", "0")])).quality, 0);
        assert_eq!(Settings::from_form_fields(&fields(&[("quality", "100")])).quality, 100);
        assert_eq!(
            Settings::from_form_fields(&fields(&[("quality", "99999999999999999999")])).quality,
            100
        );
    }

    #[test]
    fn test_malformed_quality_is_80() {
        for raw in ["", "abc", "  ", "-", "q90", "."] {
            let settings = Settings::from_form_fields(&fields(&[("quality", raw)]));
            assert_eq!(settings.quality, 80, "input {:?}", raw);
        }
    }

    #[test]
    fn test_quality_leading_digits() {
        assert_eq!(Settings::from_form_fields(&fields(&[("quality", "85abc")])).quality, 85);
        assert_eq!(Settings::from_form_fields(&fields(&[("quality", " 42")])).quality, 42);
        assert_eq!(Settings::from_form_fields(&fields(&[("quality", "70.9")])).quality, 70);
    }

    #[test]
    fn test_width_unset_for_missing_or_non_numeric() {
        assert_eq!(Settings::from_form_fields(&HashMap::new()).width, None);
        assert_eq!(Settings::from_form_fields(&fields(&[("width", "")])).width, None);
        assert_eq!(Settings::from_form_fields(&fields(&[("width", "wide")])).width, None);
    }

    #[test]
    fn test_width_floors_to_one() {
        assert_eq!(Settings::from_form_fields(&fields(&[("width", "0")])).width, Some(1));
        assert_eq!(Settings::from_form_fields(&fields(&[("width", "0.5")])).width, Some(1));
        assert_eq!(Settings::from_form_fields(&fields(&[("width", "-40")])).width, Some(1));
    }

    #[test]
    fn test_width_positive() {
        assert_eq!(Settings::from_form_fields(&fields(&[("width", "640")])).width, Some(640));
        assert_eq!(Settings::from_form_fields(&fields(&[("width", "1280px")])).width, Some(1280));
    }

    #[test]
    fn test_format_flags_by_presence() {
        let settings = Settings::from_form_fields(&fields(&[("jpeg", "on"), ("avif", "")]));
        assert!(settings.use_jpeg);
        assert!(!settings.use_webp);
        assert!(settings.use_avif);
        assert_eq!(
            settings.enabled_formats(),
            vec![OutputFormat::Jpeg, OutputFormat::Avif]
        );
    }

    #[test]
    fn test_enabled_formats_fixed_order() {
        let settings = Settings::from_form_fields(&fields(&[
            ("avif", "on"),
            ("webp", "on"),
            ("jpeg", "on"),
        ]));
        assert_eq!(settings.enabled_formats(), OutputFormat::ALL.to_vec());
    }
}
