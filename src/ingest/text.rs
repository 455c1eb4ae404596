//! Plain text input.

use super::TextExtractor;
use crate::detect::DocumentFormat;
use crate::error::Result;

const BOM: char = '\u{feff}';

/// Reads UTF-8 text; invalid sequences become U+FFFD instead of failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "text"
    }

    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Txt]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let text = String::from_utf8_lossy(bytes);
        Ok(text.strip_prefix(BOM).unwrap_or(&text).to_string())
    }
}
