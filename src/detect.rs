//! Document format detection and validation.

use crate::error::{Error, Result};
use std::path::Path;

/// Extensions accepted by the ingestor, lowercase without the leading dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt"];

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// ZIP local file header, the container of every DOCX package.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// OLE2 compound file header used by legacy binary Word documents.
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Declared format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Portable Document Format
    Pdf,
    /// Office Open XML word-processing document
    Docx,
    /// Legacy Word extension (read through the DOCX reader)
    Doc,
    /// Plain text
    Txt,
}

impl DocumentFormat {
    /// Map a file extension (with or without the leading dot, any case).
    ///
    /// # Returns
    /// * `Err(Error::UnsupportedFormat)` for anything outside pdf/docx/doc/txt
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "doc" => Ok(DocumentFormat::Doc),
            "txt" => Ok(DocumentFormat::Txt),
            _ => Err(Error::unsupported(ext)),
        }
    }

    /// Determine the format from a path's extension without touching the file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext)
    }

    /// Canonical extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Doc => "doc",
            DocumentFormat::Txt => "txt",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Container signature found at the start of a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// `%PDF-`
    Pdf,
    /// ZIP archive (DOCX package)
    Zip,
    /// OLE2 compound file (binary .doc)
    Ole,
    /// Nothing recognised
    Unknown,
}

/// Sniff the container signature of a buffer.
pub fn sniff(data: &[u8]) -> Signature {
    if data.starts_with(PDF_MAGIC) {
        Signature::Pdf
    } else if data.starts_with(ZIP_MAGIC) {
        Signature::Zip
    } else if data.starts_with(OLE_MAGIC) {
        Signature::Ole
    } else {
        Signature::Unknown
    }
}

/// Extract the PDF header version (e.g. "1.7" from "%PDF-1.7").
///
/// # Returns
/// * `Ok(version)` if the data starts with a valid PDF header
/// * `Err(Error::PdfParse)` otherwise
pub fn pdf_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::PdfParse("missing %PDF- header".to_string()));
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::PdfParse(format!("unsupported PDF version: {}", version)));
    }

    Ok(version)
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    if version.len() != 3 {
        return false;
    }

    let chars: Vec<char> = version.chars().collect();
    chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(DocumentFormat::from_extension("pdf").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_extension(".DOCX").unwrap(), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_extension("Doc").unwrap(), DocumentFormat::Doc);
        assert_eq!(DocumentFormat::from_extension("txt").unwrap(), DocumentFormat::Txt);
    }

    #[test]
    fn test_rejects_unknown_extension() {
        match DocumentFormat::from_extension("rtf") {
            Err(Error::UnsupportedFormat { extension, supported }) => {
                assert_eq!(extension, "rtf");
                assert_eq!(supported, vec!["pdf", "docx", "doc", "txt"]);
            }
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_from_path_without_extension() {
        let result = DocumentFormat::from_path("resume");
        assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_sniff() {
        assert_eq!(sniff(b"%PDF-1.4\n"), Signature::Pdf);
        assert_eq!(sniff(b"PK\x03\x04rest"), Signature::Zip);
        assert_eq!(sniff(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0]), Signature::Ole);
        assert_eq!(sniff(b"plain text"), Signature::Unknown);
    }

    #[test]
    fn test_pdf_version() {
        assert_eq!(pdf_version(b"%PDF-1.7\n%\xe2\xe3").unwrap(), "1.7");
        assert_eq!(pdf_version(b"%PDF-2.0\n").unwrap(), "2.0");
        assert!(pdf_version(b"%PDF").is_err());
        assert!(pdf_version(b"<!DOCTYPE html>").is_err());
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("2.0"));
        assert!(!is_valid_version("10.0"));
        assert!(!is_valid_version("abc"));
    }
}
