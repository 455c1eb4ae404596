//! Document ingestion: bytes of a PDF, DOCX or text file to raw text.
//!
//! Extractors are looked up by [`DocumentFormat`] in an [`ExtractorRegistry`].
//!
//! # Example
//!
//! ```no_run
//! use unresume::ingest::{extract_raw_text, ExtractorRegistry};
//! use unresume::model::RawDocument;
//!
//! fn main() -> unresume::Result<()> {
//!     let doc = RawDocument::from_path("resume.pdf")?;
//!     let text = extract_raw_text(&doc)?;
//!     println!("{}", text);
//!
//!     let registry = ExtractorRegistry::with_defaults();
//!     assert!(registry.supports_extension("docx"));
//!     Ok(())
//! }
//! ```

mod docx;
pub mod layout;
mod options;
mod pdf;
mod text;

pub use docx::DocxExtractor;
pub use layout::Word;
pub use options::{ErrorMode, LayoutConfig};
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;

use std::collections::HashMap;
use std::sync::Arc;

use crate::detect::DocumentFormat;
use crate::error::{Error, Result};
use crate::model::RawDocument;

/// Trait for format-specific text extractors.
///
/// Implement this trait to add support for a new document format.
pub trait TextExtractor: Send + Sync {
    /// Get the name of this extractor.
    fn name(&self) -> &str;

    /// Formats this extractor reads.
    fn supported_formats(&self) -> &[DocumentFormat];

    /// Extract text from the document bytes, lines separated by `\n`.
    fn extract(&self, bytes: &[u8]) -> Result<String>;

    /// Check if this extractor reads the given format.
    fn supports(&self, format: DocumentFormat) -> bool {
        self.supported_formats().contains(&format)
    }
}

/// Registry of text extractors keyed by document format.
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentFormat, Arc<dyn TextExtractor>>,
    by_name: HashMap<String, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the PDF, DOCX and plain text extractors.
    pub fn with_defaults() -> Self {
        Self::configured(LayoutConfig::default(), ErrorMode::default())
    }

    /// Default extractors, with the PDF extractor using the given settings.
    pub fn configured(layout: LayoutConfig, error_mode: ErrorMode) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(
            PdfExtractor::new()
                .with_layout(layout)
                .with_error_mode(error_mode),
        ));
        registry.register(Arc::new(DocxExtractor::new()));
        registry.register(Arc::new(PlainTextExtractor::new()));
        registry
    }

    /// Register an extractor for all its supported formats.
    ///
    /// A later registration replaces an earlier one for the same format.
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        for format in extractor.supported_formats() {
            self.extractors.insert(*format, extractor.clone());
        }
        self.by_name
            .insert(extractor.name().to_lowercase(), extractor);
    }

    /// Get the extractor for a format.
    pub fn get(&self, format: DocumentFormat) -> Option<Arc<dyn TextExtractor>> {
        self.extractors.get(&format).cloned()
    }

    /// Get an extractor by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn TextExtractor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    pub fn supports(&self, format: DocumentFormat) -> bool {
        self.extractors.contains_key(&format)
    }

    /// Check if a file extension maps to a registered extractor.
    pub fn supports_extension(&self, ext: &str) -> bool {
        DocumentFormat::from_extension(ext)
            .map(|format| self.supports(format))
            .unwrap_or(false)
    }

    /// Extract the raw text of a document with the extractor for its format.
    pub fn extract(&self, doc: &RawDocument) -> Result<String> {
        let extractor = self
            .get(doc.format)
            .ok_or_else(|| Error::unsupported(doc.format.extension()))?;
        log::debug!(
            "extracting {} ({} bytes) with {}",
            doc.name,
            doc.len(),
            extractor.name()
        );
        extractor.extract(&doc.bytes)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Extract raw text with the default extractors.
pub fn extract_raw_text(doc: &RawDocument) -> Result<String> {
    ExtractorRegistry::with_defaults().extract(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl TextExtractor for Upper {
        fn name(&self) -> &str {
            "Upper"
        }

        fn supported_formats(&self) -> &[DocumentFormat] {
            &[DocumentFormat::Txt]
        }

        fn extract(&self, bytes: &[u8]) -> Result<String> {
            Ok(String::from_utf8_lossy(bytes).to_uppercase())
        }
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ExtractorRegistry::with_defaults();
        for ext in ["pdf", "PDF", "docx", "doc", "txt"] {
            assert!(registry.supports_extension(ext), "{}", ext);
        }
        assert!(!registry.supports_extension("rtf"));
        assert_eq!(registry.get(DocumentFormat::Doc).unwrap().name(), "docx");
    }

    #[test]
    fn test_registry_get_by_name() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(registry.get_by_name("PDF").is_some());
        assert!(registry.get_by_name("unknown").is_none());
    }

    #[test]
    fn test_register_replaces_format() {
        let mut registry = ExtractorRegistry::with_defaults();
        registry.register(Arc::new(Upper));

        let doc = RawDocument::new(b"jane".to_vec(), DocumentFormat::Txt, "a.txt");
        assert_eq!(registry.extract(&doc).unwrap(), "JANE");
        assert!(registry.get_by_name("upper").is_some());
    }

    #[test]
    fn test_missing_extractor() {
        let registry = ExtractorRegistry::new();
        let doc = RawDocument::new(Vec::new(), DocumentFormat::Pdf, "a.pdf");
        assert!(matches!(
            registry.extract(&doc),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_extract_raw_text_plain() {
        let doc = RawDocument::new(b"Jane Doe\nEngineer".to_vec(), DocumentFormat::Txt, "r.txt");
        assert_eq!(extract_raw_text(&doc).unwrap(), "Jane Doe\nEngineer");
    }
}
