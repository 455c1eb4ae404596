//! Error types for unresume library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unresume operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message carried by the minimal record when a document yields no text.
pub const EMPTY_EXTRACTION_MESSAGE: &str = "No text could be extracted from the file.";

/// Error types that can occur while parsing a resume.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file extension is not one of the accepted document formats.
    #[error("Unsupported file format '{extension}' (supported: {})", .supported.join(", "))]
    UnsupportedFormat {
        /// The rejected extension, lowercased, without the leading dot
        extension: String,
        /// Accepted extensions
        supported: Vec<String>,
    },

    /// The input path does not exist.
    #[error("File not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The document contained no extractable characters.
    #[error("{}", EMPTY_EXTRACTION_MESSAGE)]
    EmptyExtraction,

    /// The skill catalog could not be read or decoded.
    #[error("Malformed skill catalog: {0}")]
    MalformedCatalog(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error reading a Word document.
    #[error("DOCX parsing error: {0}")]
    DocxParse(String),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Build an `UnsupportedFormat` error for the given extension.
    pub fn unsupported(extension: impl Into<String>) -> Self {
        Error::UnsupportedFormat {
            extension: extension.into(),
            supported: crate::detect::SUPPORTED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unsupported("rtf");
        assert_eq!(
            err.to_string(),
            "Unsupported file format 'rtf' (supported: pdf, docx, doc, txt)"
        );

        let err = Error::SourceNotFound(PathBuf::from("missing.pdf"));
        assert_eq!(err.to_string(), "File not found: missing.pdf");

        assert_eq!(
            Error::EmptyExtraction.to_string(),
            "No text could be extracted from the file."
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
