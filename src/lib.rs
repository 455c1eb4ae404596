//! # unresume
//!
//! Layout-aware resume parsing for Rust.
//!
//! This library reads resumes in PDF, DOCX or plain text and turns them into
//! a structured profile: contact details, categorized skills, work history
//! and education.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unresume::{parse_file, render, JsonFormat};
//!
//! fn main() -> unresume::Result<()> {
//!     // Parse a resume
//!     let resume = parse_file("resume.pdf")?;
//!
//!     // Convert to JSON
//!     let json = render::to_json(&resume, JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two-column PDFs**: Word geometry is used to read columns in order
//! - **Section detection**: Experience, education, skills and a dozen more
//! - **Skill ontology**: Catalog-driven matching with aliases
//! - **Pluggable entities**: Plug in a named-entity recognizer when available
//! - **Parallel batches**: Uses Rayon for multi-document runs

pub mod catalog;
pub mod detect;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod segment;

// Re-export commonly used types
pub use catalog::{SkillCatalog, SkillEntry};
pub use detect::{DocumentFormat, SUPPORTED_EXTENSIONS};
pub use error::{Error, Result};
pub use extract::{EntityRecognizer, SkillMatcher};
pub use ingest::{ErrorMode, ExtractorRegistry, LayoutConfig, TextExtractor};
pub use model::{
    ContactInfo, DateRange, EducationEntry, ExperienceEntry, OrderedSet, ParsedResume,
    RawDocument, Section, SectionMap,
};
pub use pipeline::{BatchItem, ParseOptions, ResumeParser};
pub use render::JsonFormat;

use std::path::Path;

/// Parse a resume file with the embedded skill catalog.
///
/// Builds a new [`ResumeParser`] per call; reuse a parser when parsing many
/// files.
///
/// # Example
///
/// ```no_run
/// use unresume::parse_file;
///
/// let resume = parse_file("resume.docx").unwrap();
/// println!("{:?}", resume.skills_list);
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedResume> {
    ResumeParser::with_defaults()?.parse_file(path)
}

/// Parse a resume file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<ParsedResume> {
    ResumeParser::with_defaults()?
        .with_options(options)
        .parse_file(path)
}

/// Parse resume bytes; `extension` selects the format.
///
/// # Example
///
/// ```no_run
/// use unresume::parse_bytes;
///
/// let data = std::fs::read("resume.pdf").unwrap();
/// let resume = parse_bytes(&data, "pdf", "resume.pdf").unwrap();
/// ```
pub fn parse_bytes(data: &[u8], extension: &str, file_name: &str) -> Result<ParsedResume> {
    ResumeParser::with_defaults()?.parse_bytes(data, extension, file_name)
}

/// Parse resume text that was already extracted.
pub fn parse_text(file_name: &str, text: &str) -> Result<ParsedResume> {
    Ok(ResumeParser::with_defaults()?.parse_text(file_name, text))
}

/// Extract normalized text from a resume file.
///
/// # Example
///
/// ```no_run
/// use unresume::extract_text;
///
/// let text = extract_text("resume.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = RawDocument::from_path(path)?;
    let raw = ingest::extract_raw_text(&doc)?;
    Ok(normalize::clean(&raw))
}

/// Parse a resume file and render it as JSON.
///
/// # Example
///
/// ```no_run
/// use unresume::{to_json, JsonFormat};
///
/// let json = to_json("resume.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("resume.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let resume = parse_file(path)?;
    render::to_json(&resume, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_convenience() {
        let resume = parse_text("jane.txt", "Jane Doe\njane@example.com\nSKILLS\nRust, Python").unwrap();
        assert_eq!(resume.candidate_name.as_deref(), Some("Jane Doe"));
        assert!(resume.skills_list.contains(&"Rust".to_string()));
        assert!(resume.skills_list.contains(&"Python".to_string()));
    }

    #[test]
    fn test_extract_text_missing_file() {
        assert!(matches!(
            extract_text("/nonexistent/resume.txt"),
            Err(Error::SourceNotFound(_))
        ));
    }
}
