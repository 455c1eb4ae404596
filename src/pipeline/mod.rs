//! End-to-end resume parsing.
//!
//! [`ResumeParser`] ties the stages together: ingest, normalize, segment,
//! then run the field extractors and assemble a [`ParsedResume`].
//!
//! # Example
//!
//! ```no_run
//! use unresume::pipeline::ResumeParser;
//!
//! fn main() -> unresume::Result<()> {
//!     let parser = ResumeParser::with_defaults()?;
//!     let resume = parser.parse_file("resume.pdf")?;
//!     println!("{:?}", resume.candidate_name);
//!     Ok(())
//! }
//! ```

mod options;

pub use options::{ParseOptions, DEFAULT_CONTACT_WINDOW, DEFAULT_PREVIEW_LIMIT};

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::SkillCatalog;
use crate::detect::DocumentFormat;
use crate::error::{Error, Result};
use crate::extract::{
    extract_contact, parse_education, parse_experience, EntityExtractor, EntityRecognizer,
    SkillMatcher,
};
use crate::ingest::ExtractorRegistry;
use crate::model::{ParsedResume, RawDocument, Section, SectionMap};
use crate::normalize;
use crate::segment;

/// Languages looked for when the resume has no usable languages section.
const COMMON_LANGUAGES: &[&str] = &[
    "English",
    "Spanish",
    "French",
    "German",
    "Chinese",
    "Mandarin",
    "Japanese",
    "Korean",
    "Hindi",
    "Arabic",
    "Portuguese",
    "Russian",
    "Italian",
    "Bengali",
    "Telugu",
    "Marathi",
    "Tamil",
    "Urdu",
    "Gujarati",
    "Kannada",
    "Malayalam",
    "Odia",
    "Punjabi",
];

/// A languages section shorter than this is treated as missing.
const MIN_LANGUAGES_LEN: usize = 3;

static LANGUAGE_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    COMMON_LANGUAGES
        .iter()
        .map(|lang| {
            let re = Regex::new(&format!(r"(?i)\b{}\b", lang)).expect("valid regex");
            (*lang, re)
        })
        .collect()
});

/// Outcome of one document in a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BatchItem {
    /// The document was parsed (possibly into an error-flagged record)
    Parsed(ParsedResume),
    /// The document could not be read
    Failed { file: String, error: String },
}

impl BatchItem {
    pub fn file(&self) -> &str {
        match self {
            BatchItem::Parsed(resume) => &resume.file,
            BatchItem::Failed { file, .. } => file,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BatchItem::Failed { .. })
    }
}

/// Parses resumes into structured records.
///
/// The skill matcher is built once and shared; a parser can be used from
/// many threads at once.
pub struct ResumeParser {
    options: ParseOptions,
    registry: ExtractorRegistry,
    matcher: Arc<SkillMatcher>,
    entities: EntityExtractor,
}

impl ResumeParser {
    /// Create a parser matching skills against `catalog`.
    pub fn new(catalog: &SkillCatalog) -> Self {
        let options = ParseOptions::default();
        Self {
            registry: ExtractorRegistry::configured(options.layout.clone(), options.error_mode),
            options,
            matcher: Arc::new(SkillMatcher::new(catalog)),
            entities: EntityExtractor::detect(None),
        }
    }

    /// Create a parser using the embedded skill catalog.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(&SkillCatalog::embedded()?))
    }

    /// Use an entity recognizer for names and organizations.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.entities = EntityExtractor::detect(Some(recognizer));
        self
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.registry = ExtractorRegistry::configured(options.layout.clone(), options.error_mode);
        self.options = options;
        self
    }

    /// Replace the extractor registry, e.g. to add a custom format reader.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn entity_strategy(&self) -> &'static str {
        self.entities.strategy_name()
    }

    /// Parse a resume file.
    ///
    /// # Errors
    /// * `SourceNotFound` if the path does not exist
    /// * `UnsupportedFormat` if the extension is not pdf, docx, doc or txt
    /// * Ingestion errors (`Io`, `PdfParse`, `DocxParse`)
    ///
    /// A document with no extractable text is not an error: the returned
    /// record has its `error` flag set instead.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedResume> {
        let doc = RawDocument::from_path(path)?;
        self.parse_document(&doc)
    }

    /// Parse resume bytes whose format is given by `extension`.
    pub fn parse_bytes(&self, bytes: &[u8], extension: &str, file_name: &str) -> Result<ParsedResume> {
        let format = DocumentFormat::from_extension(extension)?;
        let doc = RawDocument::new(bytes.to_vec(), format, file_name);
        self.parse_document(&doc)
    }

    pub fn parse_document(&self, doc: &RawDocument) -> Result<ParsedResume> {
        let raw = self.registry.extract(doc)?;
        Ok(self.parse_text(&doc.name, &raw))
    }

    /// Raw text of a document, before normalization.
    pub fn extract_raw(&self, doc: &RawDocument) -> Result<String> {
        self.registry.extract(doc)
    }

    /// Normalized text of a document.
    pub fn extract_text(&self, doc: &RawDocument) -> Result<String> {
        Ok(normalize::clean(&self.registry.extract(doc)?))
    }

    /// Parse already-extracted text.
    pub fn parse_text(&self, file_name: &str, text: &str) -> ParsedResume {
        let cleaned = normalize::clean(text);
        if cleaned.trim().is_empty() {
            log::warn!("{}: no text extracted", file_name);
            return ParsedResume::failed(file_name, Error::EmptyExtraction.to_string());
        }

        let sections = segment::segment(&cleaned);
        log::debug!("{}: {} sections", file_name, sections.len());

        let contact = extract_contact(&self.contact_input(&cleaned, &sections));
        let entities = self.entities.extract(&cleaned, &sections);
        let skills = self.matcher.match_skills(&skills_input(&cleaned, &sections));

        let experience = sections
            .get(Section::Experience)
            .map(parse_experience)
            .unwrap_or_default();
        let education = sections
            .get(Section::Education)
            .map(parse_education)
            .unwrap_or_default();

        let optional = |section: Section| sections.non_empty(section).map(str::to_string);

        ParsedResume {
            file: file_name.to_string(),
            error: None,
            candidate_name: entities.name,
            contact,
            summary: optional(Section::Summary),
            skills: skills.categorized,
            skills_list: skills.flat,
            experience,
            education,
            projects: optional(Section::Projects),
            frameworks: optional(Section::Frameworks),
            certifications: optional(Section::Certifications),
            awards: optional(Section::Awards),
            languages: resolve_languages(sections.get(Section::Languages), &cleaned),
            interests: optional(Section::Interests),
            organizations_detected: entities.organizations,
            degrees_detected: entities.degrees,
            universities_detected: entities.universities,
            raw_sections: previews(&sections, self.options.preview_limit),
        }
    }

    /// Parse many files, results in input order.
    ///
    /// A file that fails becomes [`BatchItem::Failed`] without affecting the
    /// others.
    pub fn parse_batch<P>(&self, paths: &[P]) -> Vec<BatchItem>
    where
        P: AsRef<Path> + Sync,
    {
        self.parse_batch_with(paths, |_| {})
    }

    /// Like [`parse_batch`](Self::parse_batch), calling `on_item` as each
    /// document finishes (in completion order).
    pub fn parse_batch_with<P, F>(&self, paths: &[P], on_item: F) -> Vec<BatchItem>
    where
        P: AsRef<Path> + Sync,
        F: Fn(&BatchItem) + Sync,
    {
        let parse_one = |path: &P| {
            let path = path.as_ref();
            let item = match self.parse_file(path) {
                Ok(resume) => BatchItem::Parsed(resume),
                Err(e) => {
                    log::warn!("{}: {}", path.display(), e);
                    BatchItem::Failed {
                        file: display_name(path),
                        error: e.to_string(),
                    }
                }
            };
            on_item(&item);
            item
        };

        let items: Vec<BatchItem> = if self.options.parallel {
            paths.par_iter().map(parse_one).collect()
        } else {
            paths.iter().map(parse_one).collect()
        };

        let failed = items.iter().filter(|item| item.is_failed()).count();
        log::info!(
            "parsed {} documents ({} failed)",
            items.len() - failed,
            failed
        );
        items
    }

    /// Header, the contact section, then the first characters of the text.
    fn contact_input(&self, text: &str, sections: &SectionMap) -> String {
        let mut input = sections.get(Section::Header).unwrap_or_default().to_string();
        if let Some(contact) = sections.get(Section::Contact) {
            input.push('\n');
            input.push_str(contact);
        }
        input.push('\n');
        input.extend(text.chars().take(self.options.contact_window));
        input
    }
}

/// The skills section (or the whole text) plus experience and projects.
fn skills_input(text: &str, sections: &SectionMap) -> String {
    let mut input = sections.get(Section::Skills).unwrap_or(text).to_string();
    for section in [Section::Experience, Section::Projects] {
        if let Some(content) = sections.get(section) {
            input.push('\n');
            input.push_str(content);
        }
    }
    input
}

/// The languages section, or known language names found anywhere in the
/// text when the section is missing or too short.
fn resolve_languages(section: Option<&str>, text: &str) -> Option<String> {
    let section = section.unwrap_or_default();
    if section.chars().count() < MIN_LANGUAGES_LEN {
        let found: Vec<&str> = LANGUAGE_PATTERNS
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(lang, _)| *lang)
            .collect();
        if !found.is_empty() {
            return Some(found.join(", "));
        }
    }
    Some(section.to_string()).filter(|s| !s.trim().is_empty())
}

fn previews(sections: &SectionMap, limit: usize) -> SectionMap {
    let mut out = SectionMap::new();
    for (section, text) in sections.iter() {
        out.append(section, &truncate_preview(text, limit));
    }
    out
}

fn truncate_preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SkillEntry;

    fn parser() -> ResumeParser {
        ResumeParser::new(&SkillCatalog::new(vec![
            SkillEntry::new("Python", "Programming"),
            SkillEntry::new("Rust", "Programming"),
            SkillEntry::new("Docker", "DevOps"),
        ]))
    }

    #[test]
    fn test_empty_text_gives_error_record() {
        let resume = parser().parse_text("blank.txt", "  \n\t\n ");
        assert_eq!(resume.file, "blank.txt");
        assert_eq!(
            resume.error.as_deref(),
            Some("No text could be extracted from the file.")
        );
        assert!(resume.raw_sections.is_empty());
        assert!(resume.experience.is_empty());
    }

    #[test]
    fn test_skills_read_from_experience_too() {
        let text = "Jane Doe\nSKILLS\nPython\nEXPERIENCE\nEngineer at Acme\nShipped Docker images";
        let resume = parser().parse_text("r.txt", text);
        assert_eq!(resume.skills_list, vec!["Docker", "Python"]);
        assert_eq!(resume.skills.get("DevOps"), Some(&vec!["Docker".to_string()]));
    }

    #[test]
    fn test_languages_fallback() {
        let text = "Jane Doe\nSUMMARY\nFluent in english and Spanish.";
        let resume = parser().parse_text("r.txt", text);
        assert_eq!(resume.languages.as_deref(), Some("English, Spanish"));
    }

    #[test]
    fn test_languages_section_kept() {
        assert_eq!(
            resolve_languages(Some("English (native)"), "German"),
            Some("English (native)".to_string())
        );
        assert_eq!(resolve_languages(Some("EN"), "nothing"), Some("EN".to_string()));
        assert_eq!(resolve_languages(None, "nothing here"), None);
        assert_eq!(
            resolve_languages(Some("EN"), "Speaks German"),
            Some("German".to_string())
        );
    }

    #[test]
    fn test_truncate_preview() {
        assert_eq!(truncate_preview("short", 200), "short");
        let long = "é".repeat(250);
        let preview = truncate_preview(&long, 200);
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.ends_with("..."));
        assert_eq!(truncate_preview(&"a".repeat(200), 200), "a".repeat(200));
    }

    #[test]
    fn test_contact_window_limits_body_scan() {
        let mut text = String::from("Jane Doe\nEXPERIENCE\n");
        text.push_str(&"filler line\n".repeat(100));
        text.push_str("late@example.com");

        let resume = parser().parse_text("r.txt", &text);
        assert!(resume.contact.emails.is_empty());

        let wide = parser().with_options(ParseOptions::new().with_contact_window(10_000));
        let resume = wide.parse_text("r.txt", &text);
        assert_eq!(resume.contact.emails.as_slice(), ["late@example.com"]);
    }

    #[test]
    fn test_parse_bytes_rejects_unknown_extension() {
        let err = parser().parse_bytes(b"{\\rtf1}", "rtf", "cv.rtf").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_parser_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResumeParser>();
    }
}
