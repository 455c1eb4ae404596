//! Integration tests for document ingestion.

use std::io::Cursor;
use std::sync::Arc;

use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

use unresume::ingest::{extract_raw_text, ExtractorRegistry, PdfExtractor, TextExtractor};
use unresume::{
    DocumentFormat, Error, ErrorMode, LayoutConfig, ParseOptions, RawDocument, ResumeParser,
};

/// Build a one-page PDF; each `(text, x, y)` is drawn at size 10.
fn create_pdf(lines: &[(&str, i64, i64)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut operations = Vec::new();
    for (text, x, y) in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Integer(10)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Integer(*x), Object::Integer(*y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

    let page = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
        ("Contents", Object::Reference(content_id)),
    ]);
    let page_id = doc.add_object(page);

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(1)),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// A two-column resume: profile on the left, history on the right.
fn two_column_resume() -> Vec<u8> {
    let left = ["Jane Doe", "jane@example.com", "SKILLS", "Rust", "Python"];
    let right = [
        "EXPERIENCE",
        "Engineer",
        "Acme Corp",
        "2019 - 2021",
        "EDUCATION",
    ];
    let mut lines = Vec::new();
    for (i, text) in left.iter().enumerate() {
        lines.push((*text, 50, 720 - i as i64 * 14));
    }
    for (i, text) in right.iter().enumerate() {
        lines.push((*text, 330, 720 - i as i64 * 14));
    }
    create_pdf(&lines)
}

fn create_docx(paragraphs: &[&str], rows: &[&[&str]]) -> Vec<u8> {
    let mut docx = Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }
    if !rows.is_empty() {
        let rows = rows
            .iter()
            .map(|cells| {
                TableRow::new(
                    cells
                        .iter()
                        .map(|text| {
                            TableCell::new()
                                .add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
                        })
                        .collect(),
                )
            })
            .collect();
        docx = docx.add_table(Table::new(rows));
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    cursor.into_inner()
}

#[test]
fn test_pdf_columns_read_in_order() {
    let doc = RawDocument::new(two_column_resume(), DocumentFormat::Pdf, "jane.pdf");
    let text = extract_raw_text(&doc).unwrap();
    assert_eq!(
        text,
        "Jane Doe\njane@example.com\nSKILLS\nRust\nPython\nEXPERIENCE\nEngineer\nAcme Corp\n2019 - 2021\nEDUCATION"
    );
}

#[test]
fn test_pdf_resume_end_to_end() {
    let parser = ResumeParser::with_defaults().unwrap();
    let resume = parser
        .parse_bytes(&two_column_resume(), "pdf", "jane.pdf")
        .unwrap();

    assert_eq!(resume.file, "jane.pdf");
    assert_eq!(resume.candidate_name.as_deref(), Some("Jane Doe"));
    assert_eq!(resume.contact.emails.as_slice(), ["jane@example.com"]);
    assert_eq!(resume.skills_list, vec!["Python", "Rust"]);
    assert_eq!(resume.experience.len(), 1);
    assert_eq!(resume.experience[0].title.as_deref(), Some("Engineer"));
}

#[test]
fn test_wide_gutter_threshold_keeps_single_column() {
    let extractor =
        PdfExtractor::new().with_layout(LayoutConfig::default().with_gutter_min_width(400.0));
    let text = extractor.extract(&two_column_resume()).unwrap();
    assert!(text.starts_with("Jane Doe EXPERIENCE\n"), "{}", text);
}

#[test]
fn test_pdf_without_text_is_flagged() {
    let parser = ResumeParser::with_defaults().unwrap();
    let resume = parser.parse_bytes(&create_pdf(&[]), "pdf", "scan.pdf").unwrap();
    assert!(resume.is_error());
}

#[test]
fn test_corrupt_pdf_is_an_error() {
    let parser = ResumeParser::with_defaults()
        .unwrap()
        .with_options(ParseOptions::new().with_error_mode(ErrorMode::Lenient));
    let err = parser
        .parse_bytes(b"%PDF-1.4\ngarbage", "pdf", "bad.pdf")
        .unwrap_err();
    assert!(matches!(err, Error::PdfParse(_) | Error::Io(_)));
}

#[test]
fn test_docx_paragraphs_and_tables() {
    let bytes = create_docx(
        &["Jane Doe", "SKILLS", "Docker"],
        &[&["Rust", "", "Python"], &["Go"]],
    );
    let doc = RawDocument::new(bytes, DocumentFormat::Docx, "jane.docx");
    assert_eq!(
        extract_raw_text(&doc).unwrap(),
        "Jane Doe\nSKILLS\nDocker\nRust | Python\nGo"
    );
}

#[test]
fn test_doc_extension_reads_docx_archive() {
    let bytes = create_docx(&["Jane Doe", "SKILLS", "Rust"], &[]);
    let parser = ResumeParser::with_defaults().unwrap();
    let resume = parser.parse_bytes(&bytes, "doc", "jane.doc").unwrap();
    assert_eq!(resume.candidate_name.as_deref(), Some("Jane Doe"));
    assert_eq!(resume.skills_list, vec!["Rust"]);
}

#[test]
fn test_legacy_doc_rejected() {
    let mut bytes = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
    bytes.resize(512, 0);
    let doc = RawDocument::new(bytes, DocumentFormat::Doc, "old.doc");
    assert!(matches!(extract_raw_text(&doc), Err(Error::DocxParse(_))));
}

#[test]
fn test_plain_text_lossy() {
    let doc = RawDocument::new(
        b"\xEF\xBB\xBFJane Doe\n\xC3(broken".to_vec(),
        DocumentFormat::Txt,
        "jane.txt",
    );
    let text = extract_raw_text(&doc).unwrap();
    assert!(text.starts_with("Jane Doe\n"));
    assert!(text.contains('\u{FFFD}'));
}

struct Shouting;

impl TextExtractor for Shouting {
    fn name(&self) -> &str {
        "shouting"
    }

    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Txt]
    }

    fn extract(&self, bytes: &[u8]) -> unresume::Result<String> {
        Ok(String::from_utf8_lossy(bytes).to_uppercase())
    }
}

#[test]
fn test_custom_extractor_in_pipeline() {
    let mut registry = ExtractorRegistry::with_defaults();
    registry.register(Arc::new(Shouting));

    let parser = ResumeParser::with_defaults()
        .unwrap()
        .with_registry(registry);
    let resume = parser.parse_bytes(b"jane doe\nskills\nrust", "txt", "r.txt").unwrap();
    assert_eq!(resume.skills_list, vec!["Rust"]);
    assert!(resume.raw_sections.get(unresume::Section::Skills).is_some());
}
