//! Word document input.

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};

use super::TextExtractor;
use crate::detect::{sniff, DocumentFormat, Signature};
use crate::error::{Error, Result};

/// Reads the body paragraphs and tables of a DOCX package.
///
/// Also serves `.doc` files that are really DOCX archives; legacy binary
/// Word files are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for DocxExtractor {
    fn name(&self) -> &str {
        "docx"
    }

    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Docx, DocumentFormat::Doc]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        if sniff(bytes) == Signature::Ole {
            return Err(Error::DocxParse(
                "legacy binary Word document (.doc) is not supported".to_string(),
            ));
        }

        let docx = docx_rs::read_docx(bytes).map_err(|e| Error::DocxParse(e.to_string()))?;

        let mut lines = Vec::new();
        let mut tables = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => {
                    let text = paragraph_text(p);
                    let text = text.trim();
                    if !text.is_empty() {
                        lines.push(text.to_string());
                    }
                }
                DocumentChild::Table(t) => tables.push(t),
                _ => {}
            }
        }

        // table rows follow the paragraph text
        for table in tables {
            lines.extend(table_rows(table));
        }

        Ok(lines.join("\n"))
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&paragraph.children, &mut text);
    text
}

fn push_children(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children(&link.children, text),
            _ => {}
        }
    }
}

/// Each row as its non-empty cell texts joined with ` | `.
#[allow(irrefutable_let_patterns)]
fn table_rows(table: &Table) -> Vec<String> {
    let mut rows = Vec::new();
    for child in &table.rows {
        let TableChild::TableRow(row) = child else {
            continue;
        };
        let mut cells = Vec::new();
        for cell_child in &row.cells {
            let TableRowChild::TableCell(cell) = cell_child else {
                continue;
            };
            let text = cell
                .children
                .iter()
                .filter_map(|content| match content {
                    TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n");
            let text = text.trim();
            if !text.is_empty() {
                cells.push(text.to_string());
            }
        }
        if !cells.is_empty() {
            rows.push(cells.join(" | "));
        }
    }
    rows
}
