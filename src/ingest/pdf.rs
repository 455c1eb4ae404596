//! PDF text extraction with word positions.
//!
//! Content streams are walked operator by operator to recover where each
//! glyph lands on the page. Glyphs are grouped into words, and the words go
//! through [`layout`](super::layout) to restore reading order.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::layout::{page_text, Word};
use super::options::{ErrorMode, LayoutConfig};
use super::TextExtractor;
use crate::detect::{pdf_version, DocumentFormat};
use crate::error::{Error, Result};

/// US Letter, used when a page has no readable MediaBox.
const DEFAULT_PAGE_BOX: PageBox = PageBox {
    llx: 0.0,
    lly: 0.0,
    urx: 612.0,
    ury: 792.0,
};

/// Advance of a glyph whose font has no width table, in text space units.
const DEFAULT_GLYPH_WIDTH: f32 = 0.5;

/// Ascender height as a fraction of the font size.
const ASCENT: f32 = 0.8;

/// TJ adjustments beyond this (thousandths of an em) separate words.
const TJ_WORD_GAP: f32 = 200.0;

/// Fragments whose baselines differ by less than this share a line.
const BASELINE_TOLERANCE: f32 = 0.5;

/// Extracts text from PDF documents.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    layout: LayoutConfig,
    error_mode: ErrorMode,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Text of every page in reading order, pages without words omitted.
    pub fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let version = pdf_version(bytes)?;
        let doc = LopdfDocument::load_mem(bytes)?;
        if doc.is_encrypted() {
            log::warn!("PDF is encrypted; text may be unreadable");
        }

        let pages = doc.get_pages();
        log::debug!("PDF {} with {} pages", version, pages.len());

        let mut texts = Vec::with_capacity(pages.len());
        for (page_num, page_id) in pages {
            match self.page_words(&doc, page_id) {
                Ok((words, page_box)) => {
                    if words.is_empty() {
                        continue;
                    }
                    texts.push(page_text(words, page_box.width(), &self.layout));
                }
                Err(e) => {
                    if self.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Skipping page {}: {}", page_num, e);
                }
            }
        }

        Ok(texts)
    }

    /// Positioned words on one page, with the page's bounding box.
    fn page_words(&self, doc: &LopdfDocument, page_id: ObjectId) -> Result<(Vec<Word>, PageBox)> {
        let page_box = media_box(doc, page_id);
        // a page without resources simply has no fonts
        let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
        let content = page_content(doc, page_id)?;
        let content =
            lopdf::content::Content::decode(&content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut walker = ContentWalker::new(doc, &fonts, self.layout.merge_tolerance);
        for op in &content.operations {
            walker.apply(&op.operator, &op.operands);
        }

        let words = walker
            .finish()
            .into_iter()
            .map(|fragment| fragment.into_word(&page_box))
            .collect();
        Ok((words, page_box))
    }
}

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &str {
        "pdf"
    }

    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Pdf]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(self.extract_pages(bytes)?.join("\n\n"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PageBox {
    llx: f32,
    lly: f32,
    urx: f32,
    ury: f32,
}

impl PageBox {
    fn width(&self) -> f32 {
        self.urx - self.llx
    }
}

fn media_box(doc: &LopdfDocument, page_id: ObjectId) -> PageBox {
    let Ok(page_dict) = doc.get_dictionary(page_id) else {
        return DEFAULT_PAGE_BOX;
    };
    let Ok(array) = page_dict.get(b"MediaBox").and_then(|o| resolve(doc, o).as_array()) else {
        return DEFAULT_PAGE_BOX;
    };
    let values: Vec<f32> = array.iter().filter_map(get_number).collect();
    if values.len() < 4 || values[2] <= values[0] {
        return DEFAULT_PAGE_BOX;
    }
    PageBox {
        llx: values[0],
        lly: values[1],
        urx: values[2],
        ury: values[3],
    }
}

/// Concatenated, decompressed content streams of a page.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(contents) => contents,
        // a page without content is blank, not broken
        Err(_) => return Ok(Vec::new()),
    };

    match resolve(doc, contents) {
        Object::Stream(s) => Ok(s.decompressed_content().unwrap_or_else(|_| s.content.clone())),
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Stream(s) = resolve(doc, obj) {
                    let data = s.decompressed_content().unwrap_or_else(|_| s.content.clone());
                    content.extend_from_slice(&data);
                    content.push(b' ');
                }
            }
            Ok(content)
        }
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Self> {
        let v: Vec<f32> = operands.iter().take(6).filter_map(get_number).collect();
        if v.len() < 6 {
            return None;
        }
        Some(Self {
            a: v[0],
            b: v[1],
            c: v[2],
            d: v[3],
            e: v[4],
            f: v[5],
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text state parameters that live in the graphics state.
#[derive(Debug, Clone)]
struct TextState {
    font: Vec<u8>,
    size: f32,
    char_spacing: f32,
    word_spacing: f32,
    /// Horizontal scaling as a fraction (Tz / 100)
    h_scale: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Vec::new(),
            size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scale: 1.0,
            leading: 0.0,
        }
    }
}

/// Glyph widths of a simple (single-byte) font, in thousandths of an em.
#[derive(Debug, Clone)]
struct FontWidths {
    first_char: i64,
    widths: Vec<f32>,
}

impl FontWidths {
    fn from_font(doc: &LopdfDocument, font: &Dictionary) -> Option<Self> {
        let subtype = font.get(b"Subtype").ok()?.as_name().ok()?;
        if subtype == b"Type0" {
            return None;
        }
        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| get_number(resolve(doc, o)))
            .unwrap_or(0.0) as i64;
        let widths = resolve(doc, font.get(b"Widths").ok()?)
            .as_array()
            .ok()?
            .iter()
            .map(|w| get_number(resolve(doc, w)).unwrap_or(0.0))
            .collect();
        Some(Self { first_char, widths })
    }

    /// Advance of `code` in text space units per unit font size.
    fn advance(&self, code: u8) -> f32 {
        let index = i64::from(code) - self.first_char;
        usize::try_from(index)
            .ok()
            .and_then(|i| self.widths.get(i))
            .map(|w| w / 1000.0)
            .unwrap_or(DEFAULT_GLYPH_WIDTH)
    }
}

/// Characters on one baseline that belong to the same word.
#[derive(Debug, Clone)]
struct Fragment {
    text: String,
    x0: f32,
    x1: f32,
    baseline: f32,
    size: f32,
}

impl Fragment {
    fn into_word(self, page_box: &PageBox) -> Word {
        let top = page_box.ury - (self.baseline + ASCENT * self.size);
        Word::new(self.text, self.x0 - page_box.llx, self.x1 - page_box.llx, top)
    }
}

/// Interprets the text-related operators of one content stream.
struct ContentWalker<'a> {
    doc: &'a LopdfDocument,
    fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    widths: HashMap<Vec<u8>, Option<FontWidths>>,
    merge_tolerance: f32,

    ctm: Matrix,
    state: TextState,
    stack: Vec<(Matrix, TextState)>,
    text_matrix: Matrix,
    line_matrix: Matrix,

    current: Option<Fragment>,
    fragments: Vec<Fragment>,
}

impl<'a> ContentWalker<'a> {
    fn new(
        doc: &'a LopdfDocument,
        fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
        merge_tolerance: f32,
    ) -> Self {
        Self {
            doc,
            fonts,
            widths: HashMap::new(),
            merge_tolerance,
            ctm: Matrix::IDENTITY,
            state: TextState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            current: None,
            fragments: Vec::new(),
        }
    }

    fn apply(&mut self, operator: &str, operands: &[Object]) {
        let num = |i: usize| operands.get(i).and_then(get_number);

        match operator {
            "q" => self.stack.push((self.ctm, self.state.clone())),
            "Q" => {
                if let Some((ctm, state)) = self.stack.pop() {
                    self.ctm = ctm;
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.ctm = m.multiply(&self.ctm);
                }
            }
            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.state.font = name.clone();
                }
                if let Some(size) = num(1) {
                    self.state.size = size;
                }
            }
            "Tc" => self.state.char_spacing = num(0).unwrap_or(0.0),
            "Tw" => self.state.word_spacing = num(0).unwrap_or(0.0),
            "Tz" => self.state.h_scale = num(0).unwrap_or(100.0) / 100.0,
            "TL" => self.state.leading = num(0).unwrap_or(0.0),
            "Td" | "TD" => {
                let tx = num(0).unwrap_or(0.0);
                let ty = num(1).unwrap_or(0.0);
                if operator == "TD" {
                    self.state.leading = -ty;
                }
                self.move_line(tx, ty);
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes),
                            other => {
                                if let Some(adjustment) = get_number(other) {
                                    self.adjust(adjustment);
                                }
                            }
                        }
                    }
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                self.state.word_spacing = num(0).unwrap_or(self.state.word_spacing);
                self.state.char_spacing = num(1).unwrap_or(self.state.char_spacing);
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(bytes);
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.state.leading != 0.0 {
            self.state.leading
        } else {
            self.state.size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// A TJ position adjustment, in thousandths of an em.
    fn adjust(&mut self, adjustment: f32) {
        let tx = -adjustment / 1000.0 * self.state.size * self.state.h_scale;
        self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
        if -adjustment > TJ_WORD_GAP {
            self.end_word();
        }
    }

    fn show(&mut self, bytes: &[u8]) {
        let doc = self.doc;
        let fonts = self.fonts;
        let font = fonts.get(&self.state.font).copied();
        let encoding = font.and_then(|f| f.get_font_encoding(doc).ok());
        let decode = |raw: &[u8]| match encoding {
            Some(ref enc) => {
                LopdfDocument::decode_text(enc, raw).unwrap_or_else(|_| decode_text_simple(raw))
            }
            None => decode_text_simple(raw),
        };

        let widths = self
            .widths
            .entry(self.state.font.clone())
            .or_insert_with(|| font.and_then(|f| FontWidths::from_font(doc, f)))
            .clone();

        // (text, advance per unit size, is a space byte)
        let glyphs: Vec<(String, f32, bool)> = match widths {
            Some(widths) => bytes
                .iter()
                .map(|&b| (decode(&[b]), widths.advance(b), b == b' '))
                .collect(),
            None => decode(bytes)
                .chars()
                .map(|c| (c.to_string(), DEFAULT_GLYPH_WIDTH, c == ' '))
                .collect(),
        };

        for (text, advance, is_space) in glyphs {
            let render = self.text_matrix.multiply(&self.ctm);
            let x = render.e;
            let baseline = render.f;
            let size = self.state.size * render.vertical_scale();

            let mut tx = advance * self.state.size + self.state.char_spacing;
            if is_space {
                tx += self.state.word_spacing;
            }
            tx *= self.state.h_scale;
            self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
            let x_end = self.text_matrix.multiply(&self.ctm).e;

            if text.trim().is_empty() {
                self.end_word();
            } else {
                self.push_glyph(&text, x, x_end, baseline, size);
            }
        }
    }

    fn push_glyph(&mut self, text: &str, x0: f32, x1: f32, baseline: f32, size: f32) {
        if let Some(current) = self.current.as_mut() {
            let same_line = (current.baseline - baseline).abs() < BASELINE_TOLERANCE;
            if same_line && x0 - current.x1 < self.merge_tolerance && x0 >= current.x0 {
                current.text.push_str(text);
                current.x1 = current.x1.max(x1);
                return;
            }
        }
        self.end_word();
        self.current = Some(Fragment {
            text: text.to_string(),
            x0,
            x1,
            baseline,
            size,
        });
    }

    fn end_word(&mut self) {
        if let Some(fragment) = self.current.take() {
            self.fragments.push(fragment);
        }
    }

    fn finish(mut self) -> Vec<Fragment> {
        self.end_word();
        self.fragments
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode a string without font information: UTF-16BE with BOM, UTF-8, then
/// Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}
