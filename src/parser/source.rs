//! Token sources: where positioned text comes from.
//!
//! The pipeline only needs, per page, a list of [`Token`]s. [`TokenSource`]
//! is that seam; [`LopdfSource`] implements it by interpreting the text
//! operators of each page's content stream.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::Token;

use super::options::{ErrorMode, ExtractOptions};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// TJ adjustments below this (in thousandths of an em) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Estimated glyph advance in ems. Font widths are not read, so the pen
/// position after a show operator is approximate.
const GLYPH_ADVANCE_EM: f32 = 0.5;

/// Anything that can produce positioned tokens page by page.
pub trait TokenSource {
    /// Number of pages available.
    fn page_count(&self) -> u32;

    /// Tokens of a page (1-indexed), in any order.
    fn page_tokens(&self, page: u32) -> Result<Vec<Token>>;
}

impl TokenSource for [Vec<Token>] {
    fn page_count(&self) -> u32 {
        self.len() as u32
    }

    fn page_tokens(&self, page: u32) -> Result<Vec<Token>> {
        if page == 0 {
            return Err(Error::PageOutOfRange(page, self.page_count()));
        }
        self.get((page - 1) as usize)
            .cloned()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

impl TokenSource for Vec<Vec<Token>> {
    fn page_count(&self) -> u32 {
        self.as_slice().page_count()
    }

    fn page_tokens(&self, page: u32) -> Result<Vec<Token>> {
        self.as_slice().page_tokens(page)
    }
}

/// Pull the tokens of every page out of a source.
///
/// In lenient mode a page that fails to extract is logged and treated as
/// empty; in strict mode the first failure is returned.
pub fn extract_pages<S: TokenSource + ?Sized>(
    source: &S,
    options: &ExtractOptions,
) -> Result<Vec<Vec<Token>>> {
    let count = source.page_count();
    let mut pages = Vec::with_capacity(count as usize);
    for page in 1..=count {
        match source.page_tokens(page) {
            Ok(tokens) => pages.push(tokens),
            Err(e) => {
                if options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to extract tokens from page {}: {}", page, e);
                pages.push(Vec::new());
            }
        }
    }
    Ok(pages)
}

/// Check if bytes start with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// [`TokenSource`] backed by `lopdf`.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::load_bytes(&data)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        if !is_pdf_bytes(data) {
            return Err(Error::UnknownFormat);
        }
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        // A page without /Contents is blank, not broken.
        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };

        let streams: Vec<&Object> = match contents {
            Object::Array(arr) => arr.iter().collect(),
            other => vec![other],
        };

        let mut content = Vec::new();
        for obj in streams {
            let resolved = match obj {
                Object::Reference(r) => self.doc.get_object(*r).ok(),
                other => Some(other),
            };
            if let Some(Object::Stream(s)) = resolved {
                match s.decompressed_content() {
                    Ok(data) => content.extend_from_slice(&data),
                    Err(_) => content.extend_from_slice(&s.content),
                }
                content.push(b' ');
            }
        }
        Ok(content)
    }

    fn decode(&self, fonts: &BTreeMap<Vec<u8>, &Dictionary>, font: &[u8], bytes: &[u8]) -> String {
        if let Some(font_dict) = fonts.get(font) {
            if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }

    /// Decode a TJ array. Also returns the summed pen shift of its
    /// adjustments, in thousandths of an em (positive moves right).
    fn decode_array(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font: &[u8],
        items: &[Object],
    ) -> (String, f32) {
        let mut combined = String::new();
        let mut shift = 0.0;
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(fonts, font, bytes)),
                other => {
                    // Large negative kerning moves the pen right: a word gap.
                    let adjustment = number(other).map(|n| -n).unwrap_or(0.0);
                    shift += adjustment;
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(char::is_whitespace)
                    {
                        combined.push(' ');
                    }
                }
            }
        }
        (combined, shift)
    }
}

impl TokenSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_tokens(&self, page: u32) -> Result<Vec<Token>> {
        let page_id = *self
            .pages
            .get(&page)
            .ok_or(Error::PageOutOfRange(page, self.page_count()))?;

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let data = self.page_content(page_id)?;
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let content = Content::decode(&data)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;

        let mut state = TextState::default();
        let mut tokens = Vec::new();

        for op in &content.operations {
            let operands = &op.operands;
            let shown = match op.operator.as_str() {
                "BT" => {
                    state.begin();
                    None
                }
                "ET" => {
                    state.in_text = false;
                    None
                }
                "Tf" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        state.font = name.clone();
                    }
                    state.font_size = operands.get(1).and_then(number).unwrap_or(12.0);
                    None
                }
                "TL" => {
                    state.leading = operands.first().and_then(number).unwrap_or(0.0);
                    None
                }
                "Td" | "TD" => {
                    let tx = operands.first().and_then(number).unwrap_or(0.0);
                    let ty = operands.get(1).and_then(number).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                    None
                }
                "Tm" => {
                    let v: Vec<f32> = operands.iter().filter_map(number).collect();
                    if v.len() >= 6 {
                        state.matrix = TextMatrix::new(v[0], v[1], v[2], v[3], v[4], v[5]);
                        state.line_start = state.matrix;
                    }
                    None
                }
                "T*" => {
                    state.next_line();
                    None
                }
                "Tj" => match operands.first() {
                    Some(Object::String(bytes, _)) => {
                        Some((self.decode(&fonts, &state.font, bytes), 0.0))
                    }
                    _ => None,
                },
                "TJ" => match operands.first() {
                    Some(Object::Array(items)) => Some(self.decode_array(&fonts, &state.font, items)),
                    _ => None,
                },
                "'" | "\"" => {
                    state.next_line();
                    let idx = if op.operator == "\"" { 2 } else { 0 };
                    match operands.get(idx) {
                        Some(Object::String(bytes, _)) => {
                            Some((self.decode(&fonts, &state.font, bytes), 0.0))
                        }
                        _ => None,
                    }
                }
                _ => None,
            };

            if let Some((text, shift)) = shown {
                if state.in_text {
                    if let Some(token) = Token::from_transform(&text, &state.transform()) {
                        tokens.push(token);
                    }
                    state.advance(text.chars().count(), shift);
                }
            }
        }

        log::debug!("Page {}: extracted {} tokens", page, tokens.len());
        Ok(tokens)
    }
}

/// Text state tracked while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    matrix: TextMatrix,
    line_start: TextMatrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: TextMatrix::default(),
            line_start: TextMatrix::default(),
            font: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
            in_text: false,
        }
    }
}

impl TextState {
    fn begin(&mut self) {
        self.in_text = true;
        self.matrix = TextMatrix::default();
        self.line_start = TextMatrix::default();
    }

    /// Td: offset from the start of the current line.
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_start.translate(tx, ty);
        self.matrix = self.line_start;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size
        };
        self.move_line(0.0, -leading);
    }

    /// Move the pen past shown text: `chars` glyphs of estimated width plus
    /// the TJ `shift` in thousandths of an em. The line start stays put.
    fn advance(&mut self, chars: usize, shift: f32) {
        let tx = (chars as f32 * GLYPH_ADVANCE_EM + shift / 1000.0) * self.font_size;
        self.matrix.translate(tx, 0.0);
    }

    /// Rendering transform: font size folded into the text matrix.
    fn transform(&self) -> [f32; 6] {
        let m = &self.matrix;
        let fs = self.font_size;
        [m.a * fs, m.b * fs, m.c * fs, m.d * fs, m.e, m.f]
    }
}

/// Text matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}

impl TextMatrix {
    fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode a PDF string without a font encoding: UTF-16BE with BOM, then
/// UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
