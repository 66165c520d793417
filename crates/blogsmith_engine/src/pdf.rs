//! Minimal HTML to PDF rendering.
//!
//! The HTML is read line by line: `<h1>` and `<h2>` lines become large and
//! medium bold headings, `<h3>`-`<h6>` bold body-size headings, and every other
//! non-blank line wrapped body text. Tags are stripped and the common entities
//! decoded; there is no inline styling, list bullets or link rendering.

use encoding_rs::WINDOWS_1252;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::ExportError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 15.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;
const LAYER_NAME: &str = "Layer 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Body,
}

impl BlockKind {
    fn font_size(self) -> f32 {
        match self {
            BlockKind::Heading1 => 16.0,
            BlockKind::Heading2 => 14.0,
            BlockKind::Heading3 | BlockKind::Body => 12.0,
        }
    }

    fn line_height(self) -> f32 {
        match self {
            BlockKind::Body => 5.0,
            _ => 10.0,
        }
    }

    fn is_bold(self) -> bool {
        self != BlockKind::Body
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    pub kind: BlockKind,
    pub text: String,
}

/// Renders HTML produced by the markdown converter into PDF bytes.
///
/// Empty input gives a single blank page.
pub fn render_pdf(html: &str) -> Result<Vec<u8>, ExportError> {
    let blocks = classify_lines(html);
    let title = blocks
        .iter()
        .find(|block| block.kind != BlockKind::Body)
        .map(|block| block.text.clone())
        .unwrap_or_else(|| "Blog Post".to_string());

    let (doc, page, layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        LAYER_NAME.to_string(),
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| ExportError::Pdf(err.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| ExportError::Pdf(err.to_string()))?;

    let mut writer = PageWriter {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT_MM - MARGIN_MM,
        regular,
        bold,
    };
    for block in &blocks {
        writer.write_block(block);
    }

    doc.save_to_bytes()
        .map_err(|err| ExportError::Pdf(err.to_string()))
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PageWriter<'_> {
    fn write_block(&mut self, block: &Block) {
        let size = block.kind.font_size();
        let height = block.kind.line_height();
        let max_chars = chars_per_line(size);
        for line in wrap(&block.text, max_chars) {
            if self.y - height < BOTTOM_MARGIN_MM {
                self.new_page();
            }
            let baseline = self.y - height * 0.75;
            let font = if block.kind.is_bold() {
                &self.bold
            } else {
                &self.regular
            };
            self.layer
                .use_text(line, size, Mm(MARGIN_MM), Mm(baseline), font);
            self.y -= height;
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
    }
}

fn chars_per_line(font_size: f32) -> usize {
    let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let glyph = font_size * PT_TO_MM * AVG_GLYPH_WIDTH;
    ((usable / glyph).floor() as usize).max(1)
}

pub(crate) fn classify_lines(html: &str) -> Vec<Block> {
    html.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            let kind = if trimmed.starts_with("<h1") {
                BlockKind::Heading1
            } else if trimmed.starts_with("<h2") {
                BlockKind::Heading2
            } else if ["<h3", "<h4", "<h5", "<h6"]
                .iter()
                .any(|tag| trimmed.starts_with(tag))
            {
                BlockKind::Heading3
            } else {
                BlockKind::Body
            };
            let text = to_win_ansi(decode_entities(&strip_tags(trimmed)).trim());
            (!text.is_empty()).then_some(Block { kind, text })
        })
        .collect()
}

/// Drops tags; a closing table cell leaves a space so cells stay apart.
fn strip_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut tag: Option<String> = None;
    for c in line.chars() {
        if let Some(name) = tag.as_mut() {
            if c == '>' {
                let name = name.trim().to_ascii_lowercase();
                tag = None;
                if matches!(name.as_str(), "/td" | "/th") {
                    out.push(' ');
                }
            } else {
                name.push(c);
            }
        } else if c == '<' {
            tag = Some(String::new());
        } else {
            out.push(c);
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// The built-in PDF fonts only cover WinAnsi; anything else becomes `?`.
fn to_win_ansi(text: &str) -> String {
    let mut buf = [0u8; 4];
    text.chars()
        .map(|c| {
            if c.is_ascii() {
                return c;
            }
            let (_, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
            if unmappable {
                '?'
            } else {
                c
            }
        })
        .collect()
}

fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > max_chars && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}
