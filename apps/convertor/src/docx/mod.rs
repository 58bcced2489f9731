//! Document Converter: rendered HTML to a `.docx` byte buffer.
//!
//! Conversion runs in two passes: the HTML tree is walked into a small block
//! model (`Block`), which is then emitted as docx-rs elements. The mapping is
//! best-effort; constructs without a counterpart are flattened or dropped,
//! never rejected.

pub mod style;

use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use docx_rs::{
    AlignmentType, BreakType, Docx, Paragraph, Pic, Run, Style, StyleType, Table, TableCell,
    TableRow,
};
use scraper::{node::Node, ElementRef, Html};
use tracing::debug;

use crate::errors::ConvertError;
use style::{heading_size, Align, InlineStyle};

/// Left indent per list level, in twentieths of a point.
const LIST_INDENT: i32 = 360;
/// Usable page width for table grids, in twentieths of a point.
const TABLE_WIDTH: usize = 9000;
const EMU_PER_PIXEL: u32 = 9525;
/// Largest image side in pixels, roughly a page; keeps EMU sizes within `u32`.
const MAX_IMAGE_PX: u32 = 2000;

/// One formatted piece of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text { text: String, style: InlineStyle },
    Break,
    Image { png: Vec<u8>, width: u32, height: u32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Para {
    pub inlines: Vec<Inline>,
    pub heading: Option<usize>,
    pub align: Option<Align>,
    pub indent: Option<i32>,
}

impl Para {
    /// Visible text, for logging and tests.
    pub fn text(&self) -> String {
        self.inlines
            .iter()
            .map(|i| match i {
                Inline::Text { text, .. } => text.as_str(),
                Inline::Break => "\n",
                Inline::Image { .. } => "",
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Para),
    /// Rows of cells; each cell holds its paragraphs.
    Table(Vec<Vec<Vec<Para>>>),
}

#[derive(Debug, Clone, Copy)]
enum ListKind {
    Bullet,
    Ordered(usize),
}

/// Converts an HTML document into `.docx` bytes.
pub fn html_to_docx(html: &str) -> Result<Vec<u8>, ConvertError> {
    let blocks = parse_blocks(html);
    debug!("HTML mapped to {} top-level blocks", blocks.len());
    if let Some(Block::Paragraph(first)) = blocks.first() {
        debug!("Document starts with {:?}", first.text());
    }

    let mut docx = heading_styles(Docx::new());
    for block in blocks {
        docx = match block {
            Block::Paragraph(para) => docx.add_paragraph(to_paragraph(para)),
            Block::Table(rows) => docx.add_table(to_table(rows)),
        };
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ConvertError::Convert(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Walks the `<body>` (or the whole fragment) into blocks.
pub fn parse_blocks(html: &str) -> Vec<Block> {
    let document = Html::parse_document(html);
    let mut walker = Walker::new(false);
    walker.walk_children(document.root_element(), &InlineStyle::default());
    walker.finish()
}

struct Walker {
    blocks: Vec<Block>,
    draft: Para,
    /// Leading marker for the next paragraph (list bullet or number).
    prefix: Option<String>,
    ends_with_space: bool,
    lists: Vec<ListKind>,
    in_cell: bool,
}

impl Walker {
    fn new(in_cell: bool) -> Self {
        Self {
            blocks: Vec::new(),
            draft: Para::default(),
            prefix: None,
            ends_with_space: true,
            lists: Vec::new(),
            in_cell,
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.end_block();
        self.blocks
    }

    fn walk_children(&mut self, element: ElementRef<'_>, style: &InlineStyle) {
        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                self.walk_element(child_element, style);
            } else if let Node::Text(text) = child.value() {
                self.push_text(text, style);
            }
        }
    }

    fn walk_element(&mut self, element: ElementRef<'_>, inherited: &InlineStyle) {
        let tag = element.value().name().to_ascii_lowercase();
        let mut style = inherited.with_tag(&tag);
        if let Some(css) = element.value().attr("style") {
            style = style.with_css(css);
        }

        match tag.as_str() {
            "head" | "style" | "script" | "title" | "meta" | "link" | "noscript" | "template" => {}
            "br" => {
                self.push_inline(Inline::Break, &style);
                self.ends_with_space = true;
            }
            "img" => self.push_image(element, &style),
            "hr" => {
                self.end_block();
                self.blocks.push(Block::Paragraph(Para::default()));
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.begin_block();
                self.draft.heading = tag[1..].parse().ok();
                self.walk_children(element, &style);
                self.end_block();
            }
            "ul" | "ol" => {
                self.end_block();
                self.lists.push(if tag == "ul" {
                    ListKind::Bullet
                } else {
                    ListKind::Ordered(0)
                });
                self.walk_children(element, &style);
                self.lists.pop();
                self.end_block();
            }
            "li" => {
                self.end_block();
                self.prefix = Some(self.next_marker());
                self.walk_children(element, &style);
                self.end_block();
            }
            "table" if !self.in_cell => {
                self.end_block();
                let rows = table_rows(element, &style);
                if !rows.is_empty() {
                    self.blocks.push(Block::Table(rows));
                }
            }
            "p" | "div" | "section" | "article" | "header" | "footer" | "main" | "nav"
            | "aside" | "blockquote" | "address" | "figure" | "figcaption" | "pre" | "body"
            | "html" | "center" | "dl" | "dt" | "dd" | "table" | "thead" | "tbody" | "tfoot"
            | "tr" | "td" | "th" | "caption" | "form" | "fieldset" => {
                self.begin_block();
                self.walk_children(element, &style);
                self.end_block();
            }
            _ => self.walk_children(element, &style),
        }
    }

    fn next_marker(&mut self) -> String {
        match self.lists.last_mut() {
            Some(ListKind::Ordered(n)) => {
                *n += 1;
                format!("{n}. ")
            }
            _ => "\u{2022} ".to_string(),
        }
    }

    /// Appends collapsed text the way a browser would lay it out.
    fn push_text(&mut self, raw: &str, style: &InlineStyle) {
        let mut text = String::with_capacity(raw.len());
        let mut last_space = self.ends_with_space;
        for c in raw.chars() {
            if c.is_whitespace() {
                if !last_space {
                    text.push(' ');
                    last_space = true;
                }
            } else {
                text.push(c);
                last_space = false;
            }
        }
        if text.is_empty() {
            return;
        }
        self.ends_with_space = last_space;
        self.push_inline(
            Inline::Text {
                text,
                style: style.clone(),
            },
            style,
        );
    }

    fn push_inline(&mut self, inline: Inline, style: &InlineStyle) {
        if self.draft.inlines.is_empty() {
            if self.draft.align.is_none() {
                self.draft.align = style.align;
            }
            if !self.lists.is_empty() {
                self.draft.indent = Some(LIST_INDENT * self.lists.len() as i32);
            }
            if let Some(prefix) = self.prefix.take() {
                self.draft.inlines.push(Inline::Text {
                    text: prefix,
                    style: InlineStyle::default(),
                });
            }
        }
        self.draft.inlines.push(inline);
    }

    fn push_image(&mut self, element: ElementRef<'_>, style: &InlineStyle) {
        let Some(src) = element.value().attr("src") else {
            return;
        };
        let Some(png) = decode_png_data_uri(src) else {
            debug!("Skipping image that is not an inline PNG");
            return;
        };
        let Some((natural_w, natural_h)) = png_dimensions(&png) else {
            debug!("Skipping image with unreadable PNG header");
            return;
        };
        let requested = element
            .value()
            .attr("width")
            .and_then(|w| w.trim_end_matches("px").trim().parse::<u32>().ok())
            .filter(|w| *w > 0);
        let (width, height) = fit_image(natural_w, natural_h, requested);
        self.push_inline(Inline::Image { png, width, height }, style);
        self.ends_with_space = false;
    }

    /// Closes the current paragraph if it has content. Pending list markers survive
    /// so `<li><p>..</p></li>` keeps its bullet.
    fn begin_block(&mut self) {
        if !self.draft.inlines.is_empty() {
            self.end_block();
        }
    }

    fn end_block(&mut self) {
        let draft = std::mem::take(&mut self.draft);
        self.ends_with_space = true;
        if draft.inlines.is_empty() {
            return;
        }
        self.blocks.push(Block::Paragraph(trim_trailing_space(draft)));
    }
}

fn trim_trailing_space(mut para: Para) -> Para {
    if let Some(Inline::Text { text, .. }) = para.inlines.last_mut() {
        let trimmed = text.trim_end().len();
        text.truncate(trimmed);
    }
    para
}

/// Direct rows of a table, including those under `thead`/`tbody`/`tfoot`.
fn table_rows(table: ElementRef<'_>, style: &InlineStyle) -> Vec<Vec<Vec<Para>>> {
    let mut row_elements = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => row_elements.push(child),
            "thead" | "tbody" | "tfoot" => row_elements.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|e| e.value().name() == "tr"),
            ),
            _ => {}
        }
    }

    row_elements
        .into_iter()
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(|cell| cell_paragraphs(cell, style))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

/// A cell's content as paragraphs; nested tables are flattened to one paragraph per row.
fn cell_paragraphs(cell: ElementRef<'_>, style: &InlineStyle) -> Vec<Para> {
    let mut walker = Walker::new(true);
    walker.walk_element(cell, style);
    walker
        .finish()
        .into_iter()
        .filter_map(|block| match block {
            Block::Paragraph(para) => Some(para),
            Block::Table(_) => None,
        })
        .collect()
}

fn decode_png_data_uri(src: &str) -> Option<Vec<u8>> {
    let rest = src.trim().strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let header = header.to_ascii_lowercase();
    if !header.starts_with("image/png") || !header.ends_with(";base64") {
        return None;
    }
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    general_purpose::STANDARD.decode(payload).ok()
}

/// Display size in pixels: the requested width (or the natural one) with the
/// aspect ratio kept, scaled down to fit `MAX_IMAGE_PX` on both sides.
fn fit_image(natural_w: u32, natural_h: u32, requested_w: Option<u32>) -> (u32, u32) {
    let width = u64::from(requested_w.unwrap_or(natural_w));
    let height = if natural_w == 0 {
        u64::from(natural_h)
    } else {
        u64::from(natural_h) * width / u64::from(natural_w)
    };
    let max = u64::from(MAX_IMAGE_PX);
    let largest = width.max(height);
    let (width, height) = if largest > max {
        (width * max / largest, height * max / largest)
    } else {
        (width, height)
    };
    // Both sides are at most MAX_IMAGE_PX here.
    (width.max(1) as u32, height.max(1) as u32)
}

/// Reads width and height from the IHDR chunk.
fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    if bytes.len() < 24 || bytes[..8] != SIGNATURE || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((width, height))
}

fn heading_styles(mut docx: Docx) -> Docx {
    for level in 1..=6 {
        let tag = format!("h{level}");
        docx = docx.add_style(
            Style::new(format!("Heading{level}"), StyleType::Paragraph)
                .name(format!("Heading {level}"))
                .bold()
                .size(heading_size(&tag)),
        );
    }
    docx
}

fn to_paragraph(para: Para) -> Paragraph {
    let mut paragraph = Paragraph::new();
    for inline in para.inlines {
        paragraph = paragraph.add_run(to_run(inline));
    }
    if let Some(level) = para.heading {
        paragraph = paragraph.style(&format!("Heading{level}"));
    }
    if let Some(align) = para.align {
        paragraph = paragraph.align(match align {
            Align::Left => AlignmentType::Left,
            Align::Center => AlignmentType::Center,
            Align::Right => AlignmentType::Right,
            Align::Justify => AlignmentType::Both,
        });
    }
    if let Some(indent) = para.indent {
        paragraph = paragraph.indent(Some(indent), None, None, None);
    }
    paragraph
}

fn to_run(inline: Inline) -> Run {
    match inline {
        Inline::Break => Run::new().add_break(BreakType::TextWrapping),
        Inline::Image { png, width, height } => {
            let pic = Pic::new_with_dimensions(png, width, height)
                .size(width * EMU_PER_PIXEL, height * EMU_PER_PIXEL);
            Run::new().add_image(pic)
        }
        Inline::Text { text, style } => {
            let mut run = Run::new().add_text(text);
            if style.bold {
                run = run.bold();
            }
            if style.italic {
                run = run.italic();
            }
            if style.underline {
                run = run.underline("single");
            }
            if let Some(color) = style.color {
                run = run.color(color);
            }
            if let Some(size) = style.size {
                run = run.size(size);
            }
            run
        }
    }
}

fn to_table(rows: Vec<Vec<Vec<Para>>>) -> Table {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let table_rows = rows
        .into_iter()
        .map(|cells| {
            let cells = cells
                .into_iter()
                .map(|paragraphs| {
                    let mut cell = TableCell::new();
                    if paragraphs.is_empty() {
                        cell = cell.add_paragraph(Paragraph::new());
                    }
                    for para in paragraphs {
                        cell = cell.add_paragraph(to_paragraph(para));
                    }
                    cell
                })
                .collect();
            TableRow::new(cells)
        })
        .collect();
    Table::new(table_rows).set_grid(vec![TABLE_WIDTH / columns; columns])
}
