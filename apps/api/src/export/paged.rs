//! Portable-page export: lays a resume out on fixed A4 pages and writes it as PDF.
//!
//! # Architecture
//! - `compose` is a pure fold over the PDF section plan. Each emission step takes a
//!   `LayoutCursor` and returns the advanced one; the cursor never lives in shared state.
//! - Every block (a wrapped bullet, a field line, a header bar) is measured before it is
//!   placed and `LayoutCursor::reserve` decides whether it starts a new page. A bullet's
//!   wrapped lines therefore never straddle a page boundary.
//! - `pdf::render_pdf` turns the composed pages into bytes.

use tracing::{debug, info};

use crate::export::pdf::render_pdf;
use crate::export::plan::{
    plan_sections, CertificationItem, PlanPolicy, PlannedSection, SectionBody,
};
use crate::export::ExportError;
use crate::layout::{get_metrics, FontFace, LayoutCursor, PageGeometry};
use crate::models::resume::{PersonalInfo, ResumeRecord};

// ────────────────────────────────────────────────────────────────────────────
// Output model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
/// Dark green behind section titles.
pub const HEADER_BAR: Rgb = Rgb(0.18, 0.37, 0.31);

/// One absolutely-positioned drawing instruction. `y` values are measured from the page top.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        /// Baseline position.
        y: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
        text: String,
    },
    Rect {
        x: f32,
        /// Top edge.
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
}

/// Composed pages, ready to be written.
#[derive(Debug, Clone)]
pub struct PagedDocument {
    pub geometry: PageGeometry,
    pub title: String,
    pub pages: Vec<Vec<DrawOp>>,
}

impl PagedDocument {
    fn new(geometry: PageGeometry, title: String) -> Self {
        Self {
            geometry,
            title,
            pages: vec![Vec::new()],
        }
    }

    fn push(&mut self, page: usize, op: DrawOp) {
        while self.pages.len() <= page {
            self.pages.push(Vec::new());
        }
        self.pages[page].push(op);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text runs on one page, in placement order.
    pub fn page_text(&self, page: usize) -> Vec<&str> {
        self.pages
            .get(page)
            .map(|ops| {
                ops.iter()
                    .filter_map(|op| match op {
                        DrawOp::Text { text, .. } => Some(text.as_str()),
                        DrawOp::Rect { .. } => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Style constants (points)
// ────────────────────────────────────────────────────────────────────────────

const NAME_SIZE: f32 = 22.0;
const NAME_ADVANCE: f32 = 30.0;
const CONTACT_SIZE: f32 = 10.0;
const BODY_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 14.0;
/// Baseline offset inside a line box.
const BASELINE: f32 = 10.5;
const HEADER_SIZE: f32 = 12.0;
const HEADER_BAR_HEIGHT: f32 = 20.0;
const HEADER_ADVANCE: f32 = 28.0;
const HEADER_TEXT_INSET: f32 = 6.0;
const BULLET_GLYPH: &str = "\u{2022}";
/// Gap between the bullet glyph and the wrapped text.
const BULLET_TEXT_OFFSET: f32 = 12.0;
const NESTED_INDENT: f32 = 16.0;
const BLOCK_GAP: f32 = 2.0;
const SECTION_GAP: f32 = 8.0;

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Renders `record` as PDF bytes on `geometry`-sized pages.
///
/// Async for symmetry with the DOCX encoder; nothing here waits on I/O, the layout and
/// serialization run on the blocking pool. Errors propagate unchanged.
pub async fn encode_paged(
    record: &ResumeRecord,
    geometry: PageGeometry,
) -> Result<Vec<u8>, ExportError> {
    let snapshot = record.clone();
    let (bytes, pages) = tokio::task::spawn_blocking(move || {
        let doc = compose(&snapshot, geometry);
        render_pdf(&doc).map(|bytes| (bytes, doc.page_count()))
    })
    .await
    .map_err(|e| ExportError::Serialization(format!("pdf composition task failed: {e}")))??;

    info!(format = "pdf", bytes = bytes.len(), pages, "Portable document encoded");
    Ok(bytes)
}

/// Lays the record out into pages. Pure.
pub fn compose(record: &ResumeRecord, geometry: PageGeometry) -> PagedDocument {
    let title = if record.personal_info.name.is_empty() {
        "Resume".to_string()
    } else {
        format!("{} - Resume", record.personal_info.name)
    };
    let mut doc = PagedDocument::new(geometry, title);

    let cursor = emit_personal_info(
        &mut doc,
        LayoutCursor::start(&geometry),
        &record.personal_info,
    );

    plan_sections(record, &PlanPolicy::PAGED)
        .iter()
        .fold(cursor, |cursor, section| emit_section(&mut doc, cursor, section));

    doc
}

// ────────────────────────────────────────────────────────────────────────────
// Emission steps
// ────────────────────────────────────────────────────────────────────────────

fn emit_personal_info(
    doc: &mut PagedDocument,
    cursor: LayoutCursor,
    info: &PersonalInfo,
) -> LayoutCursor {
    let x = doc.geometry.margin_left_pt;
    if !info.name.is_empty() {
        doc.push(
            cursor.page,
            text_op(x, cursor.y + NAME_SIZE * 0.8, FontFace::HelveticaBold, NAME_SIZE, &info.name),
        );
    }
    let mut cursor = cursor.advance(NAME_ADVANCE);

    for (label, value) in [
        ("Email:", &info.email),
        ("Phone:", &info.phone),
        ("Location:", &info.location),
    ] {
        if value.is_empty() {
            continue;
        }
        doc.push(
            cursor.page,
            text_op(
                x,
                cursor.y + BASELINE,
                FontFace::Helvetica,
                CONTACT_SIZE,
                &format!("{label} {value}"),
            ),
        );
        cursor = cursor.advance(LINE_HEIGHT);
    }

    cursor.advance(SECTION_GAP)
}

fn emit_section(
    doc: &mut PagedDocument,
    cursor: LayoutCursor,
    section: &PlannedSection,
) -> LayoutCursor {
    let cursor = emit_header(doc, cursor, &section.title);

    let cursor = match &section.body {
        SectionBody::Text(text) => emit_bullet(doc, cursor, text, 0.0),

        SectionBody::Bullets(items) => items
            .iter()
            .fold(cursor, |c, item| emit_bullet(doc, c, item, 0.0)),

        SectionBody::Certifications(items) => items
            .iter()
            .fold(cursor, |c, cert| emit_bullet(doc, c, &certification_line(cert), 0.0)),

        SectionBody::Fields(fields) => fields.iter().fold(cursor, |c, f| {
            emit_lines(doc, c, &format!("{} {}", f.label, f.value), FontFace::Helvetica)
        }),

        SectionBody::Projects(projects) => projects.iter().fold(cursor, |c, project| {
            let c = emit_lines(
                doc,
                c,
                &format!("Project: {}", project.project_name),
                FontFace::HelveticaBold,
            );
            let c = project.details.iter().fold(c, |c, f| {
                emit_lines(doc, c, &format!("{} {}", f.label, f.value), FontFace::Helvetica)
            });
            let c = if project.responsibilities.is_empty() {
                c
            } else {
                let c = emit_lines(doc, c, "Roles & Responsibilities:", FontFace::HelveticaBold);
                project
                    .responsibilities
                    .iter()
                    .fold(c, |c, r| emit_bullet(doc, c, r, NESTED_INDENT))
            };
            c.advance(BLOCK_GAP * 2.0)
        }),

        SectionBody::Declaration(decl) => {
            let c = emit_lines(doc, cursor, &decl.text, FontFace::Helvetica);
            let c = match &decl.date_place {
                Some(line) => emit_verbatim_line(doc, c, line),
                None => c,
            };
            match &decl.signature {
                Some(signature) => {
                    emit_lines(doc, c, &format!("Signature: {signature}"), FontFace::Helvetica)
                }
                None => c,
            }
        }
    };

    cursor.advance(SECTION_GAP)
}

/// Coloured bar with the title in white. Breaks the page first when the bar and one body
/// line would not fit below the cursor.
fn emit_header(doc: &mut PagedDocument, cursor: LayoutCursor, title: &str) -> LayoutCursor {
    let geometry = doc.geometry;
    let placed = cursor.reserve(HEADER_ADVANCE + LINE_HEIGHT, &geometry);
    if placed.page != cursor.page {
        debug!(page = placed.page, title, "Page break before section header");
    }

    doc.push(
        placed.page,
        DrawOp::Rect {
            x: geometry.margin_left_pt,
            y: placed.y,
            width: geometry.content_width(),
            height: HEADER_BAR_HEIGHT,
            color: HEADER_BAR,
        },
    );
    doc.push(
        placed.page,
        DrawOp::Text {
            x: geometry.margin_left_pt + HEADER_TEXT_INSET,
            y: placed.y + 14.0,
            face: FontFace::HelveticaBold,
            size: HEADER_SIZE,
            color: WHITE,
            text: title.to_string(),
        },
    );

    placed.advance(HEADER_ADVANCE)
}

/// A bullet glyph followed by `text` wrapped to the remaining width.
fn emit_bullet(
    doc: &mut PagedDocument,
    cursor: LayoutCursor,
    text: &str,
    indent: f32,
) -> LayoutCursor {
    let x = doc.geometry.margin_left_pt + indent;
    let text_x = x + BULLET_TEXT_OFFSET;
    let width = doc.geometry.content_width() - indent - BULLET_TEXT_OFFSET;
    let lines = get_metrics(FontFace::Helvetica).wrap(text, width, BODY_SIZE);
    if lines.is_empty() {
        return cursor;
    }

    let (cursor, first_page, first_y) =
        place_block(doc, cursor, &lines, text_x, FontFace::Helvetica);
    doc.push(
        first_page,
        text_op(x, first_y + BASELINE, FontFace::Helvetica, BODY_SIZE, BULLET_GLYPH),
    );
    cursor.advance(BLOCK_GAP)
}

/// `text` wrapped to the content width, no bullet.
fn emit_lines(
    doc: &mut PagedDocument,
    cursor: LayoutCursor,
    text: &str,
    face: FontFace,
) -> LayoutCursor {
    let x = doc.geometry.margin_left_pt;
    let width = doc.geometry.content_width();
    let lines = get_metrics(face).wrap(text, width, BODY_SIZE);
    if lines.is_empty() {
        return cursor;
    }
    let (cursor, _, _) = place_block(doc, cursor, &lines, x, face);
    cursor
}

/// One unwrapped line, spacing kept as given.
fn emit_verbatim_line(doc: &mut PagedDocument, cursor: LayoutCursor, line: &str) -> LayoutCursor {
    let geometry = doc.geometry;
    let cursor = cursor.reserve(LINE_HEIGHT, &geometry);
    doc.push(
        cursor.page,
        text_op(
            geometry.margin_left_pt,
            cursor.y + BASELINE,
            FontFace::Helvetica,
            BODY_SIZE,
            line,
        ),
    );
    cursor.advance(LINE_HEIGHT)
}

/// Places wrapped lines as one block. Returns the cursor after the block plus the page and
/// top edge of its first line.
///
/// The block moves to a new page as a whole when it does not fit. Only a block taller than an
/// entire page is split, one line at a time.
fn place_block(
    doc: &mut PagedDocument,
    cursor: LayoutCursor,
    lines: &[String],
    x: f32,
    face: FontFace,
) -> (LayoutCursor, usize, f32) {
    let geometry = doc.geometry;
    let height = lines.len() as f32 * LINE_HEIGHT;

    let mut cursor = if height <= geometry.content_height() {
        let placed = cursor.reserve(height, &geometry);
        if placed.page != cursor.page {
            debug!(page = placed.page, lines = lines.len(), "Page break before block");
        }
        placed
    } else {
        cursor.reserve(LINE_HEIGHT, &geometry)
    };
    let first = (cursor.page, cursor.y);

    for line in lines {
        cursor = cursor.reserve(LINE_HEIGHT, &geometry);
        doc.push(cursor.page, text_op(x, cursor.y + BASELINE, face, BODY_SIZE, line));
        cursor = cursor.advance(LINE_HEIGHT);
    }

    (cursor, first.0, first.1)
}

fn text_op(x: f32, y: f32, face: FontFace, size: f32, text: &str) -> DrawOp {
    DrawOp::Text {
        x,
        y,
        face,
        size,
        color: BLACK,
        text: text.to_string(),
    }
}

fn certification_line(cert: &CertificationItem) -> String {
    let mut line = cert.name.clone();
    if let Some(issuer) = &cert.issuer {
        line.push_str(" - ");
        line.push_str(issuer);
    }
    if let Some(year) = &cert.year {
        line.push_str(&format!(" ({year})"));
    }
    line
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
