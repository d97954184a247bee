//! Rich-document export: renders a resume as a DOCX word-processor document.
//!
//! # Layout
//! - Borderless two-column header table: contact lines on the left, badge on the right.
//! - One shaded single-cell header block per planned section, followed by its body paragraphs.
//!
//! # Failure modes
//! - Badge fetch/decode failure: `Err(ExportError::AssetFetch)`, no document at all.
//! - Packing failure: logged and reported as `Ok(None)`; callers treat a missing document as
//!   the failure signal.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, Docx, LineSpacing, Paragraph, Pic, Run, Shading, Table, TableCell, TableRow,
    WidthType,
};
use tracing::{error, info, warn};

use crate::export::assets::{fetch_badge, AssetSource};
use crate::export::delivery::{default_docx_filename, FileDelivery};
use crate::export::plan::{plan_sections, PlanPolicy, SectionBody};
use crate::export::ExportError;
use crate::models::resume::{PersonalInfo, ResumeRecord};

/// Badge display size in pixels (square).
pub const BADGE_DISPLAY_PX: u32 = 100;
const EMU_PER_PX: u32 = 9525;

/// Light green behind every section title.
const SECTION_FILL: &str = "D9EAD3";
const BULLET: &str = "\u{2022}";

// Table widths in twentieths of a point.
const CONTACT_COL_DXA: usize = 6800;
const BADGE_COL_DXA: usize = 2200;
const FULL_WIDTH_DXA: usize = CONTACT_COL_DXA + BADGE_COL_DXA;

// Spacing in twentieths of a point; run sizes in half-points.
const HEADER_SPACING_BEFORE: u32 = 120;
const HEADER_SPACING_AFTER: u32 = 120;
const TITLE_SIZE: usize = 24;

/// Renders `record` as DOCX bytes.
///
/// Suspends once, to fetch the badge. When `delivery` is present the document is also saved
/// under `"<name or Resume>.docx"` straight away; a failed save is logged and does not affect
/// the returned bytes.
pub async fn encode_rich(
    record: &ResumeRecord,
    assets: &dyn AssetSource,
    delivery: Option<&dyn FileDelivery>,
) -> Result<Option<Vec<u8>>, ExportError> {
    let badge = fetch_badge(assets).await?;

    let snapshot = record.clone();
    let packed = tokio::task::spawn_blocking(move || build_docx(&snapshot, &badge))
        .await
        .map_err(|e| ExportError::Serialization(format!("docx composition task failed: {e}")))
        .and_then(|result| result);

    let bytes = match packed {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "DOCX export produced no document");
            return Ok(None);
        }
    };

    if let Some(delivery) = delivery {
        let filename = default_docx_filename(record);
        if let Err(e) = delivery.deliver(&filename, &bytes).await {
            warn!(filename = %filename, error = %e, "Saving DOCX export failed");
        }
    }

    info!(format = "docx", bytes = bytes.len(), "Rich document encoded");
    Ok(Some(bytes))
}

/// Composes and packs the document. CPU-bound; run on the blocking pool.
pub fn build_docx(record: &ResumeRecord, badge: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new().add_table(contact_table(&record.personal_info, badge));

    for section in plan_sections(record, &PlanPolicy::RICH) {
        docx = docx.add_table(section_header(&section.title));
        for paragraph in body_paragraphs(&section.body) {
            docx = docx.add_paragraph(paragraph);
        }
    }

    let mut buf = Vec::new();
    docx.build()
        .pack(Cursor::new(&mut buf))
        .map_err(|e| ExportError::Serialization(e.to_string()))?;
    Ok(buf)
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

fn contact_table(info: &PersonalInfo, badge: &[u8]) -> Table {
    // Labels are always printed, even when the value is empty.
    let left = [
        ("Name:", &info.name),
        ("Email:", &info.email),
        ("Mobile:", &info.phone),
        ("Location:", &info.location),
    ]
    .iter()
    .fold(
        TableCell::new().width(CONTACT_COL_DXA, WidthType::Dxa),
        |cell, (label, value)| cell.add_paragraph(labeled(label, value)),
    );

    let size_emu = BADGE_DISPLAY_PX * EMU_PER_PX;
    let right = TableCell::new()
        .width(BADGE_COL_DXA, WidthType::Dxa)
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_image(Pic::new(badge).size(size_emu, size_emu)))
                .align(AlignmentType::Right),
        );

    Table::new(vec![TableRow::new(vec![left, right])])
        .set_grid(vec![CONTACT_COL_DXA, BADGE_COL_DXA])
        .clear_all_border()
}

fn section_header(title: &str) -> Table {
    let cell = TableCell::new()
        .width(FULL_WIDTH_DXA, WidthType::Dxa)
        .shading(Shading::new().fill(SECTION_FILL))
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(title).bold().size(TITLE_SIZE))
                .align(AlignmentType::Left)
                .line_spacing(
                    LineSpacing::new()
                        .before(HEADER_SPACING_BEFORE)
                        .after(HEADER_SPACING_AFTER),
                ),
        );

    Table::new(vec![TableRow::new(vec![cell])])
        .set_grid(vec![FULL_WIDTH_DXA])
        .clear_all_border()
}

fn body_paragraphs(body: &SectionBody) -> Vec<Paragraph> {
    match body {
        SectionBody::Text(text) => vec![plain(text)],

        SectionBody::Bullets(items) => items.iter().map(|item| bullet(item)).collect(),

        SectionBody::Fields(fields) => fields
            .iter()
            .map(|f| labeled(&f.label, &f.value))
            .collect(),

        SectionBody::Certifications(items) => items
            .iter()
            .flat_map(|cert| {
                let mut block = vec![strong(&cert.name)];
                if let Some(issuer) = &cert.issuer {
                    block.push(labeled("Issuer:", issuer));
                }
                if let Some(year) = &cert.year {
                    block.push(labeled("Year:", year));
                }
                block
            })
            .collect(),

        SectionBody::Projects(projects) => projects
            .iter()
            .flat_map(|project| {
                let mut block = vec![labeled("Project:", &project.project_name)];
                block.extend(project.details.iter().map(|f| labeled(&f.label, &f.value)));
                if !project.responsibilities.is_empty() {
                    block.push(strong("Roles & Responsibilities:"));
                    block.extend(project.responsibilities.iter().map(|r| bullet(r)));
                }
                block
            })
            .collect(),

        SectionBody::Declaration(decl) => {
            let mut block = vec![plain(&decl.text)];
            if let Some(line) = &decl.date_place {
                block.push(plain(line));
            }
            block
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Paragraph helpers
// ────────────────────────────────────────────────────────────────────────────

fn plain(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn strong(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold())
}

fn bullet(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(format!("{BULLET} {text}")))
}

fn labeled(label: &str, value: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(label).bold())
        .add_run(Run::new().add_text(format!(" {value}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
