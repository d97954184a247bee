//! Writes a composed `PagedDocument` as PDF with lopdf.
//!
//! Only the two standard Type1 faces are used, so no font program is embedded. Text is
//! encoded as WinAnsi; characters outside that code page print as `?`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::export::paged::{DrawOp, PagedDocument, Rgb};
use crate::export::ExportError;
use crate::layout::FontFace;

pub fn render_pdf(paged: &PagedDocument) -> Result<Vec<u8>, ExportError> {
    let geometry = paged.geometry;
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(font_dict(FontFace::Helvetica));
    let font_bold = doc.add_object(font_dict(FontFace::HelveticaBold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontFace::Helvetica.resource_name() => font_regular,
            FontFace::HelveticaBold.resource_name() => font_bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(paged.pages.len());
    for ops in &paged.pages {
        let operations: Vec<Operation> = ops
            .iter()
            .flat_map(|op| draw_operations(op, geometry.height_pt))
            .collect();
        let content = Content { operations }
            .encode()
            .map_err(|e| ExportError::Serialization(format!("encoding page content: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                geometry.width_pt.into(),
                geometry.height_pt.into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = info_dict(&mut doc, &paged.title);
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Serialization(format!("writing pdf: {e}")))?;
    Ok(bytes)
}

fn font_dict(face: FontFace) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn info_dict(doc: &mut Document, title: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Title" => Object::String(win_ansi(title), StringFormat::Literal),
        "Producer" => Object::string_literal(concat!("resume-export ", env!("CARGO_PKG_VERSION"))),
    })
}

/// Content-stream operators for one op. Flips `y` from top-down into PDF user space.
fn draw_operations(op: &DrawOp, page_height: f32) -> Vec<Operation> {
    match op {
        DrawOp::Text {
            x,
            y,
            face,
            size,
            color,
            text,
        } => vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![face.resource_name().into(), (*size).into()]),
            fill_color(*color),
            Operation::new("Td", vec![(*x).into(), (page_height - y).into()]),
            Operation::new(
                "Tj",
                vec![Object::String(win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ],
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            color,
        } => vec![
            Operation::new("q", vec![]),
            fill_color(*color),
            Operation::new(
                "re",
                vec![
                    (*x).into(),
                    (page_height - y - height).into(),
                    (*width).into(),
                    (*height).into(),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ],
    }
}

fn fill_color(Rgb(r, g, b): Rgb) -> Operation {
    Operation::new("rg", vec![r.into(), g.into(), b.into()])
}

/// Encodes text for a WinAnsiEncoding font.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::paged::compose;
    use crate::export::test_support::{full_record, rendered_values};
    use crate::layout::PageGeometry;
    use crate::models::resume::ResumeRecord;

    #[test]
    fn test_win_ansi_mapping() {
        assert_eq!(win_ansi("Abc"), b"Abc".to_vec());
        assert_eq!(win_ansi("\u{2022} Zoë"), vec![0x95, b' ', b'Z', b'o', 0xEB]);
        assert_eq!(win_ansi("\u{2013}\u{2014}\u{20AC}"), vec![0x96, 0x97, 0x80]);
        assert_eq!(win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn test_rect_is_flipped_into_pdf_space() {
        let op = DrawOp::Rect {
            x: 40.0,
            y: 100.0,
            width: 50.0,
            height: 20.0,
            color: Rgb(0.0, 0.0, 0.0),
        };
        let ops = draw_operations(&op, 800.0);
        let re = ops.iter().find(|o| o.operator == "re").unwrap();
        assert_eq!(re.operands[1].as_float().unwrap(), 680.0);
    }

    #[test]
    fn test_page_count_matches_composition() {
        let paged = compose(&full_record(), PageGeometry::a4());
        let bytes = render_pdf(&paged).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), paged.page_count());
    }

    #[test]
    fn test_empty_record_renders_single_page() {
        let paged = compose(&ResumeRecord::default(), PageGeometry::a4());
        let bytes = render_pdf(&paged).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_extracted_text_contains_every_value_and_signature() {
        let record = full_record();
        let bytes = render_pdf(&compose(&record, PageGeometry::a4())).unwrap();
        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        let missing: Vec<String> = rendered_values(&record)
            .into_iter()
            .filter(|value| !text.contains(value.as_str()))
            .collect();
        assert!(missing.is_empty(), "missing values: {missing:?}");
        assert!(text.contains(&record.declaration.signature));
        assert!(text.contains("Signature:"));
    }
}
