//! Text to PDF rendering.

use crate::document::layout::PageLayout;
use crate::error::DocumentError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

const FONT_RESOURCE: &str = "F1";

/// Summary of a rendered document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub line_count: usize,
    pub content_height: f32,
    /// Content is taller than the page; the overflow is drawn below the
    /// bottom margin and clipped by viewers.
    pub truncated: bool,
}

/// Render `text` as a single-page PDF at `destination` using the default layout.
pub fn render_text(text: &str, destination: &Path) -> Result<RenderReport, DocumentError> {
    render_text_with_layout(text, destination, &PageLayout::letter())
}

pub fn render_text_with_layout(
    text: &str,
    destination: &Path,
    layout: &PageLayout,
) -> Result<RenderReport, DocumentError> {
    let lines = layout.wrap(text);
    let content_height = layout.content_height(lines.len());
    let truncated = !layout.fits(lines.len());

    if truncated {
        tracing::warn!(
            path = %destination.display(),
            content_height,
            available_height = layout.available_height(),
            "Text is too long for a single PDF page; part of the content may be truncated"
        );
    }

    let mut doc = build_document(&lines, layout)?;
    doc.compress();
    doc.save(destination).map_err(|e| DocumentError::Write {
        path: destination.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!(
        path = %destination.display(),
        line_count = lines.len(),
        "Anonymized PDF written"
    );

    Ok(RenderReport {
        line_count: lines.len(),
        content_height,
        truncated,
    })
}

fn build_document(lines: &[String], layout: &PageLayout) -> Result<Document, DocumentError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_RESOURCE => font_id,
        },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![FONT_RESOURCE.into(), Object::Real(layout.font_size)],
        ),
        Operation::new("TL", vec![Object::Real(layout.leading)]),
        Operation::new(
            "Td",
            vec![
                Object::Real(layout.margin),
                Object::Real(layout.first_baseline()),
            ],
        ),
    ];
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        if !line.is_empty() {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_win_ansi(line))],
            ));
        }
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| DocumentError::Build(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            Object::Real(layout.page_width),
            Object::Real(layout.page_height),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Encode for WinAnsiEncoding. Latin-1 maps directly; a few common
/// typographic characters have their own code points; the rest become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\t' => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if (c as u32) < 0x20 => b' ',
            c if (c as u32) < 0x80 => c as u8,
            c if (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
