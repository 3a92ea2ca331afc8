//! PDF writing and page text extraction (lopdf).

use crate::document::GuideDocument;
use crate::error::{DocsError, DocsResult};
use crate::layout::{
    centered, paginate, DrawItem, Font, PageLayout, FOOTER_BASELINE, FOOTER_SIZE, MUTED,
    PAGE_HEIGHT, PAGE_WIDTH,
};
use log::{debug, info};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Renders `document` to `path` and returns the page count.
pub fn render_pdf(document: &GuideDocument, path: &Path) -> DocsResult<usize> {
    let pdf_err = |source| DocsError::Pdf {
        path: path.to_path_buf(),
        source,
    };
    let write_err = |source: std::io::Error| DocsError::Write {
        path: path.to_path_buf(),
        source,
    };

    let pages = paginate(&document.blocks());
    let total = pages.len();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in Font::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::with_capacity(total);
    for (index, page) in pages.iter().enumerate() {
        let mut operations = page_operations(page);
        operations.extend(footer_operations(index + 1, total));
        let content = Content { operations }.encode().map_err(pdf_err)?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => total as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::from(PAGE_WIDTH),
                Object::from(PAGE_HEIGHT),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(&document.title), StringFormat::Literal),
        "Producer" => Object::string_literal("genaxis_docs"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer)
        .map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    info!(
        "event=docs_render_pdf module=docs status=ok path={} pages={total}",
        path.display()
    );
    Ok(total)
}

/// Returns the extracted text of every page, in page order.
pub fn extract_page_texts(path: &Path) -> DocsResult<Vec<String>> {
    let pdf_err = |source| DocsError::Pdf {
        path: path.to_path_buf(),
        source,
    };

    let doc = Document::load(path).map_err(pdf_err)?;
    let texts = doc
        .get_pages()
        .keys()
        .map(|&number| doc.extract_text(&[number]).map_err(pdf_err))
        .collect::<DocsResult<Vec<_>>>()?;
    debug!(
        "event=docs_extract_text module=docs status=ok path={} pages={}",
        path.display(),
        texts.len()
    );
    Ok(texts)
}

fn page_operations(page: &PageLayout) -> Vec<Operation> {
    let mut operations = Vec::new();
    for item in &page.items {
        match item {
            DrawItem::Text {
                font,
                size,
                x,
                y,
                color,
                text,
            } => push_text(&mut operations, *font, *size, *x, *y, *color, text),
            DrawItem::Line {
                x1,
                x2,
                y,
                width,
                color,
            } => {
                operations.push(Operation::new("w", vec![(*width).into()]));
                operations.push(Operation::new(
                    "RG",
                    vec![color[0].into(), color[1].into(), color[2].into()],
                ));
                operations.push(Operation::new("m", vec![(*x1).into(), (*y).into()]));
                operations.push(Operation::new("l", vec![(*x2).into(), (*y).into()]));
                operations.push(Operation::new("S", vec![]));
            }
        }
    }
    operations
}

fn footer_operations(page: usize, total: usize) -> Vec<Operation> {
    let text = format!("Page {page} of {total}");
    let x = centered(&text, Font::Regular, FOOTER_SIZE);
    let mut operations = Vec::new();
    push_text(
        &mut operations,
        Font::Regular,
        FOOTER_SIZE,
        x,
        FOOTER_BASELINE,
        MUTED,
        &text,
    );
    operations
}

fn push_text(
    operations: &mut Vec<Operation>,
    font: Font,
    size: f32,
    x: f32,
    y: f32,
    color: [f32; 3],
    text: &str,
) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec![font.resource_name().into(), size.into()],
    ));
    operations.push(Operation::new(
        "rg",
        vec![color[0].into(), color[1].into(), color[2].into()],
    ));
    operations.push(Operation::new("Td", vec![x.into(), y.into()]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
    ));
    operations.push(Operation::new("ET", vec![]));
}

/// Encodes `text` for the standard fonts' WinAnsiEncoding. Characters outside
/// the encoding become `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => ch as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_document;

    #[test]
    fn win_ansi_keeps_latin1_and_replaces_the_rest() {
        assert_eq!(encode_win_ansi("Gene é"), b"Gene \xe9".to_vec());
        assert_eq!(encode_win_ansi("\u{2022} \u{1f9ec}"), vec![0x95, b' ', b'?']);
    }

    #[test]
    fn rendered_pages_carry_footer_and_are_extractable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("title.pdf");
        let document = build_document(&[], "Genaxis Guide", "generated", None);

        let pages = render_pdf(&document, &path).unwrap();
        let texts = extract_page_texts(&path).unwrap();

        assert_eq!(pages, texts.len());
        assert!(texts[0].contains("Genaxis Guide"));
        assert!(texts[0].contains(&format!("Page 1 of {pages}")));
    }

    #[test]
    fn unwritable_target_keeps_the_io_cause() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("guide.pdf");
        let document = build_document(&[], "Genaxis Guide", "generated", None);

        match render_pdf(&document, &path).unwrap_err() {
            DocsError::Write { path: failed, source } => {
                assert_eq!(failed, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
