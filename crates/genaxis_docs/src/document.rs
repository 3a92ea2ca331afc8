//! Document model shared by the PDF and HTML renderers.

use crate::guide::PageMap;
use crate::markdown::markdown_blocks;
use crate::section::Section;

pub const TOC_HEADING: &str = "Contents";

/// A layout unit of the PDF rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title { title: String, subtitle: String },
    Heading { level: u8, text: String },
    Paragraph(String),
    /// `depth` starts at 1 for top-level items. Continuation paragraphs of an
    /// item carry an empty marker.
    ListItem {
        depth: usize,
        marker: String,
        text: String,
    },
    CodeBlock(Vec<String>),
    TableRow { cells: Vec<String>, header: bool },
    TocEntry { title: String, page: Option<u32> },
    Rule,
    PageBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    /// `None` when the title was not found in the discovery pass.
    pub page: Option<u32>,
}

/// Title page, optional table of contents, then one part per section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideDocument {
    pub title: String,
    pub subtitle: String,
    pub toc: Option<Vec<TocEntry>>,
    pub sections: Vec<Section>,
}

impl GuideDocument {
    /// Flattens the document into layout blocks.
    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks = vec![
            Block::Title {
                title: self.title.clone(),
                subtitle: self.subtitle.clone(),
            },
            Block::PageBreak,
        ];

        if let Some(entries) = &self.toc {
            blocks.push(Block::Heading {
                level: 2,
                text: TOC_HEADING.to_string(),
            });
            blocks.extend(entries.iter().map(|entry| Block::TocEntry {
                title: entry.title.clone(),
                page: entry.page,
            }));
            blocks.push(Block::Rule);
        }

        for section in &self.sections {
            blocks.push(Block::Heading {
                level: 2,
                text: section.title.clone(),
            });
            blocks.extend(markdown_blocks(&section.markdown));
            blocks.push(Block::Rule);
        }
        blocks
    }
}

/// Builds the document for `sections`.
///
/// With `pages = None` the table of contents is omitted (discovery pass).
/// Otherwise every section gets an entry carrying its page, if known.
pub fn build_document(
    sections: &[Section],
    title: &str,
    subtitle: &str,
    pages: Option<&PageMap>,
) -> GuideDocument {
    let toc = pages.map(|pages| {
        sections
            .iter()
            .map(|section| TocEntry {
                title: section.title.clone(),
                page: pages.get(&section.title).copied(),
            })
            .collect()
    });

    GuideDocument {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        toc,
        sections: sections.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn section(title: &str, markdown: &str) -> Section {
        Section {
            title: title.to_string(),
            path: PathBuf::from(title).join("sketch.md"),
            markdown: markdown.to_string(),
        }
    }

    #[test]
    fn discovery_document_has_no_contents() {
        let document = build_document(&[section("api", "Hello")], "Docs", "sub", None);
        let blocks = document.blocks();

        assert!(document.toc.is_none());
        assert!(!blocks
            .iter()
            .any(|block| matches!(block, Block::TocEntry { .. })));
        assert_eq!(
            blocks[2],
            Block::Heading {
                level: 2,
                text: "api".to_string()
            }
        );
        assert_eq!(blocks[3], Block::Paragraph("Hello".to_string()));
        assert_eq!(blocks.last(), Some(&Block::Rule));
    }

    #[test]
    fn contents_carry_known_pages_only() {
        let mut pages = PageMap::new();
        pages.insert("api".to_string(), 2);
        let sections = [section("api", ""), section("web", "")];

        let document = build_document(&sections, "Docs", "sub", Some(&pages));
        let toc = document.toc.unwrap();
        assert_eq!(toc[0].page, Some(2));
        assert_eq!(toc[1].title, "web");
        assert_eq!(toc[1].page, None);
    }
}
