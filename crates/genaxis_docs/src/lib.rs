//! Two-pass Markdown to PDF documentation generator.
//!
//! # Responsibility
//! - Collect `sketch.md` files from immediate subdirectories of a source dir.
//! - Render them once without a table of contents to find each section's page.
//! - Render again with a table of contents carrying those page numbers.
//!
//! # Invariants
//! - Sections appear in sorted directory-name order.
//! - A section's page is the first page whose text contains its title.
//! - The discovery PDF never outlives the run.

mod document;
mod error;
mod guide;
mod html;
mod layout;
mod markdown;
mod pdf;
mod section;

pub use document::{build_document, Block, GuideDocument, TocEntry, TOC_HEADING};
pub use error::{DocsError, DocsResult};
pub use guide::{
    generate_guide, locate_titles, GuideOptions, GuideOutcome, PageMap, DEFAULT_OUTPUT,
    DEFAULT_SUBTITLE, DEFAULT_TITLE,
};
pub use html::render_html;
pub use pdf::{extract_page_texts, render_pdf};
pub use section::{discover_sections, Section, SKETCH_FILE_NAME};
