//! Two-pass guide generation.

use crate::document::build_document;
use crate::error::{DocsError, DocsResult};
use crate::html::render_html;
use crate::pdf::{extract_page_texts, render_pdf};
use crate::section::discover_sections;
use log::info;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "project_documentation.pdf";
pub const DEFAULT_TITLE: &str = "Project Documentation";
pub const DEFAULT_SUBTITLE: &str = "autogenerated documentation";

/// Section title to 1-based page number.
pub type PageMap = BTreeMap<String, u32>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideOptions {
    pub source_dir: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub subtitle: String,
    /// Also write an HTML rendering of the final document here.
    pub html_output: Option<PathBuf>,
}

impl Default for GuideOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output: PathBuf::from(DEFAULT_OUTPUT),
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            html_output: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideOutcome {
    pub output: PathBuf,
    /// Section titles in document order.
    pub titles: Vec<String>,
    /// Pages found in the discovery pass.
    pub pages: PageMap,
    pub page_count: usize,
}

/// Maps each title to the first page (1-based) whose text contains it.
/// Titles found on no page are absent from the result.
pub fn locate_titles(page_texts: &[String], titles: &[String]) -> PageMap {
    let mut pages = PageMap::new();
    for (index, text) in page_texts.iter().enumerate() {
        for title in titles {
            if !pages.contains_key(title) && text.contains(title.as_str()) {
                pages.insert(title.clone(), index as u32 + 1);
            }
        }
    }
    pages
}

/// Renders the guide twice: once without contents to find section pages, then
/// with contents carrying them.
///
/// The discovery PDF is created next to `options.output` and removed when
/// this returns, whether or not the run succeeded.
pub fn generate_guide(options: &GuideOptions) -> DocsResult<GuideOutcome> {
    let sections = discover_sections(&options.source_dir)?;
    let titles: Vec<String> = sections.iter().map(|section| section.title.clone()).collect();
    info!(
        "event=docs_generate module=docs status=start source_dir={} sections={}",
        options.source_dir.display(),
        sections.len()
    );

    let output_dir = match options.output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let discovery = tempfile::Builder::new()
        .prefix("temp_manual")
        .suffix(".pdf")
        .tempfile_in(&output_dir)
        .map_err(|source| DocsError::Write {
            path: output_dir.clone(),
            source,
        })?;

    let draft = build_document(&sections, &options.title, &options.subtitle, None);
    render_pdf(&draft, discovery.path())?;
    let pages = locate_titles(&extract_page_texts(discovery.path())?, &titles);
    info!(
        "event=docs_discovery module=docs status=ok located={} of={}",
        pages.len(),
        titles.len()
    );

    let document = build_document(&sections, &options.title, &options.subtitle, Some(&pages));
    let page_count = render_pdf(&document, &options.output)?;
    if let Some(html_path) = &options.html_output {
        write_html(html_path, &render_html(&document))?;
    }

    discovery.close().map_err(|source| DocsError::Write {
        path: output_dir,
        source,
    })?;

    info!(
        "event=docs_generate module=docs status=ok output={} pages={page_count}",
        options.output.display()
    );
    Ok(GuideOutcome {
        output: options.output.clone(),
        titles,
        pages,
        page_count,
    })
}

fn write_html(path: &Path, html: &str) -> DocsResult<()> {
    std::fs::write(path, html).map_err(|source| DocsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn first_matching_page_wins() {
        let texts = strings(&["Title page", "alpha\nbody", "beta\nalpha again"]);
        let pages = locate_titles(&texts, &strings(&["alpha", "beta", "gamma"]));

        assert_eq!(pages.get("alpha"), Some(&2));
        assert_eq!(pages.get("beta"), Some(&3));
        assert_eq!(pages.get("gamma"), None);
    }

    #[test]
    fn title_mentioned_in_earlier_prose_reports_the_earlier_page() {
        let texts = strings(&["see the billing section", "billing"]);
        let pages = locate_titles(&texts, &strings(&["billing"]));
        assert_eq!(pages.get("billing"), Some(&1));
    }
}
