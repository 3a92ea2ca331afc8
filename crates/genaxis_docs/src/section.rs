//! Section discovery.

use crate::error::{DocsError, DocsResult};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

pub const SKETCH_FILE_NAME: &str = "sketch.md";

/// One documented directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Directory name, used verbatim as the section title.
    pub title: String,
    pub path: PathBuf,
    pub markdown: String,
}

/// Reads `sketch.md` of every immediate subdirectory of `source_dir`, sorted
/// by directory name. Subdirectories without the file are skipped.
pub fn discover_sections(source_dir: &Path) -> DocsResult<Vec<Section>> {
    if !source_dir.is_dir() {
        return Err(DocsError::MissingSourceDir(source_dir.to_path_buf()));
    }
    let read_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| DocsError::Read { path, source }
    };

    let mut candidates = Vec::new();
    for entry in fs::read_dir(source_dir).map_err(read_err(source_dir))? {
        let entry = entry.map_err(read_err(source_dir))?;
        let dir = entry.path();
        let sketch = dir.join(SKETCH_FILE_NAME);
        if dir.is_dir() && sketch.is_file() {
            candidates.push((entry.file_name().to_string_lossy().into_owned(), sketch));
        }
    }
    candidates.sort_by(|left, right| left.0.cmp(&right.0));

    let mut sections = Vec::with_capacity(candidates.len());
    for (title, path) in candidates {
        let markdown = fs::read_to_string(&path).map_err(read_err(&path))?;
        debug!(
            "event=docs_section module=docs status=ok title={title} bytes={}",
            markdown.len()
        );
        sections.push(Section {
            title,
            path,
            markdown,
        });
    }
    Ok(sections)
}
