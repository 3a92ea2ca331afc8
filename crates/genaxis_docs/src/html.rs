//! HTML rendering of a guide, mirroring the PDF structure.

use crate::document::{GuideDocument, TOC_HEADING};
use crate::markdown::parser_options;
use pulldown_cmark::{html, Parser};
use pulldown_cmark_escape::escape_html;

const STYLESHEET: &str = r#"
@page { size: A4; margin: 2cm; }
body { font-family: Arial, sans-serif; margin: 2em; }
h1, h2 { color: #2c3e50; }
.title-page { page-break-after: always; text-align: center; }
.title-page h1 { font-size: 3em; margin-top: 5em; }
.title-page p { font-size: 1.2em; color: #888; }
ul.toc { list-style-type: none; padding-left: 0; }
ul.toc li { margin-bottom: 0.5em; font-size: 1.1em; position: relative; padding-right: 30px; }
ul.toc li a { text-decoration: none; color: #2980b9; }
ul.toc li span { position: absolute; right: 0; top: 0; font-weight: bold; color: #555; }
table { border-collapse: collapse; width: 100%; margin-bottom: 1.5em; }
table, th, td { border: 1px solid #ddd; }
th, td { padding: 8px; text-align: left; }
th { background-color: #f2f2f2; }
code { background-color: #eee; padding: 2px 4px; font-family: monospace; }
pre { background-color: #f5f5f5; padding: 1em; overflow: auto; }
"#;

/// Renders `document` as a standalone HTML page.
pub fn render_html(document: &GuideDocument) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<div class=\"title-page\"><h1>{}</h1><p>{}</p></div>\n",
        escape(&document.title),
        escape(&document.subtitle)
    ));

    if let Some(entries) = &document.toc {
        body.push_str(&format!("<h2>{TOC_HEADING}</h2>\n<ul class=\"toc\">\n"));
        for entry in entries {
            let page = entry
                .page
                .map(|page| format!("<span>{page}</span>"))
                .unwrap_or_default();
            body.push_str(&format!(
                "<li><a href=\"#{}\">{}</a>{page}</li>\n",
                anchor(&entry.title),
                escape(&entry.title)
            ));
        }
        body.push_str("</ul>\n<hr>\n");
    }

    for section in &document.sections {
        body.push_str(&format!(
            "<h2 id=\"{}\">{}</h2>\n",
            anchor(&section.title),
            escape(&section.title)
        ));
        html::push_html(&mut body, Parser::new_ext(&section.markdown, parser_options()));
        body.push_str("<hr>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{STYLESHEET}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape(&document.title)
    )
}

/// Lowercased title with spaces replaced by underscores.
fn anchor(title: &str) -> String {
    escape(&title.replace(' ', "_").to_lowercase())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    escape_html(&mut escaped, text).expect("writing to a String cannot fail");
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_document;
    use crate::guide::PageMap;
    use crate::section::Section;
    use std::path::PathBuf;

    #[test]
    fn html_links_contents_to_section_anchors() {
        let sections = [Section {
            title: "Crispr App".to_string(),
            path: PathBuf::from("Crispr App/sketch.md"),
            markdown: "| a | b |\n|---|---|\n| 1 | 2 |\n".to_string(),
        }];
        let mut pages = PageMap::new();
        pages.insert("Crispr App".to_string(), 2);

        let html = render_html(&build_document(&sections, "Docs & more", "sub", Some(&pages)));

        assert!(html.contains("<h1>Docs &amp; more</h1>"));
        assert!(html.contains("<a href=\"#crispr_app\">Crispr App</a><span>2</span>"));
        assert!(html.contains("<h2 id=\"crispr_app\">Crispr App</h2>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn markup_in_titles_is_escaped() {
        let sections = [Section {
            title: "a<b> \"c\"".to_string(),
            path: PathBuf::from("x/sketch.md"),
            markdown: String::new(),
        }];

        let html = render_html(&build_document(&sections, "T", "S", None));

        assert!(html.contains("<h2 id=\"a&lt;b&gt;_&quot;c&quot;\">a&lt;b&gt; &quot;c&quot;</h2>"));
        assert!(!html.contains("<b>"));
    }
}
