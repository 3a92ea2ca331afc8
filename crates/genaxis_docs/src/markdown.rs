//! Markdown to layout blocks.
//!
//! Inline styling is flattened to plain text; only block structure survives.

use crate::document::Block;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

pub(crate) fn markdown_blocks(source: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(source, parser_options()) {
        builder.push(event);
    }
    builder.finish()
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    text: String,
    heading: Option<u8>,
    /// Next number of each open ordered list, `None` for bullet lists.
    lists: Vec<Option<u64>>,
    item_marker: Option<String>,
    code: Option<String>,
    cells: Vec<String>,
}

impl BlockBuilder {
    fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match self.code.as_mut() {
                Some(code) => code.push_str(&text),
                None => self.text.push_str(&text),
            },
            Event::Code(code) => self.text.push_str(&code),
            Event::SoftBreak => self.text.push(' '),
            Event::HardBreak => self.text.push('\n'),
            Event::Rule => {
                self.flush_text();
                self.blocks.push(Block::Rule);
            }
            Event::TaskListMarker(checked) => {
                self.text.push_str(if checked { "[x] " } else { "[ ] " })
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_text();
                self.heading = Some(level as u8);
            }
            Tag::List(first) => {
                self.flush_text();
                self.lists.push(first);
            }
            Tag::Item => {
                let marker = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let marker = format!("{next}.");
                        *next += 1;
                        marker
                    }
                    _ => "\u{2022}".to_string(),
                };
                self.item_marker = Some(marker);
            }
            Tag::CodeBlock(_) => {
                self.flush_text();
                self.code = Some(String::new());
            }
            Tag::Table(_) => self.flush_text(),
            Tag::TableHead | Tag::TableRow => self.cells.clear(),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                let text = std::mem::take(&mut self.text).trim().to_string();
                let level = self.heading.take().unwrap_or(1);
                self.blocks.push(Block::Heading { level, text });
            }
            TagEnd::Paragraph => self.flush_text(),
            TagEnd::Item => {
                self.flush_text();
                if let Some(marker) = self.item_marker.take() {
                    self.blocks.push(Block::ListItem {
                        depth: self.lists.len(),
                        marker,
                        text: String::new(),
                    });
                }
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            TagEnd::CodeBlock => {
                let code = self.code.take().unwrap_or_default();
                let lines = code.trim_end_matches('\n').lines().map(str::to_string).collect();
                self.blocks.push(Block::CodeBlock(lines));
            }
            TagEnd::TableCell => {
                let cell = std::mem::take(&mut self.text).trim().to_string();
                self.cells.push(cell);
            }
            TagEnd::TableHead => self.push_row(true),
            TagEnd::TableRow => self.push_row(false),
            _ => {}
        }
    }

    fn push_row(&mut self, header: bool) {
        let cells = std::mem::take(&mut self.cells);
        self.blocks.push(Block::TableRow { cells, header });
    }

    fn flush_text(&mut self) {
        let raw = std::mem::take(&mut self.text);
        let text = raw.trim();
        if text.is_empty() {
            return;
        }

        if self.lists.is_empty() {
            self.blocks.push(Block::Paragraph(text.to_string()));
        } else {
            self.blocks.push(Block::ListItem {
                depth: self.lists.len(),
                marker: self.item_marker.take().unwrap_or_default(),
                text: text.to_string(),
            });
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_text();
        self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_paragraphs_and_inline_markup_are_flattened() {
        let blocks = markdown_blocks("# Models\n\nThe **Gene** model uses `txStart`\nand more.\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    text: "Models".to_string()
                },
                Block::Paragraph("The Gene model uses txStart and more.".to_string()),
            ]
        );
    }

    #[test]
    fn nested_and_ordered_lists_keep_depth_and_numbering() {
        let blocks = markdown_blocks("1. first\n2. second\n   - inner\n");
        assert_eq!(
            blocks,
            vec![
                Block::ListItem {
                    depth: 1,
                    marker: "1.".to_string(),
                    text: "first".to_string()
                },
                Block::ListItem {
                    depth: 1,
                    marker: "2.".to_string(),
                    text: "second".to_string()
                },
                Block::ListItem {
                    depth: 2,
                    marker: "\u{2022}".to_string(),
                    text: "inner".to_string()
                },
            ]
        );
    }

    #[test]
    fn fenced_code_keeps_lines_verbatim() {
        let blocks = markdown_blocks("```rust\nfn main() {\n    run();\n}\n```\n");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock(vec![
                "fn main() {".to_string(),
                "    run();".to_string(),
                "}".to_string(),
            ])]
        );
    }

    #[test]
    fn tables_become_rows_with_header_flag() {
        let blocks = markdown_blocks("| field | type |\n|---|---|\n| name | text |\n");
        assert_eq!(
            blocks,
            vec![
                Block::TableRow {
                    cells: vec!["field".to_string(), "type".to_string()],
                    header: true
                },
                Block::TableRow {
                    cells: vec!["name".to_string(), "text".to_string()],
                    header: false
                },
            ]
        );
    }
}
