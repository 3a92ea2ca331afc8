//! A4 pagination of layout blocks.
//!
//! Widths come from the Helvetica and Courier AFM metrics, so wrapping
//! matches what a viewer draws with the standard Type1 fonts.

use crate::document::Block;

/// A4 in points.
pub(crate) const PAGE_WIDTH: f32 = 595.28;
pub(crate) const PAGE_HEIGHT: f32 = 841.89;
/// 2 cm.
pub(crate) const MARGIN: f32 = 56.69;
pub(crate) const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
pub(crate) const FOOTER_BASELINE: f32 = MARGIN / 2.0;
pub(crate) const FOOTER_SIZE: f32 = 9.0;

const BODY_SIZE: f32 = 11.0;
const BODY_LEADING: f32 = 15.0;
const CODE_SIZE: f32 = 9.0;
const CODE_LEADING: f32 = 11.5;
const LIST_INDENT: f32 = 16.0;
const CELL_PADDING: f32 = 4.0;

pub(crate) type Rgb = [f32; 3];

pub(crate) const BLACK: Rgb = [0.0, 0.0, 0.0];
pub(crate) const HEADING: Rgb = [0.17, 0.24, 0.31];
pub(crate) const MUTED: Rgb = [0.33, 0.33, 0.33];
const RULE_GRAY: Rgb = [0.8, 0.8, 0.8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Font {
    Regular,
    Bold,
    Mono,
}

impl Font {
    pub(crate) const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Mono];

    pub(crate) fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Mono => "F3",
        }
    }

    pub(crate) fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Mono => "Courier",
        }
    }

    /// Advance width of `ch` in thousandths of the font size.
    fn advance(self, ch: char) -> f32 {
        match self {
            Font::Mono => 600.0,
            Font::Regular => helvetica_advance(ch),
            Font::Bold => helvetica_bold_advance(ch),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawItem {
    Text {
        font: Font,
        size: f32,
        x: f32,
        y: f32,
        color: Rgb,
        text: String,
    },
    Line {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PageLayout {
    pub(crate) items: Vec<DrawItem>,
}

pub(crate) fn text_width(text: &str, font: Font, size: f32) -> f32 {
    text.chars().map(|ch| font.advance(ch)).sum::<f32>() * size / 1000.0
}

/// Greedy word wrap. Explicit newlines start a new line; words wider than
/// `max_width` are split by character.
pub(crate) fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width(&candidate, font, size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width(word, font, size) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = split_by_width(word, font, size, max_width);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        lines.push(current);
    }
    lines
}

fn split_by_width(word: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if text_width(&current, font, size) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::replace(&mut current, ch.to_string()));
        }
    }
    pieces.push(current);
    pieces
}

/// Lays `blocks` out on A4 pages. Footers are added by the PDF writer.
pub(crate) fn paginate(blocks: &[Block]) -> Vec<PageLayout> {
    let mut paginator = Paginator::new();
    for block in blocks {
        paginator.place(block);
    }
    paginator.pages
}

struct Paginator {
    pages: Vec<PageLayout>,
    /// Distance of the cursor from the page bottom.
    y: f32,
}

impl Paginator {
    fn new() -> Self {
        Self {
            pages: vec![PageLayout::default()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn page(&mut self) -> &mut PageLayout {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn at_page_top(&self) -> bool {
        self.pages.last().map_or(true, |page| page.items.is_empty())
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Starts a new page unless `height` still fits above the bottom margin.
    fn reserve(&mut self, height: f32) {
        if self.y - height < MARGIN && !self.at_page_top() {
            self.new_page();
        }
    }

    fn gap(&mut self, height: f32) {
        if !self.at_page_top() {
            self.y -= height;
        }
    }

    fn line(&mut self, font: Font, size: f32, leading: f32, x: f32, color: Rgb, text: String) {
        self.reserve(leading);
        self.y -= leading;
        let baseline = self.y + (leading - size) / 2.0;
        self.page().items.push(DrawItem::Text {
            font,
            size,
            x,
            y: baseline,
            color,
            text,
        });
    }

    fn rule(&mut self, x1: f32, x2: f32, width: f32, color: Rgb) {
        let y = self.y;
        self.page().items.push(DrawItem::Line {
            x1,
            x2,
            y,
            width,
            color,
        });
    }

    fn place(&mut self, block: &Block) {
        match block {
            Block::Title { title, subtitle } => self.place_title(title, subtitle),
            Block::Heading { level, text } => self.place_heading(*level, text),
            Block::Paragraph(text) => {
                for line in wrap_text(text, Font::Regular, BODY_SIZE, CONTENT_WIDTH) {
                    self.line(Font::Regular, BODY_SIZE, BODY_LEADING, MARGIN, BLACK, line);
                }
                self.gap(6.0);
            }
            Block::ListItem {
                depth,
                marker,
                text,
            } => self.place_list_item(*depth, marker, text),
            Block::CodeBlock(lines) => {
                self.gap(2.0);
                let columns = ((CONTENT_WIDTH - 8.0) / (0.6 * CODE_SIZE)).floor().max(1.0) as usize;
                for line in lines {
                    for chunk in chunk_chars(line, columns) {
                        self.line(Font::Mono, CODE_SIZE, CODE_LEADING, MARGIN + 8.0, BLACK, chunk);
                    }
                }
                self.gap(6.0);
            }
            Block::TableRow { cells, header } => self.place_table_row(cells, *header),
            Block::TocEntry { title, page } => self.place_toc_entry(title, *page),
            Block::Rule => {
                self.gap(6.0);
                self.reserve(8.0);
                self.rule(MARGIN, PAGE_WIDTH - MARGIN, 0.75, RULE_GRAY);
                self.y -= 8.0;
            }
            Block::PageBreak => self.new_page(),
        }
    }

    fn place_title(&mut self, title: &str, subtitle: &str) {
        self.y = PAGE_HEIGHT - 260.0;
        for line in wrap_text(title, Font::Bold, 30.0, CONTENT_WIDTH) {
            let x = centered(&line, Font::Bold, 30.0);
            self.line(Font::Bold, 30.0, 38.0, x, HEADING, line);
        }
        self.y -= 12.0;
        for line in wrap_text(subtitle, Font::Regular, 14.0, CONTENT_WIDTH) {
            let x = centered(&line, Font::Regular, 14.0);
            self.line(Font::Regular, 14.0, 18.0, x, MUTED, line);
        }
    }

    fn place_heading(&mut self, level: u8, text: &str) {
        let size = match level {
            1 => 20.0,
            2 => 16.0,
            3 => 13.0,
            _ => 12.0,
        };
        let leading = size * 1.3;
        self.gap(size * 0.6);
        // Keep the heading together with the first line below it.
        self.reserve(leading + BODY_LEADING);
        for line in wrap_text(text, Font::Bold, size, CONTENT_WIDTH) {
            self.line(Font::Bold, size, leading, MARGIN, HEADING, line);
        }
        self.gap(4.0);
    }

    fn place_list_item(&mut self, depth: usize, marker: &str, text: &str) {
        let indent = LIST_INDENT * depth.max(1) as f32;
        let x = MARGIN + indent;
        let lines = wrap_text(text, Font::Regular, BODY_SIZE, CONTENT_WIDTH - indent);
        for (index, line) in lines.into_iter().enumerate() {
            self.line(Font::Regular, BODY_SIZE, BODY_LEADING, x, BLACK, line);
            if index == 0 && !marker.is_empty() {
                let marker_x = x - text_width(marker, Font::Regular, BODY_SIZE) - 4.0;
                let y = self.y + (BODY_LEADING - BODY_SIZE) / 2.0;
                self.page().items.push(DrawItem::Text {
                    font: Font::Regular,
                    size: BODY_SIZE,
                    x: marker_x,
                    y,
                    color: BLACK,
                    text: marker.to_string(),
                });
            }
        }
        self.gap(2.0);
    }

    fn place_table_row(&mut self, cells: &[String], header: bool) {
        if cells.is_empty() {
            return;
        }
        let font = if header { Font::Bold } else { Font::Regular };
        let column_width = CONTENT_WIDTH / cells.len() as f32;
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .map(|cell| wrap_text(cell, font, BODY_SIZE - 1.0, column_width - 2.0 * CELL_PADDING))
            .collect();
        let rows = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        let height = rows as f32 * BODY_LEADING + CELL_PADDING;

        self.reserve(height);
        let top = self.y;
        for (column, lines) in wrapped.into_iter().enumerate() {
            let x = MARGIN + column as f32 * column_width + CELL_PADDING;
            for (row, line) in lines.into_iter().enumerate() {
                let y = top - (row as f32 + 1.0) * BODY_LEADING + (BODY_LEADING - BODY_SIZE) / 2.0;
                self.page().items.push(DrawItem::Text {
                    font,
                    size: BODY_SIZE - 1.0,
                    x,
                    y,
                    color: BLACK,
                    text: line,
                });
            }
        }
        self.y = top - height;
        let width = if header { 1.0 } else { 0.5 };
        self.rule(MARGIN, PAGE_WIDTH - MARGIN, width, RULE_GRAY);
    }

    fn place_toc_entry(&mut self, title: &str, page: Option<u32>) {
        let number = page.map(|page| page.to_string()).unwrap_or_default();
        let number_width = text_width(&number, Font::Bold, 12.0);
        let lines = wrap_text(title, Font::Regular, 12.0, CONTENT_WIDTH - number_width - 24.0);
        for (index, line) in lines.into_iter().enumerate() {
            self.line(Font::Regular, 12.0, 18.0, MARGIN, BLACK, line);
            if index == 0 && !number.is_empty() {
                let y = self.y + 3.0;
                self.page().items.push(DrawItem::Text {
                    font: Font::Bold,
                    size: 12.0,
                    x: PAGE_WIDTH - MARGIN - number_width,
                    y,
                    color: MUTED,
                    text: number.clone(),
                });
            }
        }
    }
}

pub(crate) fn centered(text: &str, font: Font, size: f32) -> f32 {
    (PAGE_WIDTH - text_width(text, font, size)) / 2.0
}

fn chunk_chars(line: &str, columns: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(columns)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn helvetica_advance(ch: char) -> f32 {
    match ch {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | '[' | '\\' | ']' | 'f' | 't' => 278.0,
        'i' | 'j' | 'l' => 222.0,
        '\'' => 191.0,
        '"' => 355.0,
        '(' | ')' | '-' | '`' | 'r' => 333.0,
        '*' => 389.0,
        '+' | '<' | '=' | '>' | '~' => 584.0,
        '%' => 889.0,
        '&' => 667.0,
        '@' => 1015.0,
        '^' => 469.0,
        '{' | '}' => 334.0,
        '|' => 260.0,
        'I' => 278.0,
        'J' => 500.0,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500.0,
        'm' | 'M' => 833.0,
        'w' | 'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722.0,
        'W' => 944.0,
        'G' | 'O' | 'Q' => 778.0,
        'F' | 'T' | 'Z' => 611.0,
        'L' => 556.0,
        'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667.0,
        '\u{2022}' => 350.0,
        _ => 556.0,
    }
}

fn helvetica_bold_advance(ch: char) -> f32 {
    match ch {
        'i' | 'j' | 'l' => 278.0,
        '!' | '(' | ')' | '-' | ':' | ';' | 'f' | 't' => 333.0,
        'r' => 389.0,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 556.0,
        'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 611.0,
        'w' | 'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722.0,
        'L' => 611.0,
        _ => helvetica_advance(ch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width_and_newlines() {
        let lines = wrap_text("aaa bbb ccc\nddd", Font::Mono, 10.0, 42.0);
        assert_eq!(lines, ["aaa bbb", "ccc", "ddd"]);
    }

    #[test]
    fn overlong_word_is_split() {
        let lines = wrap_text("abcdefghij", Font::Mono, 10.0, 24.0);
        assert_eq!(lines, ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn page_break_starts_a_new_page() {
        let pages = paginate(&[
            Block::Paragraph("one".to_string()),
            Block::PageBreak,
            Block::Paragraph("two".to_string()),
        ]);
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn long_content_overflows_onto_more_pages() {
        let blocks: Vec<Block> = (0..200)
            .map(|index| Block::Paragraph(format!("paragraph {index}")))
            .collect();
        let pages = paginate(&blocks);
        assert!(pages.len() > 1);
        for page in &pages {
            for item in &page.items {
                if let DrawItem::Text { y, .. } = item {
                    assert!(*y >= MARGIN - BODY_LEADING, "text below margin at {y}");
                }
            }
        }
    }
}
