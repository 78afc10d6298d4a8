//! Line-level formatting of model output
//!
//! Summaries and answers come back as loosely formatted markdown. Each line
//! is shown either as a list item or as a paragraph.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A `•`, `-`, `*` or `1.` item, trimmed
    Bullet(String),
    /// Any other line, kept verbatim (blank lines included)
    Paragraph(String),
}

pub fn render(text: &str) -> Vec<Block> {
    text.lines()
        .map(|line| {
            let trimmed = line.trim();
            if is_list_item(trimmed) {
                Block::Bullet(trimmed.to_string())
            } else {
                Block::Paragraph(line.to_string())
            }
        })
        .collect()
}

fn is_list_item(line: &str) -> bool {
    let mut chars = line.chars();
    match chars.next() {
        Some('•' | '-' | '*') => chars.next().is_some_and(char::is_whitespace),
        Some(c) if c.is_ascii_digit() => {
            let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
            rest.strip_prefix('.')
                .and_then(|after| after.chars().next())
                .is_some_and(char::is_whitespace)
        }
        _ => false,
    }
}
