//! Hierarchical numbering for the always-expanded preview.
//!
//! Sections are numbered `1`, `1.1`, `1.1.1`, ... in document order. The title, when present,
//! is listed first without a number. `collapsed` has no effect here: the preview always shows
//! the full tree, and shared snapshots go through the same projection so their numbering
//! matches the editor exactly.

use crate::node::Depth;
use crate::outline::{Entry, Outline};

#[derive(Clone, Debug, PartialEq, Eq)]
/// One line of the numbered preview.
pub struct PreviewRow {
    /// 0 for the title, 1 to 3 for sections.
    pub level: u8,
    /// Dotted number such as `2.1`; `None` for the title.
    pub label: Option<String>,
    /// Displayed title.
    pub title: String,
    /// Indentation in units, `level - 1` for sections.
    pub indent: usize,
}

#[derive(Default)]
struct Counters([usize; 3]);

impl Counters {
    fn advance(&mut self, depth: Depth) -> String {
        let level = usize::from(depth.level());
        self.0[level - 1] += 1;
        for deeper in &mut self.0[level..] {
            *deeper = 0;
        }
        self.0[..level]
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[must_use]
/// Projects the outline into numbered preview rows.
pub fn number(outline: &Outline) -> Vec<PreviewRow> {
    let mut counters = Counters::default();
    outline
        .preorder()
        .map(|entry| match entry {
            Entry::Title(title) => PreviewRow {
                level: 0,
                label: None,
                title: title.candidates.title().to_string(),
                indent: 0,
            },
            Entry::Section(section) => PreviewRow {
                level: section.depth.level(),
                label: Some(counters.advance(section.depth)),
                title: section.title().to_string(),
                indent: usize::from(section.depth.level() - 1),
            },
        })
        .collect()
}

#[must_use]
/// Renders preview rows as indented plain text, one row per line.
///
/// With `show_numbers` off the dotted labels are omitted. An empty row list renders as
/// `(empty)`.
pub fn render_preview(rows: &[PreviewRow], show_numbers: bool, indent_width: usize) -> String {
    if rows.is_empty() {
        return "(empty)".to_string();
    }
    rows.iter()
        .map(|row| {
            let pad = " ".repeat(row.indent * indent_width);
            match row.label.as_deref().filter(|_| show_numbers) {
                Some(label) => format!("{pad}{label} {}", row.title),
                None => format!("{pad}{}", row.title),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "tests/numbering.rs"]
mod tests;
