//! Markdown output and input for outlines.
//!
//! Writing is a straight pre-order walk: one ATX heading per node, with the title at `#` and
//! each section one marker deeper than its level. Reading goes the other way using
//! tree-sitter-md, so a table of contents drafted elsewhere can be brought in as an outline.

use crate::formats::{extract_headings, Format, FormatError};
use crate::node::{Candidates, Depth, NodeId, Section, Title};
use crate::outline::Outline;

/// Tree-sitter queries for ATX-style markdown headings (# syntax).
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn heading_query(&self) -> &'static str {
        "(atx_heading) @heading"
    }

    fn marker_level(&self, kind: &str) -> Option<usize> {
        kind.strip_prefix("atx_h")?
            .strip_suffix("_marker")?
            .parse()
            .ok()
    }

    fn content_kind(&self) -> &'static str {
        "inline"
    }
}

#[must_use]
/// Renders the outline as one heading per line, without a trailing newline.
///
/// The title becomes `#`, level-1 sections `##`, and so on. An outline without a title simply
/// starts at `##`.
pub fn to_markdown(outline: &Outline) -> String {
    outline
        .preorder()
        .map(|entry| {
            let markers = "#".repeat(usize::from(entry.level()) + 1);
            format!("{markers} {}", entry.title())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds an outline from the ATX headings of a markdown document.
///
/// A leading `#` heading becomes the title. `##` to `####` map to levels 1 to 3 and deeper
/// headings are held at level 3. A heading that skips a level is attached as deep as the
/// preceding headings allow.
///
/// # Errors
///
/// Returns an error if the markdown grammar cannot be loaded or the document cannot be parsed.
pub fn outline_from_markdown(source: &str) -> Result<Outline, FormatError> {
    let headings = extract_headings(source, &MarkdownFormat)?;
    let mut title = None;
    let mut sections = Vec::new();

    for (index, heading) in headings.iter().enumerate() {
        if index == 0 && heading.depth == 1 {
            title = Some(Title::new(&heading.text));
            continue;
        }
        let level = u8::try_from(heading.depth.saturating_sub(1)).unwrap_or(u8::MAX);
        let target = Depth::from_level(level.clamp(1, 3)).unwrap_or(Depth::Three);
        append_at(&mut sections, Depth::One, target, &heading.text);
    }

    Ok(Outline::from_parts(title, sections))
}

fn append_at(list: &mut Vec<Section>, depth: Depth, target: Depth, text: &str) {
    if depth < target {
        if let (Some(last), Some(child)) = (list.last_mut(), depth.child()) {
            append_at(&mut last.children, child, target, text);
            return;
        }
    }
    list.push(Section {
        id: NodeId::fresh(),
        depth,
        candidates: Candidates::single(text),
        children: Vec::new(),
        collapsed: false,
    });
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
