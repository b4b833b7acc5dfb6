//! Text rendering of the editable tree.
//!
//! Each section gets a box-drawing prefix, a collapse marker, an `Lv<n>` badge, its displayed
//! title, the number of candidates when there is more than one, and its id. Children of
//! collapsed sections are hidden; this is the only view where `collapsed` has any effect.

use crate::node::Section;
use crate::outline::Outline;

/// Generate box-drawing prefix for tree structure
fn tree_prefix(is_last: bool, ancestors_continue: &[bool]) -> String {
    let mut prefix = String::new();
    for &more in ancestors_continue {
        prefix.push_str(if more { "│   " } else { "    " });
    }
    prefix.push_str(if is_last { "└── " } else { "├── " });
    prefix
}

fn marker(section: &Section) -> char {
    match (section.children.is_empty(), section.collapsed) {
        (true, _) => '·',
        (false, true) => '▸',
        (false, false) => '▾',
    }
}

fn option_count(count: usize) -> String {
    if count > 1 {
        format!(" ({count} options)")
    } else {
        String::new()
    }
}

fn push_section(out: &mut Vec<String>, section: &Section, is_last: bool, ancestors: &mut Vec<bool>) {
    out.push(format!(
        "{}{} Lv{} {}{} [{}]",
        tree_prefix(is_last, ancestors),
        marker(section),
        section.depth.level(),
        section.title(),
        option_count(section.candidates.options().len()),
        section.id,
    ));

    if section.collapsed {
        return;
    }
    ancestors.push(!is_last);
    let last = section.children.len().saturating_sub(1);
    for (i, child) in section.children.iter().enumerate() {
        push_section(out, child, i == last, ancestors);
    }
    ancestors.pop();
}

#[must_use]
/// Renders the outline as an editable tree, title first.
pub fn render_tree(outline: &Outline) -> String {
    let mut lines = Vec::with_capacity(outline.len());
    if let Some(title) = outline.title() {
        lines.push(format!(
            "Lv0 {}{} [{}]",
            title.candidates.title(),
            option_count(title.candidates.options().len()),
            title.id,
        ));
    }
    let mut ancestors = Vec::new();
    let last = outline.sections().len().saturating_sub(1);
    for (i, section) in outline.sections().iter().enumerate() {
        push_section(&mut lines, section, i == last, &mut ancestors);
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "tests/render.rs"]
mod tests;
