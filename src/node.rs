//! Node representation for the outline tree.
//!
//! An outline node is a heading whose final wording has not been decided yet: it carries a list
//! of candidate titles and remembers which one is currently shown. Sections nest up to three
//! levels deep; the document title is a separate node kind that never has children.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown whenever the selected candidate is blank, and used to repair empty option lists.
pub const PLACEHOLDER: &str = "Untitled";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Opaque identifier, unique across the whole outline.
pub struct NodeId(String);

impl NodeId {
    #[must_use]
    /// Generates a random identifier that has not been handed out before.
    pub fn fresh() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    /// Borrows the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Nesting depth of a section; the title sits above all of these at level 0.
pub enum Depth {
    /// Top-level section (a chapter).
    One,
    /// Second-level section.
    Two,
    /// Third and deepest level; never has children.
    Three,
}

impl Depth {
    #[must_use]
    /// Numeric level as written to snapshots and used for numbering.
    pub fn level(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    #[must_use]
    /// Maps a numeric level back to a depth, rejecting 0 and anything deeper than 3.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    #[must_use]
    /// Depth of this section's children, if it may have any.
    pub fn child(self) -> Option<Self> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => None,
        }
    }

    #[must_use]
    /// Depth of this section's parent, or `None` for top-level sections.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::One => None,
            Self::Two => Some(Self::One),
            Self::Three => Some(Self::Two),
        }
    }

    #[must_use]
    /// Wording given to freshly created sections at this depth.
    pub fn default_title(self) -> &'static str {
        match self {
            Self::One => "Chapter",
            Self::Two => "Section",
            Self::Three => "Subsection",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Candidate titles for one heading, exactly one of which is selected.
///
/// The list is never empty and the selection always points inside it; every method preserves
/// both properties, so the fields stay private.
pub struct Candidates {
    options: Vec<String>,
    selected: usize,
}

impl Candidates {
    #[must_use]
    /// A single candidate, selected.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            options: vec![text.into()],
            selected: 0,
        }
    }

    #[must_use]
    /// Builds a candidate list, substituting the placeholder for an empty list and clamping the
    /// selection into range.
    pub fn new(options: Vec<String>, selected: usize) -> Self {
        let options = if options.is_empty() {
            vec![PLACEHOLDER.to_string()]
        } else {
            options
        };
        let selected = selected.min(options.len() - 1);
        Self { options, selected }
    }

    #[must_use]
    /// All candidates in picker order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    /// Index of the displayed candidate.
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    /// The displayed title: the selected candidate trimmed, or the placeholder when blank.
    pub fn title(&self) -> &str {
        let text = self.options[self.selected].trim();
        if text.is_empty() {
            PLACEHOLDER
        } else {
            text
        }
    }

    /// Selects a candidate, clamping the index into range.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.options.len() - 1);
    }

    /// Appends a trimmed candidate. Blank text is rejected.
    pub fn push(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.options.push(text.to_string());
        true
    }

    /// Overwrites the candidate at `index`; out-of-range indices are ignored.
    pub fn edit(&mut self, index: usize, text: &str) -> bool {
        match self.options.get_mut(index) {
            Some(slot) => {
                text.clone_into(slot);
                true
            }
            None => false,
        }
    }

    /// Removes the candidate at `index`. The last remaining candidate cannot be removed.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.options.len() <= 1 || index >= self.options.len() {
            return false;
        }
        self.options.remove(index);
        self.selected = self.selected.min(self.options.len() - 1);
        true
    }

    /// Replaces the selected candidate's text.
    pub fn rename_selected(&mut self, text: &str) {
        text.clone_into(&mut self.options[self.selected]);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The document's own heading. It has no children, cannot be moved and is always first.
pub struct Title {
    /// Identifier shared with the section id space.
    pub id: NodeId,
    /// Candidate wordings for the document title.
    pub candidates: Candidates,
}

impl Title {
    #[must_use]
    /// A fresh title node showing `text`.
    pub fn new(text: &str) -> Self {
        Self {
            id: NodeId::fresh(),
            candidates: Candidates::single(text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A numbered heading at depth 1 to 3, owning its subsections.
pub struct Section {
    /// Identifier, unique across the outline.
    pub id: NodeId,
    /// Nesting depth; children are always exactly one level deeper.
    pub depth: Depth,
    /// Candidate wordings for this heading.
    pub candidates: Candidates,
    /// Subsections in display order.
    pub children: Vec<Section>,
    /// Hides children in the editable tree view only.
    pub collapsed: bool,
}

impl Section {
    #[must_use]
    /// A fresh, expanded, childless section with the default wording for its depth.
    pub fn new(depth: Depth) -> Self {
        Self {
            id: NodeId::fresh(),
            depth,
            candidates: Candidates::single(depth.default_title()),
            children: Vec::new(),
            collapsed: false,
        }
    }

    #[must_use]
    /// Displayed title of this section.
    pub fn title(&self) -> &str {
        self.candidates.title()
    }
}
