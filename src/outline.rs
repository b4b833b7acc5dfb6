//! The outline forest and every structural edit made to it.
//!
//! The outline is the single owner of all nodes. Nothing holds on to a node between edits:
//! every operation takes an id and re-resolves it, so an id that went stale between an event
//! firing and its handler running just turns the operation into a no-op.
//!
//! Nodes carry no parent pointer. Lookups walk the tree from the root, which is cheap for
//! outlines that are at most three levels deep.

use crate::node::{Candidates, Depth, NodeId, Section, Title};
use std::collections::HashSet;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Ordered forest of sections, optionally preceded by the document title.
///
/// The section list is never empty: any edit that would empty it inserts a default top-level
/// section instead.
pub struct Outline {
    title: Option<Title>,
    sections: Vec<Section>,
}

/// Where a section sits: the node, its parent (if nested), its sibling list and its position.
pub struct Context<'a> {
    /// The located section.
    pub node: &'a Section,
    /// Enclosing section, `None` at the top level.
    pub parent: Option<&'a Section>,
    /// The list containing `node`.
    pub siblings: &'a [Section],
    /// Position of `node` within `siblings`.
    pub index: usize,
}

impl Context<'_> {
    #[must_use]
    /// Id of the enclosing section, `None` at the top level.
    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent.map(|p| &p.id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which side of a sibling a moved section lands on.
pub enum Placement {
    /// Immediately before the target.
    Before,
    /// Immediately after the target.
    After,
}

#[derive(Clone, Copy, Debug)]
/// A node visited by a pre-order walk.
pub enum Entry<'a> {
    /// The document title, always visited first.
    Title(&'a Title),
    /// A section at any depth.
    Section(&'a Section),
}

impl<'a> Entry<'a> {
    #[must_use]
    /// Numeric level: 0 for the title, 1 to 3 for sections.
    pub fn level(&self) -> u8 {
        match *self {
            Entry::Title(_) => 0,
            Entry::Section(s) => s.depth.level(),
        }
    }

    #[must_use]
    /// Displayed title of the visited node.
    pub fn title(&self) -> &'a str {
        match *self {
            Entry::Title(t) => t.candidates.title(),
            Entry::Section(s) => s.title(),
        }
    }

    #[must_use]
    /// Id of the visited node.
    pub fn id(&self) -> &'a NodeId {
        match *self {
            Entry::Title(t) => &t.id,
            Entry::Section(s) => &s.id,
        }
    }
}

/// Pre-order iterator over the whole outline, title first, ignoring `collapsed`.
pub struct Preorder<'a> {
    title: Option<&'a Title>,
    stack: Vec<std::slice::Iter<'a, Section>>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Entry<'a>> {
        if let Some(title) = self.title.take() {
            return Some(Entry::Title(title));
        }
        loop {
            let top = self.stack.last_mut()?;
            if let Some(section) = top.next() {
                self.stack.push(section.children.iter());
                return Some(Entry::Section(section));
            }
            self.stack.pop();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// A structural rule the outline is expected to uphold but does not.
pub enum InvariantError {
    /// Two nodes share an id.
    #[error("duplicate id: {0}")]
    DuplicateId(NodeId),
    /// A child is not exactly one level below its parent, or a nested list holds top-level nodes.
    #[error("section {0} is at the wrong depth")]
    DepthMismatch(NodeId),
    /// The section list is empty.
    #[error("outline has no sections")]
    Empty,
}

enum Location {
    Title,
    Section(Vec<usize>),
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}

impl Outline {
    #[must_use]
    /// A fresh outline holding a single default chapter and no title.
    pub fn new() -> Self {
        Self {
            title: None,
            sections: vec![Section::new(Depth::One)],
        }
    }

    /// Assembles an outline from already-valid parts, topping up an empty section list.
    pub(crate) fn from_parts(title: Option<Title>, sections: Vec<Section>) -> Self {
        let mut outline = Self { title, sections };
        outline.ensure_sections();
        outline
    }

    #[must_use]
    /// The document title, if the outline has one.
    pub fn title(&self) -> Option<&Title> {
        self.title.as_ref()
    }

    #[must_use]
    /// Top-level sections in display order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    /// Walks every node in document order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            title: self.title.as_ref(),
            stack: vec![self.sections.iter()],
        }
    }

    #[must_use]
    /// Total number of nodes, title included.
    pub fn len(&self) -> usize {
        self.preorder().count()
    }

    #[must_use]
    /// Whether the section list is empty, which edits never allow.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    /// Whether any node carries `id`.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.locate(id).is_some()
    }

    #[must_use]
    /// Whether `id` names the title node.
    pub fn is_title(&self, id: &NodeId) -> bool {
        self.title.as_ref().is_some_and(|t| &t.id == id)
    }

    #[must_use]
    /// Locates a section together with its parent and sibling list.
    ///
    /// The title is not a section and never resolves here.
    pub fn context(&self, id: &NodeId) -> Option<Context<'_>> {
        find(&self.sections, None, id)
    }

    #[must_use]
    /// Candidate list of any node, title included.
    pub fn candidates(&self, id: &NodeId) -> Option<&Candidates> {
        if let Some(title) = self.title.as_ref().filter(|t| &t.id == id) {
            return Some(&title.candidates);
        }
        self.context(id).map(|ctx| &ctx.node.candidates)
    }

    #[must_use]
    /// Displayed title of any node.
    pub fn display_title(&self, id: &NodeId) -> Option<&str> {
        self.candidates(id).map(Candidates::title)
    }

    fn locate(&self, id: &NodeId) -> Option<Location> {
        if self.is_title(id) {
            return Some(Location::Title);
        }
        path_to(&self.sections, id).map(Location::Section)
    }

    fn section_path(&self, id: &NodeId) -> Option<Vec<usize>> {
        match self.locate(id)? {
            Location::Title => None,
            Location::Section(path) => Some(path),
        }
    }

    fn section_mut(&mut self, id: &NodeId) -> Option<&mut Section> {
        let path = self.section_path(id)?;
        node_at_mut(&mut self.sections, &path)
    }

    fn candidates_mut(&mut self, id: &NodeId) -> Option<&mut Candidates> {
        match self.locate(id)? {
            Location::Title => self.title.as_mut().map(|t| &mut t.candidates),
            Location::Section(path) => {
                node_at_mut(&mut self.sections, &path).map(|s| &mut s.candidates)
            }
        }
    }

    /// Takes a section out of its sibling list, returning it with its subtree.
    fn detach(&mut self, id: &NodeId) -> Option<Section> {
        let path = self.section_path(id)?;
        let (&index, parents) = path.split_last()?;
        let list = list_at_mut(&mut self.sections, parents)?;
        (index < list.len()).then(|| list.remove(index))
    }

    /// Puts a detached section back at `path`, the position it was detached from.
    fn reinsert(&mut self, path: &[usize], node: Section) {
        let Some((&index, parents)) = path.split_last() else {
            return;
        };
        if let Some(list) = list_at_mut(&mut self.sections, parents) {
            list.insert(index.min(list.len()), node);
        }
    }

    fn ensure_sections(&mut self) {
        if self.sections.is_empty() {
            debug!("outline emptied, inserting a default chapter");
            self.sections.push(Section::new(Depth::One));
        }
    }

    // --- Structural edits ---

    /// Inserts a default section of the same depth right after `id`.
    ///
    /// Returns the new section's id, or `None` for the title or an unknown id.
    pub fn add_sibling(&mut self, id: &NodeId) -> Option<NodeId> {
        let path = self.section_path(id)?;
        let (&index, parents) = path.split_last()?;
        let list = list_at_mut(&mut self.sections, parents)?;
        let node = Section::new(list.get(index)?.depth);
        let new_id = node.id.clone();
        list.insert(index + 1, node);
        debug!(after = %id, id = %new_id, "added sibling");
        Some(new_id)
    }

    /// Appends a default child to `id` and expands it.
    ///
    /// Returns `None` for third-level sections, the title, or an unknown id.
    pub fn add_child(&mut self, id: &NodeId) -> Option<NodeId> {
        let parent = self.section_mut(id)?;
        let node = Section::new(parent.depth.child()?);
        let new_id = node.id.clone();
        parent.children.push(node);
        parent.collapsed = false;
        debug!(parent = %id, id = %new_id, "added child");
        Some(new_id)
    }

    /// Appends a default chapter to the end of the top-level list.
    pub fn add_section(&mut self) -> NodeId {
        let node = Section::new(Depth::One);
        let new_id = node.id.clone();
        self.sections.push(node);
        debug!(id = %new_id, "added chapter");
        new_id
    }

    /// Removes a section and its whole subtree. The title cannot be deleted.
    pub fn delete(&mut self, id: &NodeId) -> bool {
        if self.detach(id).is_none() {
            return false;
        }
        self.ensure_sections();
        debug!(%id, "deleted section");
        true
    }

    /// Replaces the whole outline with a single default chapter, dropping the title too.
    pub fn reset(&mut self) {
        *self = Self::new();
        debug!("outline reset");
    }

    /// Creates the title node showing `text`, or renames the selected title candidate.
    ///
    /// Blank text is rejected.
    pub fn set_title(&mut self, text: &str) -> Option<NodeId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match &mut self.title {
            Some(title) => title.candidates.rename_selected(text),
            None => self.title = Some(Title::new(text)),
        }
        self.title.as_ref().map(|t| t.id.clone())
    }

    // --- Candidate edits ---

    /// Selects the candidate at `index`, clamped into range.
    pub fn set_selected(&mut self, id: &NodeId, index: usize) -> bool {
        match self.candidates_mut(id) {
            Some(candidates) => {
                candidates.select(index);
                true
            }
            None => false,
        }
    }

    /// Appends a candidate title; blank text is rejected.
    pub fn add_option(&mut self, id: &NodeId, text: &str) -> bool {
        self.candidates_mut(id).is_some_and(|c| c.push(text))
    }

    /// Overwrites the candidate at `index`.
    pub fn edit_option(&mut self, id: &NodeId, index: usize, text: &str) -> bool {
        self.candidates_mut(id).is_some_and(|c| c.edit(index, text))
    }

    /// Removes the candidate at `index`, unless it is the only one left.
    pub fn remove_option(&mut self, id: &NodeId, index: usize) -> bool {
        self.candidates_mut(id).is_some_and(|c| c.remove(index))
    }

    /// Flips a section's collapsed flag. The title is always expanded.
    pub fn toggle_collapsed(&mut self, id: &NodeId) -> bool {
        match self.section_mut(id) {
            Some(section) => {
                section.collapsed = !section.collapsed;
                true
            }
            None => false,
        }
    }

    // --- Moves ---

    /// Moves `source` next to `target` within the same sibling list.
    ///
    /// Both must be sections at the same depth under the same parent.
    pub fn move_beside(&mut self, source: &NodeId, target: &NodeId, placement: Placement) -> bool {
        if source == target {
            return false;
        }
        let (from, mut to) = {
            let (Some(src), Some(dst)) = (self.context(source), self.context(target)) else {
                return false;
            };
            if src.node.depth != dst.node.depth || src.parent_id() != dst.parent_id() {
                return false;
            }
            (
                src.index,
                dst.index + usize::from(placement == Placement::After),
            )
        };
        // Removing the source shifts everything after it one slot left.
        if from < to {
            to -= 1;
        }
        let Some(path) = self.section_path(source) else {
            return false;
        };
        let Some(list) = list_at_mut(&mut self.sections, &path[..path.len() - 1]) else {
            return false;
        };
        let node = list.remove(from);
        list.insert(to, node);
        debug!(%source, %target, ?placement, "moved beside");
        true
    }

    /// Re-parents `source` as the last child of `target`, which must be one level shallower.
    pub fn move_into(&mut self, source: &NodeId, target: &NodeId) -> bool {
        let fits = match (self.context(source), self.context(target)) {
            (Some(src), Some(dst)) => src.node.depth.parent() == Some(dst.node.depth),
            _ => false,
        };
        if !fits {
            return false;
        }
        let Some(origin) = self.section_path(source) else {
            return false;
        };
        let Some(node) = self.detach(source) else {
            return false;
        };
        let Some(parent) = self.section_mut(target) else {
            self.reinsert(&origin, node);
            return false;
        };
        parent.children.push(node);
        parent.collapsed = false;
        self.ensure_sections();
        debug!(%source, %target, "moved into");
        true
    }

    /// Moves a chapter to the end of the top-level list.
    pub fn move_to_end(&mut self, source: &NodeId) -> bool {
        if self.context(source).map(|ctx| ctx.node.depth) != Some(Depth::One) {
            return false;
        }
        let Some(node) = self.detach(source) else {
            return false;
        };
        self.sections.push(node);
        debug!(%source, "moved to end");
        true
    }

    /// Checks the structural rules every edit is meant to preserve.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: a duplicate id, a depth mismatch, or an empty
    /// section list.
    pub fn validate(&self) -> Result<(), InvariantError> {
        if self.sections.is_empty() {
            return Err(InvariantError::Empty);
        }
        let mut seen = HashSet::new();
        if let Some(title) = &self.title {
            seen.insert(&title.id);
        }
        check_list(&self.sections, Depth::One, &mut seen)
    }
}

fn check_list<'a>(
    list: &'a [Section],
    depth: Depth,
    seen: &mut HashSet<&'a NodeId>,
) -> Result<(), InvariantError> {
    for node in list {
        if !seen.insert(&node.id) {
            return Err(InvariantError::DuplicateId(node.id.clone()));
        }
        if node.depth != depth {
            return Err(InvariantError::DepthMismatch(node.id.clone()));
        }
        match depth.child() {
            Some(child) => check_list(&node.children, child, seen)?,
            None if !node.children.is_empty() => {
                return Err(InvariantError::DepthMismatch(node.children[0].id.clone()));
            }
            None => {}
        }
    }
    Ok(())
}

fn find<'a>(
    list: &'a [Section],
    parent: Option<&'a Section>,
    id: &NodeId,
) -> Option<Context<'a>> {
    for (index, node) in list.iter().enumerate() {
        if &node.id == id {
            return Some(Context {
                node,
                parent,
                siblings: list,
                index,
            });
        }
        if let Some(found) = find(&node.children, Some(node), id) {
            return Some(found);
        }
    }
    None
}

fn path_to(list: &[Section], id: &NodeId) -> Option<Vec<usize>> {
    for (index, node) in list.iter().enumerate() {
        if &node.id == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = path_to(&node.children, id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

fn node_at_mut<'a>(list: &'a mut [Section], path: &[usize]) -> Option<&'a mut Section> {
    let (&head, rest) = path.split_first()?;
    let node = list.get_mut(head)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at_mut(&mut node.children, rest)
    }
}

fn list_at_mut<'a>(list: &'a mut Vec<Section>, parents: &[usize]) -> Option<&'a mut Vec<Section>> {
    match parents.split_first() {
        None => Some(list),
        Some((&head, rest)) => list_at_mut(&mut list.get_mut(head)?.children, rest),
    }
}

#[cfg(test)]
#[path = "tests/outline.rs"]
mod tests;
