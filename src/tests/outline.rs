use super::{Outline, Placement};
use crate::node::{Depth, NodeId, PLACEHOLDER};

fn titles(outline: &Outline) -> Vec<String> {
    outline
        .preorder()
        .map(|entry| entry.title().to_string())
        .collect()
}

/// Builds `[A, B, C]` at the top level, each renamed so titles identify them.
fn three_chapters() -> (Outline, NodeId, NodeId, NodeId) {
    let mut outline = Outline::new();
    let a = outline.sections()[0].id.clone();
    let b = outline.add_sibling(&a).unwrap();
    let c = outline.add_sibling(&b).unwrap();
    outline.edit_option(&a, 0, "A");
    outline.edit_option(&b, 0, "B");
    outline.edit_option(&c, 0, "C");
    (outline, a, b, c)
}

#[test]
fn test_new_outline_has_one_chapter() {
    let outline = Outline::new();
    assert_eq!(outline.sections().len(), 1);
    assert_eq!(outline.sections()[0].depth, Depth::One);
    assert!(outline.title().is_none());
    outline.validate().unwrap();
}

#[test]
fn test_add_sibling_inserts_after() {
    let (outline, a, b, c) = three_chapters();
    let ids: Vec<_> = outline.sections().iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec![a, b, c]);
    outline.validate().unwrap();
}

#[test]
fn test_add_sibling_keeps_depth() {
    let mut outline = Outline::new();
    let root = outline.sections()[0].id.clone();
    let child = outline.add_child(&root).unwrap();
    let sibling = outline.add_sibling(&child).unwrap();

    let ctx = outline.context(&sibling).unwrap();
    assert_eq!(ctx.node.depth, Depth::Two);
    assert_eq!(ctx.parent_id(), Some(&root));
    assert_eq!(ctx.index, 1);
    assert_eq!(ctx.siblings.len(), 2);
}

#[test]
fn test_add_child_expands_parent_and_caps_depth() {
    let mut outline = Outline::new();
    let root = outline.sections()[0].id.clone();
    outline.toggle_collapsed(&root);
    assert!(outline.sections()[0].collapsed);

    let two = outline.add_child(&root).unwrap();
    assert!(!outline.sections()[0].collapsed, "adding a child expands");
    let three = outline.add_child(&two).unwrap();
    assert_eq!(outline.context(&three).unwrap().node.depth, Depth::Three);
    assert!(outline.add_child(&three).is_none(), "level 3 has no children");
    outline.validate().unwrap();
}

#[test]
fn test_title_rejects_structural_edits() {
    let mut outline = Outline::new();
    let title = outline.set_title("Report").unwrap();

    assert!(outline.add_sibling(&title).is_none());
    assert!(outline.add_child(&title).is_none());
    assert!(!outline.delete(&title));
    assert!(!outline.toggle_collapsed(&title));
    assert!(outline.context(&title).is_none());
    assert_eq!(outline.display_title(&title), Some("Report"));
}

#[test]
fn test_set_title_renames_existing() {
    let mut outline = Outline::new();
    let first = outline.set_title("Draft").unwrap();
    let second = outline.set_title("  Final  ").unwrap();
    assert_eq!(first, second);
    assert_eq!(outline.display_title(&first), Some("Final"));
    assert!(outline.set_title("   ").is_none());
}

#[test]
fn test_delete_last_section_inserts_default() {
    let mut outline = Outline::new();
    let only = outline.sections()[0].id.clone();
    assert!(outline.delete(&only));
    assert_eq!(outline.sections().len(), 1);
    assert_ne!(outline.sections()[0].id, only);
    assert_eq!(outline.sections()[0].depth, Depth::One);
}

#[test]
fn test_delete_removes_subtree() {
    let mut outline = Outline::new();
    let root = outline.sections()[0].id.clone();
    let child = outline.add_child(&root).unwrap();
    let grandchild = outline.add_child(&child).unwrap();
    outline.add_section();

    assert!(outline.delete(&root));
    assert!(!outline.contains(&child));
    assert!(!outline.contains(&grandchild));
    assert_eq!(outline.len(), 1);
}

#[test]
fn test_stale_ids_are_noops() {
    let mut outline = Outline::new();
    let ghost = NodeId::from("missing");
    let before = outline.clone();

    assert!(outline.add_sibling(&ghost).is_none());
    assert!(outline.add_child(&ghost).is_none());
    assert!(!outline.delete(&ghost));
    assert!(!outline.set_selected(&ghost, 1));
    assert!(!outline.add_option(&ghost, "x"));
    assert!(!outline.remove_option(&ghost, 0));
    assert!(!outline.toggle_collapsed(&ghost));
    assert_eq!(outline, before);
}

#[test]
fn test_option_editing() {
    let mut outline = Outline::new();
    let id = outline.sections()[0].id.clone();

    assert!(!outline.add_option(&id, "   "), "blank options are rejected");
    assert!(outline.add_option(&id, "Background"));
    assert!(outline.add_option(&id, "Context"));
    assert!(outline.set_selected(&id, 99));
    assert_eq!(outline.candidates(&id).unwrap().selected(), 2);
    assert_eq!(outline.display_title(&id), Some("Context"));

    assert!(outline.edit_option(&id, 2, "   "));
    assert_eq!(outline.display_title(&id), Some(PLACEHOLDER));
    assert!(!outline.edit_option(&id, 7, "nope"));
}

#[test]
fn test_remove_option_clamps_and_keeps_one() {
    let mut outline = Outline::new();
    let id = outline.sections()[0].id.clone();
    outline.add_option(&id, "Second");
    outline.set_selected(&id, 1);

    assert!(outline.remove_option(&id, 1));
    let candidates = outline.candidates(&id).unwrap();
    assert_eq!(candidates.options().len(), 1);
    assert_eq!(candidates.selected(), 0);

    assert!(!outline.remove_option(&id, 0), "last option stays");
    assert_eq!(outline.candidates(&id).unwrap().options().len(), 1);
}

#[test]
fn test_title_options_are_editable() {
    let mut outline = Outline::new();
    let title = outline.set_title("Report").unwrap();
    assert!(outline.add_option(&title, "Annual Report"));
    assert!(outline.set_selected(&title, 1));
    assert_eq!(outline.display_title(&title), Some("Annual Report"));
}

#[test]
fn test_move_beside_index_shift() {
    let (mut outline, a, b, c) = three_chapters();

    // A after C: source removed from before the destination.
    assert!(outline.move_beside(&a, &c, Placement::After));
    assert_eq!(titles(&outline), vec!["B", "C", "A"]);

    // A before B: destination precedes the source.
    assert!(outline.move_beside(&a, &b, Placement::Before));
    assert_eq!(titles(&outline), vec!["A", "B", "C"]);
}

#[test]
fn test_move_identity() {
    let (mut outline, a, b, _c) = three_chapters();
    assert!(outline.move_beside(&b, &a, Placement::Before));
    assert_eq!(titles(&outline), vec!["B", "A", "C"]);
    assert!(outline.move_beside(&b, &a, Placement::After));
    assert_eq!(titles(&outline), vec!["A", "B", "C"]);
}

#[test]
fn test_move_beside_rejects_other_parent() {
    let (mut outline, a, b, _c) = three_chapters();
    let under_a = outline.add_child(&a).unwrap();
    let under_b = outline.add_child(&b).unwrap();
    let before = outline.clone();

    assert!(!outline.move_beside(&under_a, &under_b, Placement::Before));
    assert!(!outline.move_beside(&under_a, &a, Placement::After));
    assert!(!outline.move_beside(&a, &a, Placement::After));
    assert_eq!(outline, before);
}

#[test]
fn test_move_into_appends_last_child() {
    let (mut outline, a, b, _c) = three_chapters();
    let first = outline.add_child(&b).unwrap();
    let moving = outline.add_child(&a).unwrap();
    outline.toggle_collapsed(&b);

    assert!(outline.move_into(&moving, &b));
    let ctx = outline.context(&moving).unwrap();
    assert_eq!(ctx.parent_id(), Some(&b));
    assert_eq!(ctx.index, 1);
    assert_eq!(ctx.siblings[0].id, first);
    assert!(!outline.context(&b).unwrap().node.collapsed);
    outline.validate().unwrap();
}

#[test]
fn test_move_into_requires_parent_depth() {
    let (mut outline, a, b, _c) = three_chapters();
    let two = outline.add_child(&a).unwrap();
    let three = outline.add_child(&two).unwrap();
    let before = outline.clone();

    assert!(!outline.move_into(&three, &b), "level 3 cannot go under level 1");
    assert!(!outline.move_into(&a, &b), "siblings cannot nest");
    assert_eq!(outline, before);
}

#[test]
fn test_reinsert_restores_detached_section_in_place() {
    let (mut outline, a, _b, _c) = three_chapters();
    let first = outline.add_child(&a).unwrap();
    let second = outline.add_child(&a).unwrap();
    let before = outline.clone();

    let path = outline.section_path(&first).unwrap();
    let node = outline.detach(&first).unwrap();
    outline.reinsert(&path, node);

    assert_eq!(outline, before);
    let ctx = outline.context(&first).unwrap();
    assert_eq!(ctx.parent_id(), Some(&a));
    assert_eq!(ctx.index, 0);
    assert_eq!(ctx.siblings[1].id, second);
    outline.validate().unwrap();
}

#[test]
fn test_move_to_end_only_for_chapters() {
    let (mut outline, a, _b, _c) = three_chapters();
    let nested = outline.add_child(&a).unwrap();

    assert!(!outline.move_to_end(&nested));
    assert!(outline.move_to_end(&a));
    assert_eq!(outline.sections().last().unwrap().id, a);
}

#[test]
fn test_reset_drops_title() {
    let (mut outline, ..) = three_chapters();
    outline.set_title("Report");
    outline.reset();
    assert!(outline.title().is_none());
    assert_eq!(outline.len(), 1);
}

#[test]
fn test_preorder_visits_title_then_depth_first() {
    let mut outline = Outline::new();
    outline.set_title("Doc");
    let one = outline.sections()[0].id.clone();
    outline.edit_option(&one, 0, "One");
    let child = outline.add_child(&one).unwrap();
    outline.edit_option(&child, 0, "One.A");
    let two = outline.add_section();
    outline.edit_option(&two, 0, "Two");
    outline.toggle_collapsed(&one);

    assert_eq!(titles(&outline), vec!["Doc", "One", "One.A", "Two"]);
    let levels: Vec<u8> = outline.preorder().map(|e| e.level()).collect();
    assert_eq!(levels, vec![0, 1, 2, 1]);
}
