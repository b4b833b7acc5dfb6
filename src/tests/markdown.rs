use super::{outline_from_markdown, to_markdown, MarkdownFormat};
use crate::formats::{extract_headings, Heading};
use crate::node::Depth;
use crate::outline::Outline;

#[test]
fn test_title_and_chapter() {
    let mut outline = Outline::new();
    outline.set_title("Report");
    let intro = outline.sections()[0].id.clone();
    outline.edit_option(&intro, 0, "Intro");

    assert_eq!(to_markdown(&outline), "# Report\n## Intro");
}

#[test]
fn test_markers_follow_level() {
    let mut outline = Outline::new();
    let one = outline.sections()[0].id.clone();
    let two = outline.add_child(&one).unwrap();
    let three = outline.add_child(&two).unwrap();
    outline.edit_option(&one, 0, "One");
    outline.edit_option(&two, 0, "Two");
    outline.edit_option(&three, 0, "  Three  ");

    assert_eq!(to_markdown(&outline), "## One\n### Two\n#### Three");
}

#[test]
fn test_blank_title_uses_placeholder() {
    let mut outline = Outline::new();
    let one = outline.sections()[0].id.clone();
    outline.edit_option(&one, 0, "");
    assert_eq!(to_markdown(&outline), "## Untitled");
}

#[test]
fn test_extract_headings() {
    let source = "# Doc\n\nSome text.\n\n## First\n\nBody\n\n### Nested\n";
    let headings = extract_headings(source, &MarkdownFormat).unwrap();
    assert_eq!(
        headings,
        vec![
            Heading {
                depth: 1,
                text: "Doc".to_string()
            },
            Heading {
                depth: 2,
                text: "First".to_string()
            },
            Heading {
                depth: 3,
                text: "Nested".to_string()
            },
        ]
    );
}

#[test]
fn test_outline_from_markdown_round_trips() {
    let source = "# Report\n## Intro\n### Scope\n#### Detail\n## Method";
    let outline = outline_from_markdown(source).unwrap();

    assert_eq!(outline.title().unwrap().candidates.title(), "Report");
    assert_eq!(outline.sections().len(), 2);
    outline.validate().unwrap();
    assert_eq!(to_markdown(&outline), source);
}

#[test]
fn test_outline_from_markdown_without_title() {
    let source = "## A\n## B\n### B.1";
    let outline = outline_from_markdown(source).unwrap();
    assert!(outline.title().is_none());
    assert_eq!(to_markdown(&outline), source);
}

#[test]
fn test_skipped_and_deep_levels_are_repaired() {
    // `####` with no level-2 parent, then `######` under a level-2 heading.
    let source = "## A\n#### Skipped\n### B\n###### Deep";
    let outline = outline_from_markdown(source).unwrap();
    outline.validate().unwrap();

    let a = &outline.sections()[0];
    assert_eq!(a.children.len(), 2);
    assert_eq!(a.children[0].title(), "Skipped");
    assert_eq!(a.children[0].depth, Depth::Two);
    assert_eq!(a.children[1].children[0].title(), "Deep");
    assert_eq!(a.children[1].children[0].depth, Depth::Three);
}

#[test]
fn test_markdown_without_headings_gets_default_chapter() {
    let outline = outline_from_markdown("just a paragraph\n").unwrap();
    assert!(outline.title().is_none());
    assert_eq!(outline.sections().len(), 1);
}
