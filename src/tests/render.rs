use super::render_tree;
use crate::outline::Outline;

/// Strips the trailing ` [id]` so expectations do not depend on random ids.
fn without_ids(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| match line.rfind(" [") {
            Some(at) => line[..at].to_string(),
            None => line.to_string(),
        })
        .collect()
}

#[test]
fn test_tree_prefixes_and_badges() {
    let mut outline = Outline::new();
    outline.set_title("Report");
    let one = outline.sections()[0].id.clone();
    let one_one = outline.add_child(&one).unwrap();
    outline.add_child(&one_one).unwrap();
    outline.add_sibling(&one_one).unwrap();
    let two = outline.add_section();
    outline.add_option(&two, "Results");

    assert_eq!(
        without_ids(&render_tree(&outline)),
        [
            "Lv0 Report",
            "├── ▾ Lv1 Chapter",
            "│   ├── ▾ Lv2 Section",
            "│   │   └── · Lv3 Subsection",
            "│   └── · Lv2 Section",
            "└── · Lv1 Chapter (2 options)",
        ]
    );
}

#[test]
fn test_collapsed_children_are_hidden() {
    let mut outline = Outline::new();
    let one = outline.sections()[0].id.clone();
    let child = outline.add_child(&one).unwrap();
    outline.toggle_collapsed(&one);

    let text = render_tree(&outline);
    assert_eq!(without_ids(&text), ["└── ▸ Lv1 Chapter"]);
    assert!(!text.contains(child.as_str()));
    assert!(text.contains(one.as_str()));
}
