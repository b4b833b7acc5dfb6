use super::{is_share_id, SnapshotSink, SnapshotStore, StoreError, MAX_BODY_BYTES};
use crate::outline::Outline;
use crate::snapshot::Snapshot;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn store() -> (TempDir, SnapshotStore) {
    let dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(dir.path().join("store"), "share?id=");
    (dir, store)
}

#[test]
fn test_only_post_is_allowed() {
    let (_dir, store) = store();
    let err = store.handle_post("GET", b"[]").unwrap_err();
    assert!(matches!(err, StoreError::MethodNotAllowed));
    assert_eq!(err.status(), 405);
}

#[test]
fn test_body_validation() {
    let (_dir, store) = store();
    let cases: [(&[u8], u16, &str); 5] = [
        (b"", 400, "Empty body"),
        (b"{oops", 400, "Invalid JSON"),
        (b"\"text\"", 400, "Invalid JSON"),
        (b"{\"nodes\": []}", 400, "Missing tree"),
        (b"{\"tree\": {}}", 400, "Missing tree"),
    ];
    for (body, status, message) in cases {
        let err = store.save(body).unwrap_err();
        assert_eq!(err.status(), status);
        assert_eq!(err.to_string(), message);
    }
    assert!(!store.dir().exists(), "nothing is written for rejected bodies");
}

#[test]
fn test_oversized_body_is_rejected() {
    let (_dir, store) = store();
    let body = vec![b' '; MAX_BODY_BYTES + 1];
    let err = store.save(&body).unwrap_err();
    assert!(matches!(err, StoreError::PayloadTooLarge));
    assert_eq!(err.status(), 413);
}

#[test]
fn test_save_writes_document_with_saved_at() {
    let (_dir, store) = store();
    let published = store.save(br#"{"tree": [{"options": ["A"]}]}"#).unwrap();

    assert!(published.ok);
    assert!(is_share_id(&published.id));
    assert_eq!(published.url, format!("share?id={}", published.id));

    let raw = fs::read_to_string(store.dir().join(format!("{}.json", published.id))).unwrap();
    let stored: Value = serde_json::from_str(&raw).unwrap();
    assert!(stored["savedAt"].as_str().is_some_and(|s| !s.is_empty()));
    assert_eq!(stored["tree"][0]["options"][0], "A");
}

#[test]
fn test_bare_array_is_wrapped() {
    let (_dir, store) = store();
    let published = store.save(br#"[{"options": ["A"]}]"#).unwrap();
    let raw = fs::read_to_string(store.dir().join(format!("{}.json", published.id))).unwrap();
    let stored: Value = serde_json::from_str(&raw).unwrap();
    assert!(stored["tree"].is_array());
    assert!(stored["savedAt"].is_string());
}

#[test]
fn test_ids_are_unique() {
    let (_dir, store) = store();
    let a = store.save(b"[]").unwrap();
    let b = store.save(b"[]").unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn test_ids_use_all_128_bits() {
    let (_dir, store) = store();
    let ids: Vec<String> = (0..200).map(|_| store.save(b"[]").unwrap().id).collect();
    // Positions 12 and 16 are fixed in a v4 UUID; random bytes vary there too.
    for position in [12, 16] {
        let first = ids[0].as_bytes()[position];
        assert!(
            ids.iter().any(|id| id.as_bytes()[position] != first),
            "hex position {position} never varied"
        );
    }
}

#[test]
fn test_share_id_shape() {
    assert!(is_share_id("0123456789abcdef0123456789abcdef"));
    assert!(!is_share_id("0123456789ABCDEF0123456789ABCDEF"));
    assert!(!is_share_id("0123456789abcdef"));
    assert!(!is_share_id("../../../../etc/passwd0123456789ab"));
}

#[test]
fn test_fetch_errors() {
    let (_dir, store) = store();
    assert_eq!(store.fetch("nope").unwrap_err().status(), 400);
    let missing = "0123456789abcdef0123456789abcdef";
    assert!(matches!(store.fetch(missing), Err(StoreError::NotFound)));

    fs::create_dir_all(store.dir()).unwrap();
    fs::write(store.dir().join(format!("{missing}.json")), "garbage").unwrap();
    let err = store.fetch(missing).unwrap_err();
    assert!(matches!(err, StoreError::Corrupted));
    assert_eq!(err.status(), 500);
}

#[test]
fn test_published_snapshot_renders_numbered_view() {
    let (_dir, store) = store();
    let mut outline = Outline::new();
    outline.set_title("Report");
    let one = outline.sections()[0].id.clone();
    outline.edit_option(&one, 0, "Intro");
    outline.add_child(&one).unwrap();

    let snapshot = Snapshot::capture(&outline);
    let published = store.publish(&snapshot.to_json().unwrap()).unwrap();
    let view = store.fetch(&published.id).unwrap();

    assert_eq!(view.id, published.id);
    assert_eq!(view.timestamp, snapshot.exported_at);
    let rows: Vec<(Option<&str>, &str)> = view
        .rows
        .iter()
        .map(|r| (r.label.as_deref(), r.title.as_str()))
        .collect();
    assert_eq!(
        rows,
        [(None, "Report"), (Some("1"), "Intro"), (Some("1.1"), "Section")]
    );
}

#[test]
fn test_view_of_empty_tree_has_no_rows() {
    let (_dir, store) = store();
    let published = store.save(b"[]").unwrap();
    let view = store.fetch(&published.id).unwrap();
    assert!(view.rows.is_empty());
    assert!(!view.timestamp.is_empty(), "falls back to savedAt");
}

#[test]
fn test_sink_reports_status() {
    let (_dir, store) = store();
    let err = store.publish("").unwrap_err();
    assert_eq!(err.to_string(), "HTTP 400: Empty body");
}
