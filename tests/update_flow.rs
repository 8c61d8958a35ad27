//! End-to-end flow minus the browser: feed captured response bodies through
//! the session, render the fragment, and patch a document on disk.

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use credly_badges::capture::{CaptureSession, ResponseFilter, ResponseKind};
use credly_badges::config::{END_MARKER, START_MARKER};
use credly_badges::patch::patch_document;
use credly_badges::render::render_fragment;

const IDENTITY_BODY: &str = r#"{ "data": { "id": "u1" } }"#;
const BADGES_BODY: &str = r#"{ "data": [ {
    "id": "b1",
    "issued_at_date": "2024-01-05",
    "badge_template": {
        "name": "X",
        "image_url": "https://images.credly.com/b1.png",
        "issuer": { "entities": [ { "entity": { "name": "Y" } } ] }
    }
} ] }"#;

fn captured_session() -> CaptureSession {
    let filter = ResponseFilter::new("alice");
    let mut session = CaptureSession::new(filter);
    session.begin();

    // Drive the session the way the capture worker does: classify the raw
    // response metadata, then feed the body of anything that matched.
    let events = [
        ("https://www.credly.com/api/v1/users/alice", IDENTITY_BODY),
        (
            "https://www.credly.com/api/v1/users/uuid-1/badges?page=1&page_size=48",
            BADGES_BODY,
        ),
        ("https://www.credly.com/assets/app.js", "var x = 1;"),
    ];
    for (url, body) in events {
        if let Some(kind) = session.classify(url, 200, "application/json") {
            session.record(kind, body);
        }
    }
    session
}

#[test]
fn capture_render_patch_round() {
    let mut session = captured_session();
    let result = session.finish();

    assert_eq!(result.user_id.as_deref(), Some("u1"));
    assert_eq!(result.badges.len(), 1);

    let rendered_at = Utc.with_ymd_and_hms(2024, 8, 5, 12, 0, 0).unwrap();
    let fragment = render_fragment(&result.badges, 80, rendered_at);

    assert!(fragment.contains("https://www.credly.com/badges/b1"));
    assert!(fragment.contains("title=\"X&#10;Issued by: Y&#10;Date: Jan 5, 2024\""));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("README.md");
    std::fs::write(
        &path,
        format!("# Profile\n\n{START_MARKER}\n{END_MARKER}\n\nfooter\n"),
    )
    .unwrap();

    let changed = patch_document(&path, &fragment, START_MARKER, END_MARKER).unwrap();
    assert!(changed);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# Profile\n\n"));
    assert!(content.ends_with("\nfooter\n"));
    assert!(content.contains("https://www.credly.com/badges/b1"));

    // Second application with the same fragment is a no-op.
    let changed = patch_document(&path, &fragment, START_MARKER, END_MARKER).unwrap();
    assert!(!changed);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn empty_capture_means_no_write() {
    let filter = ResponseFilter::new("alice");
    let mut session = CaptureSession::new(filter);
    session.begin();

    // Only unrelated traffic arrives before the deadline.
    assert_eq!(
        session.classify("https://www.credly.com/assets/app.css", 200, "text/css"),
        None
    );

    let result = session.finish();
    assert!(!result.has_data());

    // The pipeline skips rendering and patching entirely in this case; the
    // document must stay untouched.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("README.md");
    let before = format!("{START_MARKER}\nexisting badges\n{END_MARKER}\n");
    std::fs::write(&path, &before).unwrap();

    if result.has_data() {
        let fragment = render_fragment(&result.badges, 80, Utc::now());
        patch_document(&path, &fragment, START_MARKER, END_MARKER).unwrap();
    }

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn zero_badge_capture_is_no_usable_data() {
    let filter = ResponseFilter::new("alice");
    let mut session = CaptureSession::new(filter);
    session.begin();
    session.record(ResponseKind::Identity, IDENTITY_BODY);
    session.record(ResponseKind::BadgeList, r#"{ "data": [] }"#);

    let result = session.finish();
    assert_eq!(result.user_id.as_deref(), Some("u1"));
    assert!(!result.has_data());

    let fragment = render_fragment(&result.badges, 80, Utc::now());
    assert!(fragment.is_empty());
}
