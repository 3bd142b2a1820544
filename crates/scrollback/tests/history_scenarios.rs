//! End-to-end scenarios against a file-backed service.
//!
//! Each test builds a service over a temp directory, drives it through the
//! public API, and checks the persisted result by re-opening the state file
//! with a new service (the equivalent of a process restart).

use std::collections::HashSet;
use std::path::Path;

use scrollback::action::run_action;
use scrollback::config::CompressorConfig;
use scrollback::history::extract::{ELLIPSIS, KEY_POINT_MAX_CHARS, MAX_KEY_POINTS, MAX_TOPICS};
use scrollback::state::{CompressorService, FileStateStore};
use scrollback::{Message, MessageId};

/// Helper: a service whose state and exports live under `dir`.
fn open(dir: &Path, window_size: usize, summary_threshold: usize) -> CompressorService<FileStateStore> {
    CompressorService::new(
        FileStateStore::new(dir.join("state.json")),
        CompressorConfig::new(window_size, summary_threshold),
    )
    .with_export_dir(dir.join("exports"))
}

#[test]
fn state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let service = open(dir.path(), 3, 4);
        for i in 0..6 {
            service
                .add_message(Message::new("ana", format!("message number {i} with some length")))
                .unwrap();
        }
    }

    // Different requested sizing: the persisted one wins.
    let service = open(dir.path(), 50, 100);
    let state = service.state();
    assert_eq!(state.config().window_size, 3);
    assert_eq!(state.window().message_count(), 6);
    assert_eq!(state.window().len(), 3);
    assert!(!state.archive().is_empty());
}

#[test]
fn window_bound_and_counter_hold_over_long_streams() {
    let dir = tempfile::tempdir().unwrap();
    let service = open(dir.path(), 4, 5);
    for i in 0..40u64 {
        service.add_message(Message::anonymous(format!("m{i}"))).unwrap();
        let state = service.state();
        if i + 1 >= 4 {
            assert!(state.window().len() <= 4);
        }
        assert_eq!(state.window().message_count(), i + 1);
    }
}

#[test]
fn summaries_respect_size_limits() {
    let dir = tempfile::tempdir().unwrap();
    let service = open(dir.path(), 12, 12);
    let long = "a long message about python code and photos? thanks ".repeat(5);
    for _ in 0..12 {
        service.add_message(Message::new("bob", long.clone())).unwrap();
    }

    let context = service.get_current_context().unwrap();
    assert_eq!(context.total_archived_summaries, 1);
    let summary = &context.archived_summaries[0];
    assert_eq!(summary.key_points().len(), MAX_KEY_POINTS);
    for point in summary.key_points() {
        assert!(point.chars().count() <= KEY_POINT_MAX_CHARS + ELLIPSIS.len());
    }
    assert!(summary.topics().len() <= MAX_TOPICS);
    assert_eq!(summary.original_message_count, 12);
}

#[test]
fn mixed_topics_are_all_detected() {
    let dir = tempfile::tempdir().unwrap();
    let service = open(dir.path(), 2, 2);
    service
        .add_message(Message::new("ana", "Can you help me with python code?"))
        .unwrap();
    let outcome = service
        .add_message(Message::new("bob", "Thanks for the photo!"))
        .unwrap();

    let summary = outcome.summary_created.expect("threshold reached");
    let topics: HashSet<&str> = summary.summary_data.topics.iter().map(String::as_str).collect();
    for expected in ["coding", "question", "appreciation", "image_generation"] {
        assert!(topics.contains(expected), "missing {expected}");
    }
    let participants: Vec<&str> = summary
        .summary_data
        .participants
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(participants, vec!["ana", "bob"]);
}

#[test]
fn oversized_import_is_trimmed_by_next_add() {
    let dir = tempfile::tempdir().unwrap();
    let import_path = dir.path().join("incoming.json");
    let recent: Vec<serde_json::Value> = (0..8)
        .map(|i| serde_json::json!({"id": i, "author": "eve", "content": format!("m{i}")}))
        .collect();
    std::fs::write(
        &import_path,
        serde_json::json!({
            "recent_messages": recent,
            "archived_summaries": [],
            "total_messages_processed": 8,
        })
        .to_string(),
    )
    .unwrap();

    let service = open(dir.path(), 3, 10);
    service.import_context(&import_path).unwrap();
    assert_eq!(service.get_current_context().unwrap().current_window_size, 8);

    let outcome = service.add_message(Message::new("eve", "m8").with_id(8i64)).unwrap();
    assert_eq!(outcome.message_id, MessageId::Number(8));
    let context = service.get_current_context().unwrap();
    assert_eq!(context.current_window_size, 3);
    assert_eq!(context.total_messages_processed, 9);
}

#[test]
fn action_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let service = open(dir.path(), 2, 3);
    for i in 0..3 {
        let request = format!(
            r#"{{"action": "add_message", "message": {{"author": "u{i}", "content": "hello number {i}"}}}}"#
        );
        assert!(run_action(&service, &request).success);
    }

    let exported = run_action(&service, r#"{"action": "export"}"#).to_json();
    let path = exported["exported_path"].as_str().unwrap().to_string();
    assert!(Path::new(&path).starts_with(dir.path().join("exports")));

    let other_dir = tempfile::tempdir().unwrap();
    let other = open(other_dir.path(), 2, 3);
    let request = serde_json::json!({"action": "import", "filepath": path}).to_string();
    assert!(run_action(&other, &request).success);

    let before = service.get_current_context().unwrap();
    let after = other.get_current_context().unwrap();
    assert_eq!(after.current_window_size, before.current_window_size);
    assert_eq!(after.archived_summaries, before.archived_summaries);
    assert_eq!(after.recent_messages, before.recent_messages);
}
