//! Permanently retained summaries of past windows.
//!
//! Each time the window crosses the summary threshold the whole window is
//! condensed into one [`Summary`] and appended here. The archive is
//! append-only: it hands out shared references and has no removal API. The
//! only way to replace its contents is a wholesale import at the state level.
//!
//! Summary ids are `summary_<unix-seconds>_<sequence>`, where the sequence is
//! the archive length after the append. Two instances writing to the same
//! persisted archive within one second can therefore mint the same id; ids
//! are only unique within a single instance.

use super::extract::{extract_key_points, extract_topics};
use crate::error::{CompressorError, Result};
use crate::{Message, iso_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// The condensed content of a window.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SummaryData {
    /// Timestamp of the first message in window order.
    pub start_time: String,
    /// Timestamp of the last message in window order.
    pub end_time: String,
    pub message_count: usize,
    /// Distinct authors. Serialized as a sorted array.
    pub participants: BTreeSet<String>,
    /// Topic tags, at most five. Order is not meaningful.
    pub topics: Vec<String>,
    /// Longer message contents in window order, at most ten.
    pub key_points: Vec<String>,
}

/// One archived summary record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Summary {
    pub id: String,
    pub created_at: String,
    pub summary_data: SummaryData,
    /// Window length at the moment the summary was taken.
    pub original_message_count: usize,
}

impl Summary {
    pub fn start_time(&self) -> &str {
        &self.summary_data.start_time
    }

    pub fn end_time(&self) -> &str {
        &self.summary_data.end_time
    }

    pub fn participants(&self) -> &BTreeSet<String> {
        &self.summary_data.participants
    }

    pub fn topics(&self) -> &[String] {
        &self.summary_data.topics
    }

    pub fn key_points(&self) -> &[String] {
        &self.summary_data.key_points
    }
}

/// Result of a successful [`ArchiveManager::create_summary`] call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SummaryOutcome {
    pub success: bool,
    pub summary_id: String,
    pub summary_data: SummaryData,
    /// Archive length after the append.
    pub archived_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveManager {
    summaries: Vec<Summary>,
}

impl ArchiveManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_summaries(summaries: Vec<Summary>) -> Self {
        Self { summaries }
    }

    /// Condense `window` into a summary stamped with `now` and archive it.
    ///
    /// Fails with [`CompressorError::EmptyWindow`] when there is nothing to
    /// summarize; the archive is left unchanged in that case.
    pub fn create_summary(
        &mut self,
        window: &[Message],
        now: DateTime<Utc>,
    ) -> Result<SummaryOutcome> {
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return Err(CompressorError::EmptyWindow);
        };

        let summary_data = SummaryData {
            start_time: first.timestamp_or_empty().to_string(),
            end_time: last.timestamp_or_empty().to_string(),
            message_count: window.len(),
            participants: window.iter().map(|m| m.author.clone()).collect(),
            topics: extract_topics(window)
                .into_iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            key_points: extract_key_points(window),
        };

        let summary = Summary {
            id: self.next_summary_id(now),
            created_at: iso_timestamp(now),
            summary_data: summary_data.clone(),
            original_message_count: window.len(),
        };
        let summary_id = summary.id.clone();
        self.summaries.push(summary);

        info!(
            summary_id = %summary_id,
            messages = window.len(),
            archived = self.summaries.len(),
            "archived window summary"
        );

        Ok(SummaryOutcome {
            success: true,
            summary_id,
            summary_data,
            archived_count: self.summaries.len(),
        })
    }

    fn next_summary_id(&self, now: DateTime<Utc>) -> String {
        format!("summary_{}_{}", now.timestamp(), self.summaries.len() + 1)
    }

    pub fn summaries(&self) -> &[Summary] {
        &self.summaries
    }

    /// The newest `n` summaries, oldest first.
    pub fn recent(&self, n: usize) -> &[Summary] {
        let start = self.summaries.len().saturating_sub(n);
        &self.summaries[start..]
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn into_summaries(self) -> Vec<Summary> {
        self.summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn window() -> Vec<Message> {
        vec![
            Message::new("alice", "hi").with_timestamp("t1"),
            Message::new("bob", "Could you generate an image of a lighthouse?").with_timestamp("t2"),
            Message::new("alice", "thanks!").with_timestamp("t3"),
        ]
    }

    #[test]
    fn empty_window_is_an_error_and_archives_nothing() {
        let mut archive = ArchiveManager::new();
        let err = archive.create_summary(&[], at(0)).unwrap_err();
        assert!(matches!(err, CompressorError::EmptyWindow));
        assert!(archive.is_empty());
    }

    #[test]
    fn summary_captures_window_features() {
        let mut archive = ArchiveManager::new();
        let outcome = archive.create_summary(&window(), at(1_700_000_000)).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.summary_id, "summary_1700000000_1");
        assert_eq!(outcome.archived_count, 1);

        let data = &outcome.summary_data;
        assert_eq!(data.start_time, "t1");
        assert_eq!(data.end_time, "t3");
        assert_eq!(data.message_count, 3);
        assert_eq!(data.participants.len(), 2);
        assert!(data.participants.contains("alice"));
        assert!(data.topics.contains(&"image_generation".to_string()));
        assert!(data.topics.contains(&"question".to_string()));
        assert!(data.topics.contains(&"appreciation".to_string()));
        assert_eq!(
            data.key_points,
            vec!["Could you generate an image of a lighthouse?".to_string()]
        );

        let stored = &archive.summaries()[0];
        assert_eq!(stored.original_message_count, 3);
        assert_eq!(stored.created_at, "2023-11-14T22:13:20.000000Z");
    }

    #[test]
    fn start_and_end_follow_window_order_not_time_order() {
        let mut archive = ArchiveManager::new();
        let window = vec![
            Message::new("a", "x").with_timestamp("2024-12-31T00:00:00Z"),
            Message::new("b", "y").with_timestamp("2024-01-01T00:00:00Z"),
        ];
        let outcome = archive.create_summary(&window, at(0)).unwrap();
        assert_eq!(outcome.summary_data.start_time, "2024-12-31T00:00:00Z");
        assert_eq!(outcome.summary_data.end_time, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn missing_timestamps_become_empty_strings() {
        let mut archive = ArchiveManager::new();
        let outcome = archive
            .create_summary(&[Message::anonymous("no time")], at(0))
            .unwrap();
        assert_eq!(outcome.summary_data.start_time, "");
        assert!(outcome.summary_data.participants.contains("Unknown"));
    }

    #[test]
    fn same_second_summaries_are_disambiguated_by_sequence() {
        let mut archive = ArchiveManager::new();
        let a = archive.create_summary(&window(), at(42)).unwrap();
        let b = archive.create_summary(&window(), at(42)).unwrap();
        assert_eq!(a.summary_id, "summary_42_1");
        assert_eq!(b.summary_id, "summary_42_2");
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn recent_returns_newest_tail() {
        let mut archive = ArchiveManager::new();
        for i in 0..7 {
            archive.create_summary(&window(), at(i)).unwrap();
        }
        let recent = archive.recent(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].id, "summary_2_3");
        assert_eq!(recent[4].id, "summary_6_7");
        assert_eq!(archive.recent(50).len(), 7);
    }

    #[test]
    fn summary_serializes_nested_data() {
        let mut archive = ArchiveManager::new();
        archive.create_summary(&window(), at(5)).unwrap();
        let json = serde_json::to_value(&archive.summaries()[0]).unwrap();
        assert_eq!(json["id"], "summary_5_1");
        assert_eq!(json["summary_data"]["participants"], serde_json::json!(["alice", "bob"]));
        assert_eq!(json["original_message_count"], 3);
    }
}
