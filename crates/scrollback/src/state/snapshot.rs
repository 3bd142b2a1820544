//! Serialized shapes of the compressor state.
//!
//! Two records cross the persistence boundary:
//!
//! - [`StateSnapshot`] is the full internal state, written after every
//!   mutation and read back at startup. It keeps the entire archive.
//! - [`ContextView`] is the exported, read-only view for downstream
//!   consumers. It carries only the newest [`EXPORTED_SUMMARY_LIMIT`]
//!   summaries, so exporting and re-importing drops older ones.
//!
//! [`ImportedContext`] is the lenient decoder used when a `ContextView` file
//! is imported: missing lists default to empty and a missing counter falls
//! back to the number of messages.

use crate::Message;
use crate::config::{DEFAULT_SUMMARY_THRESHOLD, DEFAULT_WINDOW_SIZE};
use crate::history::Summary;
use serde::{Deserialize, Serialize};

/// Number of archived summaries included in a [`ContextView`].
pub const EXPORTED_SUMMARY_LIMIT: usize = 5;

/// Full persisted state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_summary_threshold")]
    pub summary_threshold: usize,
    /// The live window, oldest first.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Every summary ever archived.
    #[serde(default)]
    pub archived_summaries: Vec<Summary>,
    /// Total messages ingested.
    #[serde(default)]
    pub message_count: u64,
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_summary_threshold() -> usize {
    DEFAULT_SUMMARY_THRESHOLD
}

/// Exported context for downstream consumers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContextView {
    pub recent_messages: Vec<Message>,
    /// The newest summaries, oldest first.
    pub archived_summaries: Vec<Summary>,
    pub total_messages_processed: u64,
    pub current_window_size: usize,
    /// Size of the full archive, not just the exported tail.
    pub total_archived_summaries: usize,
}

/// Decoder for an imported [`ContextView`] file.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ImportedContext {
    #[serde(default)]
    pub recent_messages: Vec<Message>,
    #[serde(default)]
    pub archived_summaries: Vec<Summary>,
    #[serde(default)]
    pub total_messages_processed: Option<u64>,
}

impl ImportedContext {
    /// Counter to restore: the recorded total, or the window length.
    pub fn message_count(&self) -> u64 {
        self.total_messages_processed
            .unwrap_or(self.recent_messages.len() as u64)
    }
}

impl From<ContextView> for ImportedContext {
    fn from(view: ContextView) -> Self {
        Self {
            recent_messages: view.recent_messages,
            archived_summaries: view.archived_summaries,
            total_messages_processed: Some(view.total_messages_processed),
        }
    }
}
