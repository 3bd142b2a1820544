//! The aggregate root: config, live window, and summary archive.
//!
//! Every mutation goes through [`CompressorState::add_message`] or
//! [`CompressorState::import`]. Two independent clamps keep the window
//! bounded:
//!
//! 1. **Threshold trim.** When the window reaches `summary_threshold`, the
//!    whole window is summarized and then cut back to `window_size`.
//! 2. **Steady-state clamp.** Afterwards, any window still longer than
//!    `window_size` drops its oldest entries. In normal operation that is a
//!    single FIFO pop per call; after an oversized import it is the rule
//!    that restores the bound.
//!
//! When the first clamp fires it already lands exactly on `window_size`, so
//! the second one is a no-op in that call.

use super::snapshot::{ContextView, EXPORTED_SUMMARY_LIMIT, ImportedContext, StateSnapshot};
use crate::config::CompressorConfig;
use crate::history::{ArchiveManager, SummaryOutcome, WindowStore};
use crate::{Message, MessageId, iso_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result descriptor for one [`CompressorState::add_message`] call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddOutcome {
    pub added: bool,
    /// Caller-supplied id, or the window position right after the append.
    pub message_id: MessageId,
    /// Window length right after the append, before any trimming.
    pub current_window_size: usize,
    pub should_summarize: bool,
    pub summary_created: Option<SummaryOutcome>,
    /// Present only when the threshold trim removed messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_reset: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages_removed: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressorState {
    config: CompressorConfig,
    window: WindowStore,
    archive: ArchiveManager,
}

impl CompressorState {
    /// A fresh, empty state.
    pub fn new(config: CompressorConfig) -> Self {
        config.warn_if_unusual();
        Self {
            config,
            window: WindowStore::new(),
            archive: ArchiveManager::new(),
        }
    }

    /// Restore from a persisted snapshot, including its own sizing.
    pub fn from_snapshot(snapshot: StateSnapshot) -> Self {
        let config = CompressorConfig::new(snapshot.window_size, snapshot.summary_threshold);
        config.warn_if_unusual();
        Self {
            config,
            window: WindowStore::restore(snapshot.messages, snapshot.message_count),
            archive: ArchiveManager::from_summaries(snapshot.archived_summaries),
        }
    }

    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            window_size: self.config.window_size,
            summary_threshold: self.config.summary_threshold,
            messages: self.window.messages().to_vec(),
            archived_summaries: self.archive.summaries().to_vec(),
            message_count: self.window.message_count(),
        }
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    pub fn window(&self) -> &WindowStore {
        &self.window
    }

    pub fn archive(&self) -> &ArchiveManager {
        &self.archive
    }

    /// Ingest one message, stamping it with the current time if needed.
    pub fn add_message(&mut self, message: Message) -> AddOutcome {
        self.add_message_at(message, Utc::now())
    }

    /// [`add_message`](Self::add_message) with an explicit clock reading.
    pub fn add_message_at(&mut self, mut message: Message, now: DateTime<Utc>) -> AddOutcome {
        if message.timestamp.is_none() {
            message.timestamp = Some(iso_timestamp(now));
        }
        let supplied_id = message.id.clone();

        let len = self.window.push(message);
        let mut outcome = AddOutcome {
            added: true,
            message_id: supplied_id.unwrap_or(MessageId::Number(len as i64)),
            current_window_size: len,
            should_summarize: false,
            summary_created: None,
            window_reset: None,
            messages_removed: None,
        };

        if len >= self.config.summary_threshold {
            outcome.should_summarize = true;
            outcome.summary_created = match self.archive.create_summary(self.window.messages(), now)
            {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!("summary skipped: {e}");
                    None
                }
            };

            if self.window.len() > self.config.window_size {
                let removed = self.window.retain_newest(self.config.window_size);
                debug!(removed, "window reset after summary");
                outcome.window_reset = Some(true);
                outcome.messages_removed = Some(removed);
            }
        }

        if self.window.len() > self.config.window_size {
            let dropped = self.window.retain_newest(self.config.window_size);
            debug!(dropped, "window clamp dropped oldest messages");
        }

        outcome
    }

    /// The exported view: live window plus the newest summaries.
    pub fn context_view(&self) -> ContextView {
        ContextView {
            recent_messages: self.window.messages().to_vec(),
            archived_summaries: self.archive.recent(EXPORTED_SUMMARY_LIMIT).to_vec(),
            total_messages_processed: self.window.message_count(),
            current_window_size: self.window.len(),
            total_archived_summaries: self.archive.len(),
        }
    }

    /// Replace window, archive, and counter wholesale. Sizing is kept and the
    /// window bound is not enforced until the next add.
    pub fn import(&mut self, imported: ImportedContext) {
        let message_count = imported.message_count();
        if imported.recent_messages.len() > self.config.max_window_len() {
            info!(
                messages = imported.recent_messages.len(),
                window_size = self.config.window_size,
                "imported window exceeds bound; next add will trim it"
            );
        }
        self.window = WindowStore::restore(imported.recent_messages, message_count);
        self.archive = ArchiveManager::from_summaries(imported.archived_summaries);
    }
}

impl Default for CompressorState {
    fn default() -> Self {
        Self::new(CompressorConfig::default())
    }
}
