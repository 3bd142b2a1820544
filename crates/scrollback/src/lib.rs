//! Bounded chat history with rule-based summary archiving.
//!
//! `scrollback` ingests a stream of chat messages, keeps only a trailing
//! window of them, and every time the window reaches a threshold condenses
//! it into a compact [`Summary`](history::Summary) that is archived
//! permanently. The whole state survives restarts as a single JSON snapshot.
//!
//! # Getting started
//!
//! ```no_run
//! use scrollback::prelude::*;
//!
//! # fn main() -> scrollback::Result<()> {
//! let store = FileStateStore::new("scrollback_state.json");
//! let service = CompressorService::new(store, CompressorConfig::default());
//!
//! let outcome = service.add_message(Message::new("alice", "Can you draw a picture of a cat?"))?;
//! println!("window now holds {} messages", outcome.current_window_size);
//!
//! let context = service.get_current_context()?;
//! println!("{} summaries archived", context.total_archived_summaries);
//! # Ok(())
//! # }
//! ```
//!
//! # Where to find things
//!
//! - **Window bookkeeping:** [`WindowStore`](history::WindowStore) holds the
//!   live messages and the total ingestion counter.
//! - **Summaries:** [`ArchiveManager`](history::ArchiveManager) builds and
//!   stores [`Summary`](history::Summary) records; topic tagging lives in
//!   [`history::topics`].
//! - **The aggregate:** [`CompressorState`](state::CompressorState) wires the
//!   two together and implements the add-then-clamp algorithm.
//! - **Persistence:** [`StateStore`](state::StateStore) with file and
//!   in-memory backends; [`CompressorService`](state::CompressorService)
//!   wraps every call in a locked load, mutate, save transaction.
//! - **JSON surface:** [`action::run_action`] dispatches
//!   `{"action": ...}` requests and always answers with a success envelope.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`history`] | Live window, summary archive, topic and key-point extraction |
//! | [`state`] | Aggregate root, snapshots, persistence, locked service |
//! | [`action`] | JSON action dispatcher with schema validation |
//! | [`config`] | Window size and summary threshold |
//! | [`error`] | [`CompressorError`] taxonomy |

pub mod action;
pub mod config;
pub mod error;
pub mod history;
pub mod prelude;
pub mod state;

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub use error::{CompressorError, Result};

// Re-export schemars for downstream crates.
pub use schemars;

// ── Constants ──────────────────────────────────────────────────────

/// Author recorded for messages that arrive without one.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`.
///
/// # Example
///
/// ```
/// use scrollback::json_schema_for;
/// use scrollback::Message;
///
/// let schema = json_schema_for::<Message>();
/// assert_eq!(schema["type"], "object");
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Time helpers ───────────────────────────────────────────────────

/// Format a UTC instant as an ISO-8601 / RFC 3339 string.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ── Message types ──────────────────────────────────────────────────

/// Caller-supplied message identifier. Chat platforms hand out either
/// snowflake strings or plain integers, so both are accepted verbatim.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum MessageId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Number(n) => write!(f, "{n}"),
            MessageId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MessageId {
    fn from(n: i64) -> Self {
        MessageId::Number(n)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        MessageId::Text(s.to_string())
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        MessageId::Text(s)
    }
}

/// A single chat message.
///
/// `author` and `content` are never absent: missing (or `null`) values are
/// replaced by [`UNKNOWN_AUTHOR`] and `""` when the message is decoded. Any
/// fields this crate doesn't know about are kept in `extra` and written back
/// out unchanged.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    #[serde(default = "default_author", deserialize_with = "author_or_unknown")]
    #[schemars(with = "Option<String>")]
    pub author: String,
    #[serde(default, deserialize_with = "content_or_empty")]
    #[schemars(with = "Option<String>")]
    pub content: String,
    /// ISO-8601 timestamp. Filled with the ingestion time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

fn author_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_author))
}

fn content_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Message {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            author: author.into(),
            content: content.into(),
            timestamp: None,
            extra: serde_json::Map::new(),
        }
    }

    /// A message with no author, which records as [`UNKNOWN_AUTHOR`].
    pub fn anonymous(content: impl Into<String>) -> Self {
        Self::new(UNKNOWN_AUTHOR, content)
    }

    pub fn with_id(mut self, id: impl Into<MessageId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Attach an arbitrary extra field (e.g. `channel_id`).
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// The timestamp, or `""` for messages imported without one.
    pub fn timestamp_or_empty(&self) -> &str {
        self.timestamp.as_deref().unwrap_or("")
    }
}
