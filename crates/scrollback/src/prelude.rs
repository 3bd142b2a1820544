//! Convenience re-exports for common `scrollback` types.
//!
//! ```ignore
//! use scrollback::prelude::*;
//! ```
//!
//! Extraction constants and the snapshot decoders are left out; import
//! those from their modules when needed.

pub use crate::{CompressorError, Message, MessageId, Result, json_schema_for};

pub use crate::config::CompressorConfig;

pub use crate::history::{ArchiveManager, Summary, SummaryData, SummaryOutcome, Topic, WindowStore};

pub use crate::state::{
    AddOutcome, CompressorService, CompressorState, ContextView, FileStateStore, MemoryStateStore,
    StateSnapshot, StateStore,
};

pub use crate::action::{Action, ActionResponse, run_action, run_action_value};
