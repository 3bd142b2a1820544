//! Message history: the live window and the summary archive.
//!
//! 1. **[`window`]**: [`WindowStore`] keeps the retained messages in
//!    insertion order plus the monotonic ingestion counter.
//!
//! 2. **[`archive`]**: [`ArchiveManager`] condenses a window into a
//!    [`Summary`] and keeps every summary it ever made.
//!
//! 3. **[`extract`]**: the deterministic topic and key-point heuristics
//!    used by the archive.
//!
//! The two stores are combined, and the trimming rules applied, by
//! [`CompressorState`](crate::state::CompressorState).

pub mod archive;
pub mod extract;
pub mod window;

pub use archive::{ArchiveManager, Summary, SummaryData, SummaryOutcome};
pub use extract::Topic;
pub use window::WindowStore;
