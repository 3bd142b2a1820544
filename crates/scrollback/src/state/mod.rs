//! The compressor aggregate and everything needed to persist it.
//!
//! - **[`compressor`]**: [`CompressorState`], the add-then-clamp algorithm
//!   and import/export views.
//! - **[`snapshot`]**: the two serialized shapes: the full
//!   [`StateSnapshot`] and the exported [`ContextView`].
//! - **[`store`]**: the [`StateStore`] persistence seam with file and
//!   in-memory backends.
//! - **[`service`]**: [`CompressorService`], which wraps each call in a
//!   locked load, mutate, save transaction.

pub mod compressor;
pub mod service;
pub mod snapshot;
pub mod store;

pub use compressor::{AddOutcome, CompressorState};
pub use service::{CompressorService, DEFAULT_EXPORT_DIR};
pub use snapshot::{ContextView, EXPORTED_SUMMARY_LIMIT, ImportedContext, StateSnapshot};
pub use store::{DEFAULT_STATE_PATH, FileStateStore, MemoryStateStore, StateStore};
