//! Single-writer access to a persisted [`CompressorState`].
//!
//! Every operation is one transaction under a single mutex: load the
//! snapshot, apply the change, save it back. Concurrent callers sharing a
//! service are serialized, so none of their updates are lost. Writers in
//! other processes are not coordinated; the last save wins.
//!
//! The state is reloaded on every call, so nothing is cached between
//! transactions and a poisoned lock carries no half-applied state.

use super::compressor::{AddOutcome, CompressorState};
use super::snapshot::{ContextView, ImportedContext};
use super::store::{StateStore, read_json, write_json_atomic};
use crate::Message;
use crate::config::CompressorConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Default directory for auto-named context exports.
pub const DEFAULT_EXPORT_DIR: &str = ".scrollback";

pub struct CompressorService<S: StateStore> {
    store: Mutex<S>,
    /// Sizing for a fresh state; a restored snapshot brings its own.
    config: CompressorConfig,
    export_dir: PathBuf,
}

impl<S: StateStore> CompressorService<S> {
    pub fn new(store: S, config: CompressorConfig) -> Self {
        Self {
            store: Mutex::new(store),
            config,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }

    /// Directory used by [`export_context`](Self::export_context) when no
    /// path is given.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restore the persisted state, or start fresh.
    ///
    /// An unreadable or corrupt snapshot is logged and replaced by a fresh
    /// state; the next mutation overwrites it.
    fn load(&self, store: &S) -> CompressorState {
        match store.load() {
            Ok(Some(snapshot)) => CompressorState::from_snapshot(snapshot),
            Ok(None) => CompressorState::new(self.config),
            Err(e) => {
                warn!("Discarding unreadable state, starting fresh: {e}");
                CompressorState::new(self.config)
            }
        }
    }

    fn read<T>(&self, f: impl FnOnce(&CompressorState) -> T) -> T {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        let state = self.load(&store);
        f(&state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut CompressorState) -> T) -> Result<T> {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = self.load(&store);
        let out = f(&mut state);
        store.save(&state.to_snapshot())?;
        Ok(out)
    }

    /// Current state as it would be loaded right now.
    pub fn state(&self) -> CompressorState {
        self.read(CompressorState::clone)
    }

    /// Ingest a message and persist the result.
    pub fn add_message(&self, message: Message) -> Result<AddOutcome> {
        self.write(|state| state.add_message(message))
    }

    pub fn get_current_context(&self) -> Result<ContextView> {
        Ok(self.read(CompressorState::context_view))
    }

    /// Write the exported [`ContextView`] to `path`, or to an auto-named file
    /// in the export directory. Returns the path written.
    pub fn export_context(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => self.export_dir.join(format!(
                "scrollback_context_{}.json",
                chrono::Local::now().format("%Y%m%d_%H%M%S")
            )),
        };

        let view = self.get_current_context()?;
        write_json_atomic(&path, &view)?;
        info!(
            path = %path.display(),
            messages = view.current_window_size,
            "context exported"
        );
        Ok(path)
    }

    /// Replace window, archive, and counter from an exported context file.
    ///
    /// The file is fully decoded before anything changes; a missing or
    /// malformed file leaves the state untouched.
    pub fn import_context(&self, path: &Path) -> Result<()> {
        let imported: ImportedContext = read_json(path)?;
        let messages = imported.recent_messages.len();
        let summaries = imported.archived_summaries.len();
        self.write(|state| state.import(imported))?;
        info!(path = %path.display(), messages, summaries, "context imported");
        Ok(())
    }
}
