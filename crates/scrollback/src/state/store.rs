//! Persistence for [`StateSnapshot`]s.
//!
//! [`StateStore`] is the seam between the compressor and wherever its state
//! lives. [`FileStateStore`] keeps one pretty-printed JSON file and replaces
//! it atomically (temp file + rename), so a crash mid-write never leaves a
//! torn snapshot behind. [`MemoryStateStore`] is for tests and embedding.

use super::snapshot::StateSnapshot;
use crate::error::{CompressorError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the persisted state, relative to the working directory.
pub const DEFAULT_STATE_PATH: &str = ".scrollback/state.json";

/// Load/save of the whole compressor state as a single record.
pub trait StateStore {
    /// The last saved snapshot, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<StateSnapshot>>;

    /// Replace the stored snapshot.
    fn save(&mut self, snapshot: &StateSnapshot) -> Result<()>;
}

// ── FileStateStore ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_PATH)
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<StateSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        read_json(&self.path).map(Some)
    }

    fn save(&mut self, snapshot: &StateSnapshot) -> Result<()> {
        write_json_atomic(&self.path, snapshot)?;
        debug!(
            path = %self.path.display(),
            messages = snapshot.messages.len(),
            "state saved"
        );
        Ok(())
    }
}

// ── MemoryStateStore ───────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    snapshot: Option<StateSnapshot>,
    saves: usize,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot, as if it had been saved earlier.
    pub fn with_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            saves: 0,
        }
    }

    pub fn snapshot(&self) -> Option<&StateSnapshot> {
        self.snapshot.as_ref()
    }

    /// Number of successful `save` calls.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<StateSnapshot>> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &StateSnapshot) -> Result<()> {
        self.snapshot = Some(snapshot.clone());
        self.saves += 1;
        Ok(())
    }
}

// ── JSON file helpers ──────────────────────────────────────────────

/// Read and decode a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path).map_err(|e| CompressorError::io(path, e))?;
    serde_json::from_str(&json).map_err(|e| CompressorError::decode(Some(path.to_path_buf()), e))
}

/// Atomic write: serialize to a temp file next to `path`, then rename into
/// place. Parent directories are created as needed.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| CompressorError::io(&dir, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "state.json".to_string());
    let tmp_path = dir.join(format!(".{file_name}.tmp"));

    let json = serde_json::to_string_pretty(value).map_err(CompressorError::Encode)?;
    std::fs::write(&tmp_path, json).map_err(|e| CompressorError::io(&tmp_path, e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| CompressorError::io(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    fn sample_snapshot() -> StateSnapshot {
        StateSnapshot {
            window_size: 4,
            summary_threshold: 8,
            messages: vec![Message::new("ana", "hello").with_timestamp("t0")],
            archived_summaries: vec![],
            message_count: 12,
        }
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStateStore::new(dir.path().join("nested/deeper/state.json"));

        store.save(&sample_snapshot()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, sample_snapshot());
    }

    #[test]
    fn atomic_write_no_temp_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStateStore::new(dir.path().join("state.json"));
        store.save(&sample_snapshot()).unwrap();

        assert!(!dir.path().join(".state.json.tmp").exists());
        assert!(dir.path().join("state.json").exists());
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileStateStore::new(&path).load().unwrap_err();
        assert!(matches!(err, CompressorError::Decode { path: Some(_), .. }));
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryStateStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&sample_snapshot()).unwrap();
        store.save(&sample_snapshot()).unwrap();
        assert_eq!(store.saves(), 2);
        assert_eq!(store.snapshot().unwrap().message_count, 12);
    }

    #[test]
    fn read_json_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json::<StateSnapshot>(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CompressorError::Io { .. }));
    }
}
