//! Per-directory persistent state.
//!
//! Each scanned directory carries its own hidden marker file mapping file
//! names to their tracking records. State lives next to the data being
//! watched, so moving or deleting a source directory discards its tracking
//! state along with it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, Result};

/// Name of the hidden state file kept inside each scanned directory.
pub const STATE_FILE_NAME: &str = ".ripen";

/// Tracking record for one file name within a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Digest of the file content as of the last scan that observed it.
    /// Empty string if never fingerprinted.
    pub digest: String,

    /// Count of consecutive scans in which the digest was unchanged.
    /// Reset to 0 on any digest change.
    pub match_streak: u32,

    /// True once the action handler has run successfully for this file.
    /// Terminal: the engine never resets it to false.
    pub processed: bool,
}

impl Default for FileRecord {
    /// The defaulted-absent record: a file seen for the first time.
    fn default() -> Self {
        Self {
            digest: String::new(),
            match_streak: 0,
            processed: false,
        }
    }
}

/// The record set for a single directory: file name → [`FileRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryState {
    records: HashMap<String, FileRecord>,
}

impl DirectoryState {
    /// Path of the state file for a directory.
    pub fn file_path(dir: &Path) -> PathBuf {
        dir.join(STATE_FILE_NAME)
    }

    /// Load the persisted state for a directory.
    ///
    /// An absent state file means the directory has never been scanned and
    /// yields an empty mapping. A present but zero-byte file also yields an
    /// empty mapping, with a warning. Non-empty content that fails to parse
    /// is [`EngineError::StateCorrupt`].
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::file_path(dir);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        if content.is_empty() {
            warn!("state file {} was empty, ignoring", path.display());
            return Ok(Self::default());
        }

        serde_json::from_str(&content).map_err(|source| EngineError::StateCorrupt { path, source })
    }

    /// Persist the state for a directory, replacing any prior content.
    ///
    /// A no-op when the mapping is empty: directories with nothing tracked
    /// never get a marker file, and an existing file is left alone.
    pub fn save(&self, dir: &Path) -> Result<()> {
        if self.records.is_empty() {
            return Ok(());
        }
        let content = serde_json::to_string_pretty(&self.records)
            .map_err(std::io::Error::other)?;
        fs::write(Self::file_path(dir), content)?;
        Ok(())
    }

    /// Get the record for a file name, if one exists.
    pub fn get(&self, file_name: &str) -> Option<&FileRecord> {
        self.records.get(file_name)
    }

    /// Insert or replace the record for a file name.
    pub fn insert(&mut self, file_name: impl Into<String>, record: FileRecord) {
        self.records.insert(file_name.into(), record);
    }

    /// Number of tracked file names.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether any file names are tracked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn record(digest: &str, streak: u32, processed: bool) -> FileRecord {
        FileRecord {
            digest: digest.to_string(),
            match_streak: streak,
            processed,
        }
    }

    #[test]
    fn test_load_absent_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let state = DirectoryState::load(temp_dir.path()).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_load_empty_file_is_empty_with_warning() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(DirectoryState::file_path(temp_dir.path()), "").unwrap();

        let state = DirectoryState::load(temp_dir.path()).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_load_garbage_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(DirectoryState::file_path(temp_dir.path()), "not json {").unwrap();

        let err = DirectoryState::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::StateCorrupt { .. }));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = DirectoryState::default();
        state.insert("a.zip", record("abc", 2, false));
        state.insert("b.mp3", record("def", 5, true));
        state.save(temp_dir.path()).unwrap();

        let loaded = DirectoryState::load(temp_dir.path()).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_save_empty_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        DirectoryState::default().save(temp_dir.path()).unwrap();

        assert!(!DirectoryState::file_path(temp_dir.path()).exists());
    }

    #[test]
    fn test_save_empty_leaves_existing_file_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = DirectoryState::file_path(temp_dir.path());
        fs::write(&path, "{}").unwrap();

        DirectoryState::default().save(temp_dir.path()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_save_replaces_prior_content() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = DirectoryState::default();
        state.insert("a.zip", record("one", 0, false));
        state.save(temp_dir.path()).unwrap();

        let mut state = DirectoryState::load(temp_dir.path()).unwrap();
        state.insert("a.zip", record("two", 0, false));
        state.save(temp_dir.path()).unwrap();

        let loaded = DirectoryState::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.get("a.zip").unwrap().digest, "two");
        assert_eq!(loaded.len(), 1);
    }
}
