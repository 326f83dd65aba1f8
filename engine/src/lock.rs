//! Exclusive run lock, one per input root.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{EngineError, Result};

/// Scoped guard for the per-root run lock.
///
/// At most one walker may run against a given input root at a time; this is
/// the only cross-invocation synchronization the engine needs, since each
/// directory's state is touched only by the single active walker. The lock
/// is a file in the system temp directory, keyed by the canonicalized input
/// root, created exclusively and removed again when the guard drops — on
/// every exit path, success or failure.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Acquire the run lock for an input root.
    ///
    /// Fails with [`EngineError::LockUnavailable`] when another instance
    /// already holds it. No scanning state is touched before this succeeds.
    pub fn acquire(input_root: &Path) -> Result<Self> {
        let path = Self::lock_path(input_root)?;

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(EngineError::LockUnavailable { path });
            }
            Err(e) => return Err(e.into()),
        };

        // PID for operator diagnostics when a stale lock needs clearing.
        writeln!(file, "{}", std::process::id())?;
        debug!("acquired run lock {}", path.display());
        Ok(Self { path })
    }

    /// Path of the lock file guarding this instance.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(input_root: &Path) -> Result<PathBuf> {
        // Key on the canonical root so independent trees can run
        // concurrently while two spellings of the same root cannot.
        let canonical = fs::canonicalize(input_root)?;
        let key = hex::encode(&Sha256::digest(canonical.as_os_str().as_encoded_bytes())[..8]);
        Ok(std::env::temp_dir().join(format!("ripen-{key}.lock")))
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("failed to remove run lock {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let root = TempDir::new().unwrap();
        let lock = RunLock::acquire(root.path()).unwrap();

        let err = RunLock::acquire(root.path()).unwrap_err();
        assert!(matches!(err, EngineError::LockUnavailable { .. }));
        drop(lock);
    }

    #[test]
    fn test_lock_released_on_drop() {
        let root = TempDir::new().unwrap();
        let lock = RunLock::acquire(root.path()).unwrap();
        let path = lock.path().to_path_buf();
        assert!(path.exists());

        drop(lock);
        assert!(!path.exists());
        // Reacquirable after release.
        let _lock = RunLock::acquire(root.path()).unwrap();
    }

    #[test]
    fn test_distinct_roots_lock_independently() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();

        let _lock_a = RunLock::acquire(a.path()).unwrap();
        let _lock_b = RunLock::acquire(b.path()).unwrap();
    }
}
