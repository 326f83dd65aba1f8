//! Action dispatch: extraction and copying of eligible files.

use std::fs;
use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::info;

use crate::classify::ActionKind;
use crate::error::Result;

/// A failed action invocation, with a human-readable cause.
///
/// Caught at the dispatch boundary and reported as a warning; never fatal to
/// the run. The file stays unprocessed and is retried on the next run.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ActionError(pub String);

impl ActionError {
    fn new(cause: impl Into<String>) -> Self {
        Self(cause.into())
    }
}

/// An external operation applied to a file once it becomes eligible.
///
/// `dest_dir` is guaranteed to exist by the time `handle` is called.
pub trait ActionHandler {
    fn handle(&self, source: &Path, dest_dir: &Path) -> std::result::Result<(), ActionError>;
}

/// Copies the file into the destination directory, keeping its name.
pub struct CopyHandler;

impl ActionHandler for CopyHandler {
    fn handle(&self, source: &Path, dest_dir: &Path) -> std::result::Result<(), ActionError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| ActionError::new(format!("{} has no file name", source.display())))?;
        info!("copying {} to {}", source.display(), dest_dir.display());
        fs::copy(source, dest_dir.join(file_name))
            .map_err(|e| ActionError::new(format!("copy failed: {e}")))?;
        Ok(())
    }
}

/// Single-stream compression suffixes that hold one member with no archive
/// listing, extracted with `7z e` instead of `7z x`.
const SINGLE_STREAM_SUFFIXES: &[&str] = &[".bz2", ".gz", ".xz"];

/// Extracts archives by shelling out to `7z`.
///
/// `7z` handles every suffix in the archive table, including rar when the
/// rar codec plugin is installed. `-y` assumes yes on all queries so a
/// re-extraction never blocks waiting for an overwrite confirmation.
pub struct SevenZipHandler;

impl ActionHandler for SevenZipHandler {
    fn handle(&self, source: &Path, dest_dir: &Path) -> std::result::Result<(), ActionError> {
        let binary = which::which("7z")
            .map_err(|e| ActionError::new(format!("7z not available: {e}")))?;

        let name = source.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let mode = if SINGLE_STREAM_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            "e"
        } else {
            "x"
        };

        info!("extracting {} to {}", source.display(), dest_dir.display());
        let output = Command::new(binary)
            .arg(mode)
            .arg("-y")
            .arg(format!("-o{}", dest_dir.display()))
            .arg("--")
            .arg(source)
            .output()
            .map_err(|e| ActionError::new(format!("failed to run 7z: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ActionError::new(format!(
                "7z exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Resolves an [`ActionKind`] to its handler.
///
/// The mapping is fixed at construction: one handler per variant, no runtime
/// registration. [`Dispatcher::with_handlers`] exists so tests can substitute
/// failing or recording handlers.
pub struct Dispatcher {
    extract: Box<dyn ActionHandler>,
    copy: Box<dyn ActionHandler>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::with_handlers(Box::new(SevenZipHandler), Box::new(CopyHandler))
    }
}

impl Dispatcher {
    /// Build a dispatcher with explicit handlers.
    pub fn with_handlers(extract: Box<dyn ActionHandler>, copy: Box<dyn ActionHandler>) -> Self {
        Self { extract, copy }
    }

    /// Run the action for a file into the mirrored destination directory.
    ///
    /// Creates the destination directory first (idempotent; a pre-existing
    /// directory is not an error, any other creation failure propagates as
    /// [`crate::EngineError::Io`]). Returns whether the handler succeeded;
    /// handler failure is an `Ok(Err(..))`, not an engine error, so the
    /// caller can log it and move on.
    pub fn dispatch(
        &self,
        kind: ActionKind,
        source: &Path,
        dest_dir: &Path,
    ) -> Result<std::result::Result<(), ActionError>> {
        fs::create_dir_all(dest_dir)?;

        let handler = match kind {
            ActionKind::Extract => &self.extract,
            ActionKind::Copy => &self.copy,
        };
        Ok(handler.handle(source, dest_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct FailingHandler;

    impl ActionHandler for FailingHandler {
        fn handle(&self, _: &Path, _: &Path) -> std::result::Result<(), ActionError> {
            Err(ActionError::new("boom"))
        }
    }

    fn copy_only() -> Dispatcher {
        Dispatcher::with_handlers(Box::new(FailingHandler), Box::new(CopyHandler))
    }

    #[test]
    fn test_copy_handler_mirrors_file() {
        let src_dir = TempDir::new().unwrap();
        let dst_dir = TempDir::new().unwrap();
        let source = src_dir.path().join("song.mp3");
        fs::write(&source, b"audio").unwrap();

        copy_only()
            .dispatch(ActionKind::Copy, &source, dst_dir.path())
            .unwrap()
            .unwrap();

        let copied = fs::read(dst_dir.path().join("song.mp3")).unwrap();
        assert_eq!(copied, b"audio");
    }

    #[test]
    fn test_dispatch_creates_missing_destination() {
        let src_dir = TempDir::new().unwrap();
        let dst_root = TempDir::new().unwrap();
        let source = src_dir.path().join("song.mp3");
        fs::write(&source, b"audio").unwrap();

        let nested = dst_root.path().join("a/b/c");
        copy_only()
            .dispatch(ActionKind::Copy, &source, &nested)
            .unwrap()
            .unwrap();

        assert!(nested.join("song.mp3").exists());
    }

    #[test]
    fn test_handler_failure_is_not_an_engine_error() {
        let src_dir = TempDir::new().unwrap();
        let dst_dir = TempDir::new().unwrap();
        let source = src_dir.path().join("bad.zip");
        fs::write(&source, b"not an archive").unwrap();

        let result = copy_only()
            .dispatch(ActionKind::Extract, &source, dst_dir.path())
            .unwrap();

        assert_eq!(result.unwrap_err().to_string(), "boom");
    }
}
