//! Tree traversal driving the full processing pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::action::Dispatcher;
use crate::classify::classify;
use crate::digest::fingerprint;
use crate::error::{EngineError, Result};
use crate::gate::{self, GateDecision};
use crate::stability;
use crate::state::DirectoryState;

/// Default number of consecutive stable scans required before acting.
pub const DEFAULT_THRESHOLD: u32 = 3;

/// Per-run knobs.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Required match streak before a file becomes eligible.
    pub threshold: u32,

    /// Re-check digests of already-processed files (bookkeeping refresh
    /// only; never causes reprocessing).
    pub force: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            force: false,
        }
    }
}

/// Aggregate counts for one invocation. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Directories visited by the walk.
    pub dirs_visited: u64,

    /// Files whose suffix matched a classification table.
    pub files_classified: u64,

    /// Files whose action ran successfully this run.
    pub newly_processed: u64,

    /// Files tracked but not yet eligible, including files whose handler
    /// failed this run (they stay unprocessed and are retried next run).
    pub pending: u64,
}

/// The outcome of a full walk.
#[derive(Debug, Default)]
pub struct RunReport {
    pub stats: RunStatistics,

    /// Directories whose state could not be loaded or saved. Their files
    /// were skipped this run; sibling directories still completed.
    pub failed_dirs: Vec<PathBuf>,
}

/// Walks the input tree and pipelines each classified file through
/// fingerprint, stability detection, the processing gate, and dispatch.
pub struct Walker {
    input_root: PathBuf,
    output_root: PathBuf,
    options: RunOptions,
    dispatcher: Dispatcher,
}

impl Walker {
    /// Create a walker with the default extract/copy handlers.
    pub fn new(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        options: RunOptions,
    ) -> Self {
        Self::with_dispatcher(input_root, output_root, options, Dispatcher::default())
    }

    /// Create a walker with an explicit dispatcher.
    pub fn with_dispatcher(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        options: RunOptions,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            options,
            dispatcher,
        }
    }

    /// Run one full pass over the input tree.
    ///
    /// Directories are visited top-down, each independently: state loaded,
    /// files gated and dispatched, state persisted. A directory whose state
    /// is corrupt (or cannot be read or written) is recorded in
    /// [`RunReport::failed_dirs`] and skipped; the walk continues with its
    /// siblings. Only lock-free per-file work happens here — the caller is
    /// expected to hold the [`crate::RunLock`] for the input root.
    pub fn run(&self) -> Result<RunReport> {
        if !self.input_root.is_dir() {
            return Err(EngineError::InvalidRoot(self.input_root.clone()));
        }

        let mut report = RunReport::default();

        for entry in WalkDir::new(&self.input_root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("walk error: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            let dir = entry.path();
            report.stats.dirs_visited += 1;

            // walkdir yields paths under the root we started from, so the
            // prefix always strips.
            let rel = dir.strip_prefix(&self.input_root).unwrap_or(dir);
            let out_dir = self.output_root.join(rel);

            match self.scan_directory(dir, &out_dir, &mut report.stats) {
                Ok(()) => {}
                Err(e @ EngineError::StateCorrupt { .. }) => {
                    error!("skipping directory {}: {e}", dir.display());
                    report.failed_dirs.push(dir.to_path_buf());
                }
                Err(e @ EngineError::Io(_)) => {
                    error!("skipping directory {}: {e}", dir.display());
                    report.failed_dirs.push(dir.to_path_buf());
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "visited {} directories, {} classified, {} newly processed, {} pending",
            report.stats.dirs_visited,
            report.stats.files_classified,
            report.stats.newly_processed,
            report.stats.pending
        );
        Ok(report)
    }

    /// Process all classified files directly inside one directory.
    fn scan_directory(
        &self,
        dir: &Path,
        out_dir: &Path,
        stats: &mut RunStatistics,
    ) -> Result<()> {
        let mut state = DirectoryState::load(dir)?;

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(name) => {
                    warn!("skipping non-unicode file name {name:?}");
                    continue;
                }
            };
            let Some(kind) = classify(&file_name) else {
                continue;
            };
            stats.files_classified += 1;

            let prior = state.get(&file_name).cloned().unwrap_or_default();
            if !gate::wants_fingerprint(&prior, self.options.force) {
                debug!("{file_name}: already processed, skipping");
                continue;
            }

            let path = entry.path();
            let digest = match fingerprint(&path) {
                Ok(digest) => digest,
                Err(e) => {
                    // Fatal to this file only; record untouched, retried
                    // next run.
                    warn!("could not fingerprint {}: {e}", path.display());
                    if !prior.processed {
                        stats.pending += 1;
                    }
                    continue;
                }
            };

            let mut next = stability::advance(&prior, &digest);
            let decision =
                gate::decide(&prior, next.match_streak, self.options.threshold, self.options.force);
            match decision {
                GateDecision::Skip => continue,
                GateDecision::Record => {
                    if !next.processed {
                        debug!(
                            "{file_name}: streak {}/{}",
                            next.match_streak, self.options.threshold
                        );
                        stats.pending += 1;
                    }
                }
                GateDecision::Invoke => match self.dispatcher.dispatch(kind, &path, out_dir) {
                    Ok(Ok(())) => {
                        next.processed = true;
                        stats.newly_processed += 1;
                    }
                    Ok(Err(cause)) => {
                        warn!("could not process {}: {cause}", path.display());
                        stats.pending += 1;
                    }
                    Err(e) => {
                        // Destination directory could not be created.
                        warn!("could not process {}: {e}", path.display());
                        stats.pending += 1;
                    }
                },
            }
            state.insert(file_name, next);
        }

        state.save(dir)
    }
}
