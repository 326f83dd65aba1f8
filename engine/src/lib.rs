//! # Ripen Engine
//!
//! This crate provides the stability-gated, idempotent file-processing
//! engine behind the `ripen` CLI. It incrementally scans a directory tree
//! for files matching known suffixes (archives, media) and, once a file is
//! observed to be byte-stable across repeated scans, performs an action on
//! it (extraction or copy) exactly once.
//!
//! ## Features
//!
//! - **Stability Gating**: Act only on files whose digest is unchanged
//!   across a required number of consecutive scans
//! - **Idempotence**: Each file is processed exactly once, tracked in
//!   per-directory state files
//! - **Bounded Memory**: Content fingerprints are streamed in fixed-size
//!   chunks regardless of file size
//! - **Crash Safety**: An interrupted run loses at most one directory's
//!   in-progress bookkeeping, never source data
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Tree Walker                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Classifier ──► Fingerprinter ──► Stability ──► Gate           │
//! │       │               │           Detector        │            │
//! │       ▼               ▼               ▼           ▼            │
//! │  ActionKind    DirectoryState     FileRecord   Dispatcher      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod action;
pub mod classify;
pub mod digest;
pub mod error;
pub mod gate;
pub mod lock;
pub mod stability;
pub mod state;
pub mod walk;

pub use action::{ActionError, ActionHandler, CopyHandler, Dispatcher, SevenZipHandler};
pub use classify::{ActionKind, classify};
pub use error::{EngineError, Result};
pub use lock::RunLock;
pub use state::{DirectoryState, FileRecord, STATE_FILE_NAME};
pub use walk::{RunOptions, RunReport, RunStatistics, Walker};
