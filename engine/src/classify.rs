//! Suffix-based file classification.
//!
//! Matching is by extension only. Checking the MIME type might be considered
//! more correct, but many formats are stored as gzip, zip, or even flac that
//! we do not want to actually unpack; we only consider files following a
//! typical internet naming convention.

/// The action to perform on a classified file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Unpack the file into the destination directory.
    Extract,

    /// Copy the file into the destination directory as-is.
    Copy,
}

/// Archive suffixes that classify as [`ActionKind::Extract`].
pub const ARCHIVE_SUFFIXES: &[&str] = &[".7z", ".bz2", ".gz", ".rar", ".tar", ".xz", ".zip"];

/// Media suffixes that classify as [`ActionKind::Copy`].
pub const MEDIA_SUFFIXES: &[&str] = &[".avi", ".flac", ".mkv", ".mp3", ".mp4", ".ogg"];

/// Classify a file name by its final suffix.
///
/// Matching is exact and case-sensitive against the two fixed tables; only
/// the last extension counts, so `x.tar.gz` classifies by `.gz`. Unknown
/// suffixes return `None` and create no state anywhere.
pub fn classify(file_name: &str) -> Option<ActionKind> {
    let dot = file_name.rfind('.')?;
    let suffix = &file_name[dot..];

    if ARCHIVE_SUFFIXES.contains(&suffix) {
        Some(ActionKind::Extract)
    } else if MEDIA_SUFFIXES.contains(&suffix) {
        Some(ActionKind::Copy)
    } else {
        None
    }
}
