//! The processing gate: decides what to do with a classified file.

use crate::state::FileRecord;

/// What the walker should do for one file on one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Already processed and not forced: skip fingerprinting entirely and
    /// leave the record untouched.
    Skip,

    /// Fingerprint and update the record, but do not invoke the action.
    /// Covers files still accumulating a streak and forced refreshes of
    /// already-processed records.
    Record,

    /// Fingerprint, update the record, and invoke the action.
    Invoke,
}

/// Whether this file needs fingerprinting at all on this scan.
///
/// The fast path: an already-processed file that is not being forced is left
/// completely untouched, no digest is computed.
pub fn wants_fingerprint(record: &FileRecord, force: bool) -> bool {
    !record.processed || force
}

/// Decide the action once the next streak is known.
///
/// The action fires iff the record is unprocessed and the streak has reached
/// the threshold. `processed` is a one-way terminal flag enforced
/// independently of `force`: a forced re-scan of a processed record refreshes
/// its digest and streak bookkeeping but never re-invokes the action. That
/// interaction is preserved from the original design as-is; it looks
/// intentional but was never verified, so do not read `--force` as "force
/// reprocess".
pub fn decide(record: &FileRecord, next_streak: u32, threshold: u32, force: bool) -> GateDecision {
    if record.processed {
        if force {
            GateDecision::Record
        } else {
            GateDecision::Skip
        }
    } else if next_streak >= threshold {
        GateDecision::Invoke
    } else {
        GateDecision::Record
    }
}
