//! Digest-based stability detection.

use crate::state::FileRecord;

/// Fold a freshly computed digest into a file's tracking record.
///
/// Returns the record as it should be stored after this scan: the new digest
/// and the next match streak. The streak grows by one only when the new
/// digest equals a non-empty prior digest; any change, and the very first
/// observation (prior digest empty), resets it to 0. The `processed` flag is
/// carried over untouched.
pub fn advance(prior: &FileRecord, new_digest: &str) -> FileRecord {
    let match_streak = if !prior.digest.is_empty() && new_digest == prior.digest {
        prior.match_streak + 1
    } else {
        0
    };

    FileRecord {
        digest: new_digest.to_string(),
        match_streak,
        processed: prior.processed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(digest: &str, streak: u32) -> FileRecord {
        FileRecord {
            digest: digest.to_string(),
            match_streak: streak,
            processed: false,
        }
    }

    #[test]
    fn test_first_observation_starts_at_zero() {
        let next = advance(&FileRecord::default(), "aaa");
        assert_eq!(next.match_streak, 0);
        assert_eq!(next.digest, "aaa");
    }

    #[test]
    fn test_matching_digest_increments_streak() {
        let next = advance(&record("aaa", 0), "aaa");
        assert_eq!(next.match_streak, 1);

        let next = advance(&record("aaa", 4), "aaa");
        assert_eq!(next.match_streak, 5);
    }

    #[test]
    fn test_changed_digest_resets_streak() {
        let next = advance(&record("aaa", 7), "bbb");
        assert_eq!(next.match_streak, 0);
        assert_eq!(next.digest, "bbb");
    }

    #[test]
    fn test_empty_prior_never_matches() {
        // An empty digest is "never scanned", not a real fingerprint, so even
        // a nominally equal empty string must not count as a match.
        let next = advance(&record("", 3), "");
        assert_eq!(next.match_streak, 0);
    }

    #[test]
    fn test_processed_flag_carried_over() {
        let prior = FileRecord {
            digest: "aaa".to_string(),
            match_streak: 1,
            processed: true,
        };
        let next = advance(&prior, "bbb");
        assert!(next.processed);
    }
}
