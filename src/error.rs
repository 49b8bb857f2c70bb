//! Error types for distribution merging.
//!
//! [`MergeError`] is the single error type returned by the merge engine and
//! its drivers. It uses rich enum variants so callers can match on specific
//! failure modes (integrity violation vs. codec vs. I/O) without parsing
//! error messages.
//!
//! There is no retry anywhere: every detected inconsistency is a programming
//! or data invariant, not a transient condition. A run either completes the
//! whole distribution or aborts on the first fatal error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by merge operations.
#[derive(Debug, Error)]
pub enum MergeError {
    /// An internal invariant of the merge algorithm failed.
    ///
    /// This is fatal for the class being merged and for the run: it signals
    /// either malformed input (duplicate identity keys within one member
    /// sequence) or a defect in the alignment walk. A partially-merged class
    /// is never emitted.
    #[error("merged member list for `{class}` is in a bad state: {detail}")]
    IntegrityViolation {
        /// Internal name of the class whose merge failed.
        class: String,
        /// What went wrong (duplicate key, misaligned common subsequence,
        /// length mismatch, ...).
        detail: String,
    },

    /// A class payload could not be decoded or re-encoded by the codec
    /// collaborator. Propagated unchanged; aborts the run.
    #[error("codec error for entry `{entry}`: {detail}")]
    Codec {
        /// Archive entry name the codec was working on.
        entry: String,
        /// Codec-provided description of the failure.
        detail: String,
    },

    /// A configuration file could not be loaded or parsed.
    #[error("configuration error in '{}': {detail}", path.display())]
    Config {
        /// Path to the configuration file.
        path: PathBuf,
        /// Human-readable description of the problem.
        detail: String,
    },

    /// An archive read or write failed. Propagated unchanged; aborts the run.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MergeError {
    /// Shorthand for an [`MergeError::IntegrityViolation`].
    pub fn integrity(class: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::IntegrityViolation {
            class: class.into(),
            detail: detail.into(),
        }
    }

    /// Shorthand for a [`MergeError::Codec`] error.
    pub fn codec(entry: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Codec {
            entry: entry.into(),
            detail: detail.into(),
        }
    }

    /// Returns `true` if this error is a merge-invariant violation.
    #[must_use]
    pub const fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::IntegrityViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_message_names_the_class() {
        let err = MergeError::integrity("net/example/Foo", "length mismatch 3 != 4");
        assert_eq!(
            err.to_string(),
            "merged member list for `net/example/Foo` is in a bad state: length mismatch 3 != 4"
        );
        assert!(err.is_integrity_violation());
    }

    #[test]
    fn io_error_converts() {
        let err: MergeError = std::io::Error::other("disk gone").into();
        assert!(!err.is_integrity_violation());
        assert!(err.to_string().contains("disk gone"));
    }
}
