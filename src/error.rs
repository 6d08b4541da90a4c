//! Error types surfaced by the buffer core

use crate::constants::search::{MAX_BACK_REF_OCCURRENCES, MAX_CAPTURE_GROUP_NUM};
use thiserror::Error;

/// The recoverable failures the core can report. Everything else
/// (point out of range, zero capacity) is a programmer error and is
/// enforced with assertions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Memory could not be allocated. The operation that failed left the
    /// buffer in its prior state.
    #[error("out of memory")]
    OutOfMemory,

    /// Pattern failed to compile. The message includes the engine's
    /// description of the failure and its position.
    #[error("invalid regex - {message}")]
    InvalidRegex { message: String },

    /// The regex engine reported a failure other than "no match".
    #[error("regex execution failed: {message}")]
    RegexExecutionFailed { message: String },

    /// Replacement text referenced a group beyond what the capture
    /// vector can hold.
    #[error(
        "backreference \\{group} in replace text exceeds maximum \
         capture group number \\{}",
        MAX_CAPTURE_GROUP_NUM
    )]
    TooManyCaptureGroups { group: usize },

    /// Replacement text contained more backreferences than can be
    /// recorded.
    #[error(
        "number of backreferences in replace text exceeds maximum \
         number of backreferences {} that can occur",
        MAX_BACK_REF_OCCURRENCES
    )]
    TooManyBackReferences,

    /// Replacement text referenced a group the current match did not
    /// capture.
    #[error(
        "backreference \\{group} in replace text is greater than the \
         number of groups captured {captured}"
    )]
    InvalidCaptureGroupBackReference { group: usize, captured: usize },
}

/// Result alias for buffer core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fallible copy of a byte slice into an owned buffer. Allocation failure
/// is reported instead of aborting.
pub(crate) fn try_to_vec(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(bytes.len())
        .map_err(|_| Error::OutOfMemory)?;
    vec.extend_from_slice(bytes);
    Ok(vec)
}
