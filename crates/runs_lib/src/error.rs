//! A module containing the [`RunsError`] enum, which covers the error cases of this crate.

use crate::models::RunStatus;

/// Represents any type of error that could happen when using this crate.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[rustfmt::skip]
pub enum RunsError {
    // --------
    // --- Validation errors
    // --------

    /// A time string was empty or could not be parsed.
    ///
    /// This must be surfaced to the submitter; a bad time is never coerced to zero.
    #[error("invalid time format: `{0}`")]
    InvalidTimeFormat(
        /// The offending input, trimmed.
        String,
    ),
    /// A run carried a negative millisecond count.
    #[error("run time is negative: {0} ms")]
    NegativeTime(
        /// The millisecond count.
        i64,
    ),
    /// The submitted player name was empty or whitespace.
    #[error("player name is empty")]
    EmptyPlayerName,

    // --------
    // --- Logical errors
    // --------

    /// The course with the provided id was not found in the catalog.
    #[error("course with id `{0}` not found in catalog")]
    UnknownCourse(
        /// The course id.
        String,
    ),
    /// The star number doesn't exist on the provided course.
    #[error("course `{course}` has no star {star}")]
    UnknownStar {
        /// The course id.
        course: String,
        /// The star number.
        star: u8,
    },
    /// The run with the provided id was not found in the archive.
    #[error("run with id `{0}` not found")]
    RunNotFound(
        /// The run id.
        String,
    ),
    /// The requested status change is not allowed by the moderation lifecycle.
    #[error("run cannot move from `{from}` to `{to}`")]
    InvalidTransition {
        /// The current status.
        from: RunStatus,
        /// The requested status.
        to: RunStatus,
    },
}

/// Represents the result of a computation that could return a [`RunsError`].
pub type RunsResult<T = ()> = Result<T, RunsError>;
