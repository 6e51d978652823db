//! Crate-wide error type.
//!
//! Errors are split along the same line §7 of the design draws: configuration
//! faults are programmer errors and always become an `Err`, while ordinary
//! search non-convergence and per-session starvation are not represented here
//! at all — they show up as an imperfect (but valid) [`crate::model::BlockSchedule`].

use thiserror::Error;

/// Fatal configuration faults surfaced by the session generator and the
/// constructive enrollers.
///
/// These are never the result of an unlucky random draw; they mean the block
/// definition itself is contradictory (mismatched overflow/master frequency)
/// or that a caller invoked an enroller on an activity band it doesn't apply
/// to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// An `OverflowFrom` activity's frequency does not equal its master's.
    #[error(
        "overflow activity '{overflow}' has a frequency that does not match its master activity '{master}'"
    )]
    FrequencyMismatch { overflow: String, master: String },

    /// A constructive enroller (random, ordered, ordered-session) was invoked
    /// on an activity that is mandatory or overflow rather than unordered.
    #[error(
        "activity '{0}' cannot be scheduled by a constructive enroller: it is mandatory or overflow, not unordered"
    )]
    NotUnordered(String),

    /// A repair step attempted to remove a student from a `GroupsEnrollment`.
    ///
    /// The current crossover and mutation operators never produce this
    /// situation (mandatory sessions are always regenerated wholesale, never
    /// patched), but the fix-up step checks for it defensively and reports it
    /// as a configuration fault rather than silently dropping the student.
    #[error("cannot remove a student from the GroupsEnrollment of activity '{0}'")]
    IllegalGroupsEnrollmentEdit(String),

    /// An `OverflowFrom` activity references a master activity name that does
    /// not exist in the block.
    #[error("activity '{0}' references an unknown master activity '{1}'")]
    UnknownMaster(String, String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SchedulerError>;
