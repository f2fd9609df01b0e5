//! Error types for the state layer.

use thiserror::Error;

/// Errors raised by state-slice operations.
///
/// These are fail-fast conditions: an operation that would violate an
/// invariant leaves the state untouched and emits no change notification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Operation targeted a timetable id that does not exist
    #[error("Unknown timetable: {table_id}")]
    UnknownTable { table_id: String },

    /// Removal would leave the session with no timetable
    #[error("Cannot remove the last remaining timetable")]
    LastTable,

    /// A session was constructed with no timetables at all
    #[error("A session must contain at least one timetable")]
    NoTables,

    /// A schedule entry was inserted with an empty period range
    #[error("Schedule entry range must not be empty")]
    EmptyRange,

    /// A search slice was touched while no search flow is mounted
    #[error("No search flow is mounted")]
    SearchNotMounted,
}

impl StateError {
    /// Returns true if this error is a developer-facing contract violation
    /// (touching a slice outside its owning scope) rather than a bad
    /// user-level request.
    pub fn is_misuse(&self) -> bool {
        matches!(self, StateError::SearchNotMounted)
    }
}
