//! Search-flow state: the dialog target and the filter dimensions.
//!
//! `SearchInfo` lives for the whole session (its presence drives dialog
//! visibility); the filter dimensions live inside a [`SearchScope`] that is
//! built fresh every time the flow opens, so a reopened dialog never carries
//! stale filters.

use super::cell::{Cell, ReadHandle, WriteHandle};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Identifies which timetable (and optionally which cell) triggered the
/// search flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInfo {
    /// Mutation target for selected lectures
    pub table_id: String,
    /// Day of the grid cell that opened the flow, if any
    pub day: Option<String>,
    /// Period of the grid cell that opened the flow, if any
    pub time: Option<u8>,
}

impl SearchInfo {
    /// Search opened from a table's header button: no seed.
    pub fn for_table(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            day: None,
            time: None,
        }
    }

    /// Search opened from a specific grid cell: seeds day and time.
    pub fn for_cell(table_id: impl Into<String>, day: impl Into<String>, time: u8) -> Self {
        Self {
            table_id: table_id.into(),
            day: Some(day.into()),
            time: Some(time),
        }
    }
}

/// The combined filter options consumed by the result view.
///
/// An empty set or unset credits means that dimension imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub query: String,
    pub grades: BTreeSet<u8>,
    pub days: BTreeSet<String>,
    pub times: BTreeSet<u8>,
    pub majors: BTreeSet<String>,
    pub credits: Option<u32>,
}

/// The six filter-dimension cells of one search flow.
///
/// Each dimension is its own cell: a consumer reading only `query` is never
/// invalidated by a `majors` write. All dimensions reset when a new scope is
/// mounted.
#[derive(Debug)]
pub struct SearchScope {
    query: Cell<String>,
    grades: Cell<BTreeSet<u8>>,
    days: Cell<BTreeSet<String>>,
    times: Cell<BTreeSet<u8>>,
    majors: Cell<BTreeSet<String>>,
    credits: Cell<Option<u32>>,
}

impl SearchScope {
    /// All dimensions unconstrained.
    pub fn new() -> Self {
        Self {
            query: Cell::new(String::new()),
            grades: Cell::new(BTreeSet::new()),
            days: Cell::new(BTreeSet::new()),
            times: Cell::new(BTreeSet::new()),
            majors: Cell::new(BTreeSet::new()),
            credits: Cell::new(None),
        }
    }

    /// Fresh scope seeded from the grid cell that opened the flow.
    pub fn seeded(day: Option<&str>, time: Option<u8>) -> Self {
        let scope = Self::new();
        if let Some(day) = day {
            scope.days.writer().set(BTreeSet::from([day.to_string()]));
        }
        if let Some(time) = time {
            scope.times.writer().set(BTreeSet::from([time]));
        }
        scope
    }

    // Query side, one accessor per dimension.

    pub fn query(&self) -> ReadHandle<String> {
        self.query.reader()
    }

    pub fn grades(&self) -> ReadHandle<BTreeSet<u8>> {
        self.grades.reader()
    }

    pub fn days(&self) -> ReadHandle<BTreeSet<String>> {
        self.days.reader()
    }

    pub fn times(&self) -> ReadHandle<BTreeSet<u8>> {
        self.times.reader()
    }

    pub fn majors(&self) -> ReadHandle<BTreeSet<String>> {
        self.majors.reader()
    }

    pub fn credits(&self) -> ReadHandle<Option<u32>> {
        self.credits.reader()
    }

    // Command side.

    pub fn query_writer(&self) -> WriteHandle<String> {
        self.query.writer()
    }

    pub fn grades_writer(&self) -> WriteHandle<BTreeSet<u8>> {
        self.grades.writer()
    }

    pub fn days_writer(&self) -> WriteHandle<BTreeSet<String>> {
        self.days.writer()
    }

    pub fn times_writer(&self) -> WriteHandle<BTreeSet<u8>> {
        self.times.writer()
    }

    pub fn majors_writer(&self) -> WriteHandle<BTreeSet<String>> {
        self.majors.writer()
    }

    pub fn credits_writer(&self) -> WriteHandle<Option<u32>> {
        self.credits.writer()
    }

    /// Derived read-only combination of all six dimensions.
    pub fn options(&self) -> OptionsSnapshot {
        OptionsSnapshot {
            query: self.query.reader(),
            grades: self.grades.reader(),
            days: self.days.reader(),
            times: self.times.reader(),
            majors: self.majors.reader(),
            credits: self.credits.reader(),
            cached: None,
        }
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Combined view over the six dimensions, recomputed only when a
/// constituent changed.
///
/// Consecutive [`current`](OptionsSnapshot::current) calls with no
/// intervening write return the same `Arc` (`Arc::ptr_eq` holds), so a
/// result view can use pointer identity to skip recomputation.
pub struct OptionsSnapshot {
    query: ReadHandle<String>,
    grades: ReadHandle<BTreeSet<u8>>,
    days: ReadHandle<BTreeSet<String>>,
    times: ReadHandle<BTreeSet<u8>>,
    majors: ReadHandle<BTreeSet<String>>,
    credits: ReadHandle<Option<u32>>,
    cached: Option<Arc<SearchOptions>>,
}

impl OptionsSnapshot {
    /// Returns the current combination, rebuilding only if some dimension
    /// was written since the last call.
    pub fn current(&mut self) -> Arc<SearchOptions> {
        let needs_rebuild = match &self.cached {
            None => true,
            Some(_) => self.any_dimension_changed(),
        };
        if !needs_rebuild {
            if let Some(snapshot) = &self.cached {
                return Arc::clone(snapshot);
            }
        }

        let snapshot = Arc::new(SearchOptions {
            query: self.query.latest(),
            grades: self.grades.latest(),
            days: self.days.latest(),
            times: self.times.latest(),
            majors: self.majors.latest(),
            credits: self.credits.latest(),
        });
        self.cached = Some(Arc::clone(&snapshot));
        snapshot
    }

    fn any_dimension_changed(&self) -> bool {
        self.query.is_stale()
            || self.grades.is_stale()
            || self.days.is_stale()
            || self.times.is_stale()
            || self.majors.is_stale()
            || self.credits.is_stale()
    }
}
