//! Orchestration layer: composes the timetable store, the search flow and
//! the catalog loader into one application session.
//!
//! The session owns every state slice and injects handles downward; nothing
//! here is a process-global. The schedule map and the search-info cell live
//! as long as the session, the filter dimensions only as long as one open
//! search flow.

use crate::catalog::{CatalogError, CatalogLoader, Lecture};
use crate::state::cell::{Cell, ReadHandle, WriteHandle};
use crate::state::error::StateError;
use crate::state::schedule::{ScheduleEntry, ScheduleStore, SchedulesMap};
use crate::state::search::{SearchInfo, SearchScope};
use std::sync::Arc;
use tracing::{debug, info};

/// One user session: a set of timetables, at most one open search flow, and
/// the session-wide catalog.
pub struct Session {
    schedules: ScheduleStore,
    search_info: Cell<Option<SearchInfo>>,
    search_info_writer: WriteHandle<Option<SearchInfo>>,
    scope: Option<SearchScope>,
    loader: CatalogLoader,
}

impl Session {
    /// Creates a session with one empty timetable.
    pub fn new(loader: CatalogLoader) -> Self {
        Self::with_store(ScheduleStore::new(), loader)
    }

    /// Creates a session from existing tables.
    pub fn with_tables(tables: SchedulesMap, loader: CatalogLoader) -> Result<Self, StateError> {
        Ok(Self::with_store(ScheduleStore::with_tables(tables)?, loader))
    }

    fn with_store(schedules: ScheduleStore, loader: CatalogLoader) -> Self {
        let search_info = Cell::new(None);
        let search_info_writer = search_info.writer();
        Self {
            schedules,
            search_info,
            search_info_writer,
            scope: None,
            loader,
        }
    }

    /// The timetable collection: Query side plus mutation operations.
    pub fn schedules(&self) -> &ScheduleStore {
        &self.schedules
    }

    /// Query side of the search-info slice. `Some` means the dialog is
    /// open; consumers of this handle are never notified by schedule
    /// writes.
    pub fn search_info(&self) -> ReadHandle<Option<SearchInfo>> {
        self.search_info.reader()
    }

    /// Snapshot of the current search target, if a flow is open.
    pub fn current_search(&self) -> Option<SearchInfo> {
        self.search_info.get()
    }

    /// Opens the search flow for `info.table_id`.
    ///
    /// A fresh filter scope is mounted every time, seeded with the grid
    /// cell's day/time when given; filters from a previous flow never leak
    /// in.
    pub fn open_search(&mut self, info: SearchInfo) {
        debug!(table = %info.table_id, day = ?info.day, time = ?info.time, "opening search flow");
        self.scope = Some(SearchScope::seeded(info.day.as_deref(), info.time));
        self.search_info_writer.set(Some(info));
    }

    /// Closes the search flow and drops its filter scope.
    ///
    /// A catalog fetch still in flight is unaffected; its shared handle is
    /// retained by the loader and simply resolves unobserved.
    pub fn close_search(&mut self) {
        self.search_info_writer.set(None);
        self.scope = None;
    }

    /// The mounted filter scope.
    ///
    /// # Returns
    /// * `Err(StateError::SearchNotMounted)` - If no search flow is open;
    ///   touching the filter slices outside their flow is a contract
    ///   violation, never a silent default
    pub fn search(&self) -> Result<&SearchScope, StateError> {
        self.scope.as_ref().ok_or(StateError::SearchNotMounted)
    }

    /// Places a lecture chosen in the result view into the targeted table.
    pub fn add_selected_lecture(&self, lecture: &Lecture) -> Result<(), StateError> {
        let Some(target) = self.search_info.get() else {
            return Err(StateError::SearchNotMounted);
        };
        let entries = ScheduleEntry::for_lecture(lecture);
        self.schedules.add_entries(&target.table_id, entries)?;
        info!(table = %target.table_id, lecture = %lecture.id, "placed lecture");
        Ok(())
    }

    /// The merged lecture catalog, fetched at most once per session.
    pub async fn lectures(&self) -> Result<Arc<Vec<Lecture>>, CatalogError> {
        self.loader.all_lectures().await
    }

    /// True while removal must be disabled in the UI.
    pub fn remove_disabled(&self) -> bool {
        self.schedules.table_count() == 1
    }
}
