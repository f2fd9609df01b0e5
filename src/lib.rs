//! Reactive state core for building and comparing weekly course timetables.
//!
//! The crate is the headless heart of a timetable-builder UI: a set of
//! read/write-split state slices (timetable map, search target, filter
//! dimensions), a single-flight catalog loader, and the filter pipeline that
//! turns the merged catalog plus the active options into result rows.
//! Rendering, drag-and-drop and dialog chrome are external collaborators
//! that consume the handles exposed here.

pub mod catalog;
pub mod filter;
pub mod session;
pub mod state;

pub use catalog::{CatalogClient, CatalogConfig, CatalogError, CatalogLoader, Lecture, TimeSlot};
pub use filter::{distinct_majors, filter_lectures};
pub use session::Session;
pub use state::{
    ScheduleEntry, ScheduleStore, SchedulesMap, SearchInfo, SearchOptions, SearchScope,
    StateError, TableId,
};
