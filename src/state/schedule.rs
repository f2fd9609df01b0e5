//! The timetable map and its mutation operations.
//!
//! `ScheduleStore` is the primary mutable domain state: one cell holding the
//! whole table map. Every operation validates against the current map,
//! builds a replacement, and swaps it in atomically — observers never see a
//! partially mutated structure, and a rejected operation produces no change
//! notification at all.

use super::cell::{Cell, ReadHandle, WriteHandle};
use super::error::StateError;
use crate::catalog::Lecture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Identifier of one timetable.
pub type TableId = String;

/// Timetable id → entries placed in that table.
pub type SchedulesMap = BTreeMap<TableId, Vec<ScheduleEntry>>;

/// A lecture placed into a specific table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub lecture: Lecture,
    /// Day the entry sits on
    pub day: String,
    /// Contiguous periods the entry occupies, ascending. Never empty.
    pub range: Vec<u8>,
}

impl ScheduleEntry {
    /// Converts a lecture's time slots into placement entries.
    ///
    /// Slots are grouped by day (first-seen day order); each day's periods
    /// are sorted, deduplicated and split into maximal contiguous runs, one
    /// entry per run.
    pub fn for_lecture(lecture: &Lecture) -> Vec<ScheduleEntry> {
        let mut days: Vec<(String, Vec<u8>)> = Vec::new();
        for slot in &lecture.slots {
            match days.iter_mut().find(|(day, _)| *day == slot.day) {
                Some((_, periods)) => periods.push(slot.period),
                None => days.push((slot.day.clone(), vec![slot.period])),
            }
        }

        let mut entries = Vec::new();
        for (day, mut periods) in days {
            periods.sort_unstable();
            periods.dedup();
            for range in contiguous_runs(&periods) {
                entries.push(ScheduleEntry {
                    lecture: lecture.clone(),
                    day: day.clone(),
                    range,
                });
            }
        }
        entries
    }

    /// Returns true if the entry sits on `day` and its range contains
    /// `period`.
    pub fn covers(&self, day: &str, period: u8) -> bool {
        self.day == day && self.range.contains(&period)
    }
}

/// Splits sorted, deduplicated periods into maximal contiguous runs.
fn contiguous_runs(periods: &[u8]) -> Vec<Vec<u8>> {
    let mut runs: Vec<Vec<u8>> = Vec::new();
    for &period in periods {
        match runs.last_mut() {
            Some(run) if run.last().is_some_and(|&last| period == last + 1) => run.push(period),
            _ => runs.push(vec![period]),
        }
    }
    runs
}

/// The session's timetable collection.
///
/// Invariants enforced here: keys are unique (map semantics), at least one
/// table exists at all times, and duplication always lands on a fresh key.
pub struct ScheduleStore {
    cell: Cell<SchedulesMap>,
    writer: WriteHandle<SchedulesMap>,
    next_id: AtomicU64,
}

impl ScheduleStore {
    /// Creates a store seeded with one empty timetable.
    pub fn new() -> Self {
        let mut map = SchedulesMap::new();
        map.insert("schedule-1".to_string(), Vec::new());
        let cell = Cell::new(map);
        let writer = cell.writer();
        Self {
            cell,
            writer,
            next_id: AtomicU64::new(2),
        }
    }

    /// Creates a store from existing tables.
    ///
    /// # Returns
    /// * `Err(StateError::NoTables)` - If `tables` is empty; a session must
    ///   always hold at least one timetable
    pub fn with_tables(tables: SchedulesMap) -> Result<Self, StateError> {
        if tables.is_empty() {
            return Err(StateError::NoTables);
        }
        let cell = Cell::new(tables);
        let writer = cell.writer();
        Ok(Self {
            cell,
            writer,
            next_id: AtomicU64::new(1),
        })
    }

    /// Query side of the table map.
    pub fn reader(&self) -> ReadHandle<SchedulesMap> {
        self.cell.reader()
    }

    /// Clones the current table map.
    pub fn tables(&self) -> SchedulesMap {
        self.cell.get()
    }

    /// Number of timetables currently held.
    ///
    /// The UI disables the remove action while this is 1.
    pub fn table_count(&self) -> usize {
        self.cell.read(|map| map.len())
    }

    /// Appends entries to a table.
    ///
    /// Overlap with entries already in the table is not checked; collision
    /// handling belongs to the drag-and-drop layer.
    pub fn add_entries(
        &self,
        table_id: &str,
        entries: Vec<ScheduleEntry>,
    ) -> Result<(), StateError> {
        if entries.iter().any(|e| e.range.is_empty()) {
            return Err(StateError::EmptyRange);
        }

        let added = entries.len();
        self.writer.try_update(|map| {
            if !map.contains_key(table_id) {
                return Err(StateError::UnknownTable {
                    table_id: table_id.to_string(),
                });
            }
            let mut next = map.clone();
            if let Some(list) = next.get_mut(table_id) {
                list.extend(entries);
            }
            Ok(next)
        })?;

        debug!(table = table_id, added, "appended schedule entries");
        Ok(())
    }

    /// Duplicates a table under a fresh id.
    ///
    /// The new table's entry list is a value copy taken at this moment;
    /// later mutation of either table does not affect the other.
    pub fn duplicate(&self, table_id: &str) -> Result<TableId, StateError> {
        let mut assigned = None;
        self.writer.try_update(|map| {
            let Some(entries) = map.get(table_id) else {
                return Err(StateError::UnknownTable {
                    table_id: table_id.to_string(),
                });
            };
            let new_id = self.next_table_id(map);
            let mut next = map.clone();
            next.insert(new_id.clone(), entries.clone());
            assigned = Some(new_id);
            Ok(next)
        })?;

        let new_id = assigned.ok_or(StateError::UnknownTable {
            table_id: table_id.to_string(),
        })?;
        debug!(source = table_id, new = %new_id, "duplicated timetable");
        Ok(new_id)
    }

    /// Removes a table.
    ///
    /// # Returns
    /// * `Err(StateError::LastTable)` - If this is the sole remaining table
    /// * `Err(StateError::UnknownTable)` - If the id does not exist
    pub fn remove(&self, table_id: &str) -> Result<(), StateError> {
        self.writer.try_update(|map| {
            if !map.contains_key(table_id) {
                return Err(StateError::UnknownTable {
                    table_id: table_id.to_string(),
                });
            }
            if map.len() == 1 {
                return Err(StateError::LastTable);
            }
            let mut next = map.clone();
            next.remove(table_id);
            Ok(next)
        })?;

        debug!(table = table_id, "removed timetable");
        Ok(())
    }

    /// Removes every entry of `table_id` sitting on `day` whose range
    /// contains `period`.
    ///
    /// Several entries can go at once if more than one range contains the
    /// period. Zero matches is a no-op: the map is untouched and readers see
    /// no notification.
    pub fn delete_entry(&self, table_id: &str, day: &str, period: u8) -> Result<(), StateError> {
        let any_match = self.cell.read(|map| match map.get(table_id) {
            None => Err(StateError::UnknownTable {
                table_id: table_id.to_string(),
            }),
            Some(entries) => Ok(entries.iter().any(|e| e.covers(day, period))),
        })?;
        if !any_match {
            return Ok(());
        }

        self.writer.try_update(|map| {
            let Some(entries) = map.get(table_id) else {
                return Err(StateError::UnknownTable {
                    table_id: table_id.to_string(),
                });
            };
            let kept: Vec<ScheduleEntry> = entries
                .iter()
                .filter(|e| !e.covers(day, period))
                .cloned()
                .collect();
            let mut next = map.clone();
            next.insert(table_id.to_string(), kept);
            Ok(next)
        })?;

        debug!(table = table_id, day, period, "deleted schedule entries");
        Ok(())
    }

    /// Produces a table id that is not a key of `map`.
    ///
    /// Monotonic counter with an occupancy check: ids never collide with
    /// existing keys, no matter what the map was seeded with.
    fn next_table_id(&self, map: &SchedulesMap) -> TableId {
        loop {
            let n = self.next_id.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("schedule-{n}");
            if !map.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TimeSlot;

    fn lecture(id: &str, slots: Vec<(&str, u8)>) -> Lecture {
        Lecture {
            id: id.to_string(),
            title: format!("Lecture {id}"),
            major: "CS".to_string(),
            credit: 3,
            grade: 1,
            slots: slots
                .into_iter()
                .map(|(day, period)| TimeSlot {
                    day: day.to_string(),
                    period,
                })
                .collect(),
        }
    }

    fn entry(id: &str, day: &str, range: Vec<u8>) -> ScheduleEntry {
        ScheduleEntry {
            lecture: lecture(id, vec![]),
            day: day.to_string(),
            range,
        }
    }

    #[test]
    fn test_for_lecture_groups_and_splits_runs() {
        let l = lecture(
            "CS101",
            vec![("Mon", 2), ("Mon", 1), ("Mon", 5), ("Wed", 3), ("Mon", 2)],
        );
        let entries = ScheduleEntry::for_lecture(&l);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].day, "Mon");
        assert_eq!(entries[0].range, vec![1, 2]);
        assert_eq!(entries[1].day, "Mon");
        assert_eq!(entries[1].range, vec![5]);
        assert_eq!(entries[2].day, "Wed");
        assert_eq!(entries[2].range, vec![3]);
    }

    #[test]
    fn test_add_requires_existing_table_and_nonempty_range() {
        let store = ScheduleStore::new();

        let err = store
            .add_entries("nope", vec![entry("A", "Mon", vec![1])])
            .unwrap_err();
        assert_eq!(
            err,
            StateError::UnknownTable {
                table_id: "nope".to_string()
            }
        );

        let err = store
            .add_entries("schedule-1", vec![entry("A", "Mon", vec![])])
            .unwrap_err();
        assert_eq!(err, StateError::EmptyRange);

        store
            .add_entries("schedule-1", vec![entry("A", "Mon", vec![1, 2])])
            .unwrap();
        assert_eq!(store.tables()["schedule-1"].len(), 1);
    }

    #[test]
    fn test_duplicate_is_a_value_copy() {
        let store = ScheduleStore::new();
        store
            .add_entries(
                "schedule-1",
                vec![entry("A", "Mon", vec![1, 2]), entry("B", "Tue", vec![3])],
            )
            .unwrap();

        let copy_id = store.duplicate("schedule-1").unwrap();
        assert_eq!(
            store.tables()[&copy_id],
            store.tables()["schedule-1"]
        );

        // Mutating the original leaves the copy untouched, and vice versa
        store.delete_entry("schedule-1", "Mon", 1).unwrap();
        assert_eq!(store.tables()["schedule-1"].len(), 1);
        assert_eq!(store.tables()[&copy_id].len(), 2);

        store
            .add_entries(&copy_id, vec![entry("C", "Fri", vec![6])])
            .unwrap();
        assert_eq!(store.tables()["schedule-1"].len(), 1);
        assert_eq!(store.tables()[&copy_id].len(), 3);
    }

    #[test]
    fn test_duplicate_skips_occupied_ids() {
        let mut seeded = SchedulesMap::new();
        seeded.insert("schedule-1".to_string(), vec![entry("A", "Mon", vec![1])]);
        seeded.insert("schedule-2".to_string(), Vec::new());
        let store = ScheduleStore::with_tables(seeded).unwrap();

        // Counter candidates 1 and 2 are taken; nothing may be overwritten
        let id = store.duplicate("schedule-1").unwrap();
        assert_eq!(id, "schedule-3");
        assert_eq!(store.table_count(), 3);
        assert!(store.tables()["schedule-2"].is_empty());
    }

    #[test]
    fn test_remove_never_deletes_the_last_table() {
        let store = ScheduleStore::new();
        let copy_id = store.duplicate("schedule-1").unwrap();

        store.remove("schedule-1").unwrap();
        assert_eq!(store.table_count(), 1);

        let err = store.remove(&copy_id).unwrap_err();
        assert_eq!(err, StateError::LastTable);
        assert_eq!(store.table_count(), 1);
    }

    #[test]
    fn test_failed_remove_emits_no_notification() {
        let store = ScheduleStore::new();
        let mut reader = store.reader();
        reader.latest();

        assert!(store.remove("schedule-1").is_err());
        assert!(!reader.is_stale());
    }

    #[test]
    fn test_delete_entry_matches_day_and_period_exactly() {
        let store = ScheduleStore::new();
        store
            .add_entries(
                "schedule-1",
                vec![
                    entry("A", "Mon", vec![1, 2, 3]),
                    entry("B", "Mon", vec![3, 4]),
                    entry("C", "Mon", vec![7, 8]),
                    entry("D", "Tue", vec![3]),
                ],
            )
            .unwrap();

        // Period 3 on Mon hits two overlapping entries, nothing else
        store.delete_entry("schedule-1", "Mon", 3).unwrap();

        let remaining = &store.tables()["schedule-1"];
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0].lecture.id, "C");
        assert_eq!(remaining[0].day, "Mon");
        assert_eq!(remaining[1].day, "Tue");
    }

    #[test]
    fn test_delete_entry_zero_matches_is_a_silent_noop() {
        let store = ScheduleStore::new();
        store
            .add_entries("schedule-1", vec![entry("A", "Mon", vec![1])])
            .unwrap();

        let mut reader = store.reader();
        reader.latest();

        store.delete_entry("schedule-1", "Mon", 9).unwrap();
        assert_eq!(store.tables()["schedule-1"].len(), 1);
        assert!(!reader.is_stale());

        let err = store.delete_entry("ghost", "Mon", 1).unwrap_err();
        assert_eq!(
            err,
            StateError::UnknownTable {
                table_id: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_keys_stay_unique_and_map_nonempty() {
        let store = ScheduleStore::new();
        let mut ids = vec!["schedule-1".to_string()];
        for _ in 0..5 {
            ids.push(store.duplicate(&ids[0]).unwrap());
        }

        let tables = store.tables();
        assert_eq!(tables.len(), ids.len());
        for id in &ids[1..5] {
            store.remove(id).unwrap();
        }
        assert_eq!(store.table_count(), 2);
    }
}
