//! Filtering of the merged catalog against the active search options.

use crate::catalog::Lecture;
use crate::state::search::SearchOptions;
use std::collections::HashSet;

/// Returns the lectures satisfying every active filter dimension, in
/// catalog order.
pub fn filter_lectures<'a>(lectures: &'a [Lecture], options: &SearchOptions) -> Vec<&'a Lecture> {
    lectures
        .iter()
        .filter(|lecture| lecture_matches(lecture, options))
        .collect()
}

/// Conjunctive filter predicate for a single lecture.
///
/// Day and time are independently optional but jointly evaluated per slot:
/// when either set is non-empty, some slot must satisfy both active
/// constraints at once.
pub fn lecture_matches(lecture: &Lecture, options: &SearchOptions) -> bool {
    if !options.query.is_empty() {
        let query = options.query.to_lowercase();
        if !lecture.title.to_lowercase().contains(&query)
            && !lecture.id.to_lowercase().contains(&query)
        {
            return false;
        }
    }

    if !options.grades.is_empty() && !options.grades.contains(&lecture.grade) {
        return false;
    }

    if let Some(credits) = options.credits {
        if lecture.credit != credits {
            return false;
        }
    }

    if !options.majors.is_empty() && !options.majors.contains(&lecture.major) {
        return false;
    }

    if options.days.is_empty() && options.times.is_empty() {
        return true;
    }
    lecture.slots.iter().any(|slot| {
        (options.days.is_empty() || options.days.contains(&slot.day))
            && (options.times.is_empty() || options.times.contains(&slot.period))
    })
}

/// Unique majors of the catalog in first-seen order, for the major filter
/// UI.
pub fn distinct_majors(lectures: &[Lecture]) -> Vec<String> {
    let mut seen = HashSet::new();
    lectures
        .iter()
        .filter(|l| seen.insert(l.major.clone()))
        .map(|l| l.major.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TimeSlot;
    use std::collections::BTreeSet;

    fn lecture(id: &str, title: &str, major: &str, credit: u32, grade: u8) -> Lecture {
        Lecture {
            id: id.to_string(),
            title: title.to_string(),
            major: major.to_string(),
            credit,
            grade,
            slots: vec![],
        }
    }

    fn with_slots(mut lecture: Lecture, slots: Vec<(&str, u8)>) -> Lecture {
        lecture.slots = slots
            .into_iter()
            .map(|(day, period)| TimeSlot {
                day: day.to_string(),
                period,
            })
            .collect();
        lecture
    }

    #[test]
    fn test_empty_options_keep_everything_in_order() {
        let catalog = vec![
            lecture("A", "Algorithms", "CS", 3, 1),
            lecture("B", "Writing", "Humanities", 2, 1),
        ];
        let hits = filter_lectures(&catalog, &SearchOptions::default());
        let ids: Vec<_> = hits.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_query_is_case_insensitive_over_title_and_id() {
        let catalog = vec![
            lecture("CS101", "Algorithms", "CS", 3, 1),
            lecture("EE201", "Circuits", "EE", 3, 2),
        ];

        let by_title = SearchOptions {
            query: "ALGO".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_lectures(&catalog, &by_title).len(), 1);

        let by_id = SearchOptions {
            query: "ee2".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_lectures(&catalog, &by_id)[0].id, "EE201");
    }

    #[test]
    fn test_day_and_time_are_jointly_evaluated_per_slot() {
        let catalog = vec![
            with_slots(lecture("A", "Mon third", "CS", 3, 1), vec![("Mon", 3)]),
            with_slots(lecture("B", "Tue third", "CS", 3, 1), vec![("Tue", 3)]),
        ];

        let mon_at_3 = SearchOptions {
            days: BTreeSet::from(["Mon".to_string()]),
            times: BTreeSet::from([3]),
            ..Default::default()
        };
        let hits = filter_lectures(&catalog, &mon_at_3);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "A");

        let mon_at_5 = SearchOptions {
            days: BTreeSet::from(["Mon".to_string()]),
            times: BTreeSet::from([5]),
            ..Default::default()
        };
        assert!(filter_lectures(&catalog, &mon_at_5).is_empty());
    }

    #[test]
    fn test_day_or_time_alone_still_constrains() {
        let catalog = vec![
            with_slots(lecture("A", "Mon", "CS", 3, 1), vec![("Mon", 3)]),
            with_slots(lecture("B", "Tue", "CS", 3, 1), vec![("Tue", 5)]),
        ];

        let any_mon = SearchOptions {
            days: BTreeSet::from(["Mon".to_string()]),
            ..Default::default()
        };
        assert_eq!(filter_lectures(&catalog, &any_mon)[0].id, "A");

        let any_fifth = SearchOptions {
            times: BTreeSet::from([5]),
            ..Default::default()
        };
        assert_eq!(filter_lectures(&catalog, &any_fifth)[0].id, "B");
    }

    #[test]
    fn test_grade_credit_and_major_dimensions() {
        let catalog = vec![
            lecture("A", "a", "CS", 3, 1),
            lecture("B", "b", "CS", 2, 2),
            lecture("C", "c", "EE", 3, 2),
        ];

        let second_years = SearchOptions {
            grades: BTreeSet::from([2]),
            ..Default::default()
        };
        assert_eq!(filter_lectures(&catalog, &second_years).len(), 2);

        let three_credit_cs = SearchOptions {
            majors: BTreeSet::from(["CS".to_string()]),
            credits: Some(3),
            ..Default::default()
        };
        let hits = filter_lectures(&catalog, &three_credit_cs);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "A");
    }

    #[test]
    fn test_distinct_majors_keeps_first_seen_order() {
        let catalog = vec![
            lecture("A", "a", "CS", 3, 1),
            lecture("B", "b", "EE", 3, 1),
            lecture("C", "c", "CS", 3, 1),
            lecture("D", "d", "Humanities", 3, 1),
        ];
        assert_eq!(
            distinct_majors(&catalog),
            vec!["CS".to_string(), "EE".to_string(), "Humanities".to_string()]
        );
    }
}
