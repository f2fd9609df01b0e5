/// Wire types for lecture catalog data
use serde::{Deserialize, Serialize};

/// A single occupied period in the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day label as delivered by the catalog (e.g. "Mon", "월")
    pub day: String,
    /// 1-based period index within the day
    pub period: u8,
}

/// A lecture as delivered by the catalog endpoints.
///
/// Immutable, externally supplied. Both partitions (majors and liberal arts)
/// return a JSON array of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecture {
    #[serde(rename = "identifier")]
    pub id: String,
    pub title: String,
    pub major: String,
    pub credit: u32,
    pub grade: u8,
    /// Periods this lecture occupies, one slot per (day, period) pair
    pub slots: Vec<TimeSlot>,
}

impl Lecture {
    /// Returns true if the lecture occupies the given day/period.
    pub fn occupies(&self, day: &str, period: u8) -> bool {
        self.slots.iter().any(|s| s.day == day && s.period == period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lecture_wire_shape() {
        let raw = r#"{
            "identifier": "CS101-01",
            "title": "Introduction to Algorithms",
            "major": "Computer Science",
            "credit": 3,
            "grade": 1,
            "slots": [{"day": "Mon", "period": 3}, {"day": "Wed", "period": 3}]
        }"#;

        let lecture: Lecture = serde_json::from_str(raw).unwrap();
        assert_eq!(lecture.id, "CS101-01");
        assert_eq!(lecture.credit, 3);
        assert_eq!(lecture.slots.len(), 2);
        assert!(lecture.occupies("Mon", 3));
        assert!(!lecture.occupies("Mon", 4));
    }
}
