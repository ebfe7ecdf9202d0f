//! Teacher data structures.

use serde::{Deserialize, Serialize};

use crate::models::{LessonInfo, LessonType};

/// A teacher referenced from a schedule cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Teacher {
    /// Link text, e.g. "доц. Петренко П. П."
    pub short_name: String,

    /// Link title with the full name
    pub full_name: String,

    /// Opaque reference to the teacher's personal schedule page
    pub schedule_ref: String,
}

impl Teacher {
    pub fn new(
        short_name: impl Into<String>,
        full_name: impl Into<String>,
        schedule_ref: impl Into<String>,
    ) -> Self {
        Self {
            short_name: short_name.into(),
            full_name: full_name.into(),
            schedule_ref: schedule_ref.into(),
        }
    }
}

/// The single lesson a teacher holds in one slot, read from their own schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherPair {
    pub teacher: Teacher,
    pub subject_name: String,
    pub subject_full_name: Option<String>,
    pub room: String,
    pub lesson_type: LessonType,
    pub is_online: bool,

    /// Always empty: group names are not read from teacher pages
    pub groups: Vec<String>,
}

impl TeacherPair {
    /// This teacher's own room/type/online data for the slot.
    pub fn lesson_info(&self) -> LessonInfo {
        let room_numbers = if self.room.is_empty() {
            Vec::new()
        } else {
            vec![self.room.clone()]
        };

        LessonInfo {
            room_numbers,
            lesson_type: self.lesson_type.as_str().to_string(),
            is_online: self.is_online,
        }
    }
}
