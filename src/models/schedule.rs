//! Pair, Day and GroupSchedule data structures.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::Lesson;

/// Day names, indexed by zero-based day index.
pub const DAY_NAMES: [&str; 6] = [
    "Понеділок",
    "Вівторок",
    "Середа",
    "Четвер",
    "П'ятниця",
    "Субота",
];

/// Fixed start/end of a pair as (hour, minute).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairTime {
    start: (u32, u32),
    end: (u32, u32),
}

impl PairTime {
    const fn new(start: (u32, u32), end: (u32, u32)) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.start.0, self.start.1, 0).unwrap_or_default()
    }

    pub fn end(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.end.0, self.end.1, 0).unwrap_or_default()
    }
}

/// Pair time ranges, indexed by zero-based pair index.
pub const PAIR_TIMES: [PairTime; 6] = [
    PairTime::new((8, 30), (10, 5)),
    PairTime::new((10, 25), (12, 0)),
    PairTime::new((12, 20), (13, 55)),
    PairTime::new((14, 15), (15, 50)),
    PairTime::new((16, 10), (17, 45)),
    PairTime::new((18, 30), (20, 5)),
];

/// One time slot of a day. No lessons means the slot is free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    /// One-based pair number
    pub pair_number: u8,

    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Pair {
    pub fn new(pair_number: u8, lessons: Vec<Lesson>) -> Self {
        Self {
            pair_number,
            lessons,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Time range of this pair, if it is one of the six fixed pairs.
    pub fn time(&self) -> Option<&'static PairTime> {
        usize::from(self.pair_number)
            .checked_sub(1)
            .and_then(|index| PAIR_TIMES.get(index))
    }
}

/// One day of a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// One-based day number (1 = Monday)
    pub day_number: u8,
    pub day_name: String,
    #[serde(default)]
    pub pairs: Vec<Pair>,
}

impl Day {
    /// Create a day from its zero-based index.
    pub fn new(day_index: usize, pairs: Vec<Pair>) -> Self {
        Self {
            day_number: (day_index + 1) as u8,
            day_name: DAY_NAMES.get(day_index).copied().unwrap_or_default().to_string(),
            pairs,
        }
    }

    /// Six named days without pairs.
    pub fn empty_week() -> Vec<Day> {
        (0..DAY_NAMES.len()).map(|i| Day::new(i, Vec::new())).collect()
    }

    pub fn lesson_count(&self) -> usize {
        self.pairs.iter().map(|p| p.lessons.len()).sum()
    }
}

/// A group's two-week timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSchedule {
    pub first_week: Vec<Day>,
    pub second_week: Vec<Day>,
}

impl Default for GroupSchedule {
    fn default() -> Self {
        Self {
            first_week: Day::empty_week(),
            second_week: Day::empty_week(),
        }
    }
}

impl GroupSchedule {
    pub fn lesson_count(&self) -> usize {
        self.first_week
            .iter()
            .chain(&self.second_week)
            .map(Day::lesson_count)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lesson_count() == 0
    }

    /// SHA-256 hex digest of the canonical JSON form.
    ///
    /// Equal schedules always produce the same fingerprint, so the value can
    /// serve as an insert-if-new key for persisted snapshots.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}
