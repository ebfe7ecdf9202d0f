//! Coordinates of a single schedule slot.

use std::fmt;

use crate::error::{AppError, Result};

/// Highest zero-based pair index (7th pair).
pub const MAX_PAIR_INDEX: u8 = 6;

/// Highest zero-based day index (Saturday).
pub const MAX_DAY_INDEX: u8 = 5;

/// Immutable coordinates of one (pair, day, week, semester) slot.
///
/// Used as the cross-reference key into a teacher's personal schedule and
/// in diagnostics. Construction validates every component, so a value of
/// this type always points at a cell that can exist in a weekly table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotIdentifier {
    pair_index: u8,
    day_index: u8,
    week_number: u8,
    semester_number: u8,
}

impl SlotIdentifier {
    /// Create a slot identifier.
    ///
    /// `pair_index` is zero-based (0..=6), `day_index` is zero-based
    /// (0 = Monday .. 5 = Saturday), `week_number` and `semester_number`
    /// are one-based (1 or 2).
    pub fn new(pair_index: u8, day_index: u8, week_number: u8, semester_number: u8) -> Result<Self> {
        if pair_index > MAX_PAIR_INDEX {
            return Err(AppError::invalid_slot(format!(
                "pair index {pair_index} is outside 0..={MAX_PAIR_INDEX}"
            )));
        }
        if day_index > MAX_DAY_INDEX {
            return Err(AppError::invalid_slot(format!(
                "day index {day_index} is outside 0..={MAX_DAY_INDEX}"
            )));
        }
        if !matches!(week_number, 1 | 2) {
            return Err(AppError::invalid_slot(format!(
                "week number {week_number} is not 1 or 2"
            )));
        }
        if !matches!(semester_number, 1 | 2) {
            return Err(AppError::invalid_slot(format!(
                "semester number {semester_number} is not 1 or 2"
            )));
        }

        Ok(Self {
            pair_index,
            day_index,
            week_number,
            semester_number,
        })
    }

    pub fn pair_index(&self) -> u8 {
        self.pair_index
    }

    pub fn day_index(&self) -> u8 {
        self.day_index
    }

    pub fn week_number(&self) -> u8 {
        self.week_number
    }

    pub fn semester_number(&self) -> u8 {
        self.semester_number
    }

    /// One-based pair number as shown in the timetable.
    pub fn pair_number(&self) -> u8 {
        self.pair_index + 1
    }
}

impl fmt::Display for SlotIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pair {}, day {}, week {}, semester {}",
            self.pair_index + 1,
            self.day_index + 1,
            self.week_number,
            self.semester_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        let slot = SlotIdentifier::new(0, 4, 2, 1).unwrap();
        assert_eq!(slot.to_string(), "pair 1, day 5, week 2, semester 1");
    }

    #[test]
    fn test_pair_number() {
        let slot = SlotIdentifier::new(5, 0, 1, 1).unwrap();
        assert_eq!(slot.pair_number(), 6);
    }

    #[test]
    fn test_rejects_out_of_range_components() {
        assert!(SlotIdentifier::new(7, 0, 1, 1).is_err());
        assert!(SlotIdentifier::new(0, 6, 1, 1).is_err());
        assert!(SlotIdentifier::new(0, 0, 0, 1).is_err());
        assert!(SlotIdentifier::new(0, 0, 3, 1).is_err());
        assert!(matches!(
            SlotIdentifier::new(0, 0, 1, 3),
            Err(AppError::InvalidSlot(_))
        ));
    }

    #[test]
    fn test_accepts_last_pair_and_saturday() {
        assert!(SlotIdentifier::new(MAX_PAIR_INDEX, MAX_DAY_INDEX, 2, 2).is_ok());
    }
}
