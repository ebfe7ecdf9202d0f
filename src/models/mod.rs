// src/models/mod.rs

//! Domain models for the schedule parser.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod lesson;
mod schedule;
mod slot;
mod teacher;

// Re-export all public types
pub use config::{ClientConfig, Config, ParserConfig, RetryConfig};
pub(crate) use lesson::distinct_full_name;
pub use lesson::{Lesson, LessonInfo, LessonType, Subject};
pub use schedule::{DAY_NAMES, Day, GroupSchedule, PAIR_TIMES, Pair, PairTime};
pub use slot::{MAX_DAY_INDEX, MAX_PAIR_INDEX, SlotIdentifier};
pub use teacher::{Teacher, TeacherPair};
