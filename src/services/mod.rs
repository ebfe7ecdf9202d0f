//! Service layer for the schedule parser.
//!
//! This module contains the business logic for:
//! - Page markup conventions (`markup`)
//! - Cell field extraction (`extract_cell`, `extract_lesson_infos`)
//! - Teacher schedule lookups (`TeacherScheduleResolver`)
//! - Cardinality reconciliation (`Reconciler`)
//! - Pair and week assembly (`PairParser`, `ScheduleParser`)
//! - Page fetching (`RozkladClient`)

mod cell;
mod lesson_info;
pub mod markup;
mod pair_parser;
mod reconciler;
mod rozklad;
mod schedule_parser;
mod teacher_schedule;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cell::{CellFields, extract_cell};
pub use lesson_info::{extract_lesson_infos, parse_fragment, split_fragments};
pub use pair_parser::PairParser;
pub use reconciler::{InfoPolicy, ReconciledLesson, Reconciler, TeacherPolicy};
pub use rozklad::RozkladClient;
pub use schedule_parser::{ParseOutcome, ScheduleParser, TableShapeIssue};
pub use teacher_schedule::{
    TeacherLookup, TeacherPageSource, TeacherScheduleResolver, parse_teacher_pair,
};
