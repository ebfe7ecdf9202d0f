//! Pipeline entry points for schedule operations.
//!
//! - `run_group`: Fetch and parse a group's schedule page
//! - `run_file`: Parse a saved group schedule page
//! - `run_teacher`: Resolve one teacher's lesson in a slot

pub mod parse;
pub mod teacher;

pub use parse::{ParseReport, ParseSummary, build_schedule_parser, run_file, run_group, write_output};
pub use teacher::run_teacher;
