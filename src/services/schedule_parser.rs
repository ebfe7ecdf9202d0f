//! Group schedule page parsing.
//!
//! A group page carries one table per week parity. Each daytime table has a
//! header row of day names, a header column of pair times, six day columns
//! and six or seven pair rows.

use scraper::{ElementRef, Html};
use serde::Serialize;

use crate::error::Result;
use crate::models::{DAY_NAMES, Day, GroupSchedule, SlotIdentifier};
use crate::services::cell::{CellFields, extract_cell};
use crate::services::markup::{find_week_table, row_cells, table_rows, week_table_id};
use crate::services::pair_parser::PairParser;

/// Accepted row counts: the header row plus six or seven pairs.
const DAYTIME_ROWS: [usize; 2] = [7, 8];

/// Accepted column count: the header column plus six days.
const DAYTIME_COLUMNS: usize = 7;

/// A week table that is missing or does not look like a daytime schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableShapeIssue {
    pub week_number: u8,
    pub rows: usize,
    pub columns: usize,
}

/// Parsed schedule plus the weeks that had to be left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub schedule: GroupSchedule,
    pub shape_issues: Vec<TableShapeIssue>,
}

/// Cells of one week, indexed `[day][pair]`.
type WeekCells = Vec<Vec<(SlotIdentifier, CellFields)>>;

/// Parses whole group schedule pages into a `GroupSchedule`.
pub struct ScheduleParser {
    pair_parser: PairParser,
    semester: u8,
}

impl ScheduleParser {
    pub fn new(pair_parser: PairParser, semester: u8) -> Self {
        Self {
            pair_parser,
            semester,
        }
    }

    /// Parse a group schedule page.
    ///
    /// A week whose table is missing or mis-shaped is returned as six empty
    /// days and reported in [`ParseOutcome::shape_issues`].
    pub async fn parse(&self, page: &str) -> Result<ParseOutcome> {
        // The document is not Send; every cell is extracted before the
        // first teacher lookup is awaited.
        let weeks = {
            let document = Html::parse_document(page);
            [
                extract_week(&document, 1, self.semester)?,
                extract_week(&document, 2, self.semester)?,
            ]
        };

        let mut schedule = GroupSchedule::default();
        let mut shape_issues = Vec::new();

        for (index, week) in weeks.into_iter().enumerate() {
            let days = match week {
                Ok(cells) => self.assemble_week(cells).await,
                Err(issue) => {
                    log::warn!(
                        "Unexpected schedule table {}: {} rows, {} columns",
                        week_table_id(issue.week_number),
                        issue.rows,
                        issue.columns
                    );
                    shape_issues.push(issue);
                    Day::empty_week()
                }
            };

            if index == 0 {
                schedule.first_week = days;
            } else {
                schedule.second_week = days;
            }
        }

        Ok(ParseOutcome {
            schedule,
            shape_issues,
        })
    }

    async fn assemble_week(&self, cells: WeekCells) -> Vec<Day> {
        let mut days = Vec::with_capacity(cells.len());
        for (day_index, day_cells) in cells.into_iter().enumerate() {
            let mut pairs = Vec::with_capacity(day_cells.len());
            for (slot, fields) in day_cells {
                pairs.push(self.pair_parser.assemble(fields, &slot).await);
            }
            days.push(Day::new(day_index, pairs));
        }
        days
    }
}

/// Extract every cell of a week table, or describe why the table was rejected.
fn extract_week(
    document: &Html,
    week_number: u8,
    semester: u8,
) -> Result<std::result::Result<WeekCells, TableShapeIssue>> {
    let Some(table) = find_week_table(document, week_number)? else {
        return Ok(Err(TableShapeIssue {
            week_number,
            rows: 0,
            columns: 0,
        }));
    };

    let rows = table_rows(table);
    let columns = rows.first().map(|row| row_cells(*row).len()).unwrap_or(0);
    if !DAYTIME_ROWS.contains(&rows.len()) || columns != DAYTIME_COLUMNS {
        return Ok(Err(TableShapeIssue {
            week_number,
            rows: rows.len(),
            columns,
        }));
    }

    let grid: Vec<Vec<ElementRef<'_>>> = rows.iter().skip(1).map(|row| row_cells(*row)).collect();

    let mut week = Vec::with_capacity(DAY_NAMES.len());
    for day_index in 0..DAY_NAMES.len() {
        let mut day = Vec::with_capacity(grid.len());
        for (pair_index, cells) in grid.iter().enumerate() {
            let slot = SlotIdentifier::new(pair_index as u8, day_index as u8, week_number, semester)?;
            let fields = cells
                .get(day_index + 1)
                .map(|cell| extract_cell(*cell))
                .unwrap_or_default();
            day.push((slot, fields));
        }
        week.push(day);
    }

    Ok(Ok(week))
}
