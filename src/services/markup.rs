//! Structural markers of rozklad.kpi.ua schedule pages.
//!
//! The site has no API; these class names, id values and href fragments are
//! the de-facto wire format every parser in this crate relies on.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// Class of the element wrapping a cell's subject links.
pub const SUBJECT_CONTAINER_CLASS: &str = "disLabel";

/// Href fragment identifying a teacher schedule link.
pub const TEACHER_LINK_MARKER: &str = "Schedules/ViewSchedule";

/// Href fragment shared by teacher and group schedule links.
pub const SCHEDULE_LINK_MARKER: &str = "ViewSchedule";

/// Href fragment identifying a room link on the map service.
pub const MAP_LINK_MARKER: &str = "maps.google.com";

/// Text marking an online lesson.
pub const ONLINE_MARKER: &str = "on-line";

/// Text of the "temporarily unavailable" placeholder page.
pub const UNAVAILABLE_MARKER: &str = "Сторінка тимчасово недоступна";

pub const FIRST_WEEK_TABLE_ID: &str = "ctl00_MainContent_FirstScheduleTable";
pub const SECOND_WEEK_TABLE_ID: &str = "ctl00_MainContent_SecondScheduleTable";

/// Element id of the table holding the given week.
pub fn week_table_id(week_number: u8) -> &'static str {
    if week_number == 1 {
        FIRST_WEEK_TABLE_ID
    } else {
        SECOND_WEEK_TABLE_ID
    }
}

pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Locate a week's schedule table in a parsed page.
pub fn find_week_table(document: &Html, week_number: u8) -> Result<Option<ElementRef<'_>>> {
    let selector = parse_selector(&format!("table#{}", week_table_id(week_number)))?;
    Ok(document.select(&selector).next())
}

/// Whether the page is the transient placeholder instead of a schedule.
pub fn is_unavailable_page(html: &str) -> bool {
    html.contains(UNAVAILABLE_MARKER)
}

/// Rows of a table, looking through `thead`/`tbody`/`tfoot` but not into
/// nested tables.
pub fn table_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

/// Cells (`td` or `th`) of a table row.
pub fn row_cells<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect()
}

/// Cell at a (row, column) position, counting the header row and column.
pub fn cell_at<'a>(table: ElementRef<'a>, row: usize, column: usize) -> Option<ElementRef<'a>> {
    let rows = table_rows(table);
    let cells = row_cells(*rows.get(row)?);
    cells.get(column).copied()
}

pub fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

pub fn is_subject_container(element: &ElementRef<'_>) -> bool {
    has_class(element, SUBJECT_CONTAINER_CLASS)
}

pub fn is_teacher_link(element: &ElementRef<'_>) -> bool {
    element.value().name() == "a"
        && element
            .value()
            .attr("href")
            .is_some_and(|href| href.contains(TEACHER_LINK_MARKER))
}

/// Any link to a teacher or group schedule page.
pub fn is_schedule_link(element: &ElementRef<'_>) -> bool {
    element.value().name() == "a"
        && element
            .value()
            .attr("href")
            .is_some_and(|href| href.contains(SCHEDULE_LINK_MARKER))
}

/// Element text with whitespace collapsed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    crate::utils::normalize_whitespace(&element.text().collect::<String>())
}
