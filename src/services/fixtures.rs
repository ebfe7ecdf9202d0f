//! Shared markup builders and stub collaborators for service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use scraper::{ElementRef, Html};

use crate::error::{AppError, Result};
use crate::models::{
    DAY_NAMES, LessonInfo, LessonType, SlotIdentifier, Subject, Teacher, TeacherPair,
};
use crate::services::markup::week_table_id;
use crate::services::teacher_schedule::{TeacherLookup, TeacherPageSource};

pub const PLACEHOLDER_PAGE: &str =
    "<html><body><br><h2>Сторінка тимчасово недоступна. </h2></body></html>";

pub fn subject_link(short: &str, full: &str) -> String {
    format!("<a href=\"http://wiki.kpi.ua/index.php/{short}\" title=\"{full}\">{short}</a>")
}

pub fn teacher_link(short: &str, schedule_ref: &str) -> String {
    format!(
        "<a href=\"/Schedules/ViewSchedule.aspx?v={schedule_ref}\" title=\"{short} (повне ім'я)\">{short}</a>"
    )
}

pub fn map_link(text: &str) -> String {
    format!("<a href=\"http://maps.google.com/?q=50.45, 30.52\">{text}</a>")
}

/// A group page cell: subjects, then teachers, then the info line.
pub fn cell_html(subjects: &[String], teachers: &[String], infos: &str) -> String {
    let mut html = format!("<td><span class=\"disLabel\">{}</span>", subjects.join(", "));
    if !teachers.is_empty() {
        html.push_str("<br>");
        html.push_str(&teachers.join(", "));
    }
    if !infos.is_empty() {
        html.push_str("<br>");
        html.push_str(infos);
    }
    html.push_str("</td>");
    html
}

pub fn parse_cell(cell: &str) -> Html {
    Html::parse_fragment(&format!("<table><tr>{cell}</tr></table>"))
}

pub fn first_cell(html: &Html) -> ElementRef<'_> {
    let selector = scraper::Selector::parse("td").unwrap();
    html.select(&selector).next().unwrap()
}

/// A 7x7 week table (header row and column included) with the given cell
/// contents placed at zero-based (pair, day) positions.
pub fn week_table(week_number: u8, cells: &[(u8, u8, String)]) -> String {
    let mut html = format!("<table id=\"{}\">", week_table_id(week_number));
    html.push_str("<tr><td></td>");
    for day in DAY_NAMES {
        html.push_str(&format!("<td>{day}</td>"));
    }
    html.push_str("</tr>");

    for pair in 0..6u8 {
        html.push_str(&format!("<tr><td>{}</td>", pair + 1));
        for day in 0..6u8 {
            match cells.iter().find(|(p, d, _)| *p == pair && *d == day) {
                Some((_, _, inner)) => html.push_str(&format!("<td>{inner}</td>")),
                None => html.push_str("<td></td>"),
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

pub fn schedule_page(tables: &[String]) -> String {
    format!("<html><body>{}</body></html>", tables.concat())
}

/// A teacher page with a single filled cell.
pub fn teacher_page(week_number: u8, pair_index: u8, day_index: u8, cell_inner: &str) -> String {
    schedule_page(&[week_table(
        week_number,
        &[(pair_index, day_index, cell_inner.to_string())],
    )])
}

pub fn subject(name: &str) -> Subject {
    Subject::new(name, name)
}

pub fn teacher(schedule_ref: &str) -> Teacher {
    Teacher::new(
        format!("викл. {schedule_ref}"),
        format!("Викладач {schedule_ref}"),
        schedule_ref,
    )
}

pub fn info(room: &str, lesson_type: &str) -> LessonInfo {
    LessonInfo {
        room_numbers: vec![room.to_string()],
        lesson_type: lesson_type.to_string(),
        is_online: false,
    }
}

enum Pages {
    Sequence(Mutex<VecDeque<String>>),
    Always(String),
    Failing,
}

/// Canned teacher pages, counting fetches.
pub struct StaticPages {
    pages: Pages,
    calls: AtomicUsize,
}

impl StaticPages {
    pub fn sequence(pages: Vec<String>) -> Self {
        Self::with(Pages::Sequence(Mutex::new(pages.into())))
    }

    pub fn always(page: &str) -> Self {
        Self::with(Pages::Always(page.to_string()))
    }

    pub fn failing() -> Self {
        Self::with(Pages::Failing)
    }

    fn with(pages: Pages) -> Self {
        Self {
            pages,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TeacherPageSource for StaticPages {
    async fn fetch_teacher_page(&self, _schedule_ref: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let page = match &self.pages {
            Pages::Sequence(queue) => queue.lock().unwrap().pop_front(),
            Pages::Always(page) => Some(page.clone()),
            Pages::Failing => None,
        };
        page.ok_or_else(|| AppError::Io(std::io::Error::other("connection reset")))
    }
}

/// Teacher lookups answered from a table of (ref → subject, room).
#[derive(Default)]
pub struct StubLookup {
    pairs: HashMap<String, (String, String)>,
    calls: AtomicUsize,
}

impl StubLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(mut self, schedule_ref: &str, subject_name: &str, room: &str) -> Self {
        self.pairs.insert(
            schedule_ref.to_string(),
            (subject_name.to_string(), room.to_string()),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TeacherLookup for StubLookup {
    async fn teacher_pair(&self, teacher: &Teacher, slot: &SlotIdentifier) -> Result<TeacherPair> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (subject_name, room) = self.pairs.get(&teacher.schedule_ref).ok_or_else(|| {
            AppError::schedule_unavailable(&teacher.schedule_ref, format!("no lesson in {slot}"))
        })?;

        Ok(TeacherPair {
            teacher: teacher.clone(),
            subject_name: subject_name.clone(),
            subject_full_name: None,
            room: room.clone(),
            lesson_type: LessonType::Lab,
            is_online: false,
            groups: Vec::new(),
        })
    }
}
