//! Cell field extraction.
//!
//! Pulls three raw, order-preserving lists out of one schedule cell:
//! subject names, teacher links and lesson info fragments. Nothing is
//! reconciled here; the lists may disagree in length.

use scraper::ElementRef;

use crate::models::{LessonInfo, Subject, Teacher};
use crate::services::lesson_info::extract_lesson_infos;
use crate::services::markup::{
    element_text, is_schedule_link, is_subject_container, is_teacher_link,
};
use crate::utils::{extract_schedule_ref, normalize_whitespace};

/// Raw lists scraped from one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellFields {
    pub subjects: Vec<Subject>,

    /// One entry per teacher link; an entry may later hold several teachers
    pub teachers: Vec<Vec<Teacher>>,

    pub infos: Vec<LessonInfo>,
}

impl CellFields {
    /// A cell without subjects is an empty slot.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Whether subject, teacher and info counts all agree.
    pub fn is_aligned(&self) -> bool {
        self.subjects.len() == self.teachers.len() && self.subjects.len() == self.infos.len()
    }
}

/// Extract subjects, teachers and infos from a cell, in document order.
///
/// A cell without a subject container yields empty lists.
pub fn extract_cell(cell: ElementRef<'_>) -> CellFields {
    let Some(container) = cell
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| is_subject_container(el))
    else {
        return CellFields::default();
    };

    let subjects = container
        .children()
        .filter_map(ElementRef::wrap)
        .map(|link| subject_from_link(&link))
        .collect();

    let teachers = cell
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| is_teacher_link(el))
        .map(|link| vec![teacher_from_link(&link)])
        .collect();

    CellFields {
        subjects,
        teachers,
        infos: extract_lesson_infos(&info_tail(cell)),
    }
}

fn subject_from_link(link: &ElementRef<'_>) -> Subject {
    let short_name = element_text(link);
    let full_name = title_or(link, &short_name);
    Subject::new(short_name, full_name)
}

fn teacher_from_link(link: &ElementRef<'_>) -> Teacher {
    let short_name = element_text(link);
    let full_name = title_or(link, &short_name);
    let href = link.value().attr("href").unwrap_or_default();
    let schedule_ref = extract_schedule_ref(href).unwrap_or_else(|| href.trim().to_string());
    Teacher::new(short_name, full_name, schedule_ref)
}

fn title_or(link: &ElementRef<'_>, fallback: &str) -> String {
    link.value()
        .attr("title")
        .map(normalize_whitespace)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Markup of the cell's children after the last subject or schedule link.
///
/// Teacher pages list group links where group pages list teachers; both
/// precede the info fragments.
fn info_tail(cell: ElementRef<'_>) -> String {
    let children: Vec<_> = cell.children().collect();
    let last_header = children
        .iter()
        .rposition(|node| ElementRef::wrap(*node).is_some_and(|el| holds_header(&el)));
    let Some(last_header) = last_header else {
        return String::new();
    };

    children[last_header + 1..]
        .iter()
        .map(|node| match ElementRef::wrap(*node) {
            Some(element) => element.html(),
            None => node
                .value()
                .as_text()
                .map(|text| escape_text(text))
                .unwrap_or_default(),
        })
        .collect()
}

fn holds_header(element: &ElementRef<'_>) -> bool {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .any(|d| is_subject_container(&d) || is_schedule_link(&d))
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
