//! Lesson data structures.

use serde::{Deserialize, Serialize};

use crate::models::Teacher;

/// Kind of lesson held in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LessonType {
    #[default]
    #[serde(rename = "Лекція")]
    Lecture,
    #[serde(rename = "Лабораторна")]
    Lab,
    #[serde(rename = "Практика")]
    Practicum,
}

impl LessonType {
    /// Map a raw type token from a cell to a lesson type.
    ///
    /// Matching is by prefix ("Лек", "Прак", "Лаб"). Anything else, and a
    /// missing token, becomes `Lecture`; the fallback is logged so its
    /// frequency can be measured.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            log::debug!("Lesson type missing, defaulting to lecture");
            return Self::Lecture;
        };

        if raw.starts_with("Лек") {
            Self::Lecture
        } else if raw.starts_with("Прак") {
            Self::Practicum
        } else if raw.starts_with("Лаб") {
            Self::Lab
        } else {
            log::warn!("Unrecognized lesson type '{}', defaulting to lecture", raw);
            Self::Lecture
        }
    }

    /// Full Ukrainian name as printed on the site.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lecture => "Лекція",
            Self::Lab => "Лабораторна",
            Self::Practicum => "Практика",
        }
    }
}

/// Subject names as they appear in a cell's subject link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Subject {
    /// Link text
    pub short_name: String,

    /// Link title (equals the short name when the site gives no title)
    pub full_name: String,
}

impl Subject {
    pub fn new(short_name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            full_name: full_name.into(),
        }
    }
}

/// Room, type and online flag of one lesson before it is attached to a subject.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LessonInfo {
    pub room_numbers: Vec<String>,

    /// Raw type token, mapped through [`LessonType::parse`] later
    pub lesson_type: String,

    pub is_online: bool,
}

/// One reconciled lesson in a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub subject_name: String,

    /// Absent when it would repeat `subject_name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_full_name: Option<String>,

    #[serde(default)]
    pub teachers: Vec<Teacher>,

    #[serde(default)]
    pub rooms: Vec<String>,

    pub lesson_type: LessonType,

    #[serde(default)]
    pub is_online: bool,
}

impl Lesson {
    /// Build a lesson from a subject, its teachers and its (optional) info.
    pub fn new(subject: &Subject, teachers: Vec<Teacher>, info: Option<&LessonInfo>) -> Self {
        Self {
            subject_name: subject.short_name.clone(),
            subject_full_name: distinct_full_name(&subject.short_name, &subject.full_name),
            teachers,
            rooms: info.map(|i| i.room_numbers.clone()).unwrap_or_default(),
            lesson_type: LessonType::parse(info.map(|i| i.lesson_type.as_str())),
            is_online: info.is_some_and(|i| i.is_online),
        }
    }
}

/// Collapse a full name that merely repeats the short one.
pub(crate) fn distinct_full_name(short_name: &str, full_name: &str) -> Option<String> {
    if full_name.is_empty() || full_name == short_name {
        None
    } else {
        Some(full_name.to_string())
    }
}
