//! Teacher schedule resolution.
//!
//! Looks up the single lesson a teacher holds in a given slot by reading the
//! teacher's personal schedule page. Used by the reconciler to decide which
//! teacher, room or type belongs to which subject of an ambiguous cell.

use async_trait::async_trait;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{
    LessonType, RetryConfig, SlotIdentifier, Teacher, TeacherPair, distinct_full_name,
};
use crate::services::cell::extract_cell;
use crate::services::markup::{cell_at, find_week_table, is_unavailable_page};

/// Source of raw teacher schedule pages.
#[async_trait]
pub trait TeacherPageSource: Send + Sync {
    /// Fetch the raw HTML of a teacher's personal schedule page.
    async fn fetch_teacher_page(&self, schedule_ref: &str) -> Result<String>;
}

/// Capability to find the lesson a teacher holds in a slot.
#[async_trait]
pub trait TeacherLookup: Send + Sync {
    async fn teacher_pair(&self, teacher: &Teacher, slot: &SlotIdentifier) -> Result<TeacherPair>;
}

/// Resolves teacher pairs from fetched schedule pages, retrying while the
/// site serves its "temporarily unavailable" placeholder.
pub struct TeacherScheduleResolver<S> {
    source: S,
    retry: RetryConfig,
}

impl<S: TeacherPageSource> TeacherScheduleResolver<S> {
    pub fn new(source: S, retry: RetryConfig) -> Self {
        Self { source, retry }
    }

    /// Resolve the teacher's lesson in the given slot.
    pub async fn resolve(&self, teacher: &Teacher, slot: &SlotIdentifier) -> Result<TeacherPair> {
        let page = self.fetch_available_page(&teacher.schedule_ref).await?;
        parse_teacher_pair(&page, teacher, slot)
    }

    /// Fetch a teacher page, retrying placeholders and transport errors with
    /// exponential backoff.
    async fn fetch_available_page(&self, schedule_ref: &str) -> Result<String> {
        let attempts = self.retry.max_attempts.max(1);
        let mut last_failure = String::new();

        for attempt in 1..=attempts {
            match self.source.fetch_teacher_page(schedule_ref).await {
                Ok(page) if !is_unavailable_page(&page) => return Ok(page),
                Ok(_) => last_failure = "page temporarily unavailable".to_string(),
                Err(e) => last_failure = e.to_string(),
            }

            if attempt < attempts {
                let delay = self.retry.delay_for(attempt);
                log::debug!(
                    "Teacher page {} attempt {}/{} failed ({}), retrying in {:?}",
                    schedule_ref,
                    attempt,
                    attempts,
                    last_failure,
                    delay
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(AppError::schedule_unavailable(
            schedule_ref,
            format!("gave up after {attempts} attempts: {last_failure}"),
        ))
    }
}

#[async_trait]
impl<S: TeacherPageSource> TeacherLookup for TeacherScheduleResolver<S> {
    async fn teacher_pair(&self, teacher: &Teacher, slot: &SlotIdentifier) -> Result<TeacherPair> {
        self.resolve(teacher, slot).await
    }
}

/// Read the teacher's lesson at `slot` from their schedule page.
///
/// A teacher's own cell holds a single subject, so only the first subject
/// and the first info fragment are used.
pub fn parse_teacher_pair(
    page: &str,
    teacher: &Teacher,
    slot: &SlotIdentifier,
) -> Result<TeacherPair> {
    let document = Html::parse_document(page);
    let unavailable =
        |message: String| AppError::schedule_unavailable(&teacher.schedule_ref, message);

    let table = find_week_table(&document, slot.week_number())?
        .ok_or_else(|| unavailable(format!("no table for week {}", slot.week_number())))?;

    let cell = cell_at(
        table,
        usize::from(slot.pair_index()) + 1,
        usize::from(slot.day_index()) + 1,
    )
    .ok_or_else(|| unavailable(format!("table has no cell for {slot}")))?;

    let fields = extract_cell(cell);
    let subject = fields
        .subjects
        .first()
        .ok_or_else(|| unavailable(format!("no lesson in {slot}")))?;
    let info = fields.infos.first().cloned().unwrap_or_default();

    Ok(TeacherPair {
        teacher: teacher.clone(),
        subject_name: subject.short_name.clone(),
        subject_full_name: distinct_full_name(&subject.short_name, &subject.full_name),
        room: info.room_numbers.first().cloned().unwrap_or_default(),
        lesson_type: LessonType::parse(Some(info.lesson_type.as_str())),
        is_online: info.is_online,
        groups: parse_groups(),
    })
}

// TODO: read group links from the teacher's cell once their markup is mapped
fn parse_groups() -> Vec<String> {
    Vec::new()
}
