// src/pipeline/teacher.rs

//! Single teacher lookup, for checking how a teacher's page is read.

use crate::error::Result;
use crate::models::{Config, SlotIdentifier, Teacher, TeacherPair};
use crate::services::{RozkladClient, TeacherScheduleResolver};

/// Resolve the lesson a teacher holds in `slot`.
///
/// Only the schedule reference is known here, so it doubles as the
/// teacher's name in the result.
pub async fn run_teacher(
    config: &Config,
    teacher_ref: &str,
    slot: &SlotIdentifier,
) -> Result<TeacherPair> {
    let client = RozkladClient::new(&config.client)?;
    let resolver = TeacherScheduleResolver::new(client, config.retry.clone());
    let teacher = Teacher::new(teacher_ref, teacher_ref, teacher_ref);

    log::info!("Resolving teacher {} at {}", teacher_ref, slot);
    let pair = resolver.resolve(&teacher, slot).await?;
    log::info!(
        "Teacher {} holds {} ({}) in {}",
        teacher_ref,
        pair.subject_name,
        pair.lesson_type.as_str(),
        if pair.room.is_empty() { "no room" } else { pair.room.as_str() }
    );

    Ok(pair)
}
