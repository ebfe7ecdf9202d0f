//! Cardinality reconciliation.
//!
//! A cell yields three lists scraped independently: subjects (S), teacher
//! entries (T) and lesson infos (I). They are meant to be index-aligned but
//! often are not. The reconciler re-aligns teachers and infos to the subject
//! list using a fixed decision table, consulting teachers' own schedules
//! where the cell alone cannot say who teaches what:
//!
//! | Shape              | Teachers / infos                               |
//! |--------------------|------------------------------------------------|
//! | T > S, S == 1      | all teachers go to the single subject          |
//! | T > S, S > 1       | teachers grouped by their own subject name     |
//! | I < S, I == 1      | the info is repeated for every subject         |
//! | I < S, I > 1       | infos taken from each teacher's own slot       |
//! | I > S, S == 1      | rooms of all infos merged into one             |
//! | I > S, S > 1       | left as is, attached by clamped index          |
//! | T < S, T == 1      | the teacher is repeated for every subject      |
//! | T < S, T > 1       | teachers matched to subjects by subject name   |
//!
//! Only the rows that consult teacher schedules perform lookups; each
//! distinct teacher is looked up at most once per cell.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::models::{LessonInfo, SlotIdentifier, Subject, Teacher, TeacherPair};
use crate::services::cell::CellFields;
use crate::services::teacher_schedule::TeacherLookup;

/// A subject with the teachers and info attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledLesson {
    pub subject: Subject,
    pub teachers: Vec<Teacher>,
    pub info: Option<LessonInfo>,
}

/// How teacher entries are re-aligned to subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherPolicy {
    Direct,
    FlattenOntoSingle,
    GroupBySubject,
    CopySingle,
    MatchBySubject,
}

impl TeacherPolicy {
    pub fn select(subjects: usize, teachers: usize) -> Self {
        if subjects == 0 || teachers == 0 || teachers == subjects {
            Self::Direct
        } else if teachers > subjects {
            if subjects == 1 {
                Self::FlattenOntoSingle
            } else {
                Self::GroupBySubject
            }
        } else if teachers == 1 {
            Self::CopySingle
        } else {
            Self::MatchBySubject
        }
    }
}

/// How lesson infos are re-aligned to subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPolicy {
    Direct,
    DuplicateSingle,
    FromTeachers,
    MergeRooms,
    Clamp,
}

impl InfoPolicy {
    pub fn select(subjects: usize, infos: usize) -> Self {
        if subjects == 0 || infos == 0 || infos == subjects {
            Self::Direct
        } else if infos < subjects {
            if infos == 1 {
                Self::DuplicateSingle
            } else {
                Self::FromTeachers
            }
        } else if subjects == 1 {
            Self::MergeRooms
        } else {
            Self::Clamp
        }
    }
}

/// Re-aligns a cell's raw lists into one entry per subject.
pub struct Reconciler {
    lookup: Arc<dyn TeacherLookup>,
    max_concurrent: usize,
}

impl Reconciler {
    pub fn new(lookup: Arc<dyn TeacherLookup>, max_concurrent: usize) -> Self {
        Self {
            lookup,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Reconcile a cell's fields into exactly one entry per subject.
    ///
    /// Never fails: teachers whose schedules cannot be read are dropped and
    /// logged, and shapes without a rule fall back to clamped indexing.
    pub async fn reconcile(
        &self,
        fields: CellFields,
        slot: &SlotIdentifier,
    ) -> Vec<ReconciledLesson> {
        let CellFields {
            subjects,
            mut teachers,
            mut infos,
        } = fields;

        let (s, t, i) = (subjects.len(), teachers.len(), infos.len());
        if s == 0 {
            return Vec::new();
        }
        if s != t || s != i {
            log::warn!("{} lessons, {} teachers, {} infos in {}", s, t, i, slot);
        }

        let teacher_policy = TeacherPolicy::select(s, t);
        let info_policy = InfoPolicy::select(s, i);
        let mut pairs = TeacherPairs::new(self.lookup.as_ref(), slot, self.max_concurrent);

        match teacher_policy {
            TeacherPolicy::FlattenOntoSingle => {
                log::debug!("Single lesson with several teachers in {}", slot);
                teachers = flatten_onto_single(teachers);
            }
            TeacherPolicy::GroupBySubject => {
                log::debug!("Several lessons sharing {} teachers in {}", t, slot);
                let resolved = pairs.resolve(&flatten(&teachers)).await;
                teachers = group_by_subject(&subjects, &found(&resolved));
            }
            _ => {}
        }

        match info_policy {
            InfoPolicy::DuplicateSingle => {
                log::debug!("Copying single lesson info to {} lessons in {}", s, slot);
                infos = duplicate_single(infos, s);
            }
            InfoPolicy::FromTeachers => {
                log::debug!("Reading lesson infos from teacher schedules in {}", slot);
                let resolved = pairs.resolve(&flatten(&teachers)).await;
                infos = infos_from_teachers(&resolved, infos);
            }
            InfoPolicy::MergeRooms => {
                log::debug!("Merging {} rooms into a single lesson in {}", i, slot);
                infos = merge_rooms(infos);
            }
            InfoPolicy::Clamp => {
                log::warn!(
                    "Unresolved shape: {} infos for {} lessons in {}, attaching by index",
                    i,
                    s,
                    slot
                );
            }
            InfoPolicy::Direct => {}
        }

        match teacher_policy {
            TeacherPolicy::CopySingle => {
                log::debug!("Copying single teacher to {} lessons in {}", s, slot);
                teachers = copy_single(teachers, s);
            }
            TeacherPolicy::MatchBySubject => {
                log::debug!("Matching {} teachers to {} lessons in {}", t, s, slot);
                let resolved = pairs.resolve(&flatten(&teachers)).await;
                teachers = match_by_subject(&subjects, &found(&resolved));
            }
            _ => {}
        }

        align(subjects, teachers, infos)
    }
}

/// Per-cell memo of teacher lookups, keyed by schedule reference.
struct TeacherPairs<'a> {
    lookup: &'a dyn TeacherLookup,
    slot: &'a SlotIdentifier,
    max_concurrent: usize,
    resolved: HashMap<String, Option<TeacherPair>>,
}

impl<'a> TeacherPairs<'a> {
    fn new(lookup: &'a dyn TeacherLookup, slot: &'a SlotIdentifier, max_concurrent: usize) -> Self {
        Self {
            lookup,
            slot,
            max_concurrent,
            resolved: HashMap::new(),
        }
    }

    /// Look up every teacher not seen yet, then answer in input order.
    async fn resolve(&mut self, teachers: &[Teacher]) -> Vec<Option<TeacherPair>> {
        let mut pending: Vec<Teacher> = Vec::new();
        for teacher in teachers {
            let known = self.resolved.contains_key(&teacher.schedule_ref)
                || pending.iter().any(|p| p.schedule_ref == teacher.schedule_ref);
            if !known {
                pending.push(teacher.clone());
            }
        }

        let lookup = self.lookup;
        let slot = self.slot;
        let fetched: Vec<(String, Option<TeacherPair>)> = stream::iter(pending)
            .map(|teacher| async move {
                let pair = match lookup.teacher_pair(&teacher, slot).await {
                    Ok(pair) => Some(pair),
                    Err(e) => {
                        log::warn!(
                            "Dropping teacher {} ({}) for {}: {}",
                            teacher.short_name,
                            teacher.schedule_ref,
                            slot,
                            e
                        );
                        None
                    }
                };
                (teacher.schedule_ref, pair)
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;
        self.resolved.extend(fetched);

        teachers
            .iter()
            .map(|t| self.resolved.get(&t.schedule_ref).cloned().flatten())
            .collect()
    }
}

fn found(resolved: &[Option<TeacherPair>]) -> Vec<TeacherPair> {
    resolved.iter().flatten().cloned().collect()
}

fn flatten(groups: &[Vec<Teacher>]) -> Vec<Teacher> {
    groups.iter().flatten().cloned().collect()
}

/// Item at `index`, or the last one when the list is shorter.
fn clamped<T>(items: &[T], index: usize) -> Option<&T> {
    items.get(index).or_else(|| items.last())
}

fn flatten_onto_single(groups: Vec<Vec<Teacher>>) -> Vec<Vec<Teacher>> {
    vec![groups.concat()]
}

/// Group teachers by the subject they teach in this slot and hand each
/// group to the subject of the same name.
fn group_by_subject(subjects: &[Subject], pairs: &[TeacherPair]) -> Vec<Vec<Teacher>> {
    let mut groups: Vec<(&str, Vec<Teacher>)> = Vec::new();
    for pair in pairs {
        match groups.iter_mut().find(|(name, _)| *name == pair.subject_name) {
            Some((_, teachers)) => teachers.push(pair.teacher.clone()),
            None => groups.push((pair.subject_name.as_str(), vec![pair.teacher.clone()])),
        }
    }

    subjects
        .iter()
        .map(|subject| {
            groups
                .iter()
                .find(|(name, _)| *name == subject.short_name)
                .map(|(_, teachers)| teachers.clone())
                .unwrap_or_default()
        })
        .collect()
}

fn duplicate_single(infos: Vec<LessonInfo>, subjects: usize) -> Vec<LessonInfo> {
    match infos.into_iter().next() {
        Some(info) => vec![info; subjects],
        None => Vec::new(),
    }
}

/// One info per teacher, from the teacher's own slot.
///
/// When no teacher could be looked up the cell's infos are kept; a teacher
/// whose lookup failed falls back to the cell info at its position.
fn infos_from_teachers(
    resolved: &[Option<TeacherPair>],
    original: Vec<LessonInfo>,
) -> Vec<LessonInfo> {
    if resolved.iter().all(Option::is_none) {
        return original;
    }

    resolved
        .iter()
        .enumerate()
        .map(|(index, pair)| match pair {
            Some(pair) => pair.lesson_info(),
            None => clamped(&original, index).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Collapse several infos of one subject into a single info with all rooms.
fn merge_rooms(infos: Vec<LessonInfo>) -> Vec<LessonInfo> {
    let rooms: Vec<String> = infos
        .iter()
        .flat_map(|info| info.room_numbers.iter().cloned())
        .collect();

    match infos.into_iter().next() {
        Some(mut merged) => {
            merged.room_numbers = rooms;
            vec![merged]
        }
        None => Vec::new(),
    }
}

fn copy_single(groups: Vec<Vec<Teacher>>, subjects: usize) -> Vec<Vec<Teacher>> {
    match groups.into_iter().next() {
        Some(group) => vec![group; subjects],
        None => Vec::new(),
    }
}

/// Attach to each subject the first teacher who teaches it in this slot.
fn match_by_subject(subjects: &[Subject], pairs: &[TeacherPair]) -> Vec<Vec<Teacher>> {
    subjects
        .iter()
        .map(|subject| {
            pairs
                .iter()
                .find(|pair| pair.subject_name == subject.short_name)
                .map(|pair| vec![pair.teacher.clone()])
                .unwrap_or_default()
        })
        .collect()
}

/// Zip subjects with teachers (missing → none) and infos (clamped).
fn align(
    subjects: Vec<Subject>,
    teachers: Vec<Vec<Teacher>>,
    infos: Vec<LessonInfo>,
) -> Vec<ReconciledLesson> {
    subjects
        .into_iter()
        .enumerate()
        .map(|(index, subject)| ReconciledLesson {
            subject,
            teachers: teachers.get(index).cloned().unwrap_or_default(),
            info: clamped(&infos, index).cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{StubLookup, info, subject, teacher};

    fn slot() -> SlotIdentifier {
        SlotIdentifier::new(1, 2, 1, 1).unwrap()
    }

    fn fields(subjects: &[&str], teachers: &[&str], infos: &[&str]) -> CellFields {
        CellFields {
            subjects: subjects.iter().map(|s| subject(s)).collect(),
            teachers: teachers.iter().map(|t| vec![teacher(t)]).collect(),
            infos: infos.iter().map(|room| info(room, "Лекція")).collect(),
        }
    }

    fn rooms(lesson: &ReconciledLesson) -> Vec<String> {
        lesson
            .info
            .as_ref()
            .map(|i| i.room_numbers.clone())
            .unwrap_or_default()
    }

    fn refs(lesson: &ReconciledLesson) -> Vec<&str> {
        lesson
            .teachers
            .iter()
            .map(|t| t.schedule_ref.as_str())
            .collect()
    }

    fn reconciler(lookup: &Arc<StubLookup>) -> Reconciler {
        Reconciler::new(lookup.clone(), 4)
    }

    #[test]
    fn test_teacher_policy_selection() {
        assert_eq!(TeacherPolicy::select(2, 2), TeacherPolicy::Direct);
        assert_eq!(TeacherPolicy::select(2, 0), TeacherPolicy::Direct);
        assert_eq!(TeacherPolicy::select(1, 3), TeacherPolicy::FlattenOntoSingle);
        assert_eq!(TeacherPolicy::select(2, 3), TeacherPolicy::GroupBySubject);
        assert_eq!(TeacherPolicy::select(3, 1), TeacherPolicy::CopySingle);
        assert_eq!(TeacherPolicy::select(3, 2), TeacherPolicy::MatchBySubject);
    }

    #[test]
    fn test_info_policy_selection() {
        assert_eq!(InfoPolicy::select(2, 2), InfoPolicy::Direct);
        assert_eq!(InfoPolicy::select(2, 0), InfoPolicy::Direct);
        assert_eq!(InfoPolicy::select(3, 1), InfoPolicy::DuplicateSingle);
        assert_eq!(InfoPolicy::select(3, 2), InfoPolicy::FromTeachers);
        assert_eq!(InfoPolicy::select(1, 3), InfoPolicy::MergeRooms);
        assert_eq!(InfoPolicy::select(2, 3), InfoPolicy::Clamp);
    }

    #[tokio::test]
    async fn test_direct_alignment() {
        let lookup = Arc::new(StubLookup::new());
        let lessons = reconciler(&lookup)
            .reconcile(fields(&["A", "B"], &["t1", "t2"], &["101", "102"]), &slot())
            .await;

        assert_eq!(lessons.len(), 2);
        assert_eq!(refs(&lessons[0]), vec!["t1"]);
        assert_eq!(refs(&lessons[1]), vec!["t2"]);
        assert_eq!(rooms(&lessons[0]), vec!["101"]);
        assert_eq!(rooms(&lessons[1]), vec!["102"]);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_cell_yields_nothing() {
        let lookup = Arc::new(StubLookup::new());
        let lessons = reconciler(&lookup)
            .reconcile(CellFields::default(), &slot())
            .await;
        assert!(lessons.is_empty());
    }

    #[tokio::test]
    async fn test_single_subject_takes_all_teachers() {
        let lookup = Arc::new(StubLookup::new());
        let lessons = reconciler(&lookup)
            .reconcile(fields(&["A"], &["t1", "t2", "t3"], &["101"]), &slot())
            .await;

        assert_eq!(lessons.len(), 1);
        assert_eq!(refs(&lessons[0]), vec!["t1", "t2", "t3"]);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_teachers_grouped_by_subject_name() {
        let lookup = Arc::new(
            StubLookup::new()
                .with_pair("t1", "Фізика", "101")
                .with_pair("t2", "Хімія", "102")
                .with_pair("t3", "Фізика", "103"),
        );
        let lessons = reconciler(&lookup)
            .reconcile(
                fields(&["Фізика", "Хімія"], &["t1", "t2", "t3"], &["101", "102"]),
                &slot(),
            )
            .await;

        assert_eq!(refs(&lessons[0]), vec!["t1", "t3"]);
        assert_eq!(refs(&lessons[1]), vec!["t2"]);
        assert_eq!(lookup.calls(), 3);
    }

    #[tokio::test]
    async fn test_grouping_leaves_unmatched_subject_empty() {
        let lookup = Arc::new(
            StubLookup::new()
                .with_pair("t1", "Фізика", "101")
                .with_pair("t2", "Фізика", "101"),
        );
        let lessons = reconciler(&lookup)
            .reconcile(
                fields(&["Фізика", "Хімія"], &["t1", "t2", "t3"], &["101", "102"]),
                &slot(),
            )
            .await;

        assert_eq!(refs(&lessons[0]), vec!["t1", "t2"]);
        assert!(lessons[1].teachers.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_teachers_degrade_to_empty_lists() {
        let lookup = Arc::new(StubLookup::new());
        let lessons = reconciler(&lookup)
            .reconcile(
                fields(&["Фізика", "Хімія"], &["t1", "t2", "t3"], &["101", "102"]),
                &slot(),
            )
            .await;

        assert_eq!(lessons.len(), 2);
        assert!(lessons.iter().all(|l| l.teachers.is_empty()));
        assert_eq!(rooms(&lessons[1]), vec!["102"]);
    }

    #[tokio::test]
    async fn test_single_info_is_duplicated() {
        let lookup = Arc::new(StubLookup::new());
        let lessons = reconciler(&lookup)
            .reconcile(fields(&["A", "B", "C"], &["t1", "t2", "t3"], &["101"]), &slot())
            .await;

        assert!(lessons.iter().all(|l| rooms(l) == vec!["101"]));
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_infos_taken_from_teacher_schedules() {
        let lookup = Arc::new(
            StubLookup::new()
                .with_pair("t1", "A", "201")
                .with_pair("t2", "B", "202")
                .with_pair("t3", "C", "203"),
        );
        let lessons = reconciler(&lookup)
            .reconcile(
                fields(&["A", "B", "C"], &["t1", "t2", "t3"], &["101", "102"]),
                &slot(),
            )
            .await;

        assert_eq!(rooms(&lessons[0]), vec!["201"]);
        assert_eq!(rooms(&lessons[1]), vec!["202"]);
        assert_eq!(rooms(&lessons[2]), vec!["203"]);
    }

    #[tokio::test]
    async fn test_failed_info_lookups_clamp_to_last_info() {
        let lookup = Arc::new(StubLookup::new());
        let lessons = reconciler(&lookup)
            .reconcile(
                fields(&["A", "B", "C"], &["t1", "t2", "t3"], &["101", "102"]),
                &slot(),
            )
            .await;

        assert_eq!(rooms(&lessons[0]), vec!["101"]);
        assert_eq!(rooms(&lessons[2]), vec!["102"]);
    }

    #[tokio::test]
    async fn test_partial_info_lookups_fall_back_per_teacher() {
        let lookup = Arc::new(StubLookup::new().with_pair("t1", "A", "201"));
        let lessons = reconciler(&lookup)
            .reconcile(
                fields(&["A", "B", "C"], &["t1", "t2", "t3"], &["101", "102"]),
                &slot(),
            )
            .await;

        assert_eq!(rooms(&lessons[0]), vec!["201"]);
        assert_eq!(rooms(&lessons[1]), vec!["102"]);
        assert_eq!(rooms(&lessons[2]), vec!["102"]);
    }

    #[tokio::test]
    async fn test_rooms_merged_for_single_subject() {
        let lookup = Arc::new(StubLookup::new());
        let lessons = reconciler(&lookup)
            .reconcile(fields(&["A"], &["t1"], &["101", "102", "103"]), &slot())
            .await;

        assert_eq!(lessons.len(), 1);
        assert_eq!(rooms(&lessons[0]), vec!["101", "102", "103"]);
    }

    #[tokio::test]
    async fn test_extra_infos_for_several_subjects_are_clamped() {
        let lookup = Arc::new(StubLookup::new());
        let lessons = reconciler(&lookup)
            .reconcile(fields(&["A", "B"], &["t1", "t2"], &["101", "102", "103"]), &slot())
            .await;

        assert_eq!(lessons.len(), 2);
        assert_eq!(rooms(&lessons[0]), vec!["101"]);
        assert_eq!(rooms(&lessons[1]), vec!["102"]);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_single_teacher_copied_to_all_subjects() {
        let lookup = Arc::new(StubLookup::new());
        let lessons = reconciler(&lookup)
            .reconcile(fields(&["A", "B"], &["t1"], &["101"]), &slot())
            .await;

        assert_eq!(lessons.len(), 2);
        assert_eq!(refs(&lessons[0]), vec!["t1"]);
        assert_eq!(refs(&lessons[1]), vec!["t1"]);
        assert_eq!(rooms(&lessons[1]), vec!["101"]);
    }

    #[tokio::test]
    async fn test_teachers_matched_by_subject_name() {
        let lookup = Arc::new(
            StubLookup::new()
                .with_pair("t1", "C", "301")
                .with_pair("t2", "A", "302"),
        );
        let lessons = reconciler(&lookup)
            .reconcile(
                fields(&["A", "B", "C"], &["t1", "t2"], &["101", "102", "103"]),
                &slot(),
            )
            .await;

        assert_eq!(refs(&lessons[0]), vec!["t2"]);
        assert!(lessons[1].teachers.is_empty());
        assert_eq!(refs(&lessons[2]), vec!["t1"]);
    }

    #[tokio::test]
    async fn test_each_teacher_looked_up_once_per_cell() {
        let lookup = Arc::new(
            StubLookup::new()
                .with_pair("t1", "A", "201")
                .with_pair("t2", "B", "202"),
        );
        // The info step and the match step consult the same two teachers
        let lessons = reconciler(&lookup)
            .reconcile(
                fields(&["A", "B", "C"], &["t1", "t2"], &["101", "102"]),
                &slot(),
            )
            .await;

        assert_eq!(lessons.len(), 3);
        assert_eq!(refs(&lessons[0]), vec!["t1"]);
        assert!(lessons[2].teachers.is_empty());
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_repeated_teacher_link_looked_up_once() {
        let lookup = Arc::new(
            StubLookup::new()
                .with_pair("t1", "A", "201")
                .with_pair("t2", "B", "202"),
        );
        let lessons = reconciler(&lookup)
            .reconcile(fields(&["A", "B"], &["t1", "t2", "t1"], &["101", "102"]), &slot())
            .await;

        assert_eq!(refs(&lessons[0]), vec!["t1", "t1"]);
        assert_eq!(refs(&lessons[1]), vec!["t2"]);
        assert_eq!(lookup.calls(), 2);
    }

    #[test]
    fn test_clamped_index() {
        let items = [1, 2];
        assert_eq!(clamped(&items, 0), Some(&1));
        assert_eq!(clamped(&items, 5), Some(&2));
        assert_eq!(clamped::<i32>(&[], 0), None);
    }
}
