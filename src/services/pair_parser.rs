//! Pair assembly: cell fields in, one `Pair` out.

use scraper::ElementRef;

use crate::models::{Lesson, Pair, SlotIdentifier};
use crate::services::cell::{CellFields, extract_cell};
use crate::services::reconciler::Reconciler;

/// Builds the `Pair` held by one schedule cell.
pub struct PairParser {
    reconciler: Reconciler,
}

impl PairParser {
    pub fn new(reconciler: Reconciler) -> Self {
        Self { reconciler }
    }

    /// Parse a cell element into a pair.
    ///
    /// The returned future borrows the cell's document and so is not `Send`;
    /// when the document must be dropped before awaiting, call
    /// [`extract_cell`] and [`PairParser::assemble`] separately.
    pub async fn parse_pair(&self, cell: ElementRef<'_>, slot: &SlotIdentifier) -> Pair {
        let fields = extract_cell(cell);
        self.assemble(fields, slot).await
    }

    /// Reconcile already extracted fields into a pair.
    pub async fn assemble(&self, fields: CellFields, slot: &SlotIdentifier) -> Pair {
        if fields.is_empty() {
            return Pair::new(slot.pair_number(), Vec::new());
        }

        let lessons = self
            .reconciler
            .reconcile(fields, slot)
            .await
            .into_iter()
            .map(|lesson| Lesson::new(&lesson.subject, lesson.teachers, lesson.info.as_ref()))
            .collect();

        Pair::new(slot.pair_number(), lessons)
    }
}
