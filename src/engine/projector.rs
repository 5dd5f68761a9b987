//! Revision-keyed memoization of the derived views.

use crate::{
    core::store::Ledger,
    types::{Rank, Revision},
};

use super::{
    priority::{PriorityScore, compute_priority_scores},
    stats::{SelectionStats, compute_selection_stats},
};

type InputKey = (Revision, Revision);

#[derive(Debug)]
struct Cached<T> {
    key: InputKey,
    value: T,
}

/// Memoizes derived views on the revisions of their input collections.
///
/// A view is recomputed only when the applicant revision or the revision of
/// the selection collection it reads has moved since the last call.
#[derive(Debug)]
pub struct Projector {
    max_rank: Rank,
    review_stats: Option<Cached<SelectionStats>>,
    shortlist_stats: Option<Cached<SelectionStats>>,
    priority: Option<Cached<Vec<PriorityScore>>>,
    recomputes: u64,
}

impl Projector {
    /// Empty projector scoring against `max_rank`.
    pub fn new(max_rank: Rank) -> Self {
        Self {
            max_rank,
            review_stats: None,
            shortlist_stats: None,
            priority: None,
            recomputes: 0,
        }
    }

    /// Rank ceiling used for priority scores.
    pub fn max_rank(&self) -> Rank {
        self.max_rank
    }

    /// Number of view computations performed so far.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Drops every cached view.
    pub fn invalidate(&mut self) {
        self.review_stats = None;
        self.shortlist_stats = None;
        self.priority = None;
    }

    /// Selection summary over per-course reviews.
    pub fn review_stats(&mut self, ledger: &Ledger) -> &SelectionStats {
        let rev = ledger.revisions();
        let key = (rev.applicants, rev.reviews);
        let recomputes = &mut self.recomputes;
        &refresh(&mut self.review_stats, key, recomputes, || {
            compute_selection_stats(ledger.applicants(), ledger.reviews())
        })
        .value
    }

    /// Selection summary over the flat shortlist.
    pub fn shortlist_stats(&mut self, ledger: &Ledger) -> &SelectionStats {
        let rev = ledger.revisions();
        let key = (rev.applicants, rev.shortlist);
        let recomputes = &mut self.recomputes;
        &refresh(&mut self.shortlist_stats, key, recomputes, || {
            compute_selection_stats(ledger.applicants(), ledger.shortlist())
        })
        .value
    }

    /// Priority scores over per-course reviews.
    pub fn priority_scores(&mut self, ledger: &Ledger) -> &[PriorityScore] {
        let rev = ledger.revisions();
        let key = (rev.applicants, rev.reviews);
        let max_rank = self.max_rank;
        let recomputes = &mut self.recomputes;
        &refresh(&mut self.priority, key, recomputes, || {
            compute_priority_scores(ledger.applicants(), ledger.reviews(), max_rank)
        })
        .value
    }
}

fn refresh<'a, T>(
    slot: &'a mut Option<Cached<T>>,
    key: InputKey,
    recomputes: &mut u64,
    compute: impl FnOnce() -> T,
) -> &'a Cached<T> {
    if slot.as_ref().is_some_and(|c| c.key != key) {
        *slot = None;
    }
    if slot.is_none() {
        *recomputes += 1;
    }
    slot.get_or_insert_with(|| Cached { key, value: compute() })
}
