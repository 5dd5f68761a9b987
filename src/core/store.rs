//! Authoritative in-memory collections with a revision per collection.

use crate::{
    application::{ApplicationRecord, ReviewEntry, ShortlistEntry},
    types::{ReviewKey, Revision},
};

/// Plain copy of every collection, as loaded from or saved to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Submitted applications in submission order.
    pub applicants: Vec<ApplicationRecord>,
    /// Per-course review decisions.
    pub reviews: Vec<ReviewEntry>,
    /// Flat shortlist decisions.
    pub shortlist: Vec<ShortlistEntry>,
}

/// Revision counters, one per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Revisions {
    /// Bumped on every applicant append.
    pub applicants: Revision,
    /// Bumped on every review write or removal.
    pub reviews: Revision,
    /// Bumped on every shortlist write or removal.
    pub shortlist: Revision,
}

/// Authoritative in-memory state with a revision per collection.
///
/// Writes replace a whole collection at once; callers build the next
/// collection with the pure merges in [`crate::engine::review`] and persist
/// it before handing it over.
#[derive(Debug, Default)]
pub struct Ledger {
    applicants: Vec<ApplicationRecord>,
    reviews: Vec<ReviewEntry>,
    shortlist: Vec<ShortlistEntry>,
    revisions: Revisions,
}

impl Ledger {
    /// Empty ledger at revision zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger seeded from loaded collections, at revision zero.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            applicants: snapshot.applicants,
            reviews: snapshot.reviews,
            shortlist: snapshot.shortlist,
            revisions: Revisions::default(),
        }
    }

    /// Applications in submission order.
    pub fn applicants(&self) -> &[ApplicationRecord] {
        &self.applicants
    }

    /// Per-course review decisions.
    pub fn reviews(&self) -> &[ReviewEntry] {
        &self.reviews
    }

    /// Flat shortlist decisions.
    pub fn shortlist(&self) -> &[ShortlistEntry] {
        &self.shortlist
    }

    /// Current revision counters.
    pub fn revisions(&self) -> Revisions {
        self.revisions
    }

    /// Review stored under `key`.
    pub fn review(&self, key: &ReviewKey) -> Option<&ReviewEntry> {
        self.reviews.iter().find(|r| r.matches(key))
    }

    /// Shortlist entry for `applicant_id`.
    pub fn shortlist_entry(&self, applicant_id: &str) -> Option<&ShortlistEntry> {
        self.shortlist.iter().find(|e| e.applicant_id == applicant_id)
    }

    /// Appends a validated application.
    pub fn append_application(&mut self, record: ApplicationRecord) {
        self.applicants.push(record);
        self.revisions.applicants += 1;
    }

    /// Swaps in the next review collection.
    pub fn replace_reviews(&mut self, reviews: Vec<ReviewEntry>) {
        self.reviews = reviews;
        self.revisions.reviews += 1;
    }

    /// Swaps in the next shortlist.
    pub fn replace_shortlist(&mut self, shortlist: Vec<ShortlistEntry>) {
        self.shortlist = shortlist;
        self.revisions.shortlist += 1;
    }
}
