//! Portal orchestration and memoized views.

use std::collections::BTreeSet;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::{
    application::{ApplicationDraft, ApplicationRecord, DraftError, ReviewEntry, ReviewPatch, ShortlistEntry},
    config::PortalConfig,
    core::store::Ledger,
    engine::{
        filter::{ApplicantQuery, CourseOption, course_options},
        priority::PriorityScore,
        projector::Projector,
        ranks::{available_ranks, compute_used_ranks},
        review,
        stats::SelectionStats,
    },
    persist::{KvStore, PersistError, RecordStore},
    types::{Rank, ReviewKey, Role},
};

use super::events::PortalEvent;

/// Failure of a portal operation.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// The store could not be read or written.
    #[error(transparent)]
    Persist(#[from] PersistError),
    /// A submitted draft was incomplete.
    #[error(transparent)]
    Draft(#[from] DraftError),
}

/// Owns the record store, the in-memory collections, and the derived views.
///
/// Every mutation is a read-modify-write: the next collection is built with
/// the pure merges, persisted, and only then swapped into the ledger and
/// announced. A failed write leaves the in-memory state untouched.
pub struct Portal<K: KvStore> {
    store: RecordStore<K>,
    ledger: Ledger,
    projector: Projector,
    config: PortalConfig,
    events_tx: broadcast::Sender<PortalEvent>,
}

impl<K: KvStore> Portal<K> {
    /// Loads every collection from `kv` and starts at revision zero.
    pub fn open(kv: K, config: PortalConfig) -> Result<Self, PortalError> {
        let store = RecordStore::new(kv, config.storage.clone());
        let snapshot = store.load_snapshot()?;
        info!(
            applicants = snapshot.applicants.len(),
            reviews = snapshot.reviews.len(),
            shortlist = snapshot.shortlist.len(),
            "portal opened"
        );

        let (events_tx, _) = broadcast::channel(config.events.channel_capacity.max(1));
        Ok(Self {
            store,
            ledger: Ledger::from_snapshot(snapshot),
            projector: Projector::new(config.ranking.max_rank),
            config,
            events_tx,
        })
    }

    /// New receiver for events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PortalEvent> {
        self.events_tx.subscribe()
    }

    /// Active configuration.
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Current in-memory collections.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Record store adapter.
    pub fn store(&self) -> &RecordStore<K> {
        &self.store
    }

    /// Consumes the portal and returns its record store.
    pub fn into_store(self) -> RecordStore<K> {
        self.store
    }

    /// Configured rank ceiling.
    pub fn max_rank(&self) -> Rank {
        self.config.ranking.max_rank
    }

    /// Validates `draft`, then appends and persists the record.
    pub fn submit_application(&mut self, draft: ApplicationDraft) -> Result<ApplicationRecord, PortalError> {
        let record = draft.validate()?;
        let mut next = self.ledger.applicants().to_vec();
        next.push(record.clone());
        self.store.save_applicants(&next)?;
        self.ledger.append_application(record.clone());

        let key = record.review_key();
        info!(%key, "application submitted");
        self.emit(PortalEvent::ApplicationSubmitted { key });
        Ok(record)
    }

    /// Marks an application as selected, keeping any earlier rank and comment.
    pub fn select_applicant(&mut self, key: &ReviewKey) -> Result<ReviewEntry, PortalError> {
        self.update_review(key, ReviewPatch::default())
    }

    /// Sets the rank for `key`, creating the review when missing.
    pub fn set_rank(&mut self, key: &ReviewKey, rank: Rank) -> Result<ReviewEntry, PortalError> {
        self.update_review(key, ReviewPatch::rank(rank))
    }

    /// Sets the comment for `key`, creating the review when missing.
    pub fn set_comment(&mut self, key: &ReviewKey, comment: impl Into<String>) -> Result<ReviewEntry, PortalError> {
        self.update_review(key, ReviewPatch::comment(comment))
    }

    /// Merges `patch` into the review for `key` and persists the collection.
    ///
    /// Out-of-range or already claimed ranks are written as given.
    pub fn update_review(&mut self, key: &ReviewKey, patch: ReviewPatch) -> Result<ReviewEntry, PortalError> {
        let current = self.ledger.reviews();
        if let Some(rank) = patch.rank {
            let claimed = current
                .iter()
                .any(|r| !r.matches(key) && r.course == key.course && r.role == key.role && r.rank == rank);
            if claimed {
                debug!(%key, rank, "rank already claimed for this course and role");
            }
            if rank == 0 || rank > self.max_rank() {
                debug!(%key, rank, max_rank = self.max_rank(), "rank outside configured range");
            }
        }

        let idx = current
            .iter()
            .position(|r| r.matches(key))
            .unwrap_or(current.len());
        let next = review::upsert_review(current, key, &patch);
        let entry = next[idx].clone();

        self.store.save_reviews(&next)?;
        self.ledger.replace_reviews(next);
        debug!(%key, rank = entry.rank, "review updated");
        self.emit(PortalEvent::ReviewUpdated { key: key.clone() });
        Ok(entry)
    }

    /// Returns true when a review existed and was removed.
    pub fn deselect(&mut self, key: &ReviewKey) -> Result<bool, PortalError> {
        if self.ledger.review(key).is_none() {
            return Ok(false);
        }
        let next = review::remove_review(self.ledger.reviews(), key);
        self.store.save_reviews(&next)?;
        self.ledger.replace_reviews(next);
        debug!(%key, "review removed");
        self.emit(PortalEvent::ReviewRemoved { key: key.clone() });
        Ok(true)
    }

    /// Merges `patch` into the flat shortlist entry for `applicant_id`.
    pub fn shortlist(&mut self, applicant_id: &str, patch: ReviewPatch) -> Result<ShortlistEntry, PortalError> {
        let current = self.ledger.shortlist();
        let idx = current
            .iter()
            .position(|e| e.applicant_id == applicant_id)
            .unwrap_or(current.len());
        let next = review::upsert_shortlist(current, applicant_id, &patch);
        let entry = next[idx].clone();

        self.store.save_shortlist(&next)?;
        self.ledger.replace_shortlist(next);
        debug!(applicant_id, rank = entry.rank, "shortlist updated");
        self.emit(PortalEvent::ShortlistUpdated {
            applicant_id: applicant_id.to_string(),
        });
        Ok(entry)
    }

    /// Returns true when the applicant was on the shortlist.
    pub fn remove_from_shortlist(&mut self, applicant_id: &str) -> Result<bool, PortalError> {
        if self.ledger.shortlist_entry(applicant_id).is_none() {
            return Ok(false);
        }
        let next = review::remove_shortlist(self.ledger.shortlist(), applicant_id);
        self.store.save_shortlist(&next)?;
        self.ledger.replace_shortlist(next);
        self.emit(PortalEvent::ShortlistRemoved {
            applicant_id: applicant_id.to_string(),
        });
        Ok(true)
    }

    /// Selection summary over per-course reviews.
    pub fn selection_stats(&mut self) -> &SelectionStats {
        self.projector.review_stats(&self.ledger)
    }

    /// Selection summary over the flat shortlist.
    pub fn shortlist_stats(&mut self) -> &SelectionStats {
        self.projector.shortlist_stats(&self.ledger)
    }

    /// Priority scores over per-course reviews.
    pub fn priority_scores(&mut self) -> &[PriorityScore] {
        self.projector.priority_scores(&self.ledger)
    }

    /// Ranks already assigned for `course` and `role`.
    pub fn used_ranks(&self, course: &str, role: Role) -> BTreeSet<Rank> {
        compute_used_ranks(self.ledger.reviews(), course, role)
    }

    /// Ranks in `1..=max_rank` still free for `course` and `role`.
    pub fn available_ranks(&self, course: &str, role: Role) -> Vec<Rank> {
        available_ranks(self.ledger.reviews(), course, role, self.max_rank())
    }

    /// Applicants passing `query`, in its sort order.
    pub fn visible_applicants(&self, query: &ApplicantQuery) -> Vec<&ApplicationRecord> {
        query.apply(self.ledger.applicants())
    }

    /// Offered courses plus any other codes applicants used, with counts.
    pub fn course_options(&self) -> Vec<CourseOption> {
        course_options(self.ledger.applicants())
    }

    fn emit(&self, event: PortalEvent) {
        // No subscribers is fine; nobody is rendering.
        let _ = self.events_tx.send(event);
    }
}
