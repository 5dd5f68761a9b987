//! Last-write-wins merges of lecturer decisions.
//!
//! Rank bounds are not checked here. The two lecturer views disagree on the
//! ceiling (5 or 10), so callers clamp against their own `max_rank` before
//! writing, and use [`super::ranks::compute_used_ranks`] to steer away from
//! duplicate ranks.

use crate::{
    application::{ReviewEntry, ReviewPatch, ShortlistEntry},
    types::ReviewKey,
};

/// Merges `patch` onto the review stored under `key`.
///
/// A missing entry starts from rank 1 and an empty comment. Existing keys
/// keep their position; new keys are appended.
pub fn upsert_review(reviews: &[ReviewEntry], key: &ReviewKey, patch: &ReviewPatch) -> Vec<ReviewEntry> {
    let mut out = reviews.to_vec();
    match out.iter_mut().find(|r| r.matches(key)) {
        Some(entry) => patch.apply_to(entry),
        None => {
            let mut entry = ReviewEntry {
                applicant_id: key.applicant_id.clone(),
                course: key.course.clone(),
                role: key.role,
                rank: ReviewPatch::DEFAULT_RANK,
                comment: String::new(),
            };
            patch.apply_to(&mut entry);
            out.push(entry);
        }
    }
    out
}

/// Drops the review stored under `key`, if any.
pub fn remove_review(reviews: &[ReviewEntry], key: &ReviewKey) -> Vec<ReviewEntry> {
    reviews.iter().filter(|r| !r.matches(key)).cloned().collect()
}

/// Merges `patch` onto the shortlist entry for `applicant_id`.
pub fn upsert_shortlist(shortlist: &[ShortlistEntry], applicant_id: &str, patch: &ReviewPatch) -> Vec<ShortlistEntry> {
    let mut out = shortlist.to_vec();
    match out.iter_mut().find(|e| e.applicant_id == applicant_id) {
        Some(entry) => patch.apply_to_shortlist(entry),
        None => {
            let mut entry = ShortlistEntry {
                applicant_id: applicant_id.to_string(),
                rank: ReviewPatch::DEFAULT_RANK,
                comment: String::new(),
            };
            patch.apply_to_shortlist(&mut entry);
            out.push(entry);
        }
    }
    out
}

/// Drops the shortlist entry for `applicant_id`, if any.
pub fn remove_shortlist(shortlist: &[ShortlistEntry], applicant_id: &str) -> Vec<ShortlistEntry> {
    shortlist
        .iter()
        .filter(|e| e.applicant_id != applicant_id)
        .cloned()
        .collect()
}
