//! Rank bookkeeping per course and role.

use std::collections::BTreeSet;

use crate::{
    application::ReviewEntry,
    types::{Rank, Role},
};

/// Ranks already claimed by reviews for `(course, role)`.
pub fn compute_used_ranks(reviews: &[ReviewEntry], course: &str, role: Role) -> BTreeSet<Rank> {
    reviews
        .iter()
        .filter(|r| r.course == course && r.role == role)
        .map(|r| r.rank)
        .collect()
}

/// Ranks in `1..=max_rank` not yet claimed for `(course, role)`, ascending.
pub fn available_ranks(reviews: &[ReviewEntry], course: &str, role: Role, max_rank: Rank) -> Vec<Rank> {
    let used = compute_used_ranks(reviews, course, role);
    (1..=max_rank).filter(|r| !used.contains(r)).collect()
}
