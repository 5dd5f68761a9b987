//! Normalized priority scores for the applicant priority chart.

use hashbrown::{HashMap, HashSet};
use serde::Serialize;

use crate::{
    application::ApplicationRecord,
    types::{ApplicantId, Rank},
};

use super::traits::Selection;

/// Chart tag for a scored applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityStatus {
    /// Selected and tied for the top score.
    Highest,
    /// Selected.
    Selected,
    /// Never selected.
    Unselected,
}

/// Priority score of one distinct applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScore {
    /// Scored applicant.
    #[serde(rename = "email")]
    pub applicant_id: ApplicantId,
    /// `max_rank + 1 - rank` when selected, otherwise 0.
    pub priority_score: i64,
    /// Chart tag.
    pub status: PriorityStatus,
}

/// Converts a rank into a score where rank 1 scores `max_rank`.
///
/// Ranks above `max_rank` go negative; bounds are the caller's concern.
pub fn score_for_rank(rank: Rank, max_rank: Rank) -> i64 {
    i64::from(max_rank) + 1 - i64::from(rank)
}

/// Scores every distinct applicant, in order of first appearance.
///
/// Selections are matched on applicant id alone; when an applicant holds
/// several, the first one in collection order supplies the rank.
pub fn compute_priority_scores<S: Selection>(
    applicants: &[ApplicationRecord],
    selections: &[S],
    max_rank: Rank,
) -> Vec<PriorityScore> {
    let mut first_rank: HashMap<&str, Rank> = HashMap::new();
    for sel in selections {
        first_rank.entry(sel.applicant_id()).or_insert(sel.rank());
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut scores: Vec<PriorityScore> = applicants
        .iter()
        .map(|a| a.applicant_id.as_str())
        .filter(|id| seen.insert(*id))
        .map(|id| match first_rank.get(id) {
            Some(rank) => PriorityScore {
                applicant_id: id.to_string(),
                priority_score: score_for_rank(*rank, max_rank),
                status: PriorityStatus::Selected,
            },
            None => PriorityScore {
                applicant_id: id.to_string(),
                priority_score: 0,
                status: PriorityStatus::Unselected,
            },
        })
        .collect();

    let Some(highest) = scores.iter().map(|s| s.priority_score).max() else {
        return scores;
    };
    for s in &mut scores {
        if s.status == PriorityStatus::Selected && s.priority_score == highest {
            s.status = PriorityStatus::Highest;
        }
    }
    scores
}
