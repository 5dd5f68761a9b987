//! Selection counts, most/least chosen summaries, and bar chart series.

use hashbrown::{HashMap, HashSet};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{application::ApplicationRecord, types::ApplicantId};

use super::traits::Selection;

/// Per-applicant selection counts in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCount {
    order: Vec<ApplicantId>,
    counts: HashMap<ApplicantId, usize>,
}

impl SelectionCount {
    /// Counts one selection per entry, keyed by applicant.
    pub fn tally<S: Selection>(selections: &[S]) -> Self {
        let mut out = Self::default();
        for sel in selections {
            let id = sel.applicant_id();
            match out.counts.get_mut(id) {
                Some(n) => *n += 1,
                None => {
                    out.order.push(id.to_string());
                    out.counts.insert(id.to_string(), 1);
                }
            }
        }
        out
    }

    /// Count for `applicant_id`, zero when never selected.
    pub fn get(&self, applicant_id: &str) -> usize {
        self.counts.get(applicant_id).copied().unwrap_or(0)
    }

    /// True when the applicant was selected at least once.
    pub fn contains(&self, applicant_id: &str) -> bool {
        self.counts.contains_key(applicant_id)
    }

    /// Number of distinct selected applicants.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nobody has been selected.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates `(applicant, count)` in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.counts.get(id).copied().unwrap_or(0)))
    }
}

impl Serialize for SelectionCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (id, count) in self.iter() {
            map.serialize_entry(id, &count)?;
        }
        map.end()
    }
}

/// One bar of the selection chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarPoint {
    /// Applicant the bar belongs to.
    #[serde(rename = "email")]
    pub applicant_id: ApplicantId,
    /// Number of selections.
    pub count: usize,
}

/// Derived selection summary over the applicant and selection collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStats {
    /// Per-applicant selection counts.
    pub selection_count: SelectionCount,
    /// Applicant with the highest count, `None` when nothing is selected.
    pub most_chosen: Option<ApplicantId>,
    /// Applicant with the lowest count, `None` when nothing is selected.
    pub least_chosen: Option<ApplicantId>,
    /// Applicants never selected, in applicant order.
    ///
    /// This is a set: an applicant with several application rows is listed
    /// once, unlike [`SelectionStats::bar_chart_series`] which keeps one bar
    /// per row.
    pub unselected_applicants: Vec<ApplicantId>,
    /// One bar per applicant row, including repeated rows and zero counts.
    pub bar_chart_series: Vec<BarPoint>,
}

/// Aggregates the selection summary for the current collections.
///
/// Counts are ordered descending with a stable sort over first-appearance
/// order. `most_chosen` is the head of that order and `least_chosen` its
/// tail, so among tied applicants the earliest selected is most chosen and
/// the latest selected is least chosen.
pub fn compute_selection_stats<S: Selection>(
    applicants: &[ApplicationRecord],
    selections: &[S],
) -> SelectionStats {
    let selection_count = SelectionCount::tally(selections);

    let mut ranked: Vec<(&str, usize)> = selection_count.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let most_chosen = ranked.first().map(|(id, _)| (*id).to_string());
    let least_chosen = ranked.last().map(|(id, _)| (*id).to_string());

    let mut seen: HashSet<&str> = HashSet::new();
    let unselected_applicants = applicants
        .iter()
        .map(|a| a.applicant_id.as_str())
        .filter(|id| !selection_count.contains(id) && seen.insert(*id))
        .map(str::to_string)
        .collect();

    let bar_chart_series = applicants
        .iter()
        .map(|a| BarPoint {
            applicant_id: a.applicant_id.clone(),
            count: selection_count.get(&a.applicant_id),
        })
        .collect();

    SelectionStats {
        selection_count,
        most_chosen,
        least_chosen,
        unselected_applicants,
        bar_chart_series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::ShortlistEntry,
        types::{Availability, Role},
    };

    fn applicant(id: &str) -> ApplicationRecord {
        ApplicationRecord {
            applicant_id: id.to_string(),
            display_name: None,
            course: "COSC1234".to_string(),
            role: Role::Tutor,
            availability: Availability::PartTime,
            previous_roles: String::new(),
            skills: String::new(),
            credentials: String::new(),
        }
    }

    fn pick(id: &str) -> ShortlistEntry {
        ShortlistEntry {
            applicant_id: id.to_string(),
            rank: 1,
            comment: String::new(),
        }
    }

    #[test]
    fn ties_resolve_by_first_selection() {
        let apps = [applicant("a"), applicant("b")];
        let stats = compute_selection_stats(&apps, &[pick("b"), pick("a")]);
        assert_eq!(stats.most_chosen.as_deref(), Some("b"));
        assert_eq!(stats.least_chosen.as_deref(), Some("a"));
    }

    #[test]
    fn single_selected_applicant_is_both_most_and_least() {
        let stats = compute_selection_stats(&[applicant("a")], &[pick("a"), pick("a")]);
        assert_eq!(stats.most_chosen.as_deref(), Some("a"));
        assert_eq!(stats.least_chosen.as_deref(), Some("a"));
    }

    #[test]
    fn selections_for_unknown_applicants_still_count() {
        let stats = compute_selection_stats(&[applicant("a")], &[pick("ghost")]);
        assert_eq!(stats.selection_count.get("ghost"), 1);
        assert_eq!(stats.unselected_applicants, vec!["a".to_string()]);
        assert_eq!(stats.bar_chart_series.len(), 1);
        assert_eq!(stats.bar_chart_series[0].count, 0);
    }

    #[test]
    fn duplicate_rows_repeat_bars_but_not_unselected() {
        let apps = [applicant("a"), applicant("b"), applicant("a"), applicant("b")];
        let stats = compute_selection_stats(&apps, &[pick("a")]);
        let bars: Vec<_> = stats
            .bar_chart_series
            .iter()
            .map(|p| (p.applicant_id.as_str(), p.count))
            .collect();
        assert_eq!(bars, vec![("a", 1), ("b", 0), ("a", 1), ("b", 0)]);
        assert_eq!(stats.unselected_applicants, vec!["b".to_string()]);
    }

    #[test]
    fn serializes_counts_in_first_appearance_order() {
        let stats = compute_selection_stats(&[], &[pick("z"), pick("a"), pick("z")]);
        let json = serde_json::to_string(&stats.selection_count).expect("encode");
        assert_eq!(json, r#"{"z":2,"a":1}"#);
        assert_eq!(stats.selection_count.iter().collect::<Vec<_>>(), vec![("z", 2), ("a", 1)]);
    }
}
