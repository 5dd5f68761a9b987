//! Aggregation engine: pure derived views over applicants and selections.

/// Search, course filter, and sort helpers.
pub mod filter;
/// Priority scores for the priority chart.
pub mod priority;
/// Revision-keyed memoization of derived views.
pub mod projector;
/// Used and available ranks per course and role.
pub mod ranks;
/// Last-write-wins review and shortlist merges.
pub mod review;
/// Selection counts and most/least chosen summaries.
pub mod stats;
/// Selection trait shared by review and shortlist entries.
pub mod traits;

