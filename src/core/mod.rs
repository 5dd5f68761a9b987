//! In-memory authoritative collections.

/// Revisioned applicant, review, and shortlist collections.
pub mod store;
