//! Applicant ranking, shortlisting, and selection statistics for tutor hiring.
//!
//! The aggregation engine in [`engine`] is a set of pure functions over the
//! applicant collection and the lecturer decisions. [`persist`] adapts a
//! key-value store to typed JSON collections, and [`runtime::portal`] ties
//! the two together with memoized views and change events.
//!
//! # Examples
//!
//! Pure aggregation:
//! ```
//! use shortlist::{
//!     application::{ApplicationRecord, ReviewPatch},
//!     engine::{priority::{PriorityStatus, compute_priority_scores}, review::upsert_review, stats::compute_selection_stats},
//!     types::{Availability, ReviewKey, Role},
//! };
//!
//! let applicant = |id: &str| ApplicationRecord {
//!     applicant_id: id.to_string(),
//!     display_name: None,
//!     course: "COSC1234".to_string(),
//!     role: Role::Tutor,
//!     availability: Availability::PartTime,
//!     previous_roles: String::new(),
//!     skills: String::new(),
//!     credentials: String::new(),
//! };
//! let applicants = vec![applicant("a@example.com"), applicant("b@example.com")];
//!
//! let key = ReviewKey::new("a@example.com", "COSC1234", Role::Tutor);
//! let reviews = upsert_review(&[], &key, &ReviewPatch::rank(2));
//!
//! let stats = compute_selection_stats(&applicants, &reviews);
//! assert_eq!(stats.most_chosen.as_deref(), Some("a@example.com"));
//! assert_eq!(stats.unselected_applicants, vec!["b@example.com".to_string()]);
//!
//! let scores = compute_priority_scores(&applicants, &reviews, 5);
//! assert_eq!(scores[0].priority_score, 4);
//! assert_eq!(scores[0].status, PriorityStatus::Highest);
//! ```
//!
//! Portal over a SQLite file:
//! ```no_run
//! use shortlist::{
//!     application::ApplicationDraft,
//!     config::PortalConfig,
//!     persist::sqlite::SqliteKv,
//!     runtime::portal::Portal,
//!     types::{Availability, Role},
//! };
//!
//! let config = PortalConfig::default();
//! let kv = SqliteKv::open(&config.storage.db_path).expect("open sqlite");
//! let mut portal = Portal::open(kv, config).expect("open portal");
//! let record = portal.submit_application(ApplicationDraft {
//!     applicant_id: "tutor@example.com".to_string(),
//!     course: "COSC1234".to_string(),
//!     role: Some(Role::Tutor),
//!     availability: Some(Availability::FullTime),
//!     previous_roles: "TA".to_string(),
//!     skills: "Rust".to_string(),
//!     credentials: "BSc".to_string(),
//!     ..ApplicationDraft::default()
//! }).expect("submit");
//! portal.set_rank(&record.review_key(), 1).expect("rank");
//! println!("{:?}", portal.priority_scores());
//! ```
#![deny(missing_docs)]

/// Application records, drafts, decisions, and patches.
pub mod application;
/// TOML configuration.
pub mod config;
/// Revisioned in-memory collections.
pub mod core;
/// Aggregation engine and memoizing projector.
pub mod engine;
/// Key-value persistence and the typed record store.
pub mod persist;
/// Portal orchestration and change events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
