use tempfile::TempDir;

use shortlist::{
    application::{ApplicationRecord, ReviewEntry, ShortlistEntry},
    config::StorageConfig,
    core::store::LedgerSnapshot,
    engine::stats::compute_selection_stats,
    persist::{KvStore, RecordStore, sqlite::SqliteKv},
    types::{Availability, Role},
};

fn applicant(id: &str, course: &str) -> ApplicationRecord {
    ApplicationRecord {
        applicant_id: id.to_string(),
        display_name: Some(id.to_uppercase()),
        course: course.to_string(),
        role: Role::LabAssistant,
        availability: Availability::FullTime,
        previous_roles: "demonstrator".to_string(),
        skills: "C, Rust".to_string(),
        credentials: "MSc".to_string(),
    }
}

fn snapshot() -> LedgerSnapshot {
    LedgerSnapshot {
        applicants: vec![applicant("a", "COSC1234"), applicant("b", "COSC3456")],
        reviews: vec![ReviewEntry {
            applicant_id: "b".to_string(),
            course: "COSC3456".to_string(),
            role: Role::LabAssistant,
            rank: 2,
            comment: "good lab notes".to_string(),
        }],
        shortlist: vec![ShortlistEntry {
            applicant_id: "a".to_string(),
            rank: 1,
            comment: String::new(),
        }],
    }
}

#[test]
fn collections_survive_reopen() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("portal.db");

    let mut store = RecordStore::new(SqliteKv::open(&db_path).expect("open sqlite"), StorageConfig::default());
    store.save_snapshot(&snapshot()).expect("save");
    drop(store);

    let reopened = RecordStore::new(SqliteKv::open(&db_path).expect("reopen"), StorageConfig::default());
    let loaded = reopened.load_snapshot().expect("load");
    assert_eq!(loaded, snapshot());
    assert_eq!(
        compute_selection_stats(&loaded.applicants, &loaded.reviews),
        compute_selection_stats(&snapshot().applicants, &snapshot().reviews)
    );
}

#[test]
fn overwrite_replaces_value_and_remove_deletes() {
    let mut kv = SqliteKv::open_in_memory().expect("open");
    kv.set_raw("reviews", "[]").expect("set");
    kv.set_raw("reviews", "[1]").expect("overwrite");
    kv.set_raw("applicants", "[]").expect("set");

    assert_eq!(kv.get_raw("reviews").expect("get").as_deref(), Some("[1]"));
    assert_eq!(kv.keys().expect("keys"), vec!["applicants", "reviews"]);
    assert!(kv.updated_ms("reviews").expect("ts").is_some());

    kv.remove("reviews").expect("remove");
    kv.remove("reviews").expect("remove missing");
    assert_eq!(kv.get_raw("reviews").expect("get"), None);
    assert_eq!(kv.updated_ms("reviews").expect("ts"), None);
}

#[test]
fn malformed_stored_json_loads_as_empty() {
    let mut kv = SqliteKv::open_in_memory().expect("open");
    kv.set_raw("applicants", "[{\"email\": 42}]").expect("set");
    kv.set_raw("shortlist", "not json at all").expect("set");

    let store = RecordStore::new(kv, StorageConfig::default());
    let loaded = store.load_snapshot().expect("load");
    assert_eq!(loaded, LedgerSnapshot::default());
}

#[test]
fn keyed_review_object_loads_like_an_array() {
    let mut kv = SqliteKv::open_in_memory().expect("open");
    kv.set_raw(
        "reviews",
        r#"{
            "b_COSC1234_tutor": {"email": "b", "course": "COSC1234", "role": "tutor", "rank": 2, "comment": "ok"},
            "a_COSC1234_tutor": {"username": "a", "course": "COSC1234", "role": "tutor", "rank": 1, "comment": "Great"}
        }"#,
    )
    .expect("set");

    let mut store = RecordStore::new(kv, StorageConfig::default());
    let reviews = store.load_reviews().expect("load");
    let keys: Vec<_> = reviews.iter().map(|r| (r.applicant_id.as_str(), r.rank)).collect();
    assert_eq!(keys, vec![("b", 2), ("a", 1)]);

    let apps = [applicant("a", "COSC1234"), applicant("b", "COSC1234"), applicant("c", "COSC1234")];
    let stats = compute_selection_stats(&apps, &reviews);
    assert_eq!(stats.unselected_applicants, vec!["c".to_string()]);

    // Saving normalizes to the array form.
    store.save_reviews(&reviews).expect("save");
    let raw = store.kv().get_raw("reviews").expect("get").expect("present");
    assert!(raw.starts_with('['));
    assert_eq!(store.load_reviews().expect("reload"), reviews);
}
