use shortlist::{
    application::{ApplicationDraft, DraftError, MissingField, ReviewPatch},
    config::PortalConfig,
    engine::{filter::ApplicantQuery, priority::PriorityStatus},
    persist::{KvStore, PersistError, PersistResult, memory::MemoryKv},
    runtime::{
        events::PortalEvent,
        portal::{Portal, PortalError},
    },
    types::{Availability, ReviewKey, Role},
};

fn draft(id: &str, course: &str, role: Role) -> ApplicationDraft {
    ApplicationDraft {
        applicant_id: id.to_string(),
        display_name: None,
        course: course.to_string(),
        role: Some(role),
        availability: Some(Availability::PartTime),
        previous_roles: "marker".to_string(),
        skills: "python".to_string(),
        credentials: "BSc".to_string(),
    }
}

struct ReadOnlyKv(MemoryKv);

impl KvStore for ReadOnlyKv {
    fn get_raw(&self, key: &str) -> PersistResult<Option<String>> {
        self.0.get_raw(key)
    }

    fn set_raw(&mut self, _key: &str, _value: &str) -> PersistResult<()> {
        Err(PersistError::Sqlite(rusqlite::Error::InvalidQuery))
    }

    fn remove(&mut self, _key: &str) -> PersistResult<()> {
        Err(PersistError::Sqlite(rusqlite::Error::InvalidQuery))
    }
}

#[test]
fn mutations_emit_events_in_order_and_views_follow() {
    let mut portal = Portal::open(MemoryKv::new(), PortalConfig::default()).expect("open");
    let mut sub = portal.subscribe();

    let a = portal
        .submit_application(draft("a@example.com", "COSC1234", Role::Tutor))
        .expect("submit a");
    let b = portal
        .submit_application(draft("b@example.com", "COSC1234", Role::Tutor))
        .expect("submit b");

    let selected = portal.select_applicant(&a.review_key()).expect("select");
    assert_eq!(selected.rank, 1);
    assert_eq!(selected.comment, "");

    portal.set_rank(&a.review_key(), 2).expect("rank a");
    portal.set_comment(&a.review_key(), "clear explanations").expect("comment a");
    portal.set_rank(&b.review_key(), 1).expect("rank b");

    let expected = vec![
        PortalEvent::ApplicationSubmitted { key: a.review_key() },
        PortalEvent::ApplicationSubmitted { key: b.review_key() },
        PortalEvent::ReviewUpdated { key: a.review_key() },
        PortalEvent::ReviewUpdated { key: a.review_key() },
        PortalEvent::ReviewUpdated { key: a.review_key() },
        PortalEvent::ReviewUpdated { key: b.review_key() },
    ];
    let mut seen = Vec::new();
    while let Ok(evt) = sub.try_recv() {
        seen.push(evt);
    }
    assert_eq!(seen, expected);

    let review = portal.ledger().review(&a.review_key()).expect("review a");
    assert_eq!(review.rank, 2);
    assert_eq!(review.comment, "clear explanations");

    assert_eq!(portal.used_ranks("COSC1234", Role::Tutor).into_iter().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(portal.available_ranks("COSC1234", Role::Tutor), vec![3, 4, 5]);

    let scores = portal.priority_scores().to_vec();
    assert_eq!(scores[0].priority_score, 4);
    assert_eq!(scores[0].status, PriorityStatus::Selected);
    assert_eq!(scores[1].priority_score, 5);
    assert_eq!(scores[1].status, PriorityStatus::Highest);

    assert!(portal.deselect(&b.review_key()).expect("deselect"));
    assert!(!portal.deselect(&b.review_key()).expect("deselect again"));
    assert_eq!(portal.selection_stats().unselected_applicants, vec!["b@example.com"]);
}

#[test]
fn state_reloads_from_the_same_store() {
    let mut portal = Portal::open(MemoryKv::new(), PortalConfig::default()).expect("open");
    let rec = portal
        .submit_application(draft("a@example.com", "COSC2345", Role::LabAssistant))
        .expect("submit");
    portal.set_rank(&rec.review_key(), 3).expect("rank");
    portal
        .shortlist("a@example.com", ReviewPatch::comment("keep"))
        .expect("shortlist");

    let kv = portal.into_store().into_inner();
    let mut reopened = Portal::open(kv, PortalConfig::default()).expect("reopen");
    assert_eq!(reopened.ledger().applicants(), &[rec.clone()]);
    assert_eq!(reopened.ledger().reviews()[0].rank, 3);
    assert_eq!(reopened.ledger().shortlist()[0].comment, "keep");
    assert_eq!(reopened.shortlist_stats().most_chosen.as_deref(), Some("a@example.com"));

    assert!(reopened.remove_from_shortlist("a@example.com").expect("remove"));
    assert!(reopened.shortlist_stats().most_chosen.is_none());
}

#[test]
fn incomplete_draft_is_rejected_without_writing() {
    let mut portal = Portal::open(MemoryKv::new(), PortalConfig::default()).expect("open");
    let mut sub = portal.subscribe();

    let err = portal
        .submit_application(ApplicationDraft {
            availability: None,
            ..draft("a@example.com", "COSC1234", Role::Tutor)
        })
        .unwrap_err();
    assert!(matches!(
        err,
        PortalError::Draft(DraftError::Incomplete(ref fields)) if fields == &[MissingField::Availability]
    ));
    assert!(portal.ledger().applicants().is_empty());
    assert!(portal.store().kv().is_empty());
    assert!(sub.try_recv().is_err());
}

#[test]
fn failed_write_leaves_state_untouched() {
    let mut seed = MemoryKv::new();
    seed.set_raw(
        "applicants",
        r#"[{"email":"a@example.com","course":"COSC1234","role":"tutor","availability":"full-time","previousRoles":"","skills":"","credentials":""}]"#,
    )
    .expect("seed");

    let mut portal = Portal::open(ReadOnlyKv(seed), PortalConfig::default()).expect("open");
    assert_eq!(portal.ledger().applicants().len(), 1);

    let key = ReviewKey::new("a@example.com", "COSC1234", Role::Tutor);
    let err = portal.set_rank(&key, 1).unwrap_err();
    assert!(matches!(err, PortalError::Persist(_)));
    assert!(portal.ledger().reviews().is_empty());
    assert_eq!(portal.ledger().revisions().reviews, 0);
}

#[test]
fn listing_query_filters_and_sorts() {
    let mut portal = Portal::open(MemoryKv::new(), PortalConfig::default()).expect("open");
    for (id, course) in [("z@example.com", "COSC4567"), ("y@example.com", "COSC1234"), ("x@example.com", "COSC4567")] {
        portal.submit_application(draft(id, course, Role::Tutor)).expect("submit");
    }

    let all = portal.visible_applicants(&ApplicantQuery::default());
    let ids: Vec<_> = all.iter().map(|a| a.applicant_id.as_str()).collect();
    assert_eq!(ids, vec!["y@example.com", "z@example.com", "x@example.com"]);

    let query = ApplicantQuery {
        course: "4567".to_string(),
        search: "X@".to_string(),
        ..ApplicantQuery::default()
    };
    let hits = portal.visible_applicants(&query);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].applicant_id, "x@example.com");

    let counts: Vec<_> = portal
        .course_options()
        .into_iter()
        .map(|o| (o.code, o.applications))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("COSC1234".to_string(), 1),
            ("COSC2345".to_string(), 0),
            ("COSC3456".to_string(), 0),
            ("COSC4567".to_string(), 2),
        ]
    );
}
