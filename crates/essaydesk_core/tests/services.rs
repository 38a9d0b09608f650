mod common;

use common::{new_essay, new_planning, new_user, repo, SteppingClock, FEB_2024, JAN_2024};
use essaydesk_core::db::open_db_in_memory;
use essaydesk_core::model::stats::{MonthlyAverage, MonthlyCount, StatusCount, ThemeCount};
use essaydesk_core::model::user::USER_ALREADY_EXISTS;
use essaydesk_core::query::filter::{find_by_many, Predicate};
use essaydesk_core::store::{FindManyQuery, Include, Store};
use essaydesk_core::{
    Essay, EssayPatch, EssayService, EssayStatus, ListQuery, PageRequest, Planning,
    PlanningService, User, UserLookup, UserService,
};
use serde_json::json;

#[test]
fn user_create_rejects_an_active_duplicate_email() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let users = UserService::new(repo::<User>(&conn, &clock));

    let ana = users.create(&new_user("Ana", "ana@example.com")).unwrap();
    let err = users
        .create(&new_user("Ana Again", "ana@example.com"))
        .unwrap_err();
    assert_eq!(err, USER_ALREADY_EXISTS);
    assert_eq!(err.code, "USR-008");

    users.delete(&ana.id).unwrap();
    let again = users.create(&new_user("Ana Again", "ana@example.com")).unwrap();
    assert_ne!(again.id, ana.id);
}

#[test]
fn user_list_is_paginated_and_hides_passwords() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let users = UserService::new(repo::<User>(&conn, &clock));
    for index in 0..5 {
        users
            .create(&new_user(&format!("User {index}"), &format!("u{index}@example.com")))
            .unwrap();
    }

    let page = users
        .list(&ListQuery {
            page: PageRequest::new(Some(2), Some(2)),
            ..ListQuery::default()
        })
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.results.len(), 2);

    let body = serde_json::to_value(&page).unwrap();
    assert_eq!(body["totalPages"], json!(3));
    assert!(body["results"][0].get("password").is_none());
    assert_eq!(body["results"][0]["counts"], json!({"essays": 0, "plannings": 0}));

    let fetched = users
        .get(&UserLookup::Email("u3@example.com".to_string()))
        .unwrap();
    assert_eq!(fetched.name, "User 3");
}

#[test]
fn essay_dashboard_aggregates_skip_deleted_rows() {
    let conn = open_db_in_memory().unwrap();
    let jan = SteppingClock::new(JAN_2024, 1_000);
    let feb = SteppingClock::new(FEB_2024, 1_000);
    let ana = UserService::new(repo::<User>(&conn, &jan))
        .create(&new_user("Ana", "ana@example.com"))
        .unwrap();
    let bia = UserService::new(repo::<User>(&conn, &jan))
        .create(&new_user("Bia", "bia@example.com"))
        .unwrap();
    let in_jan = EssayService::new(repo::<Essay>(&conn, &jan));
    let in_feb = EssayService::new(repo::<Essay>(&conn, &feb));

    let first = in_jan.create(&new_essay(&ana.id, "One", "Climate")).unwrap();
    let second = in_jan.create(&new_essay(&ana.id, "Two", "Health")).unwrap();
    let third = in_feb.create(&new_essay(&ana.id, "Three", "Climate")).unwrap();
    let removed = in_feb.create(&new_essay(&bia.id, "Gone", "Climate")).unwrap();
    in_feb.delete(&removed.id).unwrap();

    for (id, note) in [(&first.id, 800.0), (&second.id, 600.0), (&third.id, 900.0)] {
        in_jan
            .update(
                id,
                &EssayPatch {
                    status: Some(EssayStatus::Reviewed),
                    note: Some(Some(note)),
                    ..EssayPatch::default()
                },
            )
            .unwrap();
    }
    in_jan
        .update(
            &second.id,
            &EssayPatch {
                status: Some(EssayStatus::Submitted),
                ..EssayPatch::default()
            },
        )
        .unwrap();

    assert_eq!(
        in_jan.per_month(None).unwrap(),
        vec![
            MonthlyCount {
                month: "2024-01".to_string(),
                count: 2
            },
            MonthlyCount {
                month: "2024-02".to_string(),
                count: 1
            },
        ]
    );
    assert_eq!(
        in_jan.per_theme(Some(&ana.id)).unwrap(),
        vec![
            ThemeCount {
                theme: "Climate".to_string(),
                count: 2
            },
            ThemeCount {
                theme: "Health".to_string(),
                count: 1
            },
        ]
    );
    assert_eq!(
        in_jan.per_status(None).unwrap(),
        vec![
            StatusCount {
                status: "Reviewed".to_string(),
                count: 2
            },
            StatusCount {
                status: "Submitted".to_string(),
                count: 1
            },
        ]
    );
    assert_eq!(
        in_jan.average_note_per_month(None).unwrap(),
        vec![
            MonthlyAverage {
                month: "2024-01".to_string(),
                avg: 700.0
            },
            MonthlyAverage {
                month: "2024-02".to_string(),
                avg: 900.0
            },
        ]
    );
    assert!(in_jan.per_month(Some(&bia.id)).unwrap().is_empty());
}

#[test]
fn planning_service_counts_per_month_and_links_essays() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let ana = UserService::new(repo::<User>(&conn, &clock))
        .create(&new_user("Ana", "ana@example.com"))
        .unwrap();
    let essay = EssayService::new(repo::<Essay>(&conn, &clock))
        .create(&new_essay(&ana.id, "Linked", "Climate"))
        .unwrap();
    let plannings = PlanningService::new(repo::<Planning>(&conn, &clock));

    let mut linked = new_planning(&ana.id, "With essay", "Climate");
    linked.essay_id = Some(essay.id.clone());
    let linked = plannings.create(&linked).unwrap();
    plannings
        .create(&new_planning(&ana.id, "Loose", "Climate"))
        .unwrap();

    assert!(linked.id.starts_with("plg_"));
    assert_eq!(
        plannings.per_month(Some(&ana.id)).unwrap(),
        vec![MonthlyCount {
            month: "2024-01".to_string(),
            count: 2
        }]
    );

    let predicate = Predicate::And(find_by_many(&[
        ("essay.title", json!("Linked")),
        ("user.email", json!("ana@example.com")),
    ]));
    let found = plannings
        .repository()
        .store()
        .find_many(&FindManyQuery {
            predicate,
            order: Default::default(),
            take: 10,
            skip: 0,
            include: Include::Relations,
        })
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, linked.id);
    assert_eq!(found[0].user.as_ref().map(|user| user.name.as_str()), Some("Ana"));
}
