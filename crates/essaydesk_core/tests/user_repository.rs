mod common;

use common::{new_essay, new_planning, new_user, repo, resource, SteppingClock, JAN_2024};
use essaydesk_core::db::open_db_in_memory;
use essaydesk_core::model::user::{UserCounts, USER_ERRORS};
use essaydesk_core::query::order::{Direction, OrderSpec};
use essaydesk_core::query::pagination::DEFAULT_PAGE_SIZE;
use essaydesk_core::{
    Essay, ErrorKind, ListQuery, OutcomeExt, PageRequest, Planning, User, UserLookup, UserPatch,
};
use serde_json::json;

#[test]
fn create_stamps_id_and_created_at_only() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let users = repo::<User>(&conn, &clock);

    let user = users.create(&new_user("Ana", "ana@example.com")).unwrap();

    assert!(user.id.starts_with("usr_"));
    assert_eq!(user.created_at, JAN_2024);
    assert_eq!(user.updated_at, None);
    assert_eq!(user.deleted_at, None);
    assert!(!user.is_master);
}

#[test]
fn find_by_email_loads_active_child_counts() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let users = repo::<User>(&conn, &clock);
    let essays = repo::<Essay>(&conn, &clock);
    let plannings = repo::<Planning>(&conn, &clock);

    let ana = users.create(&new_user("Ana", "ana@example.com")).unwrap();
    let kept = essays.create(&new_essay(&ana.id, "Kept", "Climate")).unwrap();
    let dropped = essays.create(&new_essay(&ana.id, "Dropped", "Climate")).unwrap();
    plannings
        .create(&new_planning(&ana.id, "Outline", "Climate"))
        .unwrap();
    essays.delete(&dropped.id).unwrap();

    let loaded = users
        .find_by(&UserLookup::Email("ana@example.com".to_string()))
        .unwrap();
    assert_eq!(loaded.id, ana.id);
    assert_eq!(
        loaded.counts,
        Some(UserCounts {
            essays: 1,
            plannings: 1
        })
    );
    assert!(essays.find_by(&essaydesk_core::EssayLookup::Id(kept.id)).is_success());
}

#[test]
fn update_sets_updated_at_and_keeps_created_at() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let users = repo::<User>(&conn, &clock);
    let user = users.create(&new_user("Ana", "ana@example.com")).unwrap();

    let patch = UserPatch {
        name: Some("Ana Maria".to_string()),
        phone: Some(Some("+55 11 99999-0000".to_string())),
        ..UserPatch::default()
    };
    let before = clock.peek();
    let updated = users.update(&user.id, &patch).unwrap();

    assert_eq!(updated.name, "Ana Maria");
    assert_eq!(updated.phone.as_deref(), Some("+55 11 99999-0000"));
    assert_eq!(updated.email, "ana@example.com");
    assert_eq!(updated.created_at, JAN_2024);
    assert_eq!(updated.updated_at, Some(before));

    let cleared = users
        .update(
            &user.id,
            &UserPatch {
                phone: Some(None),
                ..UserPatch::default()
            },
        )
        .unwrap();
    assert_eq!(cleared.phone, None);
}

#[test]
fn deleted_user_is_invisible_and_second_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let users = repo::<User>(&conn, &clock);
    let user = users.create(&new_user("Ana", "ana@example.com")).unwrap();

    assert_eq!(users.delete(&user.id), Ok(true));

    let second = users.delete(&user.id).unwrap_err();
    assert_eq!(second, USER_ERRORS.not_found);
    assert_eq!(second.kind, ErrorKind::NotFound);
    assert_eq!(
        users.find_by(&UserLookup::Id(user.id.clone())),
        Err(USER_ERRORS.not_found)
    );
    assert_eq!(users.count(None), Ok(0));
    assert!(users.update(&user.id, &UserPatch::default()).is_failure());

    let deleted_at: Option<i64> = conn
        .query_row(
            "SELECT deleted_at FROM users WHERE id = ?1;",
            [&user.id],
            |row| row.get(0),
        )
        .unwrap();
    assert!(deleted_at.is_some());
}

#[test]
fn duplicate_active_email_maps_to_conflict() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let users = repo::<User>(&conn, &clock);
    users.create(&new_user("Ana", "ana@example.com")).unwrap();

    let err = users
        .create(&new_user("Other Ana", "ana@example.com"))
        .unwrap_err();
    assert_eq!(err, USER_ERRORS.conflict);
    assert_eq!(err.kind, ErrorKind::ConstraintViolation);
}

#[test]
fn list_defaults_to_newest_first_with_default_page_size() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let users = repo::<User>(&conn, &clock);
    for index in 0..12 {
        users
            .create(&new_user(&format!("User {index}"), &format!("u{index}@example.com")))
            .unwrap();
    }

    let page = users
        .list(&ListQuery {
            page: PageRequest::new(Some(0), None),
            ..ListQuery::default()
        })
        .unwrap();

    assert_eq!(page.len(), DEFAULT_PAGE_SIZE as usize);
    assert_eq!(page[0].name, "User 11");
    assert!(page
        .windows(2)
        .all(|pair| pair[0].created_at > pair[1].created_at));
}

#[test]
fn list_applies_filter_order_and_skip() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let users = repo::<User>(&conn, &clock);
    for name in ["Carla", "Bruna", "Ana", "Zed"] {
        users
            .create(&new_user(name, &format!("{}@example.com", name.to_lowercase())))
            .unwrap();
    }

    let query = ListQuery {
        page: PageRequest::new(Some(2), Some(1)),
        filter: Some(resource(json!({"name": "a"}))),
        order: Some(OrderSpec::new().with("name", Direction::Asc)),
    };
    let names: Vec<String> = users
        .list(&query)
        .unwrap()
        .into_iter()
        .map(|user| user.name)
        .collect();

    assert_eq!(names, vec!["Bruna", "Carla"]);
    assert_eq!(users.count(Some(&resource(json!({"name": "a"})))), Ok(3));
}

#[test]
fn json_order_keys_are_applied_in_written_priority() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let users = repo::<User>(&conn, &clock);
    for (name, email) in [
        ("Ana", "a1@example.com"),
        ("Bea", "b@example.com"),
        ("Ana", "a2@example.com"),
    ] {
        users.create(&new_user(name, email)).unwrap();
    }

    let query = ListQuery {
        order: Some(OrderSpec::from_json(&json!({"name": "asc", "email": "desc"}))),
        ..ListQuery::default()
    };
    let emails: Vec<String> = users
        .list(&query)
        .unwrap()
        .into_iter()
        .map(|user| user.email)
        .collect();

    assert_eq!(emails, vec!["a2@example.com", "a1@example.com", "b@example.com"]);
}

#[test]
fn created_at_range_filter_accepts_dates() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 86_400_000);
    let users = repo::<User>(&conn, &clock);
    for index in 0..5 {
        users
            .create(&new_user("User", &format!("u{index}@example.com")))
            .unwrap();
    }

    let filter = resource(json!({
        "start_date": "2024-01-16",
        "end_date": "2024-01-17T23:59:59Z",
    }));
    assert_eq!(users.count(Some(&filter)), Ok(2));
}

#[test]
fn unknown_order_field_maps_to_list_error() {
    let conn = open_db_in_memory().unwrap();
    let clock = SteppingClock::new(JAN_2024, 1_000);
    let users = repo::<User>(&conn, &clock);

    let err = users
        .list(&ListQuery {
            order: Some(OrderSpec::new().with("password", Direction::Asc)),
            ..ListQuery::default()
        })
        .unwrap_err();
    assert_eq!(err, USER_ERRORS.list);
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
}
