#![allow(dead_code)]

use essaydesk_core::model::essay::{EssayStatus, NewEssay};
use essaydesk_core::model::planning::NewPlanning;
use essaydesk_core::model::user::NewUser;
use essaydesk_core::query::filter::Resource;
use essaydesk_core::{Clock, ReporterConfig, Repository, SqliteStore};
use rusqlite::Connection;
use serde_json::Value;
use std::cell::Cell;

/// Deterministic clock: starts at `start` and advances by `step` per read.
pub struct SteppingClock {
    next: Cell<i64>,
    step: i64,
}

impl SteppingClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }

    pub fn peek(&self) -> i64 {
        self.next.get()
    }
}

impl Clock for SteppingClock {
    fn now_millis(&self) -> i64 {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }
}

/// 2024-01-15T00:00:00Z in epoch milliseconds.
pub const JAN_2024: i64 = 1_705_276_800_000;
/// 2024-02-15T00:00:00Z in epoch milliseconds.
pub const FEB_2024: i64 = 1_707_955_200_000;

pub fn repo<'conn, E>(
    conn: &'conn Connection,
    clock: &'conn SteppingClock,
) -> Repository<E, SqliteStore<'conn, E>, &'conn SteppingClock>
where
    E: essaydesk_core::store::sqlite::SqliteEntity,
{
    Repository::with_parts(SqliteStore::new(conn), clock, ReporterConfig::default())
}

pub fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "argon2-hash".to_string(),
        ..NewUser::default()
    }
}

pub fn new_essay(user_id: &str, title: &str, theme: &str) -> NewEssay {
    NewEssay {
        title: title.to_string(),
        text: format!("{title} body"),
        theme: theme.to_string(),
        note: None,
        status: EssayStatus::Submitted,
        user_id: user_id.to_string(),
    }
}

pub fn new_planning(user_id: &str, title: &str, theme: &str) -> NewPlanning {
    NewPlanning {
        title: title.to_string(),
        theme: theme.to_string(),
        user_id: user_id.to_string(),
        essay_id: None,
    }
}

pub fn resource(value: Value) -> Resource {
    value.as_object().cloned().expect("resource must be a JSON object")
}
