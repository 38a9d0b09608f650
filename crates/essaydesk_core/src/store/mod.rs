//! Persistence boundary consumed by repositories.
//!
//! # Responsibility
//! - Execute compiled predicates and orderings against a physical store.
//! - Report store-level failures as [`StoreError`] without business meaning.
//!
//! # Invariants
//! - Stores never stamp timestamps or generate IDs; callers pass them in.
//! - `patch` and `mark_deleted` only touch rows that are not soft-deleted.
//!
//! # See also
//! - `crate::repo` for the mapping of store errors onto descriptors.

use crate::db::DbError;
use crate::model::entity::Entity;
use crate::model::stats::{MonthlyAverage, MonthlyCount, StatusCount, ThemeCount};
use crate::query::filter::Predicate;
use crate::query::order::NestedOrder;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sqlite;

pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure.
#[derive(Debug)]
pub enum StoreError {
    /// Uniqueness or foreign-key rejection.
    Constraint(String),
    /// Predicate or ordering names a field the store does not expose.
    UnknownField(String),
    /// Predicate shape the store cannot translate.
    UnsupportedCondition(String),
    /// Persisted row failed to parse.
    InvalidData(String),
    /// Targeted record vanished between lookup and write.
    Missing(String),
    Db(DbError),
}

impl StoreError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constraint(message) => write!(f, "constraint violation: {message}"),
            Self::UnknownField(field) => write!(f, "unknown field `{field}`"),
            Self::UnsupportedCondition(message) => {
                write!(f, "unsupported condition: {message}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Missing(id) => write!(f, "record not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
            return Self::Constraint(value.to_string());
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Whether reads load related data (user counts, owner summary).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Include {
    #[default]
    None,
    Relations,
}

/// Repository-owned fields of a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecordMeta {
    pub id: String,
    pub created_at: i64,
}

/// Compiled list request.
#[derive(Debug, Clone, PartialEq)]
pub struct FindManyQuery {
    pub predicate: Predicate,
    pub order: NestedOrder,
    pub take: u32,
    pub skip: u32,
    pub include: Include,
}

/// Storage operations for one entity kind.
pub trait Store<E: Entity> {
    fn count(&self, predicate: &Predicate) -> StoreResult<u64>;
    fn insert(&self, meta: NewRecordMeta, input: &E::Input) -> StoreResult<E>;
    fn find_one(&self, predicate: &Predicate, include: Include) -> StoreResult<Option<E>>;
    fn find_many(&self, query: &FindManyQuery) -> StoreResult<Vec<E>>;
    /// Applies `patch` and returns the stored record after the write.
    fn patch(&self, id: &str, patch: &E::Patch, updated_at: i64) -> StoreResult<E>;
    /// Returns `false` when no active row matched `id`.
    fn mark_deleted(&self, id: &str, deleted_at: i64) -> StoreResult<bool>;
}

impl<E: Entity, S: Store<E> + ?Sized> Store<E> for &S {
    fn count(&self, predicate: &Predicate) -> StoreResult<u64> {
        (**self).count(predicate)
    }

    fn insert(&self, meta: NewRecordMeta, input: &E::Input) -> StoreResult<E> {
        (**self).insert(meta, input)
    }

    fn find_one(&self, predicate: &Predicate, include: Include) -> StoreResult<Option<E>> {
        (**self).find_one(predicate, include)
    }

    fn find_many(&self, query: &FindManyQuery) -> StoreResult<Vec<E>> {
        (**self).find_many(query)
    }

    fn patch(&self, id: &str, patch: &E::Patch, updated_at: i64) -> StoreResult<E> {
        (**self).patch(id, patch, updated_at)
    }

    fn mark_deleted(&self, id: &str, deleted_at: i64) -> StoreResult<bool> {
        (**self).mark_deleted(id, deleted_at)
    }
}

/// Essay dashboard aggregates, optionally scoped to one owner.
///
/// Soft-deleted essays never count.
pub trait EssayStats {
    fn per_month(&self, user_id: Option<&str>) -> StoreResult<Vec<MonthlyCount>>;
    fn per_theme(&self, user_id: Option<&str>) -> StoreResult<Vec<ThemeCount>>;
    fn per_status(&self, user_id: Option<&str>) -> StoreResult<Vec<StatusCount>>;
    fn average_note_per_month(&self, user_id: Option<&str>) -> StoreResult<Vec<MonthlyAverage>>;
}

pub trait PlanningStats {
    fn per_month(&self, user_id: Option<&str>) -> StoreResult<Vec<MonthlyCount>>;
}
