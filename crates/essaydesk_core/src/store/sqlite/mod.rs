//! SQLite implementation of the [`Store`] contract.
//!
//! # Responsibility
//! - Keep SQL text, column whitelists and row parsing inside this module.
//! - Share one generic CRUD implementation across entity kinds.
//!
//! # Invariants
//! - Read paths reject malformed persisted rows with `InvalidData`.
//! - Writes never touch soft-deleted rows.

mod essay;
mod planning;
mod stats;
mod user;
pub mod where_clause;

use crate::model::entity::Entity;
use crate::query::filter::Predicate;
use crate::query::order::NestedOrder;
use crate::store::{FindManyQuery, Include, NewRecordMeta, Store, StoreError, StoreResult};
use crate::util::id::is_prefixed_id;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::marker::PhantomData;
use where_clause::{compile_order, compile_where, TableScope};

/// Column/value pairs written by insert and patch statements.
pub type ColumnValues = Vec<(&'static str, Value)>;

/// Table mapping for an entity stored in SQLite.
pub trait SqliteEntity: Entity {
    const SCOPE: TableScope;

    /// `SELECT ... FROM ...` without a `WHERE` clause.
    fn select_sql(include: Include) -> String;

    fn from_row(row: &Row<'_>, include: Include) -> StoreResult<Self>;

    /// Caller-owned columns of a new row (excluding `id` and timestamps).
    fn insert_values(input: &Self::Input) -> ColumnValues;

    /// Columns changed by `patch`; may be empty.
    fn patch_values(patch: &Self::Patch) -> ColumnValues;
}

/// SQLite-backed store for entity kind `E`.
pub struct SqliteStore<'conn, E> {
    conn: &'conn Connection,
    entity: PhantomData<fn() -> E>,
}

impl<'conn, E> SqliteStore<'conn, E> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            entity: PhantomData,
        }
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }
}

impl<E: SqliteEntity> SqliteStore<'_, E> {
    fn query_rows(
        &self,
        predicate: &Predicate,
        order: Option<&NestedOrder>,
        page: Option<(u32, u32)>,
        include: Include,
    ) -> StoreResult<Vec<E>> {
        let filter = compile_where(&E::SCOPE, predicate)?;
        let mut sql = format!("{} WHERE {}", E::select_sql(include), filter.sql);
        let mut bind_values = filter.params;

        if let Some(order) = order {
            sql.push_str(" ORDER BY ");
            sql.push_str(&compile_order(&E::SCOPE, order)?);
        }
        if let Some((take, skip)) = page {
            sql.push_str(" LIMIT ? OFFSET ?");
            bind_values.push(Value::Integer(i64::from(take)));
            bind_values.push(Value::Integer(i64::from(skip)));
        }
        debug!(
            "event=store_query module=store table={} params={}",
            E::SCOPE.table,
            bind_values.len()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(E::from_row(row, include)?);
        }
        Ok(records)
    }

    fn load_active(&self, id: &str, include: Include) -> StoreResult<E> {
        let predicate = Predicate::active_only(Predicate::equals("id", id));
        self.query_rows(&predicate, None, Some((1, 0)), include)?
            .pop()
            .ok_or_else(|| StoreError::Missing(id.to_string()))
    }
}

impl<E: SqliteEntity> Store<E> for SqliteStore<'_, E> {
    fn count(&self, predicate: &Predicate) -> StoreResult<u64> {
        let filter = compile_where(&E::SCOPE, predicate)?;
        let sql = format!(
            "SELECT COUNT(*) FROM {table} WHERE {where_sql};",
            table = E::SCOPE.table,
            where_sql = filter.sql,
        );
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(filter.params), |row| row.get(0))?;
        u64::try_from(count).map_err(|_| StoreError::InvalidData(format!("negative count {count}")))
    }

    fn insert(&self, meta: NewRecordMeta, input: &E::Input) -> StoreResult<E> {
        let mut columns: ColumnValues = vec![
            ("id", Value::Text(meta.id.clone())),
            ("created_at", Value::Integer(meta.created_at)),
        ];
        columns.extend(E::insert_values(input));

        let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {table} ({names}) VALUES ({placeholders});",
            table = E::SCOPE.table,
            names = names.join(", "),
        );
        self.conn.execute(
            &sql,
            params_from_iter(columns.into_iter().map(|(_, value)| value)),
        )?;

        self.load_active(&meta.id, Include::None)
    }

    fn find_one(&self, predicate: &Predicate, include: Include) -> StoreResult<Option<E>> {
        Ok(self
            .query_rows(predicate, None, Some((1, 0)), include)?
            .pop())
    }

    fn find_many(&self, query: &FindManyQuery) -> StoreResult<Vec<E>> {
        self.query_rows(
            &query.predicate,
            Some(&query.order),
            Some((query.take, query.skip)),
            query.include,
        )
    }

    fn patch(&self, id: &str, patch: &E::Patch, updated_at: i64) -> StoreResult<E> {
        let mut columns = E::patch_values(patch);
        columns.push(("updated_at", Value::Integer(updated_at)));

        let assignments: Vec<String> = columns
            .iter()
            .map(|(name, _)| format!("{name} = ?"))
            .collect();
        let sql = format!(
            "UPDATE {table} SET {assignments} WHERE id = ? AND deleted_at IS NULL;",
            table = E::SCOPE.table,
            assignments = assignments.join(", "),
        );
        let mut bind_values: Vec<Value> = columns.into_iter().map(|(_, value)| value).collect();
        bind_values.push(Value::Text(id.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(StoreError::Missing(id.to_string()));
        }

        self.load_active(id, Include::Relations)
    }

    fn mark_deleted(&self, id: &str, deleted_at: i64) -> StoreResult<bool> {
        let sql = format!(
            "UPDATE {table}
             SET deleted_at = ?1, updated_at = ?1
             WHERE id = ?2 AND deleted_at IS NULL;",
            table = E::SCOPE.table,
        );
        let changed = self
            .conn
            .execute(&sql, rusqlite::params![deleted_at, id])?;
        Ok(changed > 0)
    }
}

/// Reads the `id` column and checks its prefix against `E`.
fn parse_id<E: Entity>(row: &Row<'_>) -> StoreResult<String> {
    let id: String = row.get("id")?;
    if !is_prefixed_id(&id, E::PREFIX) {
        return Err(StoreError::InvalidData(format!(
            "invalid {} id `{id}`",
            E::NAME
        )));
    }
    Ok(id)
}

fn parse_flag(value: i64, column: &str) -> StoreResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn opt_text(value: Option<&String>) -> Value {
    value.map_or(Value::Null, |text| Value::Text(text.clone()))
}

fn flag(value: bool) -> Value {
    Value::Integer(i64::from(value))
}
