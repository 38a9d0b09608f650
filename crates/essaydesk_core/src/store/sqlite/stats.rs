//! Dashboard aggregates over essays and plannings.
//!
//! Months are UTC `YYYY-MM` buckets of `created_at`.

use super::SqliteStore;
use crate::model::essay::Essay;
use crate::model::planning::Planning;
use crate::model::stats::{MonthlyAverage, MonthlyCount, StatusCount, ThemeCount};
use crate::store::{EssayStats, PlanningStats, StoreError, StoreResult};
use rusqlite::{params, Connection};

const MONTH_BUCKET: &str = "strftime('%Y-%m', created_at / 1000, 'unixepoch')";

fn grouped_counts(
    conn: &Connection,
    table: &str,
    group_expr: &str,
    order: &str,
    user_id: Option<&str>,
) -> StoreResult<Vec<(String, u64)>> {
    let sql = format!(
        "SELECT {group_expr} AS bucket, COUNT(*) AS total
         FROM {table}
         WHERE deleted_at IS NULL
           AND (?1 IS NULL OR user_id = ?1)
         GROUP BY bucket
         ORDER BY {order};"
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![user_id])?;
    let mut buckets = Vec::new();
    while let Some(row) = rows.next()? {
        let total: i64 = row.get("total")?;
        let total = u64::try_from(total)
            .map_err(|_| StoreError::InvalidData(format!("negative count `{total}`")))?;
        buckets.push((row.get("bucket")?, total));
    }
    Ok(buckets)
}

fn monthly(
    conn: &Connection,
    table: &str,
    user_id: Option<&str>,
) -> StoreResult<Vec<MonthlyCount>> {
    Ok(
        grouped_counts(conn, table, MONTH_BUCKET, "bucket ASC", user_id)?
            .into_iter()
            .map(|(month, count)| MonthlyCount { month, count })
            .collect(),
    )
}

impl EssayStats for SqliteStore<'_, Essay> {
    fn per_month(&self, user_id: Option<&str>) -> StoreResult<Vec<MonthlyCount>> {
        monthly(self.conn(), "essays", user_id)
    }

    fn per_theme(&self, user_id: Option<&str>) -> StoreResult<Vec<ThemeCount>> {
        Ok(
            grouped_counts(self.conn(), "essays", "theme", "total DESC, bucket ASC", user_id)?
                .into_iter()
                .map(|(theme, count)| ThemeCount { theme, count })
                .collect(),
        )
    }

    fn per_status(&self, user_id: Option<&str>) -> StoreResult<Vec<StatusCount>> {
        Ok(
            grouped_counts(self.conn(), "essays", "status", "bucket ASC", user_id)?
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
        )
    }

    fn average_note_per_month(&self, user_id: Option<&str>) -> StoreResult<Vec<MonthlyAverage>> {
        let sql = format!(
            "SELECT {MONTH_BUCKET} AS month, AVG(note) AS avg_note
             FROM essays
             WHERE deleted_at IS NULL
               AND note IS NOT NULL
               AND (?1 IS NULL OR user_id = ?1)
             GROUP BY month
             ORDER BY month ASC;"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let mut rows = stmt.query(params![user_id])?;
        let mut averages = Vec::new();
        while let Some(row) = rows.next()? {
            averages.push(MonthlyAverage {
                month: row.get("month")?,
                avg: row.get("avg_note")?,
            });
        }
        Ok(averages)
    }
}

impl PlanningStats for SqliteStore<'_, Planning> {
    fn per_month(&self, user_id: Option<&str>) -> StoreResult<Vec<MonthlyCount>> {
        monthly(self.conn(), "plannings", user_id)
    }
}
