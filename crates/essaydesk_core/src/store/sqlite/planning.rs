use super::essay::{owner_summary, ESSAY_SCOPE};
use super::{opt_text, parse_id, ColumnValues, SqliteEntity};
use crate::model::planning::{NewPlanning, Planning, PlanningPatch};
use crate::store::sqlite::user::USER_SCOPE;
use crate::store::sqlite::where_clause::{Relation, TableScope};
use crate::store::{Include, StoreResult};
use rusqlite::types::Value;
use rusqlite::Row;

const PLANNING_SCOPE: TableScope = TableScope {
    table: "plannings",
    columns: &[
        "id",
        "title",
        "theme",
        "user_id",
        "essay_id",
        "created_at",
        "updated_at",
        "deleted_at",
    ],
    relations: &[
        Relation {
            name: "user",
            local_key: "user_id",
            target: &USER_SCOPE,
        },
        Relation {
            name: "essay",
            local_key: "essay_id",
            target: &ESSAY_SCOPE,
        },
    ],
};

const PLANNING_COLUMNS: &str = "plannings.id,
    plannings.title,
    plannings.theme,
    plannings.user_id,
    plannings.essay_id,
    plannings.created_at,
    plannings.updated_at,
    plannings.deleted_at";

impl SqliteEntity for Planning {
    const SCOPE: TableScope = PLANNING_SCOPE;

    fn select_sql(include: Include) -> String {
        match include {
            Include::None => format!("SELECT {PLANNING_COLUMNS} FROM plannings"),
            Include::Relations => format!(
                "SELECT {PLANNING_COLUMNS},
                    owner.id AS owner_id,
                    owner.name AS owner_name,
                    owner.email AS owner_email
                 FROM plannings
                 LEFT JOIN users AS owner ON owner.id = plannings.user_id"
            ),
        }
    }

    fn from_row(row: &Row<'_>, include: Include) -> StoreResult<Self> {
        Ok(Planning {
            id: parse_id::<Planning>(row)?,
            title: row.get("title")?,
            theme: row.get("theme")?,
            user_id: row.get("user_id")?,
            essay_id: row.get("essay_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            deleted_at: row.get("deleted_at")?,
            user: owner_summary(row, include)?,
        })
    }

    fn insert_values(input: &NewPlanning) -> ColumnValues {
        vec![
            ("title", Value::Text(input.title.clone())),
            ("theme", Value::Text(input.theme.clone())),
            ("user_id", Value::Text(input.user_id.clone())),
            ("essay_id", opt_text(input.essay_id.as_ref())),
        ]
    }

    fn patch_values(patch: &PlanningPatch) -> ColumnValues {
        let mut columns = ColumnValues::new();
        if let Some(title) = &patch.title {
            columns.push(("title", Value::Text(title.clone())));
        }
        if let Some(theme) = &patch.theme {
            columns.push(("theme", Value::Text(theme.clone())));
        }
        if let Some(essay_id) = &patch.essay_id {
            columns.push(("essay_id", opt_text(essay_id.as_ref())));
        }
        columns
    }
}
