use super::{parse_id, ColumnValues, SqliteEntity};
use crate::model::essay::{Essay, EssayPatch, EssayStatus, NewEssay};
use crate::model::user::UserSummary;
use crate::store::sqlite::user::USER_SCOPE;
use crate::store::sqlite::where_clause::{Relation, TableScope};
use crate::store::{Include, StoreError, StoreResult};
use rusqlite::types::Value;
use rusqlite::Row;

pub(super) const ESSAY_SCOPE: TableScope = TableScope {
    table: "essays",
    columns: &[
        "id",
        "title",
        "text",
        "theme",
        "note",
        "status",
        "user_id",
        "created_at",
        "updated_at",
        "deleted_at",
    ],
    relations: &[Relation {
        name: "user",
        local_key: "user_id",
        target: &USER_SCOPE,
    }],
};

const ESSAY_COLUMNS: &str = "essays.id,
    essays.title,
    essays.text,
    essays.theme,
    essays.note,
    essays.status,
    essays.user_id,
    essays.created_at,
    essays.updated_at,
    essays.deleted_at";

impl SqliteEntity for Essay {
    const SCOPE: TableScope = ESSAY_SCOPE;

    fn select_sql(include: Include) -> String {
        match include {
            Include::None => format!("SELECT {ESSAY_COLUMNS} FROM essays"),
            Include::Relations => format!(
                "SELECT {ESSAY_COLUMNS},
                    owner.id AS owner_id,
                    owner.name AS owner_name,
                    owner.email AS owner_email
                 FROM essays
                 LEFT JOIN users AS owner ON owner.id = essays.user_id"
            ),
        }
    }

    fn from_row(row: &Row<'_>, include: Include) -> StoreResult<Self> {
        let status_text: String = row.get("status")?;
        let status = EssayStatus::parse(&status_text).ok_or_else(|| {
            StoreError::InvalidData(format!("invalid essay status `{status_text}`"))
        })?;

        Ok(Essay {
            id: parse_id::<Essay>(row)?,
            title: row.get("title")?,
            text: row.get("text")?,
            theme: row.get("theme")?,
            note: row.get("note")?,
            status,
            user_id: row.get("user_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            deleted_at: row.get("deleted_at")?,
            user: owner_summary(row, include)?,
        })
    }

    fn insert_values(input: &NewEssay) -> ColumnValues {
        vec![
            ("title", Value::Text(input.title.clone())),
            ("text", Value::Text(input.text.clone())),
            ("theme", Value::Text(input.theme.clone())),
            ("note", input.note.map_or(Value::Null, Value::Real)),
            ("status", Value::Text(input.status.as_str().to_string())),
            ("user_id", Value::Text(input.user_id.clone())),
        ]
    }

    fn patch_values(patch: &EssayPatch) -> ColumnValues {
        let mut columns = ColumnValues::new();
        if let Some(title) = &patch.title {
            columns.push(("title", Value::Text(title.clone())));
        }
        if let Some(text) = &patch.text {
            columns.push(("text", Value::Text(text.clone())));
        }
        if let Some(theme) = &patch.theme {
            columns.push(("theme", Value::Text(theme.clone())));
        }
        if let Some(note) = patch.note {
            columns.push(("note", note.map_or(Value::Null, Value::Real)));
        }
        if let Some(status) = patch.status {
            columns.push(("status", Value::Text(status.as_str().to_string())));
        }
        columns
    }
}

/// Owner projection from the `owner_*` join columns.
pub(super) fn owner_summary(row: &Row<'_>, include: Include) -> StoreResult<Option<UserSummary>> {
    if include == Include::None {
        return Ok(None);
    }
    let Some(id) = row.get::<_, Option<String>>("owner_id")? else {
        return Ok(None);
    };
    Ok(Some(UserSummary {
        id,
        name: row.get("owner_name")?,
        email: row.get("owner_email")?,
    }))
}
