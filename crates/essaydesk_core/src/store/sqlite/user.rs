use super::{flag, opt_text, parse_flag, parse_id, ColumnValues, SqliteEntity};
use crate::model::user::{NewUser, User, UserCounts, UserPatch};
use crate::store::sqlite::where_clause::TableScope;
use crate::store::{Include, StoreError, StoreResult};
use rusqlite::types::Value;
use rusqlite::Row;

/// `password` is write-only: never filterable or orderable.
pub(super) const USER_SCOPE: TableScope = TableScope {
    table: "users",
    columns: &[
        "id",
        "name",
        "email",
        "is_master",
        "phone",
        "biography",
        "active",
        "created_at",
        "updated_at",
        "deleted_at",
    ],
    relations: &[],
};

const USER_COLUMNS: &str = "users.id,
    users.name,
    users.email,
    users.password,
    users.is_master,
    users.phone,
    users.biography,
    users.active,
    users.created_at,
    users.updated_at,
    users.deleted_at";

const USER_COUNTS: &str = "(SELECT COUNT(*) FROM essays
        WHERE essays.user_id = users.id AND essays.deleted_at IS NULL) AS essay_count,
    (SELECT COUNT(*) FROM plannings
        WHERE plannings.user_id = users.id AND plannings.deleted_at IS NULL) AS planning_count";

impl SqliteEntity for User {
    const SCOPE: TableScope = USER_SCOPE;

    fn select_sql(include: Include) -> String {
        match include {
            Include::None => format!("SELECT {USER_COLUMNS} FROM users"),
            Include::Relations => format!("SELECT {USER_COLUMNS}, {USER_COUNTS} FROM users"),
        }
    }

    fn from_row(row: &Row<'_>, include: Include) -> StoreResult<Self> {
        let counts = match include {
            Include::None => None,
            Include::Relations => Some(UserCounts {
                essays: count_column(row, "essay_count")?,
                plannings: count_column(row, "planning_count")?,
            }),
        };
        let active = match row.get::<_, Option<i64>>("active")? {
            Some(value) => Some(parse_flag(value, "users.active")?),
            None => None,
        };

        Ok(User {
            id: parse_id::<User>(row)?,
            name: row.get("name")?,
            email: row.get("email")?,
            password: row.get("password")?,
            is_master: parse_flag(row.get("is_master")?, "users.is_master")?,
            phone: row.get("phone")?,
            biography: row.get("biography")?,
            active,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            deleted_at: row.get("deleted_at")?,
            counts,
        })
    }

    fn insert_values(input: &NewUser) -> ColumnValues {
        vec![
            ("name", Value::Text(input.name.clone())),
            ("email", Value::Text(input.email.clone())),
            ("password", Value::Text(input.password.clone())),
            ("is_master", flag(input.is_master)),
            ("phone", opt_text(input.phone.as_ref())),
            ("biography", opt_text(input.biography.as_ref())),
            ("active", input.active.map_or(Value::Null, flag)),
        ]
    }

    fn patch_values(patch: &UserPatch) -> ColumnValues {
        let mut columns = ColumnValues::new();
        if let Some(name) = &patch.name {
            columns.push(("name", Value::Text(name.clone())));
        }
        if let Some(email) = &patch.email {
            columns.push(("email", Value::Text(email.clone())));
        }
        if let Some(password) = &patch.password {
            columns.push(("password", Value::Text(password.clone())));
        }
        if let Some(phone) = &patch.phone {
            columns.push(("phone", opt_text(phone.as_ref())));
        }
        if let Some(biography) = &patch.biography {
            columns.push(("biography", opt_text(biography.as_ref())));
        }
        if let Some(active) = patch.active {
            columns.push(("active", active.map_or(Value::Null, flag)));
        }
        columns
    }
}

fn count_column(row: &Row<'_>, column: &str) -> StoreResult<u64> {
    let value: i64 = row.get(column)?;
    u64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("negative {column} `{value}`")))
}
