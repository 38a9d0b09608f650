//! User domain model.
//!
//! # Responsibility
//! - Define the persisted user record, its create/patch payloads and lookups.
//! - Map records to the public response shape without the password hash.
//!
//! # Invariants
//! - `email` is unique among active users.
//! - `id` carries the `usr` prefix.

use crate::model::entity::{created_at_range, Entity, Lookup};
use crate::outcome::{ErrorCatalog, ErrorDescriptor, ErrorKind};
use crate::query::filter::{FilterDefinitionEntry, FilterOperator, Predicate, Resource};
use crate::util::id::IdPrefix;
use serde::{Deserialize, Serialize};

/// Active child counts loaded with user reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounts {
    pub essays: u64,
    pub plannings: u64,
}

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Opaque credential hash; never leaves the core through [`UserView`].
    pub password: String,
    pub is_master: bool,
    pub phone: Option<String>,
    pub biography: Option<String>,
    pub active: Option<bool>,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub deleted_at: Option<i64>,
    /// Present only when the read requested relations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<UserCounts>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Create payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_master: bool,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Partial update; `None` leaves a column untouched.
///
/// Nullable columns use `Some(None)` to clear the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<Option<String>>,
    pub biography: Option<Option<String>>,
    pub active: Option<Option<bool>>,
}

/// Fields a user can be looked up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Id(String),
    Email(String),
}

impl Lookup for UserLookup {
    fn by_id(id: &str) -> Self {
        Self::Id(id.to_string())
    }

    fn to_predicate(&self) -> Predicate {
        match self {
            Self::Id(id) => Predicate::equals("id", id.as_str()),
            Self::Email(email) => Predicate::equals("email", email.as_str()),
        }
    }
}

/// Compact user projection embedded in essay/planning reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Public response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_master: bool,
    pub phone: Option<String>,
    pub biography: Option<String>,
    pub active: Option<bool>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<UserCounts>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_master: user.is_master,
            phone: user.phone.clone(),
            biography: user.biography.clone(),
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
            counts: user.counts,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

pub const USER_ERRORS: ErrorCatalog = ErrorCatalog {
    count: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "USR-001",
        "userCountError",
        "Failed to count users.",
    ),
    create: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "USR-002",
        "userCreateError",
        "Failed to create user.",
    ),
    delete: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "USR-003",
        "userDeleteError",
        "Failed to delete user.",
    ),
    not_found: ErrorDescriptor::new(
        ErrorKind::NotFound,
        404,
        "USR-004",
        "userNotFoundError",
        "User not found.",
    ),
    find_by: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        404,
        "USR-005",
        "userFindByError",
        "Failed to look up user.",
    ),
    list: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "USR-006",
        "userListError",
        "Failed to list users.",
    ),
    update: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "USR-007",
        "userUpdateError",
        "Failed to update user.",
    ),
    conflict: USER_ALREADY_EXISTS,
};

/// Another active user already owns the email.
pub const USER_ALREADY_EXISTS: ErrorDescriptor = ErrorDescriptor::new(
    ErrorKind::ConstraintViolation,
    500,
    "USR-008",
    "userCreateAlreadyExistsError",
    "Failed to create user, email already registered.",
);

impl Entity for User {
    const NAME: &'static str = "user";
    const PREFIX: IdPrefix = IdPrefix::User;
    const ERRORS: ErrorCatalog = USER_ERRORS;

    type Input = NewUser;
    type Patch = UserPatch;
    type Lookup = UserLookup;

    fn id(&self) -> &str {
        &self.id
    }

    fn filter_definition(resource: &Resource) -> Vec<FilterDefinitionEntry> {
        let mut definition =
            vec![FilterDefinitionEntry::field("name").with_operator(FilterOperator::Contains)];
        definition.extend(created_at_range(resource));
        definition
    }
}

#[cfg(test)]
mod tests {
    use super::{User, UserView};
    use serde_json::json;

    #[test]
    fn view_drops_password() {
        let user = User {
            id: "usr_0123".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "hash".to_string(),
            is_master: false,
            phone: None,
            biography: None,
            active: Some(true),
            created_at: 1,
            updated_at: None,
            deleted_at: None,
            counts: None,
        };

        let json = serde_json::to_value(UserView::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("counts").is_none());
        assert_eq!(json["email"], json!("ana@example.com"));
    }
}
