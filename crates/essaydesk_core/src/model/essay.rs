//! Essay domain model.
//!
//! # Invariants
//! - Every essay belongs to exactly one user (`user_id`).
//! - `note` is only meaningful once the essay is reviewed.

use crate::model::entity::{created_at_range, owner_filter, Entity, Lookup};
use crate::model::user::UserSummary;
use crate::outcome::{ErrorCatalog, ErrorDescriptor, ErrorKind};
use crate::query::filter::{FilterDefinitionEntry, FilterOperator, Predicate, Resource};
use crate::util::caster::{boolean_string, cast, CastOptions};
use crate::util::id::IdPrefix;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Review lifecycle of an essay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EssayStatus {
    Submitted,
    Reviewed,
}

impl EssayStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Reviewed => "Reviewed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("submitted") {
            Some(Self::Submitted)
        } else if value.eq_ignore_ascii_case("reviewed") {
            Some(Self::Reviewed)
        } else {
            None
        }
    }
}

/// Persisted essay record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Essay {
    pub id: String,
    pub title: String,
    pub text: String,
    pub theme: String,
    pub note: Option<f64>,
    pub status: EssayStatus,
    pub user_id: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub deleted_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEssay {
    pub title: String,
    pub text: String,
    pub theme: String,
    #[serde(default)]
    pub note: Option<f64>,
    pub status: EssayStatus,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EssayPatch {
    pub title: Option<String>,
    pub text: Option<String>,
    pub theme: Option<String>,
    pub note: Option<Option<f64>>,
    pub status: Option<EssayStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EssayLookup {
    Id(String),
    Title(String),
}

impl Lookup for EssayLookup {
    fn by_id(id: &str) -> Self {
        Self::Id(id.to_string())
    }

    fn to_predicate(&self) -> Predicate {
        match self {
            Self::Id(id) => Predicate::equals("id", id.as_str()),
            Self::Title(title) => Predicate::equals("title", title.as_str()),
        }
    }
}

/// Public response shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EssayView {
    pub id: String,
    pub title: String,
    pub text: String,
    pub theme: String,
    pub note: Option<f64>,
    pub status: EssayStatus,
    pub user_id: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

impl From<&Essay> for EssayView {
    fn from(essay: &Essay) -> Self {
        Self {
            id: essay.id.clone(),
            title: essay.title.clone(),
            text: essay.text.clone(),
            theme: essay.theme.clone(),
            note: essay.note,
            status: essay.status,
            user_id: essay.user_id.clone(),
            created_at: essay.created_at,
            updated_at: essay.updated_at,
            user: essay.user.clone(),
        }
    }
}

impl From<Essay> for EssayView {
    fn from(essay: Essay) -> Self {
        Self::from(&essay)
    }
}

/// Status filter value: a status name, or a "reviewed" flag (`true`, `1`, `"1"`).
fn status_filter_value(value: Value) -> Option<Value> {
    let status = match &value {
        Value::Bool(reviewed) => reviewed_flag(*reviewed),
        Value::Number(number) => reviewed_flag(number.as_i64()? == 1),
        Value::String(text) => EssayStatus::parse(text)
            .unwrap_or_else(|| reviewed_flag(boolean_string(Some(text.as_str())))),
        _ => return None,
    };
    Some(Value::from(status.as_str()))
}

fn reviewed_flag(reviewed: bool) -> EssayStatus {
    if reviewed {
        EssayStatus::Reviewed
    } else {
        EssayStatus::Submitted
    }
}

pub const ESSAY_ERRORS: ErrorCatalog = ErrorCatalog {
    count: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "ESA-001",
        "essayCountError",
        "Failed to count essays.",
    ),
    create: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "ESA-002",
        "essayCreateError",
        "Failed to create essay.",
    ),
    not_found: ErrorDescriptor::new(
        ErrorKind::NotFound,
        404,
        "ESA-003",
        "essayNotFoundError",
        "Essay not found.",
    ),
    find_by: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        404,
        "ESA-004",
        "essayFindByError",
        "Failed to look up essay.",
    ),
    list: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "ESA-005",
        "essayListError",
        "Failed to list essays.",
    ),
    update: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "ESA-007",
        "essayUpdateError",
        "Failed to update essay.",
    ),
    delete: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "ESA-008",
        "essayDeleteError",
        "Failed to delete essay.",
    ),
    conflict: ErrorDescriptor::new(
        ErrorKind::ConstraintViolation,
        409,
        "ESA-013",
        "essayConstraintError",
        "Essay rejected by a store constraint.",
    ),
};

pub const ESSAY_PER_MONTH_ERROR: ErrorDescriptor = ErrorDescriptor::new(
    ErrorKind::StoreUnavailable,
    500,
    "ESA-009",
    "getEssayByMonthError",
    "Failed to load essays per month.",
);

pub const ESSAY_PER_THEME_ERROR: ErrorDescriptor = ErrorDescriptor::new(
    ErrorKind::StoreUnavailable,
    500,
    "ESA-010",
    "getEssayByThemeError",
    "Failed to load essays per theme.",
);

pub const ESSAY_PER_STATUS_ERROR: ErrorDescriptor = ErrorDescriptor::new(
    ErrorKind::StoreUnavailable,
    500,
    "ESA-011",
    "getEssayByStatusError",
    "Failed to load essays per status.",
);

pub const ESSAY_AVG_NOTE_ERROR: ErrorDescriptor = ErrorDescriptor::new(
    ErrorKind::StoreUnavailable,
    500,
    "ESA-012",
    "getEssayAVGNoteError",
    "Failed to load average essay notes.",
);

impl Entity for Essay {
    const NAME: &'static str = "essay";
    const PREFIX: IdPrefix = IdPrefix::Essay;
    const ERRORS: ErrorCatalog = ESSAY_ERRORS;

    type Input = NewEssay;
    type Patch = EssayPatch;
    type Lookup = EssayLookup;

    fn id(&self) -> &str {
        &self.id
    }

    fn filter_definition(resource: &Resource) -> Vec<FilterDefinitionEntry> {
        let mut definition = vec![
            FilterDefinitionEntry::field("title").with_operator(FilterOperator::Contains),
            FilterDefinitionEntry::field("theme").with_operator(FilterOperator::Contains),
            FilterDefinitionEntry::field("status").with_value(
                cast(
                    resource.get("status"),
                    status_filter_value,
                    CastOptions::default(),
                )
                .flatten(),
            ),
            owner_filter(resource),
        ];
        definition.extend(created_at_range(resource));
        definition
    }
}

#[cfg(test)]
mod tests {
    use super::{status_filter_value, EssayStatus};
    use serde_json::json;

    #[test]
    fn status_filter_accepts_names_and_reviewed_flags() {
        assert_eq!(status_filter_value(json!("reviewed")), Some(json!("Reviewed")));
        assert_eq!(status_filter_value(json!("1")), Some(json!("Reviewed")));
        assert_eq!(status_filter_value(json!("0")), Some(json!("Submitted")));
        assert_eq!(status_filter_value(json!(true)), Some(json!("Reviewed")));
        assert_eq!(status_filter_value(json!(0)), Some(json!("Submitted")));
        assert_eq!(status_filter_value(json!([1])), None);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [EssayStatus::Submitted, EssayStatus::Reviewed] {
            assert_eq!(EssayStatus::parse(status.as_str()), Some(status));
        }
    }
}
