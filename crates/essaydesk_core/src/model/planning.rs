//! Planning domain model.
//!
//! A planning is a user's writing plan for a theme, optionally tied to the
//! essay it produced.

use crate::model::entity::{created_at_range, owner_filter, Entity, Lookup};
use crate::model::user::UserSummary;
use crate::outcome::{ErrorCatalog, ErrorDescriptor, ErrorKind};
use crate::query::filter::{FilterDefinitionEntry, FilterOperator, Predicate, Resource};
use crate::util::id::IdPrefix;
use serde::{Deserialize, Serialize};

/// Persisted planning record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planning {
    pub id: String,
    pub title: String,
    pub theme: String,
    pub user_id: String,
    pub essay_id: Option<String>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub deleted_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlanning {
    pub title: String,
    pub theme: String,
    pub user_id: String,
    #[serde(default)]
    pub essay_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanningPatch {
    pub title: Option<String>,
    pub theme: Option<String>,
    pub essay_id: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanningLookup {
    Id(String),
    Title(String),
}

impl Lookup for PlanningLookup {
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanningView {
    pub id: String,
    pub title: String,
    pub theme: String,
    pub user_id: String,
    pub essay_id: Option<String>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

impl From<&Planning> for PlanningView {
    fn from(planning: &Planning) -> Self {
        Self {
            id: planning.id.clone(),
            title: planning.title.clone(),
            theme: planning.theme.clone(),
            user_id: planning.user_id.clone(),
            essay_id: planning.essay_id.clone(),
            created_at: planning.created_at,
            updated_at: planning.updated_at,
            user: planning.user.clone(),
        }
    }
}

impl From<Planning> for PlanningView {
    fn from(planning: Planning) -> Self {
        Self::from(&planning)
    }
}

pub const PLANNING_ERRORS: ErrorCatalog = ErrorCatalog {
    count: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "PLG-001",
        "planningCountError",
        "Failed to count plannings.",
    ),
    create: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "PLG-002",
        "planningCreateError",
        "Failed to create planning.",
    ),
    not_found: ErrorDescriptor::new(
        ErrorKind::NotFound,
        404,
        "PLG-003",
        "planningNotFoundError",
        "Planning not found.",
    ),
    find_by: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        404,
        "PLG-004",
        "planningFindByError",
        "Failed to look up planning.",
    ),
    list: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "PLG-005",
        "planningListError",
        "Failed to list plannings.",
    ),
    update: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "PLG-007",
        "planningUpdateError",
        "Failed to update planning.",
    ),
    delete: ErrorDescriptor::new(
        ErrorKind::StoreUnavailable,
        500,
        "PLG-008",
        "planningDeleteError",
        "Failed to delete planning.",
    ),
    conflict: ErrorDescriptor::new(
        ErrorKind::ConstraintViolation,
        409,
        "PLG-010",
        "planningConstraintError",
        "Planning rejected by a store constraint.",
    ),
};

pub const PLANNING_PER_MONTH_ERROR: ErrorDescriptor = ErrorDescriptor::new(
    ErrorKind::StoreUnavailable,
    500,
    "PLG-009",
    "getPlanningPerMonthError",
    "Failed to load plannings per month.",
);

impl Entity for Planning {
    const NAME: &'static str = "planning";
    const PREFIX: IdPrefix = IdPrefix::Planning;
    const ERRORS: ErrorCatalog = PLANNING_ERRORS;

    type Input = NewPlanning;
    type Patch = PlanningPatch;
    type Lookup = PlanningLookup;

    fn id(&self) -> &str {
        &self.id
    }

    fn filter_definition(resource: &Resource) -> Vec<FilterDefinitionEntry> {
        let mut definition = vec![
            FilterDefinitionEntry::field("title").with_operator(FilterOperator::Contains),
            FilterDefinitionEntry::field("theme").with_operator(FilterOperator::Contains),
            owner_filter(resource),
        ];
        definition.extend(created_at_range(resource));
        definition
    }
}
