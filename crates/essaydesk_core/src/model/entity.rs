//! Contract every persisted entity kind implements.

use crate::outcome::ErrorCatalog;
use crate::query::filter::{FilterDefinitionEntry, FilterOperator, Predicate, Resource};
use crate::util::caster::{cast, identity, to_epoch_millis, CastOptions};
use crate::util::id::IdPrefix;

/// Closed set of fields an entity can be looked up by.
pub trait Lookup {
    /// Lookup by primary ID; used by update/delete existence checks.
    fn by_id(id: &str) -> Self;

    fn to_predicate(&self) -> Predicate;
}

/// Persisted record kind with soft-delete lifecycle.
pub trait Entity: Sized {
    /// Lower-case kind name used in log events.
    const NAME: &'static str;
    const PREFIX: IdPrefix;
    const ERRORS: ErrorCatalog;

    /// Create payload (caller-owned fields only).
    type Input;
    /// Partial update payload.
    type Patch;
    type Lookup: Lookup;

    fn id(&self) -> &str;

    /// Filter definitions compiled against the caller's resource.
    fn filter_definition(resource: &Resource) -> Vec<FilterDefinitionEntry>;
}

/// `created_at` bounds read from the `start_date`/`end_date` filter keys.
pub(crate) fn created_at_range(resource: &Resource) -> [FilterDefinitionEntry; 2] {
    let bound = |key: &str| {
        cast(resource.get(key), to_epoch_millis, CastOptions::KEEP_STRINGS).flatten()
    };
    [
        FilterDefinitionEntry::field("created_at")
            .with_operator(FilterOperator::Gte)
            .with_value(bound("start_date")),
        FilterDefinitionEntry::field("created_at")
            .with_operator(FilterOperator::Lte)
            .with_value(bound("end_date")),
    ]
}

/// Exact `user_id` match; ids are never parsed as booleans.
pub(crate) fn owner_filter(resource: &Resource) -> FilterDefinitionEntry {
    FilterDefinitionEntry::field("user_id").with_value(cast(
        resource.get("user_id"),
        identity,
        CastOptions::KEEP_STRINGS,
    ))
}
