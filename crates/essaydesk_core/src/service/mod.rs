//! Use-case services composed over repositories.
//!
//! # Responsibility
//! - Compose repository calls into caller-facing operations (paginated
//!   listing, duplicate-email guard, dashboard aggregates).
//! - Return public views instead of persisted records.
//!
//! # Invariants
//! - Services never reach the store except through their repository.

mod essay_service;
mod planning_service;
mod user_service;

pub use essay_service::EssayService;
pub use planning_service::PlanningService;
pub use user_service::UserService;

use crate::model::entity::Entity;
use crate::outcome::Outcome;
use crate::query::pagination::{paginate, PageInput, Paginated};
use crate::repo::{Clock, ListQuery, Repository};
use crate::store::Store;

/// Counts the filtered set, lists one page, and wraps both as views.
fn list_page<E, S, C, V>(repo: &Repository<E, S, C>, query: &ListQuery) -> Outcome<Paginated<V>>
where
    E: Entity,
    S: Store<E>,
    C: Clock,
    V: From<E>,
{
    let total = repo.count(query.filter.as_ref())?;
    let records = repo.list(query)?;
    Ok(paginate(PageInput {
        results: records.into_iter().map(V::from).collect(),
        total,
        take: query.page.take(),
        skip: query.page.skip(),
        current_page: None,
    }))
}
