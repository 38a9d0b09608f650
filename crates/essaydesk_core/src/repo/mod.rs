//! Repository layer: the data-access contract shared by every entity kind.
//!
//! # Responsibility
//! - Compile loose filter/order/page input and delegate to a [`Store`].
//! - Own record lifecycle fields (`id`, `created_at`, `updated_at`,
//!   `deleted_at`).
//! - Translate store failures into the entity's error descriptors.
//!
//! # Invariants
//! - Every read and write sees active (not soft-deleted) records only.
//! - Update and delete look the record up first and never write when the
//!   lookup fails.
//!
//! [`Store`]: crate::store::Store

mod clock;
mod repository;

pub use clock::{Clock, SystemClock};
pub use repository::{ListQuery, Repository};
