//! Data-access core for the essaydesk writing platform.
//!
//! Users, essays and plannings share one repository contract built from a
//! filter compiler, an order compiler, pagination and a pluggable store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod outcome;
pub mod query;
pub mod repo;
pub mod service;
pub mod store;
pub mod util;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, ErrorReporter, ReporterConfig};
pub use model::essay::{Essay, EssayLookup, EssayPatch, EssayStatus, EssayView, NewEssay};
pub use model::planning::{NewPlanning, Planning, PlanningLookup, PlanningPatch, PlanningView};
pub use model::user::{NewUser, User, UserLookup, UserPatch, UserView};
pub use outcome::{fail, ok, ErrorDescriptor, ErrorKind, Outcome, OutcomeExt};
pub use query::pagination::{PageRequest, Paginated};
pub use repo::{Clock, ListQuery, Repository, SystemClock};
pub use service::{EssayService, PlanningService, UserService};
pub use store::{SqliteStore, Store, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
