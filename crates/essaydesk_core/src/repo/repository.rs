//! Generic repository over a [`Store`].

use crate::logging::{ErrorReporter, ReporterConfig};
use crate::model::entity::{Entity, Lookup};
use crate::outcome::{fail, ok, ErrorDescriptor, Outcome};
use crate::query::filter::{make_filter, Combinator, FilterInput, Predicate, Resource};
use crate::query::order::{order_by, NestedOrder, OrderSpec};
use crate::query::pagination::PageRequest;
use crate::repo::clock::{Clock, SystemClock};
use crate::store::{FindManyQuery, Include, NewRecordMeta, Store, StoreError};
use crate::util::id::generate_prefixed;
use log::info;
use std::marker::PhantomData;

/// List request: page window plus optional filter resource and ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub page: PageRequest,
    pub filter: Option<Resource>,
    /// Empty or absent ordering falls back to `created_at desc`.
    pub order: Option<OrderSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Count,
    Create,
    FindBy,
    List,
    Update,
    Delete,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Create => "create",
            Self::FindBy => "find_by",
            Self::List => "list",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Data-access contract for entity kind `E`.
pub struct Repository<E, S, C = SystemClock> {
    store: S,
    clock: C,
    reporter: ErrorReporter,
    entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: Store<E>> Repository<E, S> {
    /// Repository on the wall clock with a reporter that logs every failure.
    pub fn new(store: S) -> Self {
        Self::with_parts(store, SystemClock, ReporterConfig::default())
    }
}

impl<E: Entity, S: Store<E>, C: Clock> Repository<E, S, C> {
    pub fn with_parts(store: S, clock: C, reporter: ReporterConfig) -> Self {
        Self {
            store,
            clock,
            reporter: ErrorReporter::new(reporter),
            entity: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Counts active records matching `filter`.
    pub fn count(&self, filter: Option<&Resource>) -> Outcome<u64> {
        let predicate = Self::active_filter(filter);
        self.store
            .count(&predicate)
            .map_err(|err| self.failure(Operation::Count, err))
    }

    /// Persists a new record with a fresh prefixed ID and `created_at = now`.
    pub fn create(&self, input: &E::Input) -> Outcome<E> {
        let meta = NewRecordMeta {
            id: generate_prefixed(E::PREFIX),
            created_at: self.clock.now_millis(),
        };
        self.store
            .insert(meta, input)
            .map_err(|err| self.failure(Operation::Create, err))
    }

    /// Loads the active record matching `lookup`, with relations.
    pub fn find_by(&self, lookup: &E::Lookup) -> Outcome<E> {
        let predicate = Predicate::active_only(lookup.to_predicate());
        match self.store.find_one(&predicate, Include::Relations) {
            Ok(Some(record)) => ok(record),
            Ok(None) => fail(E::ERRORS.not_found),
            Err(err) => fail(self.failure(Operation::FindBy, err)),
        }
    }

    /// Lists one page of active records.
    pub fn list(&self, query: &ListQuery) -> Outcome<Vec<E>> {
        let order = query
            .order
            .as_ref()
            .map(order_by)
            .filter(|order| !order.is_empty())
            .unwrap_or_else(NestedOrder::created_at_desc);
        let find = FindManyQuery {
            predicate: Self::active_filter(query.filter.as_ref()),
            order,
            take: query.page.take(),
            skip: query.page.skip(),
            include: Include::Relations,
        };
        self.store
            .find_many(&find)
            .map_err(|err| self.failure(Operation::List, err))
    }

    /// Applies `patch` to the active record `id`; `updated_at = now`.
    ///
    /// A failed lookup is returned unchanged and nothing is written.
    pub fn update(&self, id: &str, patch: &E::Patch) -> Outcome<E> {
        let existing = self.find_by(&<E::Lookup as Lookup>::by_id(id))?;
        self.store
            .patch(existing.id(), patch, self.clock.now_millis())
            .map_err(|err| self.failure(Operation::Update, err))
    }

    /// Soft-deletes the active record `id`; `deleted_at = now`.
    pub fn delete(&self, id: &str) -> Outcome<bool> {
        let existing = self.find_by(&<E::Lookup as Lookup>::by_id(id))?;
        match self.store.mark_deleted(existing.id(), self.clock.now_millis()) {
            Ok(true) => {
                info!(
                    "event=soft_delete module=repo entity={} status=ok id={}",
                    E::NAME,
                    existing.id()
                );
                ok(true)
            }
            Ok(false) => fail(E::ERRORS.not_found),
            Err(err) => fail(self.failure(Operation::Delete, err)),
        }
    }

    /// Reports a store failure outside the CRUD operations (e.g. aggregates)
    /// and returns `descriptor`.
    pub(crate) fn report_failure(
        &self,
        operation: &str,
        descriptor: ErrorDescriptor,
        err: &StoreError,
    ) -> ErrorDescriptor {
        self.reporter.report(E::NAME, operation, &descriptor, err);
        descriptor
    }

    fn active_filter(filter: Option<&Resource>) -> Predicate {
        let definition = filter.map(E::filter_definition).unwrap_or_default();
        Predicate::active_only(make_filter(&FilterInput {
            resource: filter,
            definition: &definition,
            operator: Some(Combinator::And),
        }))
    }

    fn failure(&self, operation: Operation, err: StoreError) -> ErrorDescriptor {
        let errors = E::ERRORS;
        let descriptor = match (&err, operation) {
            (StoreError::Constraint(_), Operation::Create | Operation::Update) => errors.conflict,
            (StoreError::Missing(_), Operation::Update | Operation::Delete) => {
                return errors.not_found;
            }
            (_, Operation::Count) => errors.count,
            (_, Operation::Create) => errors.create,
            (_, Operation::FindBy) => errors.find_by,
            (_, Operation::List) => errors.list,
            (_, Operation::Update) => errors.update,
            (_, Operation::Delete) => errors.delete,
        };
        self.reporter
            .report(E::NAME, operation.as_str(), &descriptor, &err);
        descriptor
    }
}
