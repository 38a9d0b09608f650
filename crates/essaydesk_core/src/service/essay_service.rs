//! Essay use cases and dashboard aggregates.

use super::list_page;
use crate::model::essay::{
    Essay, EssayLookup, EssayPatch, EssayView, NewEssay, ESSAY_AVG_NOTE_ERROR,
    ESSAY_PER_MONTH_ERROR, ESSAY_PER_STATUS_ERROR, ESSAY_PER_THEME_ERROR,
};
use crate::model::stats::{MonthlyAverage, MonthlyCount, StatusCount, ThemeCount};
use crate::outcome::{ErrorDescriptor, Outcome};
use crate::query::filter::Resource;
use crate::query::pagination::Paginated;
use crate::repo::{Clock, ListQuery, Repository, SystemClock};
use crate::store::{EssayStats, Store, StoreResult};

pub struct EssayService<S, C = SystemClock> {
    repo: Repository<Essay, S, C>,
}

impl<S: Store<Essay>, C: Clock> EssayService<S, C> {
    pub fn new(repo: Repository<Essay, S, C>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository<Essay, S, C> {
        &self.repo
    }

    pub fn create(&self, input: &NewEssay) -> Outcome<EssayView> {
        self.repo.create(input).map(EssayView::from)
    }

    pub fn get(&self, lookup: &EssayLookup) -> Outcome<EssayView> {
        self.repo.find_by(lookup).map(EssayView::from)
    }

    pub fn list(&self, query: &ListQuery) -> Outcome<Paginated<EssayView>> {
        list_page(&self.repo, query)
    }

    pub fn count(&self, filter: Option<&Resource>) -> Outcome<u64> {
        self.repo.count(filter)
    }

    pub fn update(&self, id: &str, patch: &EssayPatch) -> Outcome<EssayView> {
        self.repo.update(id, patch).map(EssayView::from)
    }

    pub fn delete(&self, id: &str) -> Outcome<bool> {
        self.repo.delete(id)
    }
}

/// Aggregates are scoped to `user_id` when given, else span all users.
impl<S: Store<Essay> + EssayStats, C: Clock> EssayService<S, C> {
    pub fn per_month(&self, user_id: Option<&str>) -> Outcome<Vec<MonthlyCount>> {
        self.aggregate("per_month", ESSAY_PER_MONTH_ERROR, |store| {
            store.per_month(user_id)
        })
    }

    pub fn per_theme(&self, user_id: Option<&str>) -> Outcome<Vec<ThemeCount>> {
        self.aggregate("per_theme", ESSAY_PER_THEME_ERROR, |store| {
            store.per_theme(user_id)
        })
    }

    pub fn per_status(&self, user_id: Option<&str>) -> Outcome<Vec<StatusCount>> {
        self.aggregate("per_status", ESSAY_PER_STATUS_ERROR, |store| {
            store.per_status(user_id)
        })
    }

    pub fn average_note_per_month(&self, user_id: Option<&str>) -> Outcome<Vec<MonthlyAverage>> {
        self.aggregate("average_note_per_month", ESSAY_AVG_NOTE_ERROR, |store| {
            store.average_note_per_month(user_id)
        })
    }

    fn aggregate<T>(
        &self,
        operation: &str,
        descriptor: ErrorDescriptor,
        query: impl FnOnce(&S) -> StoreResult<T>,
    ) -> Outcome<T> {
        query(self.repo.store())
            .map_err(|err| self.repo.report_failure(operation, descriptor, &err))
    }
}
