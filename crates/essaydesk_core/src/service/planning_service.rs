//! Planning use cases.

use super::list_page;
use crate::model::planning::{
    NewPlanning, Planning, PlanningLookup, PlanningPatch, PlanningView, PLANNING_PER_MONTH_ERROR,
};
use crate::model::stats::MonthlyCount;
use crate::outcome::Outcome;
use crate::query::filter::Resource;
use crate::query::pagination::Paginated;
use crate::repo::{Clock, ListQuery, Repository, SystemClock};
use crate::store::{PlanningStats, Store};

pub struct PlanningService<S, C = SystemClock> {
    repo: Repository<Planning, S, C>,
}

impl<S: Store<Planning>, C: Clock> PlanningService<S, C> {
    pub fn new(repo: Repository<Planning, S, C>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository<Planning, S, C> {
        &self.repo
    }

    pub fn create(&self, input: &NewPlanning) -> Outcome<PlanningView> {
        self.repo.create(input).map(PlanningView::from)
    }

    pub fn get(&self, lookup: &PlanningLookup) -> Outcome<PlanningView> {
        self.repo.find_by(lookup).map(PlanningView::from)
    }

    pub fn list(&self, query: &ListQuery) -> Outcome<Paginated<PlanningView>> {
        list_page(&self.repo, query)
    }

    pub fn count(&self, filter: Option<&Resource>) -> Outcome<u64> {
        self.repo.count(filter)
    }

    pub fn update(&self, id: &str, patch: &PlanningPatch) -> Outcome<PlanningView> {
        self.repo.update(id, patch).map(PlanningView::from)
    }

    pub fn delete(&self, id: &str) -> Outcome<bool> {
        self.repo.delete(id)
    }
}

impl<S: Store<Planning> + PlanningStats, C: Clock> PlanningService<S, C> {
    /// Active plannings per creation month, optionally for one user.
    pub fn per_month(&self, user_id: Option<&str>) -> Outcome<Vec<MonthlyCount>> {
        self.repo
            .store()
            .per_month(user_id)
            .map_err(|err| {
                self.repo
                    .report_failure("per_month", PLANNING_PER_MONTH_ERROR, &err)
            })
    }
}
