//! User use cases.

use super::list_page;
use crate::model::user::{NewUser, User, UserLookup, UserPatch, UserView, USER_ALREADY_EXISTS};
use crate::outcome::{fail, Outcome};
use crate::query::filter::Resource;
use crate::query::pagination::Paginated;
use crate::repo::{Clock, ListQuery, Repository, SystemClock};
use crate::store::Store;
use log::info;

pub struct UserService<S, C = SystemClock> {
    repo: Repository<User, S, C>,
}

impl<S: Store<User>, C: Clock> UserService<S, C> {
    pub fn new(repo: Repository<User, S, C>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository<User, S, C> {
        &self.repo
    }

    /// Registers a user unless an active user already owns the email.
    ///
    /// Lookup failures other than "not found" are returned as-is.
    pub fn create(&self, input: &NewUser) -> Outcome<UserView> {
        match self.repo.find_by(&UserLookup::Email(input.email.clone())) {
            Ok(_) => {
                info!("event=user_create module=service status=rejected reason=email_taken");
                return fail(USER_ALREADY_EXISTS);
            }
            Err(err) if !err.is_not_found() => return fail(err),
            Err(_) => {}
        }
        self.repo.create(input).map(UserView::from)
    }

    pub fn get(&self, lookup: &UserLookup) -> Outcome<UserView> {
        self.repo.find_by(lookup).map(UserView::from)
    }

    pub fn list(&self, query: &ListQuery) -> Outcome<Paginated<UserView>> {
        list_page(&self.repo, query)
    }

    pub fn count(&self, filter: Option<&Resource>) -> Outcome<u64> {
        self.repo.count(filter)
    }

    pub fn update(&self, id: &str, patch: &UserPatch) -> Outcome<UserView> {
        self.repo.update(id, patch).map(UserView::from)
    }

    pub fn delete(&self, id: &str) -> Outcome<bool> {
        self.repo.delete(id)
    }
}
