//! Public-profile service
//!
//! Business rules on top of [`ShareStore`]: missing rows become `NotFound`
//! errors, and inactive profiles fail public lookups with exactly the same
//! error as unknown ones.

use std::sync::Arc;

use redb::Database;
use tracing::{debug, info};

use crate::error::AppError;
use crate::model::{Profile, ProfileUpdate, PublicProfile, PublicProfileView};
use crate::store::{Lookup, ShareStore};

#[derive(Clone)]
pub struct ProfileService {
    store: ShareStore,
}

impl ProfileService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            store: ShareStore::new(db),
        }
    }

    /// Returns the caller's public profile, creating it on first call
    ///
    /// The boolean reports whether the row was created by this call.
    pub fn get_or_create(&self, user_id: &str) -> Result<(PublicProfile, bool), AppError> {
        let (record, created) = self.store.get_or_create(user_id)?;
        if created {
            info!(user_id, profile_id = %record.id, "created public profile");
        }
        Ok((record, created))
    }

    /// Turns public visibility on or off for an existing public profile
    pub fn toggle(&self, user_id: &str, is_active: bool) -> Result<PublicProfile, AppError> {
        let record = self
            .store
            .set_active(user_id, is_active)?
            .ok_or(AppError::PublicProfileNotFound)?;
        info!(user_id, is_active, "toggled public profile");
        Ok(record)
    }

    /// Anonymous lookup by share token; counts one view
    pub fn get_by_token(&self, share_token: &str) -> Result<PublicProfileView, AppError> {
        self.view(Lookup::Token(share_token))
    }

    /// Anonymous lookup by user id; counts one view
    pub fn get_by_user_id(&self, user_id: &str) -> Result<PublicProfileView, AppError> {
        self.view(Lookup::User(user_id))
    }

    fn view(&self, lookup: Lookup<'_>) -> Result<PublicProfileView, AppError> {
        match self.store.record_view(lookup)? {
            Some((record, profile)) => {
                debug!(user_id = %record.user_id, view_count = record.view_count, "public profile viewed");
                Ok(PublicProfileView::new(&record, profile))
            }
            None => Err(AppError::PublicProfileNotFound),
        }
    }

    /// Profile snapshot of the caller, `ProfileNotFound` when none was stored
    pub fn get_profile(&self, user_id: &str) -> Result<Profile, AppError> {
        self.store
            .get_profile(user_id)?
            .ok_or(AppError::ProfileNotFound)
    }

    /// Merges `update` into the caller's profile, creating an empty one first
    /// when needed
    pub fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<Profile, AppError> {
        let profile = self.store.upsert_profile(user_id, update)?;
        debug!(user_id, "updated profile");
        Ok(profile)
    }
}
