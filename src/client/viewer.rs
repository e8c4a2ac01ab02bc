//! Visitor side of public profiles
//!
//! Every server lookup counts a view, so a visitor session remembers what it
//! has already opened and answers repeat visits from memory. Reloading a
//! profile page within one session therefore counts once.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::api::{ClientError, PublicProfileApi};
use crate::model::PublicProfileView;

pub struct ProfileViewer<A> {
    api: A,
    by_token: Mutex<HashMap<String, PublicProfileView>>,
    by_user: Mutex<HashMap<String, PublicProfileView>>,
}

impl<A: PublicProfileApi> ProfileViewer<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            by_token: Mutex::new(HashMap::new()),
            by_user: Mutex::new(HashMap::new()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Opens a public profile by share token
    pub async fn view_by_token(&self, share_token: &str) -> Result<PublicProfileView, ClientError> {
        if let Some(view) = cached(&self.by_token, share_token) {
            debug!("public profile already viewed this session");
            return Ok(view);
        }

        let view = self.api.get_by_token(share_token).await?;
        remember(&self.by_token, share_token, &view);
        Ok(view)
    }

    /// Opens a public profile by user id
    pub async fn view_by_user_id(&self, user_id: &str) -> Result<PublicProfileView, ClientError> {
        if let Some(view) = cached(&self.by_user, user_id) {
            debug!(user_id, "public profile already viewed this session");
            return Ok(view);
        }

        let view = self.api.get_by_user_id(user_id).await?;
        remember(&self.by_user, user_id, &view);
        Ok(view)
    }

    /// Forgets viewed profiles so the next visit is counted again
    pub fn clear(&self) {
        self.by_token.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.by_user.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

fn cached(map: &Mutex<HashMap<String, PublicProfileView>>, key: &str) -> Option<PublicProfileView> {
    map.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(key)
        .cloned()
}

fn remember(map: &Mutex<HashMap<String, PublicProfileView>>, key: &str, view: &PublicProfileView) {
    map.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key.to_string(), view.clone());
}
