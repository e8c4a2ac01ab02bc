//! Client-side public profile session
//!
//! The session follows the signed-in user: when a session starts it fetches
//! (or creates) the public profile and derives the share link; when it ends
//! everything is cleared. State transitions go through [`reduce`] and are
//! published on a `watch` channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tracing::{debug, warn};

use super::api::{ClientError, PublicProfileApi};
use crate::model::PublicProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareState {
    /// No signed-in user
    Idle,
    /// Get-or-create request in flight
    Loading,
    Ready {
        profile: PublicProfile,
        link: String,
    },
    Error {
        message: String,
    },
}

impl ShareState {
    pub fn link(&self) -> Option<&str> {
        match self {
            ShareState::Ready { link, .. } => Some(link),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&PublicProfile> {
        match self {
            ShareState::Ready { profile, .. } => Some(profile),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ShareAction {
    SessionStarted,
    Loaded { profile: PublicProfile, link: String },
    Failed { message: String },
    Toggled { profile: PublicProfile },
    SessionEnded,
}

/// Pure transition function over [`ShareState`]
pub fn reduce(state: ShareState, action: ShareAction) -> ShareState {
    match (state, action) {
        (_, ShareAction::SessionStarted) => ShareState::Loading,
        (_, ShareAction::Loaded { profile, link }) => ShareState::Ready { profile, link },
        (_, ShareAction::Failed { message }) => ShareState::Error { message },
        (ShareState::Ready { link, .. }, ShareAction::Toggled { profile }) => {
            ShareState::Ready { profile, link }
        }
        (state, ShareAction::Toggled { .. }) => state,
        (_, ShareAction::SessionEnded) => ShareState::Idle,
    }
}

/// Builds the public URL for a share token, e.g. `https://app.example/public-profile/abc123`
pub fn share_link(origin: &str, share_token: &str) -> String {
    format!("{}/public-profile/{}", origin.trim_end_matches('/'), share_token)
}

#[derive(Error, Debug)]
#[error("Clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Process-local clipboard
///
/// Headless callers (servers, CLIs without a display, tests) use this one;
/// desktop callers enable the `system-clipboard` feature for [`SystemClipboard`].
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| ClipboardError("lock poisoned".to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}

/// The operating system clipboard
#[cfg(feature = "system-clipboard")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        // arboard handles are not Sync, so each write opens its own
        let mut clipboard =
            arboard::Clipboard::new().map_err(|err| ClipboardError(err.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|err| ClipboardError(err.to_string()))
    }
}

struct ActiveSession {
    generation: u64,
    bearer: String,
}

pub struct ShareSession<A, C> {
    api: A,
    clipboard: C,
    origin: String,
    state: watch::Sender<ShareState>,
    generation: AtomicU64,
    session: AsyncMutex<Option<ActiveSession>>,
}

impl<A: PublicProfileApi, C: Clipboard> ShareSession<A, C> {
    /// `origin` is the frontend origin the share link points at
    pub fn new(api: A, clipboard: C, origin: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ShareState::Idle);
        Self {
            api,
            clipboard,
            origin: origin.into(),
            state,
            generation: AtomicU64::new(0),
            session: AsyncMutex::new(None),
        }
    }

    pub fn state(&self) -> ShareState {
        self.state.borrow().clone()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn subscribe(&self) -> watch::Receiver<ShareState> {
        self.state.subscribe()
    }

    fn dispatch(&self, action: ShareAction) {
        self.state.send_modify(|state| {
            let current = std::mem::replace(state, ShareState::Idle);
            *state = reduce(current, action);
        });
    }

    /// Starts a session for the given access token and loads the public profile
    ///
    /// Returns the state after the request settles. If another login or a
    /// logout happened meanwhile, the response is dropped and the newer state
    /// is returned untouched.
    pub async fn login(&self, bearer: impl Into<String>) -> ShareState {
        let bearer = bearer.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut session = self.session.lock().await;
            *session = Some(ActiveSession {
                generation,
                bearer: bearer.clone(),
            });
            self.dispatch(ShareAction::SessionStarted);
        }

        let result = self.api.get_or_create(&bearer).await;

        let session = self.session.lock().await;
        let current = session.as_ref().map(|s| s.generation);
        if current != Some(generation) {
            debug!(generation, ?current, "dropping stale public profile response");
            return self.state();
        }

        match result {
            Ok(profile) => {
                let link = share_link(&self.origin, &profile.share_token);
                self.dispatch(ShareAction::Loaded { profile, link });
            }
            Err(err) => {
                warn!(error = %err, "failed to load public profile");
                self.dispatch(ShareAction::Failed {
                    message: err.to_string(),
                });
            }
        }
        drop(session);

        self.state()
    }

    /// Ends the session; profile and link are cleared unconditionally
    pub async fn logout(&self) {
        let mut session = self.session.lock().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        *session = None;
        self.dispatch(ShareAction::SessionEnded);
    }

    /// Changes public visibility
    ///
    /// Only valid once the profile is loaded. On failure the current state is
    /// kept and the error is returned.
    pub async fn toggle(&self, is_active: bool) -> Result<PublicProfile, ClientError> {
        let (generation, bearer) = {
            let session = self.session.lock().await;
            match (session.as_ref(), self.state.borrow().profile()) {
                (Some(active), Some(_)) => (active.generation, active.bearer.clone()),
                _ => return Err(ClientError::NotReady),
            }
        };

        let profile = self.api.toggle(&bearer, is_active).await.map_err(|err| {
            warn!(error = %err, is_active, "failed to toggle public profile");
            err
        })?;

        let session = self.session.lock().await;
        if session.as_ref().map(|s| s.generation) == Some(generation) {
            self.dispatch(ShareAction::Toggled {
                profile: profile.clone(),
            });
        }

        Ok(profile)
    }

    /// Copies the share link to the clipboard
    ///
    /// Returns false when no link is available or the clipboard write failed.
    pub fn copy_share_link(&self) -> bool {
        let link = match self.state.borrow().link() {
            Some(link) => link.to_string(),
            None => return false,
        };

        match self.clipboard.write_text(&link) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to copy share link");
                false
            }
        }
    }
}
