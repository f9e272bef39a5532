//! Explicit session context.
//!
//! The logged-in user is owned by a [`Session`] value handed to the forms
//! that need it. It is set on login, cleared on logout, and restored from its
//! [`SessionStore`] at start-up.

mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::api::SessionUser;
use crate::errors::ClientError;

pub struct Session {
    store: Box<dyn SessionStore>,
    user: Option<SessionUser>,
    since: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        Self {
            store,
            user: None,
            since: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySessionStore::new()))
    }

    /// Rehydrates the user persisted by a previous login, if any.
    pub fn restore(store: Box<dyn SessionStore>) -> Result<Self, ClientError> {
        let user = store.load()?;
        let since = match &user {
            Some(user) => {
                info!(user = %user.id, "restored session");
                store.saved_at()
            }
            None => None,
        };
        Ok(Self { store, user, since })
    }

    pub fn login(&mut self, user: SessionUser) -> Result<(), ClientError> {
        self.store.save(&user)?;
        info!(user = %user.id, admin = user.is_admin, "logged in");
        self.user = Some(user);
        self.since = Some(Utc::now());
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.store.clear()?;
        self.since = None;
        if let Some(user) = self.user.take() {
            info!(user = %user.id, "logged out");
        }
        Ok(())
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// The current user, or `LoginRequired` naming the attempted action.
    pub fn require(&self, action: &'static str) -> Result<&SessionUser, ClientError> {
        self.user
            .as_ref()
            .ok_or(ClientError::LoginRequired(action))
    }

    /// When the current user logged in, when known.
    pub fn since(&self) -> Option<DateTime<Utc>> {
        self.since
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map_or(false, |user| user.is_admin)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}
