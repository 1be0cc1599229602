//! Session store: who is logged in, persisted across restarts.
//!
//! The store is the single owner of the current [`User`]. Reads are lock-free
//! (`ArcSwapOption`); every change is pushed to registered listeners. The
//! persisted copy lives in [`Storage`] under [`SESSION_KEY`] and is what the
//! auth interceptor reads to attach bearer tokens.
//!
//! State is always one of two things: authenticated with a non-empty token, or
//! unauthenticated. There is no token refresh exchange; expiry is discovered
//! when the backend rejects a request with 403.

pub mod storage;

use anyhow::{Context, Result};
use arc_swap::ArcSwapOption;
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::models::{ProfileEnvelope, ProfileField, StoredSession, User};
use crate::ui::Navigator;

pub use storage::{FileStorage, MemoryStorage, Storage};

/// Storage key of the persisted session record
pub const SESSION_KEY: &str = "user";

type Listener = Arc<dyn Fn(Option<&User>) + Send + Sync>;

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

pub struct SessionStore {
    storage: Arc<dyn Storage>,
    navigator: Arc<dyn Navigator>,
    user: ArcSwapOption<User>,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
}

impl SessionStore {
    /// Create an empty (unauthenticated) store.
    pub fn new(storage: Arc<dyn Storage>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            storage,
            navigator,
            user: ArcSwapOption::empty(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Current user, if authenticated.
    pub fn get(&self) -> Option<Arc<User>> {
        self.user.load_full()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.load().is_some()
    }

    /// Replace the in-memory user and notify listeners. Does not persist.
    pub fn set(&self, user: Option<User>) {
        self.replace(user.map(Arc::new));
    }

    fn replace(&self, user: Option<Arc<User>>) -> Option<Arc<User>> {
        self.user.store(user.clone());
        self.notify(user.as_deref());
        user
    }

    /// Register a listener called with the new state after every change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Option<&User>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn notify(&self, user: Option<&User>) {
        // Snapshot so listeners may (un)subscribe from inside the callback
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(user);
        }
    }

    /// Read the persisted record as stored, token or not.
    pub async fn read_stored(&self) -> Result<Option<StoredSession>> {
        let Some(raw) = self.storage.get(SESSION_KEY).await? else {
            return Ok(None);
        };
        let stored = serde_json::from_str(&raw).context("Persisted session is malformed")?;
        Ok(Some(stored))
    }

    /// Write `user` as the persisted record.
    pub async fn persist(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user).context("Failed to serialize session")?;
        self.storage.set(SESSION_KEY, &raw).await
    }

    /// Populate the store from the persisted record at startup.
    ///
    /// A missing, malformed or tokenless record leaves the store empty.
    pub async fn load(&self) -> Option<Arc<User>> {
        let user = match self.read_stored().await {
            Ok(Some(stored)) => stored.into_user(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable persisted session");
                None
            }
        };

        match &user {
            Some(user) => tracing::debug!(username = %user.username(), "Restored session"),
            None => tracing::debug!("No persisted session"),
        }

        self.replace(user.map(Arc::new))
    }

    /// Log in: persist the new session and make it current.
    ///
    /// The interceptor reads the token from storage, so nothing changes in
    /// memory unless the write succeeds.
    pub async fn establish(&self, user: User) -> Result<Arc<User>> {
        self.persist(&user)
            .await
            .context("Failed to persist session")?;
        tracing::info!(username = %user.username(), "Session established");
        let user = Arc::new(user);
        self.replace(Some(Arc::clone(&user)));
        Ok(user)
    }

    /// Forget the session in memory and on disk.
    pub async fn clear(&self) {
        self.set(None);
        if let Err(e) = self.storage.remove(SESSION_KEY).await {
            tracing::warn!(error = %e, "Failed to remove persisted session");
        }
    }

    /// Clear the session and send the user to the login screen.
    pub async fn invalidate(&self) {
        self.clear().await;
        self.navigator.to_login();
    }

    /// Re-fetch the current user's profile with the persisted token.
    ///
    /// Without a token nothing is requested: the store is emptied and the user
    /// is sent to login. Any failure of the profile call clears the session
    /// (memory and disk) and redirects, except a 403, which the interceptor
    /// has already handled. On success the fetched profile replaces the
    /// in-memory one and keeps the existing token.
    pub async fn refresh(&self, api: &ApiClient) -> Option<Arc<User>> {
        let stored = match self.read_stored().await {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable persisted session");
                StoredSession::default()
            }
        };

        let Some(token) = stored.token().map(str::to_string) else {
            tracing::debug!("No stored token, session is unauthenticated");
            self.clear().await;
            self.navigator.to_login();
            return None;
        };

        let path = match &stored.profile.id {
            Some(id) => format!("/user/{}", id),
            None => "/user".to_string(),
        };

        match api.get::<ProfileEnvelope>(&path).await {
            Ok(envelope) => {
                let mut profile = envelope.into_profile();
                if profile.username.is_empty() {
                    profile.username = stored.profile.username;
                }
                if profile.id.is_none() {
                    profile.id = stored.profile.id;
                }

                let user = User::new(profile, token);
                if let Err(e) = self.persist(&user).await {
                    tracing::warn!(error = %e, "Failed to persist refreshed session");
                }
                self.replace(Some(Arc::new(user)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile refresh failed, clearing session");
                self.clear().await;
                if !e.is_forbidden() {
                    self.navigator.to_login();
                }
                None
            }
        }
    }

    /// Merge one edited profile field into the current user and persist it.
    ///
    /// Returns `None` when nobody is logged in.
    pub async fn merge_profile(&self, field: ProfileField, value: &str) -> Option<Arc<User>> {
        let current = self.get()?;
        let user = (*current).clone().with_field(field, value);

        if let Err(e) = self.persist(&user).await {
            tracing::warn!(error = %e, field = %field, "Failed to persist profile change");
        }
        self.replace(Some(Arc::new(user)))
    }
}
