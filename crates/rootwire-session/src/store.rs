//! The session store: the process's single source of truth for
//! "am I authenticated".
//!
//! # Concurrency note
//!
//! The store is a `tokio::sync::watch` sender. Every mutation replaces the
//! whole value, so concurrent writers resolve last-write-wins with no
//! partial states. Readers never block writers for longer than a clone.
//! Anyone interested in changes (UI, background tasks) can
//! [`subscribe`](SessionStore::subscribe) instead of polling.

use rootwire_protocol::AuthUser;
use tokio::sync::watch;

use crate::credentials::{CredentialProvider, TokenFuture};
use crate::Session;

/// Holds at most one [`Session`] and announces every change.
///
/// ## Lifecycle
///
/// ```text
///            set() / populate_if_empty()
///   [empty] ─────────────────────────────→ [active]
///      ↑                                      │
///      └──────────────── clear() ─────────────┘
/// ```
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Returns a copy of the current session, if any.
    pub fn get(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Returns the current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.token.clone())
    }

    /// Returns the current user, if any.
    pub fn user(&self) -> Option<AuthUser> {
        self.tx.borrow().as_ref().map(|s| s.user.clone())
    }

    /// Returns `true` if a session is held.
    pub fn is_active(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Stores `session`, replacing whatever was there.
    pub fn set(&self, session: Session) {
        let user_id = session.user_id();
        self.tx.send_replace(Some(session));
        tracing::info!(%user_id, "session established");
    }

    /// Stores `session` only if the store is empty.
    ///
    /// Returns `true` if the session was stored. Used by background
    /// reconciliation so it never clobbers a session a concurrent login
    /// established first.
    pub fn populate_if_empty(&self, session: Session) -> bool {
        let user_id = session.user_id();
        let stored = self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(session);
            true
        });
        if stored {
            tracing::info!(%user_id, "session restored from credential mirror");
        }
        stored
    }

    /// Drops the current session.
    ///
    /// Returns `true` if there was one. Clearing an empty store is a no-op
    /// and does not notify subscribers.
    pub fn clear(&self) -> bool {
        let cleared = self.tx.send_if_modified(|current| current.take().is_some());
        if cleared {
            tracing::info!("session cleared");
        }
        cleared
    }

    /// Returns a receiver that observes every session change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The in-memory tier of the credential chain.
impl CredentialProvider for SessionStore {
    fn source(&self) -> &'static str {
        "session"
    }

    fn token(&self) -> TokenFuture<'_> {
        let token = SessionStore::token(self);
        Box::pin(async move { Ok(token) })
    }
}

// =========================================================================
// Tests
// =========================================================================
