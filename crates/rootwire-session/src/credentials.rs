//! Credential precedence: where the bearer token comes from.
//!
//! A token can live in three places: the in-memory session, a cookie the
//! server set, or the durable local store. Rather than a nest of `if`s,
//! each place is a [`CredentialProvider`] and the precedence rule is an
//! ordered [`CredentialChain`]: ask everyone, take the first answer.

use std::fmt;
use std::sync::Arc;

use futures_util::future::{BoxFuture, join_all};

use crate::{AUTH_TOKEN_KEY, LocalStore, SessionError};

/// Future returned by [`CredentialProvider::token`].
pub type TokenFuture<'a> = BoxFuture<'a, Result<Option<String>, SessionError>>;

/// A place a bearer token might be found.
///
/// The method returns a boxed future (rather than being an `async fn`) so
/// that providers can be stored as `Arc<dyn CredentialProvider>` in one
/// list.
pub trait CredentialProvider: Send + Sync {
    /// Short, stable name for logs (`"session"`, `"cookie"`, ...).
    fn source(&self) -> &'static str;

    /// Looks up the token. `Ok(None)` means "this source has nothing".
    fn token(&self) -> TokenFuture<'_>;
}

/// A token together with the provider that supplied it.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub source: &'static str,
    pub token: String,
}

impl fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("source", &self.source)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Providers in priority order, highest first.
///
/// All providers are queried concurrently; priority only decides which
/// answer wins. A provider that fails is logged and skipped, so a corrupt
/// local store never hides a perfectly good cookie.
#[derive(Clone, Default)]
pub struct CredentialChain {
    providers: Vec<Arc<dyn CredentialProvider>>,
}

impl CredentialChain {
    /// Creates an empty chain. An empty chain never resolves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `provider` at the lowest priority so far.
    pub fn with(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Provider names in priority order.
    pub fn sources(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Returns the highest-priority non-empty token, if any provider has one.
    pub async fn resolve(&self) -> Option<ResolvedCredential> {
        let answers = join_all(self.providers.iter().map(|p| p.token())).await;

        for (provider, answer) in self.providers.iter().zip(answers) {
            match answer {
                Ok(Some(token)) if !token.is_empty() => {
                    tracing::debug!(source = provider.source(), "credential resolved");
                    return Some(ResolvedCredential {
                        source: provider.source(),
                        token,
                    });
                }
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(
                        source = provider.source(),
                        error = %e,
                        "credential lookup failed, trying next source"
                    );
                }
            }
        }
        None
    }
}

impl fmt::Debug for CredentialChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialChain")
            .field("sources", &self.sources())
            .finish()
    }
}

/// Reads the token mirror from a [`LocalStore`].
pub struct LocalStoreCredentials {
    store: Arc<dyn LocalStore>,
    key: String,
}

impl LocalStoreCredentials {
    /// Reads the standard [`AUTH_TOKEN_KEY`] entry.
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            store,
            key: AUTH_TOKEN_KEY.to_string(),
        }
    }
}

impl CredentialProvider for LocalStoreCredentials {
    fn source(&self) -> &'static str {
        "local_store"
    }

    fn token(&self) -> TokenFuture<'_> {
        Box::pin(async move { self.store.get(&self.key) })
    }
}
