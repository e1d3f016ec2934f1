//! Error types for the session layer.

/// Errors that can occur while managing sessions and credential mirrors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation needs an authenticated session and none is held.
    ///
    /// Raised before any network traffic happens.
    #[error("no active session")]
    NotAuthenticated,

    /// Reading or writing the durable local store failed.
    #[error("local store i/o failed: {0}")]
    Store(#[source] std::io::Error),

    /// The durable local store exists but is not valid JSON.
    #[error("local store is corrupt: {0}")]
    StoreFormat(#[source] serde_json::Error),

    /// A credential provider could not read its source.
    #[error("credential provider {provider} failed: {reason}")]
    Credential {
        provider: &'static str,
        reason: String,
    },
}
