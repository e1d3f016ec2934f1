//! Unified error type for the Rootwire client.

use rootwire_protocol::{Codec, ErrorResponse, JsonCodec, ProtocolError};
use rootwire_session::SessionError;
use rootwire_transport::TransportError;

use crate::config::ConfigError;

/// Result type of every fallible [`ApiClient`](crate::ApiClient) operation.
///
/// `Ok` carries the value, which may itself be empty (an empty favorites
/// list is a success). `Err` carries the cause.
pub type ApiResult<T> = Result<T, ApiError>;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network failure or non-success HTTP status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not the JSON we expected.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Missing session, or a credential mirror misbehaved.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The endpoint configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// `true` when the call was refused locally because no session is held.
    /// No request was sent in that case.
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::Session(SessionError::NotAuthenticated))
    }

    /// The HTTP status, if the server answered with a non-success code.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// The server's own explanation, if the error body was a backend
    /// [`ErrorResponse`].
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Transport(TransportError::Status { body, .. }) => JsonCodec
                .decode::<ErrorResponse>(body.as_bytes())
                .ok()
                .map(|e| e.describe()),
            _ => None,
        }
    }
}
