//! Transport layer for Rootwire.
//!
//! Provides the [`Transport`] trait that abstracts over how an HTTP request
//! reaches the backend, the default [`HttpTransport`] built on `reqwest`,
//! and the realtime [`WebSocketChannel`].
//!
//! Everything here speaks bytes. Turning bytes into typed values is the
//! protocol layer's job.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — realtime channel via `tokio-tungstenite`

mod error;
mod http;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use http::HttpTransport;
pub use reqwest::cookie::Jar as CookieJar;
#[cfg(feature = "websocket")]
pub use websocket::{ChannelState, WebSocketChannel};

use std::fmt;
use std::future::Future;

/// Opaque identifier for a realtime channel handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Creates a new `ChannelId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chan-{}", self.0)
    }
}

/// The HTTP methods the backend surface uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Returns the method name as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully resolved request, ready to hand to a [`Transport`].
///
/// `body` is already-encoded JSON. `bearer` is the raw token; the
/// transport is responsible for formatting the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Vec<u8>>,
    pub bearer: Option<String>,
}

/// Executes HTTP requests against the backend.
///
/// Implementations must:
/// - send `Content-Type: application/json` on every request,
/// - send `Authorization: Bearer <token>` when `request.bearer` is set,
/// - include ambient cookies,
/// - map any non-success status to [`TransportError::Status`].
///
/// On success the raw response body is returned untouched.
///
/// The returned future is `Send` so callers can drive requests from any
/// Tokio worker thread.
pub trait Transport: Send + Sync + 'static {
    /// Sends the request and waits for the full response body.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}
