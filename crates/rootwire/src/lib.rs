//! # Rootwire
//!
//! Session-aware client for the Rootwire sensor backend.
//!
//! One [`ApiClient`] is the only component that talks to the backend. It
//! keeps the signed-in session in memory, attaches the bearer token to
//! every request, restores the session from a cookie or a local mirror
//! when the backend still recognises the user, and owns the realtime
//! channel.
//!
//! Every operation returns an [`ApiResult`]. An empty value (no favorites)
//! is `Ok`; a refused or failed call is `Err` with its cause.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rootwire::prelude::*;
//!
//! # async fn run() -> Result<(), ApiError> {
//! let endpoint = EndpointConfig::from_env()?.select(Platform::Web)?;
//! let client = ApiClient::builder(endpoint).build()?;
//!
//! if !client.is_authenticated().await {
//!     client.login(&LoginRequest::new("alice", "secret")).await?;
//! }
//! for node in client.get_all_nodes().await?.data {
//!     println!("{} is {:?}", node.device_id, node.status);
//! }
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod config;
mod cookies;
mod error;
mod realtime;
mod resources;
#[cfg(test)]
mod testing;

pub use client::{ApiClient, ApiClientBuilder};
pub use config::{
    CHANNEL_PATH, ConfigError, ENV_NATIVE_BASE, ENV_VERSION, ENV_WEB_BASE, Endpoint,
    EndpointConfig, Platform,
};
pub use cookies::{AUTH_COOKIE, CookieCredentials};
pub use error::{ApiError, ApiResult};

pub use rootwire_protocol as protocol;
pub use rootwire_session as session;
pub use rootwire_transport as transport;

/// Everything most applications need, in one import.
pub mod prelude {
    pub use crate::{
        ApiClient, ApiClientBuilder, ApiError, ApiResult, Endpoint, EndpointConfig, Platform,
    };
    pub use rootwire_protocol::{
        AuthUser, Codec, DeviceId, JsonCodec, LoginRequest, NodeCreateRequest,
        NodeDataCreateRequest, NodeDataItem, NodeFavoriteItem, NodeResponse, NodeStatus,
        NodeUpdateRequest, NodesResponse, SocketMessage, UserCreateRequest, UserId,
        UserUpdateRequest,
    };
    pub use rootwire_session::{FileStore, LocalStore, MemoryStore, Session};
    pub use rootwire_transport::{ChannelId, ChannelState, CookieJar};
}
