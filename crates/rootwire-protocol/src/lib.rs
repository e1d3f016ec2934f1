//! Wire protocol for Rootwire.
//!
//! This crate defines what travels between the client and the backend:
//!
//! - **Types** ([`AuthResponse`], [`NodesResponse`], [`SocketMessage`], etc.) —
//!   the JSON shapes of the REST and realtime surfaces.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those shapes are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the client
//! facade (typed operations). It doesn't know about sessions or sockets.
//!
//! ```text
//! Transport (bytes) → Protocol (typed bodies) → ApiClient (operations)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    AuthResponse, AuthUser, DeploymentEnvironment, DeviceId, ErrorField,
    ErrorResponse, HealthCheckResponse, HealthStatus, LoginRequest,
    NodeCreateRequest, NodeDataCreateRequest, NodeDataItem,
    NodeFavoriteCreateRequest, NodeFavoriteItem, NodeResponse, NodeStatus,
    NodeUpdateRequest, NodesResponse, PaginationResponse, SocketMessage,
    SocketReading, SystemInfo, UserCreateRequest, UserId, UserResponse,
    UserUpdateRequest, UsersResponse,
};
