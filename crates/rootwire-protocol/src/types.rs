//! Wire types for the backend's REST and realtime surfaces.
//!
//! Every type here mirrors a JSON shape the backend sends or expects.
//! Field names follow the backend's `snake_case` convention, so most
//! structs need no serde renames at all.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The backend's identifier for a user account.
///
/// `#[serde(transparent)]` keeps it a plain number on the wire:
/// `UserId(1)` is `1`, not `{"0":1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user-{}", self.0)
    }
}

/// The backend's identifier for a sensor node (a physical device).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Common
// ---------------------------------------------------------------------------

/// The `error` field of an [`ErrorResponse`].
///
/// Some endpoints send a message string, others just `true`.
/// `#[serde(untagged)]` lets serde try each variant in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorField {
    Message(String),
    Flag(bool),
}

/// Error body returned alongside non-success statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Picks the most descriptive text the server gave us.
    pub fn describe(&self) -> String {
        match (&self.message, &self.error) {
            (Some(message), _) => message.clone(),
            (None, ErrorField::Message(error)) => error.clone(),
            (None, ErrorField::Flag(_)) => "unspecified error".to_string(),
        }
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResponse {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

// ---------------------------------------------------------------------------
// Healthcheck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Alive,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentEnvironment {
    Production,
    Development,
    Staging,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub environment: DeploymentEnvironment,
    /// Backend version string, e.g. `"v1.4.0"`.
    pub version: String,
}

/// Response of `GET /healthcheck/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: HealthStatus,
    pub system_info: SystemInfo,
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreateRequest {
    pub username: String,
    pub password: String,
}

/// The identity the backend vouches for: returned by login and by
/// `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: UserId,
    pub username: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Body of `PUT /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersResponse {
    pub data: Vec<UserResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationResponse>,
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// Reported health of a sensor node.
///
/// The backend uses SCREAMING case on the wire: `"ONLINE"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeStatus {
    Online,
    Offline,
    Error,
}

/// Body of `POST /nodes/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCreateRequest {
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_details: Option<String>,
}

/// Body of `PUT /nodes/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeResponse {
    pub device_id: DeviceId,
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_details: Option<String>,
}

/// Response of `GET /nodes/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodesResponse {
    pub data: Vec<NodeResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationResponse>,
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// Body of `POST /favorites`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFavoriteCreateRequest {
    pub device_id: DeviceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFavoriteItem {
    pub device_id: DeviceId,
}

// ---------------------------------------------------------------------------
// Node data (sensor readings)
// ---------------------------------------------------------------------------

/// Body of `POST /nodedata/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDataCreateRequest {
    pub user_id: UserId,
    pub device_id: DeviceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture_content: Option<f64>,
}

/// One stored sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDataItem {
    pub id: u64,
    pub user_id: UserId,
    pub device_id: DeviceId,
    #[serde(default)]
    pub moisture_content: Option<f64>,
    /// ISO 8601 timestamp, passed through as the server formatted it.
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Realtime
// ---------------------------------------------------------------------------

/// The reading embedded in a realtime push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketReading {
    pub device_id: DeviceId,
    pub moisture_content: f64,
    pub user_id: UserId,
}

/// A message pushed over the `/faucet` realtime channel.
///
/// The client library forwards these frames untouched; this type is here
/// for consumers that want to decode them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketMessage {
    /// `type` is a Rust keyword, hence the rename.
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub timestamp: String,
    pub device_id: DeviceId,
    pub data: SocketReading,
}

// =========================================================================
// Tests
// =========================================================================
