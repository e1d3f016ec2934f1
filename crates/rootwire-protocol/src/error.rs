//! Error types for the protocol layer.
//!
//! When you see a `ProtocolError`, the bytes arrived fine but could not be
//! turned into (or made from) the type the caller asked for.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: a non-JSON body (an HTML error page behind a
    /// `200`), missing required fields, or wrong data types.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
