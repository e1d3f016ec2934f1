//! Codec trait and implementations for serializing/deserializing bodies.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The client facade doesn't care HOW bodies are serialized — it just
//! needs something that implements the [`Codec`] trait.
//!
//! The backend speaks JSON, so [`JsonCodec`] is the only implementation.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → safe to share between threads (the client may be
///   driven from any Tokio worker).
/// - `'static` → the codec owns everything it needs.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the result doesn't
/// borrow from the input bytes, so the response buffer can be dropped
/// right after decoding.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use rootwire_protocol::{Codec, JsonCodec, LoginRequest};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&LoginRequest::new("a", "b")).unwrap();
/// assert_eq!(bytes, br#"{"username":"a","password":"b"}"#);
///
/// let decoded: LoginRequest = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded.username, "a");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuthUser, NodeFavoriteItem};

    #[test]
    fn test_decode_non_json_body_returns_decode_error() {
        let result: Result<AuthUser, _> = JsonCodec.decode(b"<html>oops</html>");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_wrong_shape_returns_decode_error() {
        let result: Result<Vec<NodeFavoriteItem>, _> = JsonCodec.decode(br#"{"device_id":1}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_empty_list_is_not_an_error() {
        let items: Vec<NodeFavoriteItem> = JsonCodec.decode(b"[]").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_decode_ignored_any_accepts_any_json_but_not_garbage() {
        let ok: Result<serde::de::IgnoredAny, _> = JsonCodec.decode(br#"{"message":"deleted"}"#);
        assert!(ok.is_ok());
        let bad: Result<serde::de::IgnoredAny, _> = JsonCodec.decode(b"deleted");
        assert!(bad.is_err());
    }
}
