/// Errors that can occur in the transport layer.
///
/// The transport only moves bytes. It never looks inside a response body,
/// so decoding problems live in the protocol layer, not here.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (DNS, refused, reset, etc.),
    /// or the response body could not be read.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    ///
    /// `body` holds the raw response text so higher layers can extract a
    /// server-side error message for their logs.
    #[error("server returned status {status}")]
    Status { status: u16, body: String },

    /// A URL could not be turned into a request target.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// A header value contained characters HTTP does not allow.
    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    /// The WebSocket opening handshake failed.
    #[cfg(feature = "websocket")]
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tokio_tungstenite::tungstenite::Error),

    /// Sending a frame over an open channel failed.
    #[cfg(feature = "websocket")]
    #[error("send failed: {0}")]
    SendFailed(#[source] tokio_tungstenite::tungstenite::Error),

    /// The channel was already closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),
}

impl TransportError {
    /// Returns the HTTP status code, if this error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_returns_code_for_status_error() {
        let err = TransportError::Status {
            status: 503,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "server returned status 503");
    }

    #[test]
    fn test_status_returns_none_for_other_errors() {
        let err = TransportError::ConnectionClosed("gone".into());
        assert_eq!(err.status(), None);
    }
}
