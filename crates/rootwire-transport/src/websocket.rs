//! Realtime channel implementation using `tokio-tungstenite`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use futures_util::SinkExt;
use futures_util::stream::{SplitSink, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::{ChannelId, TransportError};

/// Counter for generating unique channel IDs.
static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// How many inbound frames a slow subscriber may lag behind before it
/// starts missing messages.
const INBOUND_BUFFER: usize = 64;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Connection state of a [`WebSocketChannel`].
///
/// Named after the browser `WebSocket.readyState` values so the strings
/// reported to the UI stay familiar. There is no `CONNECTING` state: a
/// channel only exists once its opening handshake has completed.
///
/// ```text
///   Open ──(close())──→ Closing ──(peer acks / stream ends)──→ Closed
///     └──────────────(peer drops / read error)────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Open,
    Closing,
    Closed,
}

impl ChannelState {
    /// Returns the raw state name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closing => "CLOSING",
            Self::Closed => "CLOSED",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Open,
            1 => Self::Closing,
            _ => Self::Closed,
        }
    }

    fn into_u8(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Closing => 1,
            Self::Closed => 2,
        }
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, lock-free view of a channel's state.
///
/// Both the channel handle and its reader task hold one, so the reader can
/// mark the channel closed when the peer goes away.
#[derive(Debug, Clone)]
struct SharedState(Arc<AtomicU8>);

impl SharedState {
    fn new(state: ChannelState) -> Self {
        Self(Arc::new(AtomicU8::new(state.into_u8())))
    }

    fn get(&self) -> ChannelState {
        ChannelState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: ChannelState) {
        self.0.store(state.into_u8(), Ordering::Release);
    }
}

/// A single open push channel to the backend.
///
/// Inbound text frames are fanned out to every subscriber as raw strings.
/// The channel does not interpret them; decoding is up to the consumer.
///
/// Dropping the handle stops the reader task. Call [`close`](Self::close)
/// first if you want the peer to see a clean close frame.
pub struct WebSocketChannel {
    id: ChannelId,
    url: String,
    state: SharedState,
    sink: Mutex<WsSink>,
    inbound: broadcast::Sender<String>,
    reader: JoinHandle<()>,
}

impl WebSocketChannel {
    /// Opens a channel to `url`, optionally presenting a bearer token in
    /// the upgrade request.
    ///
    /// Resolves once the opening handshake is complete.
    pub async fn connect(
        url: &str,
        bearer: Option<&str>,
    ) -> Result<Self, TransportError> {
        let mut request = url
            .into_client_request()
            .map_err(|e| TransportError::InvalidUrl(format!("{url}: {e}")))?;

        if let Some(token) = bearer {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| TransportError::InvalidHeader(e.to_string()))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (ws, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(TransportError::Handshake)?;

        let id = ChannelId::new(NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed));
        let state = SharedState::new(ChannelState::Open);
        let (inbound, _) = broadcast::channel(INBOUND_BUFFER);
        let (sink, stream) = ws.split();

        let reader = tokio::spawn(read_loop(id, stream, inbound.clone(), state.clone()));

        tracing::debug!(%id, url, "realtime channel open");

        Ok(Self {
            id,
            url: url.to_string(),
            state,
            sink: Mutex::new(sink),
            inbound,
            reader,
        })
    }

    /// Returns the unique identifier for this channel.
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Returns the URL this channel was opened against.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the current connection state.
    pub fn state(&self) -> ChannelState {
        self.state.get()
    }

    /// Subscribes to inbound text frames received from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.inbound.subscribe()
    }

    /// Starts the closing handshake.
    ///
    /// The state moves to `Closing` immediately and to `Closed` once the
    /// reader sees the stream end.
    pub async fn close(&self) -> Result<(), TransportError> {
        if self.state() != ChannelState::Open {
            return Err(TransportError::ConnectionClosed(format!(
                "{} is {}",
                self.id,
                self.state()
            )));
        }
        self.state.set(ChannelState::Closing);
        self.sink
            .lock()
            .await
            .close()
            .await
            .map_err(TransportError::SendFailed)
    }
}

impl Drop for WebSocketChannel {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

impl fmt::Debug for WebSocketChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSocketChannel")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("state", &self.state())
            .finish()
    }
}

/// Forwards inbound frames to subscribers until the stream ends.
async fn read_loop(
    id: ChannelId,
    mut stream: futures_util::stream::SplitStream<WsStream>,
    inbound: broadcast::Sender<String>,
    state: SharedState,
) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                // No subscribers is fine; the frame is simply dropped.
                let _ = inbound.send(text.as_str().to_owned());
            }
            Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                Ok(text) => {
                    let _ = inbound.send(text);
                }
                Err(_) => tracing::debug!(%id, "dropping non-utf8 binary frame"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // ping/pong/raw frame
            Err(e) => {
                tracing::debug!(%id, error = %e, "realtime channel read failed");
                break;
            }
        }
    }
    state.set(ChannelState::Closed);
    tracing::debug!(%id, "realtime channel closed");
}
