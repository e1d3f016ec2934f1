//! The realtime channel.
//!
//! At most one channel is held at a time. It is opened explicitly, after
//! login, and lives independently of the session: signing out does not
//! close it.

use rootwire_transport::{ChannelId, ChannelState, Transport, WebSocketChannel};
use tokio::sync::broadcast;

use crate::client::{ApiClient, logged};
use crate::error::ApiResult;

impl<T: Transport> ApiClient<T> {
    /// Opens the channel at [`Endpoint::socket_url`](crate::Endpoint::socket_url),
    /// presenting the session token.
    ///
    /// A channel that is already held is closed and replaced once the new
    /// one is up. If the new one fails to open the old one is kept.
    pub async fn start_socket_connection(&self) -> ApiResult<ChannelId> {
        logged(
            "start_socket_connection",
            async {
                let session = self.require_session()?;
                let url = self.endpoint.socket_url();
                let channel = WebSocketChannel::connect(&url, Some(&session.token)).await?;
                let id = channel.id();

                let previous = self.channel.lock().await.replace(channel);
                if let Some(old) = previous {
                    if old.state() == ChannelState::Open {
                        if let Err(e) = old.close().await {
                            tracing::warn!(channel = %old.id(), error = %e, "closing replaced channel failed");
                        }
                    }
                    tracing::info!(old = %old.id(), new = %id, "realtime channel replaced");
                } else {
                    tracing::info!(channel = %id, url = %url, "realtime channel opened");
                }
                Ok(id)
            }
            .await,
        )
    }

    /// The state of the current channel, or `None` if none was opened.
    pub async fn get_socket_status(&self) -> Option<ChannelState> {
        self.channel.lock().await.as_ref().map(WebSocketChannel::state)
    }

    /// Raw text frames received on the current channel from now on.
    ///
    /// The frames are not decoded here; see
    /// [`SocketMessage`](rootwire_protocol::SocketMessage) for their shape.
    pub async fn subscribe_socket(&self) -> Option<broadcast::Receiver<String>> {
        self.channel
            .lock()
            .await
            .as_ref()
            .map(WebSocketChannel::subscribe)
    }

    /// Closes and forgets the current channel. With no channel this is a
    /// no-op; a channel the peer already closed is just forgotten.
    pub async fn close_socket(&self) -> ApiResult<()> {
        let Some(channel) = self.channel.lock().await.take() else {
            return Ok(());
        };
        tracing::info!(channel = %channel.id(), "closing realtime channel");
        if channel.state() != ChannelState::Open {
            return Ok(());
        }
        logged("close_socket", channel.close().await.map_err(Into::into))
    }
}
