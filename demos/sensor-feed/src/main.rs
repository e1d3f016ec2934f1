//! Signs in to a Rootwire backend and prints the live sensor feed.
//!
//! ```text
//! ROOTWIRE_BE_BASE=https://api.example.com ROOTWIRE_BE_VERSION=/v1 \
//! SENSOR_FEED_USER=alice SENSOR_FEED_PASSWORD=secret \
//!     cargo run -p sensor-feed
//! ```
//!
//! The token is mirrored to `sensor-feed.json` in the working directory, so
//! a second run restores the session without asking the backend to log in
//! again (as long as it still recognises the cookie).

use std::sync::Arc;

use rootwire::prelude::*;
use tokio::sync::broadcast::error::RecvError;

const STORE_PATH: &str = "sensor-feed.json";

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rootwire=info,sensor_feed=info".into()),
        )
        .init();

    let platform = match std::env::var("SENSOR_FEED_NATIVE").as_deref() {
        Ok("1") | Ok("true") => Platform::Native,
        _ => Platform::Web,
    };
    let endpoint = EndpointConfig::from_env()?.select(platform)?;
    let client = ApiClient::builder(endpoint)
        .local_store(Arc::new(FileStore::new(STORE_PATH)))
        .build()?;

    if !client.is_authenticated().await || client.session().is_none() {
        let username = std::env::var("SENSOR_FEED_USER").unwrap_or_default();
        let password = std::env::var("SENSOR_FEED_PASSWORD").unwrap_or_default();
        client.login(&LoginRequest::new(username, password)).await?;
    }

    if let Some(user) = client.current_user() {
        tracing::info!(user_id = %user.user_id, username = %user.username, "signed in");
    }

    match client.get_favorite_nodes().await {
        Ok(favorites) => {
            for favorite in favorites {
                println!("favorite: {}", favorite.device_id);
            }
        }
        Err(e) => tracing::warn!(error = %e, "could not list favorites"),
    }

    client.start_socket_connection().await?;
    let Some(mut frames) = client.subscribe_socket().await else {
        return Ok(());
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            frame = frames.recv() => match frame {
                Ok(raw) => match JsonCodec.decode::<SocketMessage>(raw.as_bytes()) {
                    Ok(msg) => println!(
                        "[{}] {} moisture={:.1} ({})",
                        msg.timestamp, msg.device_id, msg.data.moisture_content, msg.message
                    ),
                    Err(e) => tracing::debug!(error = %e, raw = %raw, "skipping unrecognised frame"),
                },
                Err(RecvError::Lagged(n)) => tracing::warn!(skipped = n, "feed is behind"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    tracing::info!(status = ?client.get_socket_status().await, "feed stopped");
    client.close_socket().await
}
