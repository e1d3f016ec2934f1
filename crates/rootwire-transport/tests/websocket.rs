//! Integration tests for the realtime WebSocket channel.
//!
//! These tests spin up a real WebSocket server with `tokio-tungstenite`
//! and connect a [`WebSocketChannel`] to it, so frames actually cross a
//! socket.

#[cfg(feature = "websocket")]
mod websocket {
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use rootwire_transport::{ChannelState, WebSocketChannel};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};

    type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Binds a listener on a random port and returns it with its address.
    async fn listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have addr").to_string();
        (listener, addr)
    }

    /// Accepts one connection, recording the request path and the
    /// `Authorization` header of the upgrade request.
    async fn accept_one(
        listener: TcpListener,
        seen: Arc<Mutex<Option<(String, Option<String>)>>>,
    ) -> ServerWs {
        let (stream, _) = listener.accept().await.expect("should accept");
        let callback = |req: &Request, resp: Response| {
            let auth = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let path = req.uri().path().to_owned();
            // The callback is sync, so stash the values via try_lock.
            if let Ok(mut slot) = seen.try_lock() {
                *slot = Some((path, auth));
            }
            Ok(resp)
        };
        tokio_tungstenite::accept_hdr_async(stream, callback)
            .await
            .expect("handshake should succeed")
    }

    async fn wait_for_state(channel: &WebSocketChannel, want: ChannelState) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while channel.state() != want {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("channel should reach expected state");
    }

    #[tokio::test]
    async fn test_connect_sends_bearer_and_forwards_text_frames() {
        let (listener, addr) = listener().await;
        let seen = Arc::new(Mutex::new(None));
        let server = tokio::spawn(accept_one(listener, Arc::clone(&seen)));

        let url = format!("ws://{addr}/v1/faucet");
        let channel = WebSocketChannel::connect(&url, Some("T"))
            .await
            .expect("should connect");
        let mut server_ws = server.await.expect("server task should finish");

        assert_eq!(channel.state(), ChannelState::Open);
        assert!(channel.id().into_inner() > 0);
        assert_eq!(channel.url(), url);

        let (path, auth) = seen.lock().await.clone().expect("request recorded");
        assert_eq!(path, "/v1/faucet");
        assert_eq!(auth.as_deref(), Some("Bearer T"));

        // --- Server pushes, subscriber receives ---
        let mut rx = channel.subscribe();
        server_ws
            .send(Message::Text(r#"{"type":"reading"}"#.into()))
            .await
            .unwrap();

        let frame = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("frame should arrive")
            .expect("channel should be open");
        assert_eq!(frame, r#"{"type":"reading"}"#);
    }

    #[tokio::test]
    async fn test_connect_without_bearer_omits_authorization() {
        let (listener, addr) = listener().await;
        let seen = Arc::new(Mutex::new(None));
        let server = tokio::spawn(accept_one(listener, Arc::clone(&seen)));

        let _channel = WebSocketChannel::connect(&format!("ws://{addr}/x"), None)
            .await
            .expect("should connect");
        let _server_ws = server.await.unwrap();

        let (_, auth) = seen.lock().await.clone().expect("request recorded");
        assert!(auth.is_none());
    }

    #[tokio::test]
    async fn test_close_moves_through_closing_to_closed() {
        let (listener, addr) = listener().await;
        let seen = Arc::new(Mutex::new(None));
        let server = tokio::spawn(accept_one(listener, seen));

        let channel = WebSocketChannel::connect(&format!("ws://{addr}/"), None)
            .await
            .expect("should connect");
        let mut server_ws = server.await.unwrap();

        // Drive the server side so it answers the close frame.
        let echo = tokio::spawn(async move { while server_ws.next().await.is_some() {} });

        channel.close().await.expect("close should succeed");
        assert_ne!(channel.state(), ChannelState::Open);

        wait_for_state(&channel, ChannelState::Closed).await;
        echo.await.unwrap();

        // A second close is rejected: the channel is already gone.
        assert!(channel.close().await.is_err());
    }

    #[tokio::test]
    async fn test_peer_close_marks_channel_closed() {
        let (listener, addr) = listener().await;
        let seen = Arc::new(Mutex::new(None));
        let server = tokio::spawn(accept_one(listener, seen));

        let channel = WebSocketChannel::connect(&format!("ws://{addr}/"), None)
            .await
            .expect("should connect");
        let mut server_ws = server.await.unwrap();

        server_ws.send(Message::Close(None)).await.unwrap();

        wait_for_state(&channel, ChannelState::Closed).await;
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_host_fails() {
        let (listener, addr) = listener().await;
        drop(listener);

        let result = WebSocketChannel::connect(&format!("ws://{addr}/"), None).await;

        assert!(result.is_err(), "nothing is listening any more");
    }
}
