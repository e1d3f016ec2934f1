//! End-to-end tests of [`ApiClient`] on the real `reqwest` transport
//! against a `wiremock` backend.

use std::sync::Arc;

use rootwire::prelude::*;
use rootwire::session::AUTH_TOKEN_KEY;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_OK: &str = r#"{"user":{"user_id":1,"username":"a"},"token":"T"}"#;

fn client_for(server: &MockServer, store: Arc<MemoryStore>) -> ApiClient {
    let endpoint = Endpoint::new(server.uri(), "/v1").expect("mock uri is valid");
    ApiClient::builder(endpoint)
        .local_store(store)
        .build()
        .expect("client should build")
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"username": "a", "password": "b"})))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_OK))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_then_get_all_nodes_sends_bearer() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/nodes/"))
        .and(header("authorization", "Bearer T"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"data":[{"device_id":3,"status":"ONLINE"}]}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let client = client_for(&server, Arc::clone(&store));

    let user = client.login(&LoginRequest::new("a", "b")).await.unwrap();
    assert_eq!(user.user_id, UserId(1));
    assert_eq!(client.get_auth_token().as_deref(), Some("T"));
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("T"));

    let nodes = client.get_all_nodes().await.unwrap();
    assert_eq!(nodes.data[0].device_id, DeviceId(3));
}

#[tokio::test]
async fn test_ok_status_with_non_json_body_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/nodes/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStore::new()));

    let err = client.get_all_nodes().await.unwrap_err();
    assert!(matches!(err, ApiError::Protocol(_)));
}

#[tokio::test]
async fn test_login_rejected_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid credentials"}"#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStore::new()));

    let err = client.login(&LoginRequest::new("a", "nope")).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.server_message().as_deref(), Some("invalid credentials"));
    assert!(client.session().is_none());
}

#[tokio::test]
async fn test_logout_server_error_still_clears_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStore::new()));
    client.login(&LoginRequest::new("a", "b")).await.unwrap();

    let result = client.logout().await;

    assert_eq!(result.unwrap_err().status(), Some(500));
    assert!(client.session().is_none());
}

#[tokio::test]
async fn test_preconditions_send_no_requests() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStore::new()));

    assert!(client.delete_user().await.unwrap_err().is_not_authenticated());
    assert!(client.get_favorite_nodes().await.unwrap_err().is_not_authenticated());
    assert!(client.add_favorite_node(DeviceId(1)).await.unwrap_err().is_not_authenticated());
    assert!(
        client
            .remove_favorite_node(DeviceId(1))
            .await
            .unwrap_err()
            .is_not_authenticated()
    );
    assert!(client.start_socket_connection().await.unwrap_err().is_not_authenticated());
    assert_eq!(client.get_socket_status().await, None);
}

#[tokio::test]
async fn test_is_authenticated_with_session_sends_no_request() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStore::new()));
    client.login(&LoginRequest::new("a", "b")).await.unwrap();

    assert!(client.is_authenticated().await);
}

#[tokio::test]
async fn test_is_authenticated_restores_session_from_server_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "authorization=COOKIE; Path=/")
                .set_body_string(r#"{"user_id":1,"username":"a"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/favorites/user/1/"))
        .and(header("authorization", "Bearer COOKIE"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(AUTH_TOKEN_KEY, "LOCAL").unwrap();
    let client = client_for(&server, store);

    assert!(client.is_authenticated().await);
    assert_eq!(client.get_auth_token().as_deref(), Some("COOKIE"));

    let favorites = client.get_favorite_nodes().await.unwrap();
    assert!(favorites.is_empty());
}

#[tokio::test]
async fn test_is_authenticated_prefers_pathless_cookie_over_local_store() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "authorization=COOKIE; HttpOnly")
                .set_body_string(r#"{"user_id":1,"username":"a"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(AUTH_TOKEN_KEY, "LOCAL").unwrap();
    let client = client_for(&server, store);

    assert!(client.is_authenticated().await);
    assert_eq!(client.get_auth_token().as_deref(), Some("COOKIE"));
}

#[tokio::test]
async fn test_is_authenticated_rejected_identity_reports_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":true}"#))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(AUTH_TOKEN_KEY, "STALE").unwrap();
    let client = client_for(&server, store);

    assert!(!client.is_authenticated().await);
    assert!(client.session().is_none());
}

#[tokio::test]
async fn test_session_subscriber_sees_login_and_logout() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStore::new()));
    let mut rx = client.subscribe_session();

    client.login(&LoginRequest::new("a", "b")).await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(
        rx.borrow_and_update().as_ref().map(|s| s.user.username.clone()),
        Some("a".to_string())
    );

    client.logout().await.unwrap();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_none());
}

#[tokio::test]
async fn test_healthcheck_ping_reads_system_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/healthcheck/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status":"alive","system_info":{"environment":"production","version":"v1.4.0"}}"#,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStore::new()));

    let health = client.healthcheck_ping().await.unwrap();
    assert_eq!(health.system_info.version, "v1.4.0");
}
