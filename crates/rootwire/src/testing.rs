//! Test doubles shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use rootwire_protocol::{AuthUser, UserId};
use rootwire_session::{LocalStore, Session};
use rootwire_transport::{HttpRequest, Transport, TransportError};

use crate::{ApiClient, Endpoint};

/// A [`Transport`] that records every request and replays canned
/// responses in order. Running out of responses is a transport failure.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    requests: Vec<HttpRequest>,
    responses: VecDeque<Result<Vec<u8>, TransportError>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, response: Result<Vec<u8>, TransportError>) {
        self.inner.lock().unwrap().responses.push_back(response);
    }

    /// Queues a `2xx` response with `body` (which need not be valid JSON).
    pub(crate) fn respond_json(&self, body: &str) {
        self.respond(Ok(body.as_bytes().to_vec()));
    }

    pub(crate) fn respond_status(&self, status: u16) {
        self.respond(Err(TransportError::Status {
            status,
            body: String::new(),
        }));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        let mut state = self.inner.lock().unwrap();
        state.requests.push(request);
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::ConnectionClosed("no canned response".into())))
    }
}

pub(crate) fn endpoint() -> Endpoint {
    Endpoint::new("https://api.example.com", "/v1").unwrap()
}

/// A client on `mock` with no cookie jar and an in-memory local store.
pub(crate) fn client_with(mock: &MockTransport) -> ApiClient<MockTransport> {
    ApiClient::builder(endpoint()).build_with(mock.clone())
}

/// A client on `mock` mirroring into `store`.
pub(crate) fn client_with_store(
    mock: &MockTransport,
    store: Arc<dyn LocalStore>,
) -> ApiClient<MockTransport> {
    ApiClient::builder(endpoint())
        .local_store(store)
        .build_with(mock.clone())
}

pub(crate) fn session(id: u64, token: &str) -> Session {
    Session::new(
        AuthUser {
            user_id: UserId(id),
            username: format!("user{id}"),
        },
        token,
    )
}
