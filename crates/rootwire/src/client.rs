//! `ApiClient` builder and the request executor.
//!
//! This is the entry point for talking to the backend. It ties together
//! the layers: transport (bytes) → protocol (typed bodies) → session
//! (who we are).

use std::sync::Arc;

use rootwire_protocol::{Codec, JsonCodec};
use rootwire_session::{
    CredentialChain, LocalStore, LocalStoreCredentials, MemoryStore, SessionStore,
};
use rootwire_transport::{
    CookieJar, HttpRequest, HttpTransport, Method, Transport, WebSocketChannel,
};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tokio::sync::Mutex;

use crate::config::Endpoint;
use crate::cookies::CookieCredentials;
use crate::error::{ApiError, ApiResult};

/// The session-aware adapter between the application and the backend.
///
/// One `ApiClient` owns:
/// - the request executor (every network call goes through
///   [`request`](Self::request)),
/// - the in-memory session, consulted for the bearer token on each call,
/// - at most one realtime channel.
///
/// Build it once at the top of the application and hand out references
/// (`&ApiClient` or `Arc<ApiClient>`); there is no global instance.
///
/// Operations are grouped by concern in sibling modules: authentication
/// and the identity check in `auth`, REST resources in `resources`, the realtime
/// channel in `realtime`.
pub struct ApiClient<T: Transport = HttpTransport> {
    pub(crate) endpoint: Endpoint,
    transport: T,
    codec: JsonCodec,
    pub(crate) session: Arc<SessionStore>,
    pub(crate) local_store: Arc<dyn LocalStore>,
    pub(crate) credentials: CredentialChain,
    pub(crate) channel: Mutex<Option<WebSocketChannel>>,
}

/// Builder for configuring an [`ApiClient`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rootwire::prelude::*;
///
/// # fn main() -> Result<(), ApiError> {
/// let endpoint = EndpointConfig::from_env()?.select(Platform::Web)?;
/// let client = ApiClient::builder(endpoint)
///     .local_store(Arc::new(FileStore::new("rootwire-store.json")))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ApiClientBuilder {
    endpoint: Endpoint,
    local_store: Option<Arc<dyn LocalStore>>,
    cookie_jar: Option<Arc<CookieJar>>,
}

impl ApiClientBuilder {
    /// Creates a builder for `endpoint` with default settings: an
    /// in-memory local store and a fresh cookie jar.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            local_store: None,
            cookie_jar: None,
        }
    }

    /// Sets the durable store the token is mirrored into.
    pub fn local_store(mut self, store: Arc<dyn LocalStore>) -> Self {
        self.local_store = Some(store);
        self
    }

    /// Shares an existing cookie jar (e.g. one restored from disk).
    pub fn cookie_jar(mut self, jar: Arc<CookieJar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Builds a client on the default `reqwest` transport.
    pub fn build(self) -> ApiResult<ApiClient> {
        let jar = self.cookie_jar.clone().unwrap_or_default();
        let transport = HttpTransport::with_cookie_jar(Arc::clone(&jar))?;
        Ok(self.assemble(transport, Some(jar)))
    }

    /// Builds a client on a caller-supplied transport.
    ///
    /// The cookie tier of the credential chain is only present if a jar
    /// was set with [`cookie_jar`](Self::cookie_jar).
    pub fn build_with<T: Transport>(self, transport: T) -> ApiClient<T> {
        let jar = self.cookie_jar.clone();
        self.assemble(transport, jar)
    }

    fn assemble<T: Transport>(self, transport: T, jar: Option<Arc<CookieJar>>) -> ApiClient<T> {
        let session = Arc::new(SessionStore::new());
        let local_store = self
            .local_store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));

        // Precedence: memory → cookie → durable store.
        let mut credentials = CredentialChain::new().with(session.clone());
        if let Some(jar) = jar {
            let scopes = self.endpoint.cookie_scopes();
            credentials = credentials.with(Arc::new(CookieCredentials::new(jar, scopes)));
        }
        credentials =
            credentials.with(Arc::new(LocalStoreCredentials::new(Arc::clone(&local_store))));

        tracing::debug!(
            base = self.endpoint.base(),
            version = self.endpoint.version_prefix(),
            sources = ?credentials.sources(),
            "api client ready"
        );

        ApiClient {
            endpoint: self.endpoint,
            transport,
            codec: JsonCodec,
            session,
            local_store,
            credentials,
            channel: Mutex::new(None),
        }
    }
}

impl ApiClient {
    /// Creates a new builder.
    pub fn builder(endpoint: Endpoint) -> ApiClientBuilder {
        ApiClientBuilder::new(endpoint)
    }
}

impl<T: Transport> ApiClient<T> {
    /// Returns the endpoint this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the credential sources in the order they are consulted.
    pub fn credential_sources(&self) -> Vec<&'static str> {
        self.credentials.sources()
    }

    /// Issues one request and decodes the JSON response.
    ///
    /// The URL is `base + version_prefix + path`. If a session is held its
    /// token is sent as a bearer credential. Any failure (network,
    /// non-success status, undecodable body) comes back as a single
    /// [`ApiError`]; nothing is retried.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ApiResult<R> {
        let request = HttpRequest {
            method,
            url: self.endpoint.url(path),
            body,
            bearer: self.session.token(),
        };
        let bytes = self.transport.execute(request).await?;
        Ok(self.codec.decode(&bytes)?)
    }

    pub(crate) async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.request(Method::Get, path, None).await
    }

    pub(crate) async fn send<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<R> {
        let body = self.codec.encode(body)?;
        self.request(method, path, Some(body)).await
    }

    /// For endpoints whose response body is irrelevant. The body must still
    /// be JSON: a `200` carrying garbage is a failure.
    pub(crate) async fn request_ack(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ApiResult<()> {
        self.request::<IgnoredAny>(method, path, body)
            .await
            .map(|_| ())
    }
}

/// Logs a failed operation under its name, then passes the result through.
///
/// Precondition failures are expected (the UI asks before logging in), so
/// they log at `warn`. Everything else is an `error`.
pub(crate) fn logged<V>(operation: &'static str, result: ApiResult<V>) -> ApiResult<V> {
    result.inspect_err(|e: &ApiError| {
        if e.is_not_authenticated() {
            tracing::warn!(operation, "refused: no active session");
        } else {
            let server_message = e.server_message();
            tracing::error!(
                operation,
                error = %e,
                server_message = server_message.as_deref(),
                "operation failed"
            );
        }
    })
}
