//! `reqwest`-backed [`Transport`] implementation.

use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::{HttpRequest, Transport, TransportError};

/// The default [`Transport`]: a shared `reqwest::Client` with a cookie jar.
///
/// The jar is what lets the backend authenticate us by cookie alone (the
/// `/auth/me` identity check) and what the cookie credential provider reads the
/// `authorization` cookie from. Keep a clone of [`cookie_jar`](Self::cookie_jar)
/// if you need to inspect or seed it.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    jar: Arc<Jar>,
}

impl HttpTransport {
    /// Creates a transport with a fresh, empty cookie jar.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_cookie_jar(Arc::new(Jar::default()))
    }

    /// Creates a transport that stores and sends cookies through `jar`.
    pub fn with_cookie_jar(jar: Arc<Jar>) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self { client, jar })
    }

    /// Returns the cookie jar shared with the underlying client.
    pub fn cookie_jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        let HttpRequest {
            method,
            url,
            body,
            bearer,
        } = request;

        let url = reqwest::Url::parse(&url)
            .map_err(|e| TransportError::InvalidUrl(format!("{url}: {e}")))?;

        let mut builder = self.client.request(method.into(), url.clone());
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        tracing::debug!(%method, %url, "sending request");

        let response = builder.send().await.map_err(TransportError::Request)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(TransportError::Request)?;

        if !status.is_success() {
            tracing::debug!(%method, %url, status = status.as_u16(), "request rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes.to_vec())
    }
}
