//! The cookie tier of the credential chain.

use std::sync::Arc;

use reqwest::Url;
use reqwest::cookie::CookieStore;
use rootwire_session::{CredentialProvider, SessionError, TokenFuture};
use rootwire_transport::CookieJar;

/// Name of the cookie the backend sets alongside a successful login.
pub const AUTH_COOKIE: &str = "authorization";

/// Reads the bearer token out of a server-set cookie.
///
/// Shares the jar with the HTTP transport, so whatever `Set-Cookie` the
/// backend sent is visible here. The cookie is never written by the client.
///
/// A cookie set without a `Path` attribute is scoped to the directory of
/// the request that set it (`/v1/auth` for `/v1/auth/me`), so it is not
/// sent to the API root. The provider therefore checks several URLs.
pub struct CookieCredentials {
    jar: Arc<CookieJar>,
    urls: Vec<Url>,
    name: String,
}

impl CookieCredentials {
    /// Looks for [`AUTH_COOKIE`] among the cookies that would be sent to
    /// each of `urls`, in order.
    pub fn new(jar: Arc<CookieJar>, urls: Vec<Url>) -> Self {
        Self {
            jar,
            urls,
            name: AUTH_COOKIE.to_string(),
        }
    }

    fn lookup(&self) -> Result<Option<String>, SessionError> {
        for url in &self.urls {
            let Some(header) = self.jar.cookies(url) else {
                continue;
            };
            let header = header.to_str().map_err(|e| SessionError::Credential {
                provider: "cookie",
                reason: e.to_string(),
            })?;
            if let Some(token) = find_cookie(header, &self.name) {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }
}

impl CredentialProvider for CookieCredentials {
    fn source(&self) -> &'static str {
        "cookie"
    }

    fn token(&self) -> TokenFuture<'_> {
        let result = self.lookup();
        Box::pin(async move { result })
    }
}

/// Finds `name` in a `Cookie:` header value (`a=1; b=2`).
fn find_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
