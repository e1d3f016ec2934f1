//! Endpoint configuration.
//!
//! The backend lives at `base + version_prefix`. Which base applies
//! depends on where the app runs (a browser-style web context or an
//! embedded native shell), but deciding that is the host's job: it passes a
//! [`Platform`] and gets back an immutable [`Endpoint`].

use reqwest::Url;

/// Path of the realtime channel, relative to the version prefix.
pub const CHANNEL_PATH: &str = "/faucet";

/// Environment variable holding the REST base URL for the web context.
pub const ENV_WEB_BASE: &str = "ROOTWIRE_BE_BASE";
/// Environment variable holding the REST base URL for the native context.
pub const ENV_NATIVE_BASE: &str = "ROOTWIRE_BE_BASE_NATIVE";
/// Environment variable holding the API version prefix, e.g. `/v1`.
pub const ENV_VERSION: &str = "ROOTWIRE_BE_VERSION";

/// Errors raised while building an [`Endpoint`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error("missing configuration value {0}")]
    Missing(&'static str),

    /// The base URL is not an absolute `http` or `https` URL.
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBase { url: String, reason: String },
}

/// The deployment target the host detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Web,
    Native,
}

/// Raw settings, before a platform has been chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// REST base for the web context.
    pub web_base: String,

    /// REST base for the native context. Falls back to `web_base`.
    pub native_base: Option<String>,

    /// Version prefix appended to the base, e.g. `/v1`.
    pub version_prefix: String,
}

impl EndpointConfig {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings through an arbitrary key lookup.
    ///
    /// Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            web_base: get(ENV_WEB_BASE).ok_or(ConfigError::Missing(ENV_WEB_BASE))?,
            native_base: get(ENV_NATIVE_BASE),
            version_prefix: get(ENV_VERSION).ok_or(ConfigError::Missing(ENV_VERSION))?,
        })
    }

    /// Picks the base for `platform` and validates it.
    pub fn select(&self, platform: Platform) -> Result<Endpoint, ConfigError> {
        let base = match platform {
            Platform::Web => &self.web_base,
            Platform::Native => self.native_base.as_ref().unwrap_or(&self.web_base),
        };
        Endpoint::new(base.as_str(), self.version_prefix.as_str())
    }
}

/// Where the backend lives. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
    version_prefix: String,
}

impl Endpoint {
    /// Validates `base` and combines it with `version_prefix`.
    ///
    /// A trailing `/` on `base` is dropped so `url("/nodes/")` never
    /// produces a double slash.
    pub fn new(
        base: impl Into<String>,
        version_prefix: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let base = base.into();
        let base = base.trim_end_matches('/').to_string();

        let invalid = |reason: String| ConfigError::InvalidBase {
            url: base.clone(),
            reason,
        };
        let parsed = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
        }

        Ok(Self {
            base,
            version_prefix: version_prefix.into(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn version_prefix(&self) -> &str {
        &self.version_prefix
    }

    /// `base + version_prefix + path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base, self.version_prefix, path)
    }

    /// URLs whose cookies may carry the auth token: the API root, then the
    /// endpoints that set it. A cookie without a `Path` attribute only
    /// matches the directory of the request that set it.
    pub fn cookie_scopes(&self) -> Vec<Url> {
        ["/", "/auth/me", "/auth/login"]
            .into_iter()
            .filter_map(|path| Url::parse(&self.url(path)).ok())
            .collect()
    }

    /// The realtime channel URL: the base with its scheme switched to the
    /// WebSocket equivalent, plus the version prefix and [`CHANNEL_PATH`].
    ///
    /// `https://api.example.com` + `/v1` → `wss://api.example.com/v1/faucet`
    pub fn socket_url(&self) -> String {
        let rest = if let Some(rest) = self.base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.base.clone()
        };
        format!("{rest}{}{CHANNEL_PATH}", self.version_prefix)
    }
}
