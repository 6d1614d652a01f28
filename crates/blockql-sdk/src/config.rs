//! Registry configuration.
//!
//! Extra introspection headers resolve with precedence: explicit value ->
//! `$BLOCKQL_HEADERS` -> `~/.blockql_headers.json`. Headers are always a
//! JSON object of string values, e.g. `{"authorization": "Bearer abc"}`.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const HEADERS_ENV: &str = "BLOCKQL_HEADERS";
pub const HEADERS_FILE: &str = ".blockql_headers.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every introspection request a registry issues.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Sent with every request; per-instance headers override them.
    pub default_headers: HeaderMap,
    pub timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_headers: HeaderMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RegistryConfig {
    /// Default settings with headers auto-detected (env -> file).
    pub fn auto() -> Result<Self, ConfigError> {
        Ok(Self {
            default_headers: auto_headers()?,
            ..Self::default()
        })
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parse a JSON-encoded header object. Blank input means no headers.
pub fn parse_headers(json: &str) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    if json.trim().is_empty() {
        return Ok(headers);
    }

    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidHeaders(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ConfigError::InvalidHeaders("expected a JSON object".to_string()))?;

    for (name, value) in object {
        let value = value.as_str().ok_or_else(|| {
            ConfigError::InvalidHeaders(format!("value of '{}' is not a string", name))
        })?;
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ConfigError::InvalidHeaders(format!("'{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ConfigError::InvalidHeaders(format!("'{}': {}", name, e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Header JSON from `$BLOCKQL_HEADERS`, if set.
pub fn headers_from_env() -> Option<String> {
    std::env::var(HEADERS_ENV).ok()
}

/// Header JSON from `~/.blockql_headers.json`, if the file exists.
pub fn headers_from_file() -> Result<Option<String>, ConfigError> {
    match headers_file_path() {
        Some(path) => read_optional(&path),
        None => Ok(None),
    }
}

/// Resolve headers with precedence: env var -> file -> none.
/// (An explicit CLI flag takes highest precedence but is handled at the CLI layer.)
pub fn auto_headers() -> Result<HeaderMap, ConfigError> {
    match headers_from_env() {
        Some(json) => parse_headers(&json),
        None => match headers_from_file()? {
            Some(json) => parse_headers(&json),
            None => Ok(HeaderMap::new()),
        },
    }
}

/// Check that `url` is an absolute http(s) URL.
pub fn validate_endpoint(url: &str) -> Result<url::Url, ConfigError> {
    let parsed = url::Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: url.to_string(),
            source: url::ParseError::RelativeUrlWithoutBase,
        });
    }
    Ok(parsed)
}

pub fn headers_file_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(HEADERS_FILE))
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}
