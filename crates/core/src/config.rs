use std::{fmt, time::Duration};
use url::Url;

pub const DEFAULT_API_ORIGIN: &str = "http://localhost:8000";
pub const ENV_API_URL: &str = "EMOTION_API_URL";
pub const ANALYZE_PATH: &str = "api/analyze";
pub const DEMO_PATH: &str = "api/analyze/demo";

/// Base address of the analysis service.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiOrigin(Url);

impl ApiOrigin {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyOrigin);
        }
        let mut url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidOrigin {
            value: trimmed.to_owned(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidOrigin {
                value: trimmed.to_owned(),
                reason: "not a base url".to_owned(),
            });
        }
        // Url::join drops the last path segment unless it ends with a slash.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        self.0
            .join(path.trim_start_matches('/'))
            .map_err(|e| ConfigError::InvalidOrigin {
                value: self.0.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn analyze_url(&self) -> Result<Url, ConfigError> {
        self.endpoint(ANALYZE_PATH)
    }

    pub fn demo_url(&self) -> Result<Url, ConfigError> {
        self.endpoint(DEMO_PATH)
    }
}

impl Default for ApiOrigin {
    fn default() -> Self {
        Self(Url::parse("http://localhost:8000/").expect("default origin is a valid url"))
    }
}

impl fmt::Debug for ApiOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiOrigin({})", self.as_str())
    }
}

impl fmt::Display for ApiOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub origin: ApiOrigin,
    /// `None` leaves timing to the transport.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(origin: ApiOrigin) -> Self {
        Self {
            origin,
            request_timeout: None,
        }
    }

    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Result<Self, ConfigError> {
        self.request_timeout = match secs {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(s) => Some(Duration::from_secs(s)),
            None => None,
        };
        Ok(self)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api origin must not be empty")]
    EmptyOrigin,
    #[error("invalid api origin {value:?}: {reason}")]
    InvalidOrigin { value: String, reason: String },
    #[error("timeout must be > 0 s")]
    ZeroTimeout,
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_origin(cli_value: Option<String>, env: &impl Env) -> Result<ApiOrigin, ConfigError> {
    ApiOrigin::new(resolve_string_with_default(
        cli_value,
        ENV_API_URL,
        env,
        DEFAULT_API_ORIGIN,
    ))
}
