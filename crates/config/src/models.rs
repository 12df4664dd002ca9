//! Configuration models.

use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default cap on redirects: enough to turn `/dir` into `/dir/`, no more.
const DEFAULT_MAX_REDIRECTS: usize = 2;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 64;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address of the directory index exposed as the root of the tree.
    pub base_url: Option<Url>,
    pub network: NetworkConfig,
}
impl Config {
    /// The configured base address, or an error if there isn't one.
    pub fn base_url(&self) -> Result<&Url> {
        self.base_url.as_ref().ok_or_raise(|| ErrorKind::MissingBaseUrl)
    }

    /// Replace the base address, e.g. with one given on the command line.
    pub fn with_base_url(mut self, url: Url) -> Result<Self> {
        self.base_url = Some(url);
        self.validate()?;
        Ok(self)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(url) = &self.base_url
            && !matches!(url.scheme(), "http" | "https")
        {
            exn::bail!(ErrorKind::Invalid(format!("base_url must be http(s), got `{}`", url.scheme())));
        }
        self.network.validate()
    }
}

/// Settings handed to every request the transport makes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub user_agent: String,
    /// Maximum number of redirects followed per request.
    pub max_redirects: usize,
    /// Enable TCP keep-alive on pooled connections.
    pub tcp_keepalive: bool,
    pub connect_timeout_secs: u64,
    /// Basic-auth credentials sent to the origin server.
    pub username: Option<String>,
    pub password: Option<String>,
    pub proxy: Option<ProxyConfig>,
    /// Upper bound on requests in flight at once (metadata probes are
    /// issued as one batch per directory).
    pub max_concurrent_requests: usize,
}
impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("webdir/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            tcp_keepalive: true,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            username: None,
            password: None,
            proxy: None,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}
impl NetworkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.max_concurrent_requests == 0 {
            exn::bail!(ErrorKind::Invalid("network.max_concurrent_requests must be at least 1".to_string()));
        }
        if self.connect_timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("network.connect_timeout_secs must be at least 1".to_string()));
        }
        if self.password.is_some() && self.username.is_none() {
            exn::bail!(ErrorKind::Invalid("network.password requires network.username".to_string()));
        }
        Ok(())
    }
}

/// Forward proxy, optionally authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub url: Url,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
