//! Client configuration.
//!
//! The only inputs the SDK needs are an output directory and an API token.
//! The vendor base URL and transport timeout can be overridden, mostly for
//! pointing the client at a staging host.

use crate::error::EodError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Vendor REST root.
pub const EOD_HISTORICAL_DATA_URL: &str = "https://eodhistoricaldata.com/api";

/// Configuration shared by every data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Root of the output tree.
    pub base_dir: PathBuf,

    /// Vendor API token, sent as the `api_token` query parameter. May be left
    /// out of the file and supplied at run time.
    #[serde(default)]
    pub api_token: String,

    /// Vendor REST root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport timeout. `None` keeps the HTTP client's default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    EOD_HISTORICAL_DATA_URL.to_string()
}

impl ClientConfig {
    pub fn new(base_dir: impl Into<PathBuf>, api_token: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            api_token: api_token.into(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, EodError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EodError::Config(format!("read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string. Call [`Self::validate`] once
    /// any run-time overrides are applied.
    pub fn from_toml(content: &str) -> Result<Self, EodError> {
        toml::from_str(content).map_err(|e| EodError::Config(format!("parse config: {e}")))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Reject configurations that cannot produce a working client.
    pub fn validate(&self) -> Result<(), EodError> {
        if self.api_token.trim().is_empty() {
            return Err(EodError::Config("api_token is empty".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(EodError::Config("base_url is empty".into()));
        }
        Ok(())
    }
}
