use crate::DEFAULT_ENDPOINT;
use anyhow::{Context, Result, bail};
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the configured endpoint.
pub const ENDPOINT_ENV: &str = "TASKLIST_ENDPOINT";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout. Unset means calls wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load from `path`, or from [`Config::config_path`] when `path` is `None`.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn config_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Apply `TASKLIST_ENDPOINT` and then `flag` on top of the file value,
    /// and check that the result is usable.
    pub fn with_endpoint_override(self, flag: Option<String>) -> Result<Self> {
        let env = std::env::var(ENDPOINT_ENV).ok();
        self.resolve_endpoint(env, flag)
    }

    fn resolve_endpoint(mut self, env: Option<String>, flag: Option<String>) -> Result<Self> {
        let given = |value: Option<String>| value.filter(|e| !e.trim().is_empty());
        if let Some(endpoint) = given(flag).or(given(env)) {
            self.endpoint = endpoint;
        }
        self.endpoint_url()?;
        Ok(self)
    }

    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(self.endpoint.trim())
            .with_context(|| format!("invalid endpoint URL {:?}", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("endpoint must be an http(s) URL, got {}", url);
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn dirs_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(config_dir).join("tasklist")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config").join("tasklist")
    } else {
        PathBuf::from("/tmp/tasklist")
    }
}
