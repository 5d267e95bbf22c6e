//! Client configuration.
//!
//! Every setting has a default matching the behaviour of the hosted lookup
//! page, so an empty (or missing) configuration file yields a working client.
//! A file given to [`ClientConfig::load`] is layered over those defaults using
//! the `config` crate; any format it understands (TOML, YAML, JSON) works.

use std::path::Path;
use std::time::Duration;

use config::{Config, File};
use serde::Deserialize;

use crate::error::{RegcheckError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin of the resolution service, without a trailing slash.
    pub base_url: String,
    pub search_path: String,
    pub laws_path: String,
    pub news_path: String,
    pub request_timeout_ms: Option<u64>,
    pub loading_interval_ms: u64,
    pub loading_messages: Vec<String>,
    pub overlay_timeout_ms: u64,
    pub overlay_fade_ms: u64,
    pub copy_revert_ms: u64,
    pub composition_grace_ms: u64,
    pub copy_label: String,
    pub copied_label: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            search_path: "/api/search".into(),
            laws_path: "/static/laws.txt".into(),
            news_path: "/static/news.txt".into(),
            request_timeout_ms: None,
            loading_interval_ms: 4500,
            loading_messages: vec![
                "Searching the database...".into(),
                "Starting the server (this may take a moment)...".into(),
                "Analyzing the structure...".into(),
                "Results are almost ready...".into(),
            ],
            overlay_timeout_ms: 30_000,
            overlay_fade_ms: 750,
            copy_revert_ms: 2000,
            composition_grace_ms: 50,
            copy_label: "Copy result".into(),
            copied_label: "Copied!".into(),
        }
    }
}

impl ClientConfig {
    /// Reads `path` (if it exists) on top of the defaults and validates the result.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let loaded: ClientConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .build()?
            .try_deserialize()?;
        tracing::debug!(path = %path.display(), base_url = %loaded.base_url, "configuration loaded");
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<()> {
        if self.loading_messages.is_empty() {
            return Err(RegcheckError::Config("loading_messages must not be empty".into()));
        }
        let intervals = [
            ("loading_interval_ms", self.loading_interval_ms),
            ("overlay_timeout_ms", self.overlay_timeout_ms),
            ("copy_revert_ms", self.copy_revert_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(RegcheckError::Config(format!("{name} must be greater than zero")));
            }
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(RegcheckError::Config(format!("base_url must be an http(s) URL, got {}", self.base_url)));
        }
        Ok(())
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn loading_interval(&self) -> Duration { Duration::from_millis(self.loading_interval_ms) }
    pub fn overlay_timeout(&self) -> Duration { Duration::from_millis(self.overlay_timeout_ms) }
    pub fn overlay_fade(&self) -> Duration { Duration::from_millis(self.overlay_fade_ms) }
    pub fn copy_revert(&self) -> Duration { Duration::from_millis(self.copy_revert_ms) }
    pub fn composition_grace(&self) -> Duration { Duration::from_millis(self.composition_grace_ms) }
    pub fn request_timeout(&self) -> Option<Duration> { self.request_timeout_ms.map(Duration::from_millis) }
}
