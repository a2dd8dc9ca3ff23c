//! Configuration data model.

use serde::Deserialize;

use super::defaults::{DEFAULT_AGENT_ENDPOINT, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use super::sources::ConfigSource;
use crate::reconciler::RelevanceDetection;

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub reconciler: ReconcilerConfig,
    pub display: DisplayConfig,
}

/// Agent backend connection settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub agent_endpoint: String,
    /// Connect timeout, and the longest silence tolerated on the event stream.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            agent_endpoint: DEFAULT_AGENT_ENDPOINT.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Full URL of the agent endpoint.
    pub fn agent_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let endpoint = self.agent_endpoint.trim();
        if endpoint.is_empty() {
            return base.to_string();
        }
        if endpoint.starts_with('/') {
            format!("{base}{endpoint}")
        } else {
            format!("{base}/{endpoint}")
        }
    }
}

/// Progress reconciliation settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReconcilerConfig {
    pub relevance_detection: RelevanceDetection,
}

/// Display / rendering preferences.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
    /// Print the final answer as JSON instead of text.
    pub json: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            json: false,
        }
    }
}

/// Configuration plus the file it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}
