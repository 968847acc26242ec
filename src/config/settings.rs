// src/config/settings.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dispatch::{TopicNaming, DEFAULT_TOPIC_SUFFIX};
use crate::error::PipelineError;
use crate::feed::reddit::{DEFAULT_LIMIT, DEFAULT_SUBREDDIT};
use crate::store::DEFAULT_TABLE;

pub const ENV_CONFIG_PATH: &str = "DEAL_ALERTS_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/deal_alerts.toml";

fn default_subreddit() -> String {
    DEFAULT_SUBREDDIT.to_string()
}
fn default_feed_limit() -> u32 {
    DEFAULT_LIMIT
}
fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("state")
}
fn default_topic_suffix() -> String {
    DEFAULT_TOPIC_SUFFIX.to_string()
}
fn default_true() -> bool {
    true
}
fn default_webhook_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_subreddit")]
    pub subreddit: String,
    #[serde(default = "default_feed_limit")]
    pub feed_limit: u32,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub topic_prefix: String,
    #[serde(default = "default_topic_suffix")]
    pub topic_suffix: String,
    /// Set `notified = true` after each publish.
    #[serde(default = "default_true")]
    pub track_notified: bool,
    /// topic -> webhook URL
    #[serde(default)]
    pub webhooks: HashMap<String, String>,
    #[serde(default = "default_webhook_timeout_secs")]
    pub webhook_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            subreddit: default_subreddit(),
            feed_limit: default_feed_limit(),
            table: default_table(),
            data_dir: default_data_dir(),
            topic_prefix: String::new(),
            topic_suffix: default_topic_suffix(),
            track_notified: true,
            webhooks: HashMap::new(),
            webhook_timeout_secs: default_webhook_timeout_secs(),
        }
    }
}

impl Settings {
    pub fn topics(&self) -> TopicNaming {
        TopicNaming::new(self.topic_prefix.clone(), self.topic_suffix.clone())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
        if settings.subreddit.trim().is_empty() {
            return Err(PipelineError::Config("subreddit must not be empty".into()).into());
        }
        Ok(settings)
    }

    /// 1) $DEAL_ALERTS_CONFIG_PATH
    /// 2) config/deal_alerts.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(PipelineError::Config(format!(
                "{ENV_CONFIG_PATH} points to non-existent path {}",
                pb.display()
            ))
            .into());
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            return Self::load_from(&fallback);
        }
        Ok(Self::default())
    }
}
