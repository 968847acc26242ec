// src/config/credentials.rs
//! Reddit API credentials: env vars when hosted, `config.json` when run locally.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fmt, fs, path::Path};

use crate::error::PipelineError;

pub const ENV_CREDENTIALS_PATH: &str = "DEAL_ALERTS_CREDENTIALS_PATH";
pub const DEFAULT_CREDENTIALS_PATH: &str = "config.json";
/// Any of these marks a hosted run. Env names are case-sensitive, and existing
/// deployments set the lower-case `in_aws`.
pub const HOSTED_MARKERS: [&str; 3] = ["in_aws", "IN_AWS", "DEAL_ALERTS_HOSTED"];

pub const REQUIRED_FIELDS: [&str; 5] = [
    "client_id",
    "client_secret",
    "password",
    "user_agent",
    "username",
];

#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub password: String,
    pub user_agent: String,
    pub username: String,
}

impl fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("password", &"***")
            .field("user_agent", &self.user_agent)
            .field("username", &self.username)
            .finish()
    }
}

pub fn is_hosted() -> bool {
    HOSTED_MARKERS.iter().any(|k| env::var_os(k).is_some())
}

impl RedditCredentials {
    /// Hosted: every field from an env var of the same name.
    /// Local: `$DEAL_ALERTS_CREDENTIALS_PATH` or `./config.json`.
    pub fn load() -> Result<Self> {
        if is_hosted() {
            return Self::from_env();
        }
        let path = env::var(ENV_CREDENTIALS_PATH)
            .unwrap_or_else(|_| DEFAULT_CREDENTIALS_PATH.to_string());
        Self::from_file(path)
    }

    pub fn from_env() -> Result<Self> {
        let var = |key: &str| -> Result<String> {
            env::var(key).map_err(|_| {
                tracing::error!(key, "credential env var missing");
                PipelineError::Config(format!("unable to locate env var {key}")).into()
            })
        };
        Ok(Self {
            client_id: var("client_id")?,
            client_secret: var("client_secret")?,
            password: var("password")?,
            user_agent: var("user_agent")?,
            username: var("username")?,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("reading {}: {e}", path.display())))?;
        let creds: RedditCredentials = serde_json::from_str(&data)
            .map_err(|e| PipelineError::Config(format!("parsing {}: {e}", path.display())))
            .context("loading reddit credentials")?;
        Ok(creds)
    }
}
