// src/dispatch/webhook.rs
use anyhow::{Context, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use super::{fingerprint, DeliveryId, Dispatcher};
use crate::config::Settings;
use crate::error::PipelineError;

/// Publishes each topic to its own webhook URL as `{"topic", "text"}` JSON.
pub struct WebhookDispatcher {
    routes: HashMap<String, String>,
    client: Client,
    timeout: Duration,
}

impl WebhookDispatcher {
    pub fn new(routes: HashMap<String, String>) -> Self {
        Self {
            routes,
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.webhooks.clone()).with_timeout(settings.webhook_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait::async_trait]
impl Dispatcher for WebhookDispatcher {
    async fn publish(&self, topic: &str, message: &str) -> Result<DeliveryId> {
        let Some(url) = self.routes.get(topic) else {
            return Err(PipelineError::UnknownTopic {
                topic: topic.to_string(),
            }
            .into());
        };

        let body = serde_json::json!({ "topic": topic, "text": message });
        let resp = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("webhook post for {topic}"))?
            .error_for_status()
            .with_context(|| format!("webhook non-2xx for {topic}"))?;

        let id = resp
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| DeliveryId(s.to_string()))
            .unwrap_or_else(|| fingerprint(topic, message));
        Ok(id)
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}
