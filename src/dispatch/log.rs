// src/dispatch/log.rs
use anyhow::Result;

use super::{fingerprint, DeliveryId, Dispatcher};

/// Logs instead of publishing. Used for dry runs.
pub struct LogDispatcher;

#[async_trait::async_trait]
impl Dispatcher for LogDispatcher {
    async fn publish(&self, topic: &str, message: &str) -> Result<DeliveryId> {
        let id = fingerprint(topic, message);
        tracing::info!(topic, delivery_id = %id, "dry-run publish:\n{message}");
        Ok(id)
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
