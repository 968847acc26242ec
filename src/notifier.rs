// src/notifier.rs
//! Second stage: one alert per (category, post), then flag the post as notified.

use anyhow::{Context, Result};
use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::category::Category;
use crate::dispatch::{DeliveryId, Dispatcher, TopicNaming};
use crate::error::PipelineError;
use crate::manifest::CollectorOutcome;
use crate::store::{PostStore, Projection, StoredItem};
use crate::telemetry::ensure_metrics_described;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierOptions {
    /// Set `notified = true` once a post's publishes have all succeeded.
    pub track_notified: bool,
}

impl Default for NotifierOptions {
    fn default() -> Self {
        Self {
            track_notified: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub post_id: String,
    pub category: Category,
    pub topic: String,
    pub delivery_id: DeliveryId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub deliveries: Vec<Delivery>,
}

/// `NEW - "<CATEGORY>" deal!!` header, then title and url separated by blank lines.
pub fn format_alert(category: Category, item: &StoredItem) -> String {
    format!(
        "NEW - \"{}\" deal!!\n\n{}\n\n{}",
        category.as_str().to_uppercase(),
        item.title,
        item.url
    )
}

pub struct Notifier {
    store: Arc<dyn PostStore>,
    dispatcher: Arc<dyn Dispatcher>,
    topics: TopicNaming,
    options: NotifierOptions,
}

impl Notifier {
    pub fn new(
        store: Arc<dyn PostStore>,
        dispatcher: Arc<dyn Dispatcher>,
        topics: TopicNaming,
    ) -> Self {
        Self {
            store,
            dispatcher,
            topics,
            options: NotifierOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NotifierOptions) -> Self {
        self.options = options;
        self
    }

    /// Publish for every (category, id) in the outcome, in manifest order, to
    /// that category's topic. A post listed under several categories gets one
    /// alert per category and is flagged once, after its last publish. The
    /// first failure aborts the run; ids after it stay unnotified.
    pub async fn run(&self, outcome: &CollectorOutcome) -> Result<NotifyReport> {
        ensure_metrics_described();

        let mut report = NotifyReport::default();
        let Some(processed) = outcome.processed.as_ref().filter(|_| outcome.inserted) else {
            info!("collector inserted nothing, no alerts to send");
            return Ok(report);
        };

        let mut pending: HashMap<&str, usize> = HashMap::new();
        for (_, ids) in processed.iter() {
            for post_id in ids {
                *pending.entry(post_id.as_str()).or_default() += 1;
            }
        }

        for (category, ids) in processed.iter() {
            for post_id in ids {
                report
                    .deliveries
                    .push(self.publish_one(category, post_id).await?);

                let left = pending.entry(post_id.as_str()).or_default();
                *left = left.saturating_sub(1);
                if *left == 0 && self.options.track_notified {
                    self.store
                        .mark_notified(post_id)
                        .await
                        .with_context(|| format!("marking {post_id} notified"))?;
                }
            }
        }
        Ok(report)
    }

    async fn publish_one(&self, category: Category, post_id: &str) -> Result<Delivery> {
        let item = self
            .store
            .get(post_id, Projection::Alert)
            .await?
            .ok_or_else(|| PipelineError::MissingRecord {
                post_id: post_id.to_string(),
            })?;

        let topic = self.topics.topic_for(category);
        let message = format_alert(category, &item);
        let delivery_id = self
            .dispatcher
            .publish(&topic, &message)
            .await
            .with_context(|| format!("publishing {post_id} via {}", self.dispatcher.name()))?;
        counter!("notifier_published_total").increment(1);
        info!(post_id, %category, %topic, %delivery_id, "alert published");

        Ok(Delivery {
            post_id: post_id.to_string(),
            category,
            topic,
            delivery_id,
        })
    }
}
