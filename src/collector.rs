// src/collector.rs
//! First stage: find unseen posts, classify them, persist them, report the ids.
//!
//! The existence check and the insert are separate store calls. Two collector
//! runs overlapping in time can both see a post as new and both insert it;
//! nothing here excludes that. [`PostStore::insert_if_absent`] exists for
//! deployments that need the stronger guarantee.

use anyhow::Result;
use metrics::counter;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::category::classify;
use crate::feed::{FeedSource, Post};
use crate::manifest::{CategoryManifest, CollectorOutcome};
use crate::store::{PostStore, StoredItem};
use crate::telemetry::ensure_metrics_described;

pub struct Collector {
    feed: Arc<dyn FeedSource>,
    store: Arc<dyn PostStore>,
}

impl Collector {
    pub fn new(feed: Arc<dyn FeedSource>, store: Arc<dyn PostStore>) -> Self {
        Self { feed, store }
    }

    /// Classify every post of the feed's new listing the store has not seen.
    /// `None` means no category received anything this run.
    pub async fn gather_new_posts(&self) -> Result<Option<CategoryManifest<Post>>> {
        ensure_metrics_described();

        let posts = self.feed.fetch_new().await?;
        let mut found: CategoryManifest<Post> = CategoryManifest::new();

        for post in posts {
            counter!("collector_posts_seen_total").increment(1);
            debug!(post_id = %post.id, title = %post.title, "processing post");

            if self.store.contains(&post.id).await? {
                counter!("collector_posts_duplicate_total").increment(1);
                debug!(post_id = %post.id, "already in store, skipping");
                continue;
            }

            let categories = classify(&post.title);
            if categories.is_empty() {
                counter!("collector_posts_unmatched_total").increment(1);
                continue;
            }
            for category in categories {
                info!(post_id = %post.id, %category, "new post found");
                found.push(category, post.clone());
            }
        }

        if found.is_empty() {
            return Ok(None);
        }
        Ok(Some(found))
    }

    /// Write one unnotified record per post. No rollback: a failed write
    /// leaves earlier writes in place.
    ///
    /// A post listed under several categories is written once, with the first
    /// category in manifest order, and its id is returned under every category.
    pub async fn insert_new_posts(
        &self,
        found: &CategoryManifest<Post>,
    ) -> Result<CategoryManifest<String>> {
        let mut written: CategoryManifest<String> = CategoryManifest::new();
        let mut stored: HashSet<&str> = HashSet::new();
        for (category, posts) in found.iter() {
            for post in posts {
                if stored.insert(post.id.as_str()) {
                    self.store
                        .put(&StoredItem::new_unnotified(post, category))
                        .await?;
                    counter!("collector_posts_inserted_total").increment(1);
                }
                written.push(category, post.id.clone());
            }
        }
        Ok(written)
    }

    pub async fn run(&self) -> Result<CollectorOutcome> {
        match self.run_inner().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(feed = self.feed.name(), error = ?e, "collector run failed");
                Err(e)
            }
        }
    }

    async fn run_inner(&self) -> Result<CollectorOutcome> {
        let Some(found) = self.gather_new_posts().await? else {
            info!("no new posts in tracked categories");
            return Ok(CollectorOutcome::nothing_new());
        };
        let written = self.insert_new_posts(&found).await?;
        info!(inserted = written.total(), "collector run finished");
        Ok(CollectorOutcome::inserted(written))
    }
}
