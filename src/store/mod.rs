// src/store/mod.rs
//! Persisted post records keyed by `post_id`.
pub mod json_file;
pub mod memory;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::category::Category;

pub const DEFAULT_TABLE: &str = "gundeal-posts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredItem {
    pub post_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub notified: bool,
    pub post_category: Category,
}

impl StoredItem {
    /// Fresh record as the collector writes it.
    pub fn new_unnotified(post: &crate::feed::Post, category: Category) -> Self {
        Self {
            post_id: post.id.clone(),
            url: post.url.clone(),
            title: post.title.clone(),
            notified: false,
            post_category: category,
        }
    }

    /// Copy limited to the fields of `projection`. Strings outside it come back
    /// empty and `notified` false; `post_category` has no empty value and is
    /// always carried.
    pub fn project(&self, projection: Projection) -> Self {
        match projection {
            Projection::Full => self.clone(),
            Projection::Alert => Self {
                notified: false,
                ..self.clone()
            },
            Projection::KeyOnly => Self {
                post_id: self.post_id.clone(),
                url: String::new(),
                title: String::new(),
                notified: false,
                post_category: self.post_category,
            },
        }
    }
}

/// Attribute subset requested from [`PostStore::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Existence check: `post_id` (plus the always-present `post_category`).
    KeyOnly,
    /// url, title and post_category.
    Alert,
    Full,
}

/// Key-value table of posts. Single-item operations only, no transactions.
#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    async fn get(&self, post_id: &str, projection: Projection) -> Result<Option<StoredItem>>;

    /// Unconditional insert. Callers check existence first for dedup.
    async fn put(&self, item: &StoredItem) -> Result<()>;

    /// Partial update setting `notified = true`. Fails if the item is absent.
    async fn mark_notified(&self, post_id: &str) -> Result<()>;

    async fn contains(&self, post_id: &str) -> Result<bool> {
        Ok(self.get(post_id, Projection::KeyOnly).await?.is_some())
    }

    /// Insert unless the key exists; returns whether it was written.
    /// This default is read-then-write and races with concurrent writers.
    async fn insert_if_absent(&self, item: &StoredItem) -> Result<bool> {
        if self.contains(&item.post_id).await? {
            return Ok(false);
        }
        self.put(item).await?;
        Ok(true)
    }
}
