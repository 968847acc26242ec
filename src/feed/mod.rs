// src/feed/mod.rs
pub mod reddit;

use anyhow::Result;

/// A post as read from the feed. Lives only for one collector run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub url: String,
}

impl Post {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// Newest posts, in the order the feed lists them (most recent first).
    async fn fetch_new(&self) -> Result<Vec<Post>>;
    fn name(&self) -> &'static str;
}
