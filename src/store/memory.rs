// src/store/memory.rs
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{PostStore, Projection, StoredItem};
use crate::error::PipelineError;

/// In-process table. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, StoredItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items<I: IntoIterator<Item = StoredItem>>(items: I) -> Self {
        let map = items
            .into_iter()
            .map(|it| (it.post_id.clone(), it))
            .collect();
        Self {
            items: Mutex::new(map),
        }
    }

    pub fn snapshot(&self) -> Vec<StoredItem> {
        let items = self.items.lock().expect("memory store mutex poisoned");
        let mut out: Vec<StoredItem> = items.values().cloned().collect();
        out.sort_by(|a, b| a.post_id.cmp(&b.post_id));
        out
    }

    pub fn len(&self) -> usize {
        self.items.lock().expect("memory store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl PostStore for MemoryStore {
    async fn get(&self, post_id: &str, projection: Projection) -> Result<Option<StoredItem>> {
        let items = self.items.lock().expect("memory store mutex poisoned");
        Ok(items.get(post_id).map(|it| it.project(projection)))
    }

    async fn put(&self, item: &StoredItem) -> Result<()> {
        let mut items = self.items.lock().expect("memory store mutex poisoned");
        items.insert(item.post_id.clone(), item.clone());
        Ok(())
    }

    async fn mark_notified(&self, post_id: &str) -> Result<()> {
        let mut items = self.items.lock().expect("memory store mutex poisoned");
        match items.get_mut(post_id) {
            Some(it) => {
                it.notified = true;
                Ok(())
            }
            None => Err(PipelineError::MissingRecord {
                post_id: post_id.to_string(),
            }
            .into()),
        }
    }

    async fn insert_if_absent(&self, item: &StoredItem) -> Result<bool> {
        let mut items = self.items.lock().expect("memory store mutex poisoned");
        if items.contains_key(&item.post_id) {
            return Ok(false);
        }
        items.insert(item.post_id.clone(), item.clone());
        Ok(true)
    }
}
