// src/manifest.rs
//! Payloads passed between the collector and the notifier.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::category::Category;

/// Category -> ordered items. Every category is always present, possibly with
/// an empty list, and iteration follows `Category` ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryManifest<T> {
    lists: BTreeMap<Category, Vec<T>>,
}

impl<T> CategoryManifest<T> {
    pub fn new() -> Self {
        let lists = Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
        Self { lists }
    }

    pub fn push(&mut self, category: Category, item: T) {
        self.lists.entry(category).or_default().push(item);
    }

    pub fn get(&self, category: Category) -> &[T] {
        self.lists.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no category holds any item.
    pub fn is_empty(&self) -> bool {
        self.lists.values().all(Vec::is_empty)
    }

    pub fn total(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[T])> {
        self.lists.iter().map(|(c, v)| (*c, v.as_slice()))
    }
}

impl<T> Default for CategoryManifest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<BTreeMap<Category, Vec<T>>> for CategoryManifest<T> {
    fn from(partial: BTreeMap<Category, Vec<T>>) -> Self {
        let mut out = Self::new();
        out.lists.extend(partial);
        out
    }
}

// Producers may omit empty categories; fill them back in.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for CategoryManifest<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let partial = BTreeMap::<Category, Vec<T>>::deserialize(deserializer)?;
        Ok(Self::from(partial))
    }
}

/// Result of one collector run and the sole contract with the notifier.
///
/// The legacy field names `newPostsInserted` / `newPostsProcessed` are accepted
/// on input; extra fields such as `statusCode` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorOutcome {
    #[serde(alias = "newPostsInserted")]
    pub inserted: bool,
    #[serde(alias = "newPostsProcessed", default)]
    pub processed: Option<CategoryManifest<String>>,
}

impl CollectorOutcome {
    pub fn nothing_new() -> Self {
        Self {
            inserted: false,
            processed: None,
        }
    }

    pub fn inserted(ids: CategoryManifest<String>) -> Self {
        Self {
            inserted: true,
            processed: Some(ids),
        }
    }
}

/// What the notifier accepts: the outcome itself, or the outcome wrapped by
/// the orchestrator's invocation envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NotifierInput {
    Envelope {
        #[serde(rename = "responsePayload")]
        response_payload: CollectorOutcome,
    },
    Bare(CollectorOutcome),
}

impl NotifierInput {
    pub fn into_outcome(self) -> CollectorOutcome {
        match self {
            NotifierInput::Envelope { response_payload } => response_payload,
            NotifierInput::Bare(outcome) => outcome,
        }
    }

    pub fn parse(s: &str) -> Result<CollectorOutcome> {
        let input: NotifierInput =
            serde_json::from_str(s.trim()).context("parsing collector outcome JSON")?;
        Ok(input.into_outcome())
    }
}
