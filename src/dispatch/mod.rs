// src/dispatch/mod.rs
//! Publish side: one topic per category.
pub mod log;
pub mod webhook;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::Category;

pub const DEFAULT_TOPIC_SUFFIX: &str = "-gundeals-topic";

/// Identifier handed back by the dispatcher for one publish.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryId(pub String);

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait::async_trait]
pub trait Dispatcher: Send + Sync {
    async fn publish(&self, topic: &str, message: &str) -> Result<DeliveryId>;
    fn name(&self) -> &'static str;
}

/// Topic id = `<prefix><category><suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNaming {
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

fn default_suffix() -> String {
    DEFAULT_TOPIC_SUFFIX.to_string()
}

impl Default for TopicNaming {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: default_suffix(),
        }
    }
}

impl TopicNaming {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn topic_for(&self, category: Category) -> String {
        format!("{}{}{}", self.prefix, category.as_str(), self.suffix)
    }
}

/// Short sha256 fingerprint of a publish, used when the backend returns no id.
pub fn fingerprint(topic: &str, message: &str) -> DeliveryId {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(topic.as_bytes());
    hasher.update([0u8]);
    hasher.update(message.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(16);
    for b in digest.iter().take(8) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    DeliveryId(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_naming_matches_legacy_topics() {
        let n = TopicNaming::default();
        assert_eq!(n.topic_for(Category::Handgun), "handgun-gundeals-topic");
        assert_eq!(n.topic_for(Category::Ammo), "ammo-gundeals-topic");
    }

    #[test]
    fn prefix_is_prepended() {
        let n = TopicNaming::new("arn:aws:sns:us-east-1:000000000000:", "-gundeals-topic");
        assert_eq!(
            n.topic_for(Category::Rifle),
            "arn:aws:sns:us-east-1:000000000000:rifle-gundeals-topic"
        );
    }

    #[test]
    fn fingerprint_is_stable_and_topic_sensitive() {
        let a = fingerprint("t1", "msg");
        assert_eq!(a, fingerprint("t1", "msg"));
        assert_ne!(a, fingerprint("t2", "msg"));
        assert_eq!(a.0.len(), 16);
    }
}
