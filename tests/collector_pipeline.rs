// tests/collector_pipeline.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use deal_alerts::feed::{FeedSource, Post};
use deal_alerts::store::{memory::MemoryStore, PostStore, Projection, StoredItem};
use deal_alerts::{Category, CategoryManifest, Collector, CollectorOutcome};
use std::sync::{Arc, Mutex};

struct StaticFeed(Vec<Post>);

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch_new(&self) -> Result<Vec<Post>> {
        Ok(self.0.clone())
    }
    fn name(&self) -> &'static str {
        "static"
    }
}

/// Memory store that logs every call as "op:post_id".
#[derive(Default)]
struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<String>>,
    fail_put_on: Option<String>,
}

impl RecordingStore {
    fn seeded(items: Vec<StoredItem>) -> Self {
        Self {
            inner: MemoryStore::with_items(items),
            ..Default::default()
        }
    }
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
    fn puts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("put:"))
            .collect()
    }
}

#[async_trait]
impl PostStore for RecordingStore {
    async fn get(&self, post_id: &str, projection: Projection) -> Result<Option<StoredItem>> {
        self.calls.lock().unwrap().push(format!("get:{post_id}"));
        self.inner.get(post_id, projection).await
    }
    async fn put(&self, item: &StoredItem) -> Result<()> {
        self.calls.lock().unwrap().push(format!("put:{}", item.post_id));
        if self.fail_put_on.as_deref() == Some(item.post_id.as_str()) {
            return Err(anyhow!("store unavailable"));
        }
        self.inner.put(item).await
    }
    async fn mark_notified(&self, post_id: &str) -> Result<()> {
        self.calls.lock().unwrap().push(format!("mark:{post_id}"));
        self.inner.mark_notified(post_id).await
    }
}

fn post(id: &str, title: &str) -> Post {
    Post::new(id, title, format!("https://deals.test/{id}"))
}

fn collector(posts: Vec<Post>, store: Arc<RecordingStore>) -> Collector {
    Collector::new(Arc::new(StaticFeed(posts)), store)
}

#[tokio::test]
async fn known_posts_are_skipped_and_not_rewritten() {
    let store = Arc::new(RecordingStore::seeded(vec![StoredItem {
        post_id: "old".into(),
        url: "https://deals.test/old".into(),
        title: "[Ammo] old".into(),
        notified: true,
        post_category: Category::Ammo,
    }]));
    let c = collector(
        vec![post("new", "[AMMO] 9mm"), post("old", "[Ammo] old")],
        store.clone(),
    );

    let out = c.run().await.unwrap();
    let ids = out.processed.unwrap();
    assert_eq!(ids.get(Category::Ammo), ["new".to_string()]);
    assert_eq!(store.puts(), vec!["put:new".to_string()]);
}

#[tokio::test]
async fn tags_match_case_insensitively() {
    let store = Arc::new(RecordingStore::default());
    let c = collector(
        vec![
            post("a", "[aMmO] .223"),
            post("r", "[RIFLE] Ruger"),
            post("h", "[Handgun] Glock"),
            post("p", "[pistol] CZ"),
        ],
        store,
    );
    let found = c.gather_new_posts().await.unwrap().unwrap();
    let ids = |cat: Category| -> Vec<String> {
        found.get(cat).iter().map(|p| p.id.clone()).collect()
    };
    assert_eq!(ids(Category::Ammo), vec!["a"]);
    assert_eq!(ids(Category::Rifle), vec!["r"]);
    assert_eq!(ids(Category::Handgun), vec!["h", "p"]);
}

#[tokio::test]
async fn multi_tag_post_lands_in_both_lists() {
    let store = Arc::new(RecordingStore::default());
    let c = collector(vec![post("x", "[Rifle] SKS w/ [Ammo] 7.62")], store.clone());

    let out = c.run().await.unwrap();
    let ids = out.processed.unwrap();
    assert_eq!(ids.get(Category::Rifle), ["x".to_string()]);
    assert_eq!(ids.get(Category::Ammo), ["x".to_string()]);
    // One record per post; the first category in manifest order is stored.
    assert_eq!(store.puts(), vec!["put:x".to_string()]);
    let stored = store.inner.snapshot();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].post_category, Category::Ammo);
    assert!(!stored[0].notified);
}

#[tokio::test]
async fn untagged_posts_are_dropped_and_yield_sentinel() {
    let store = Arc::new(RecordingStore::default());
    let c = collector(
        vec![post("o", "[Optic] Holosun"), post("m", "[Mag] PMAG 10pk")],
        store.clone(),
    );

    assert!(c.gather_new_posts().await.unwrap().is_none());
    let out = c.run().await.unwrap();
    assert_eq!(out, CollectorOutcome::nothing_new());
    assert!(store.puts().is_empty());
    assert!(store.inner.is_empty());
}

#[tokio::test]
async fn empty_feed_yields_sentinel() {
    let store = Arc::new(RecordingStore::default());
    let out = collector(vec![], store.clone()).run().await.unwrap();
    assert!(!out.inserted);
    assert!(out.processed.is_none());
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn insert_writes_unnotified_record_and_returns_ids() {
    let store = Arc::new(RecordingStore::default());
    let c = collector(vec![], store.clone());

    let mut found = CategoryManifest::new();
    found.push(Category::Ammo, Post::new("a1", "[AMMO] deal", "u"));
    let ids = c.insert_new_posts(&found).await.unwrap();

    let expected: CategoryManifest<String> = {
        let mut m = CategoryManifest::new();
        m.push(Category::Ammo, "a1".to_string());
        m
    };
    assert_eq!(ids, expected);
    assert_eq!(
        serde_json::to_value(&ids).unwrap(),
        serde_json::json!({"ammo": ["a1"], "handgun": [], "rifle": []})
    );

    let stored = store.inner.get("a1", Projection::Full).await.unwrap().unwrap();
    assert_eq!(
        stored,
        StoredItem {
            post_id: "a1".into(),
            url: "u".into(),
            title: "[AMMO] deal".into(),
            notified: false,
            post_category: Category::Ammo,
        }
    );
}

#[tokio::test]
async fn failed_write_propagates_and_keeps_earlier_writes() {
    let store = Arc::new(RecordingStore {
        fail_put_on: Some("h2".into()),
        ..Default::default()
    });
    let c = collector(
        vec![
            post("h1", "[Handgun] one"),
            post("h2", "[Handgun] two"),
            post("h3", "[Handgun] three"),
        ],
        store.clone(),
    );

    assert!(c.run().await.is_err());
    let stored: Vec<String> = store.inner.snapshot().into_iter().map(|i| i.post_id).collect();
    assert_eq!(stored, vec!["h1".to_string()]);
    assert!(!store.puts().contains(&"put:h3".to_string()));
}

#[tokio::test]
async fn second_run_over_same_listing_inserts_nothing() {
    let store = Arc::new(RecordingStore::default());
    let posts = vec![post("a", "[Ammo] x"), post("r", "[Rifle] y")];

    let first = collector(posts.clone(), store.clone()).run().await.unwrap();
    assert!(first.inserted);
    let second = collector(posts, store.clone()).run().await.unwrap();
    assert_eq!(second, CollectorOutcome::nothing_new());
    assert_eq!(store.puts().len(), 2);
}
