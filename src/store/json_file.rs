// src/store/json_file.rs
//! Table persisted as one JSON object keyed by `post_id`.
//!
//! Every mutation rewrites the whole document through a temp file + rename, so
//! a crash leaves either the old or the new table on disk. The in-process lock
//! serializes operations of this handle only; separate processes are not
//! excluded.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};

use super::{PostStore, Projection, StoredItem};
use crate::error::PipelineError;

type Table = BTreeMap<String, StoredItem>;

pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<dir>/<table>.json`
    pub fn for_table(dir: impl AsRef<Path>, table: &str) -> Self {
        Self::new(dir.as_ref().join(format!("{table}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Table> {
        match fs::read_to_string(&self.path).await {
            Ok(s) if s.trim().is_empty() => Ok(Table::new()),
            Ok(s) => serde_json::from_str(&s)
                .with_context(|| format!("parsing store {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Table::new()),
            Err(e) => Err(e).with_context(|| format!("reading store {}", self.path.display())),
        }
    }

    async fn save(&self, table: &Table) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating store dir {}", dir.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(table).context("serializing store")?;
        fs::write(&tmp, body)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing store {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PostStore for JsonFileStore {
    async fn get(&self, post_id: &str, projection: Projection) -> Result<Option<StoredItem>> {
        let _guard = self.lock.lock().await;
        let table = self.load().await?;
        Ok(table.get(post_id).map(|it| it.project(projection)))
    }

    async fn put(&self, item: &StoredItem) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut table = self.load().await?;
        table.insert(item.post_id.clone(), item.clone());
        self.save(&table).await
    }

    async fn mark_notified(&self, post_id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut table = self.load().await?;
        let Some(it) = table.get_mut(post_id) else {
            return Err(PipelineError::MissingRecord {
                post_id: post_id.to_string(),
            }
            .into());
        };
        it.notified = true;
        self.save(&table).await
    }

    async fn insert_if_absent(&self, item: &StoredItem) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut table = self.load().await?;
        if table.contains_key(&item.post_id) {
            return Ok(false);
        }
        table.insert(item.post_id.clone(), item.clone());
        self.save(&table).await?;
        Ok(true)
    }
}
