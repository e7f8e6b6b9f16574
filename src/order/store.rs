//! Persisted install orders
//!
//! One plain-text file per Python version, one dependency token per line:
//!
//! ```text
//! <cache_dir>/python-3.12.txt
//! ```
//!
//! Files are read if present and always rewritten whole. Concurrent builds
//! for the same version race; the last writer wins.

use crate::error::{PylayerError, PylayerResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const FILE_PREFIX: &str = "python-";
const FILE_SUFFIX: &str = ".txt";

/// Key-value store of install orders, keyed by runtime version
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Load the recorded order. A missing record is an empty order.
    async fn load(&self, runtime_version: &str) -> PylayerResult<Vec<String>>;

    /// Replace the recorded order
    async fn save(&self, runtime_version: &str, order: &[String]) -> PylayerResult<()>;
}

/// Summary of one stored order
#[derive(Debug, Clone)]
pub struct StoredOrder {
    pub runtime_version: String,
    pub path: PathBuf,
    pub entries: usize,
    pub modified: DateTime<Utc>,
}

/// Directory-backed order store
#[derive(Debug, Clone)]
pub struct FileOrderStore {
    dir: PathBuf,
}

impl FileOrderStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the order file for a runtime version
    pub fn path_for(&self, runtime_version: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", FILE_PREFIX, runtime_version, FILE_SUFFIX))
    }

    /// List all stored orders, sorted by runtime version
    pub async fn list(&self) -> PylayerResult<Vec<StoredOrder>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut reader = fs::read_dir(&self.dir)
            .await
            .map_err(|e| PylayerError::io(format!("listing {}", self.dir.display()), e))?;

        let mut orders = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| PylayerError::io(format!("listing {}", self.dir.display()), e))?
        {
            let file_name = entry.file_name();
            let Some(runtime_version) = file_name
                .to_str()
                .and_then(|n| n.strip_prefix(FILE_PREFIX))
                .and_then(|n| n.strip_suffix(FILE_SUFFIX))
            else {
                continue;
            };

            let path = entry.path();
            let entries = read_order(&path).await?.len();
            let modified = entry
                .metadata()
                .await
                .and_then(|m| m.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            orders.push(StoredOrder {
                runtime_version: runtime_version.to_string(),
                path,
                entries,
                modified,
            });
        }

        orders.sort_by(|a, b| a.runtime_version.cmp(&b.runtime_version));
        Ok(orders)
    }

    /// Remove one stored order. Returns false if there was none.
    pub async fn remove(&self, runtime_version: &str) -> PylayerResult<bool> {
        let path = self.path_for(runtime_version);
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)
            .await
            .map_err(|e| PylayerError::io(format!("removing {}", path.display()), e))?;
        debug!("Removed order file {}", path.display());
        Ok(true)
    }

    /// Remove every stored order, returning how many were removed
    pub async fn clear(&self) -> PylayerResult<usize> {
        let orders = self.list().await?;
        for order in &orders {
            fs::remove_file(&order.path)
                .await
                .map_err(|e| PylayerError::io(format!("removing {}", order.path.display()), e))?;
        }
        Ok(orders.len())
    }
}

#[async_trait]
impl OrderStore for FileOrderStore {
    async fn load(&self, runtime_version: &str) -> PylayerResult<Vec<String>> {
        let path = self.path_for(runtime_version);
        if !path.exists() {
            debug!("No recorded order at {}", path.display());
            return Ok(Vec::new());
        }

        let order = read_order(&path).await?;
        debug!("Loaded {} recorded entries from {}", order.len(), path.display());
        Ok(order)
    }

    async fn save(&self, runtime_version: &str, order: &[String]) -> PylayerResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PylayerError::io(format!("creating {}", self.dir.display()), e))?;

        let mut content = order.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }

        // Write beside the target and rename so readers never see a partial file
        let path = self.path_for(runtime_version);
        let tmp = self.dir.join(format!(".{}.tmp", uuid::Uuid::new_v4()));
        fs::write(&tmp, content)
            .await
            .map_err(|e| PylayerError::io(format!("writing {}", tmp.display()), e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| PylayerError::io(format!("replacing {}", path.display()), e))?;

        debug!("Saved {} entries to {}", order.len(), path.display());
        Ok(())
    }
}

async fn read_order(path: &Path) -> PylayerResult<Vec<String>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| PylayerError::io(format!("reading {}", path.display()), e))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
