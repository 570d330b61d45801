//! # Snapshot Cache
//!
//! A local JSON copy of each collection, one file per collection:
//!
//! ```text
//! <cache_dir>/
//! ├── products.json
//! ├── sales.json
//! └── expenses.json
//! ```
//!
//! A file that does not exist yet reads as an empty collection. Writes go to
//! a sibling `*.json.tmp` file which is then renamed over the real one, so a
//! crash mid-write leaves the previous snapshot readable.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::DbResult;
use stockbook_core::{Expense, Product, Sale};

pub const PRODUCTS_FILE: &str = "products.json";
pub const SALES_FILE: &str = "sales.json";
pub const EXPENSES_FILE: &str = "expenses.json";

/// JSON snapshot files under one directory.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    /// The directory is created lazily on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotCache { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn load_products(&self) -> DbResult<Vec<Product>> {
        self.load(PRODUCTS_FILE).await
    }

    pub async fn load_sales(&self) -> DbResult<Vec<Sale>> {
        self.load(SALES_FILE).await
    }

    pub async fn load_expenses(&self) -> DbResult<Vec<Expense>> {
        self.load(EXPENSES_FILE).await
    }

    pub async fn store_products(&self, products: &[Product]) -> DbResult<()> {
        self.store(PRODUCTS_FILE, products).await
    }

    pub async fn store_sales(&self, sales: &[Sale]) -> DbResult<()> {
        self.store(SALES_FILE, sales).await
    }

    pub async fn store_expenses(&self, expenses: &[Expense]) -> DbResult<()> {
        self.store(EXPENSES_FILE, expenses).await
    }

    async fn load<T: DeserializeOwned>(&self, file: &str) -> DbResult<Vec<T>> {
        let path = self.dir.join(file);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot yet, reading as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<T> = serde_json::from_slice(&bytes)?;
        debug!(path = %path.display(), count = records.len(), "Loaded snapshot");
        Ok(records)
    }

    async fn store<T: Serialize>(&self, file: &str, records: &[T]) -> DbResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{file}.tmp"));

        let json = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(path = %path.display(), count = records.len(), "Stored snapshot");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::fixtures::{expense, product, sale};

    #[tokio::test]
    async fn test_missing_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path().join("not-created-yet"));

        assert!(cache.load_products().await.unwrap().is_empty());
        assert!(cache.load_sales().await.unwrap().is_empty());
        assert!(cache.load_expenses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path().join("cache"));

        let products = vec![product("p2", "Gadget", 40), product("p1", "Widget", 5)];
        let sales = vec![sale("s1", "p1", 2, 2000)];
        let expenses = vec![expense("e1", 500)];

        cache.store_products(&products).await.unwrap();
        cache.store_sales(&sales).await.unwrap();
        cache.store_expenses(&expenses).await.unwrap();

        assert_eq!(cache.load_products().await.unwrap(), products);
        assert_eq!(cache.load_sales().await.unwrap(), sales);
        assert_eq!(cache.load_expenses().await.unwrap(), expenses);
        assert!(!cache.dir().join("products.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path());

        cache.store_products(&[product("p1", "Widget", 5)]).await.unwrap();
        cache.store_products(&[]).await.unwrap();

        assert!(cache.load_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SALES_FILE), b"{ not json").unwrap();

        let err = SnapshotCache::new(dir.path()).load_sales().await.unwrap_err();
        assert!(matches!(err, DbError::CacheCorrupt(_)));
    }

    #[tokio::test]
    async fn test_files_are_camel_case_json() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path());
        cache.store_expenses(&[expense("e1", 500)]).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join(EXPENSES_FILE)).unwrap();
        assert!(raw.contains("\"amountCents\": 500"));
    }
}
