//! # Record Store
//!
//! The persistence seam the server talks to. Every write replaces one whole
//! collection; reads return a whole collection in insertion order.
//!
//! ## Tiers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         TieredStore                                     │
//! │                                                                         │
//! │  read ──► primary (SQLite) ── ok ─────────────────────────► records     │
//! │                  │                                                      │
//! │                  └─ unreachable ─► warn! ─► snapshot cache ─► records   │
//! │                                                                         │
//! │  write ─► primary (SQLite) ── ok ─► snapshot cache ─────────► done      │
//! │                  │                        └─ fails ─► warn! ─► done      │
//! │                  │                                                      │
//! │                  └─ unreachable ─► warn! ─► snapshot cache ─► done      │
//! │                                             └─ fails ─► error         │
//! │                                                                         │
//! │  Rejections (duplicate id, failed CHECK) are returned as-is.           │
//! │  LocalOnly skips the primary entirely.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A write reports failure only when no tier kept it. A write that only
//! reached the cache is not replayed to the primary later,
//! so the two tiers can diverge until the next successful write of that
//! collection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::cache::SnapshotCache;
use crate::error::{DbError, DbResult};
use crate::pool::Database;
use stockbook_core::validation::validate_unique_ids;
use stockbook_core::{Expense, Product, Sale, ValidationError};

// =============================================================================
// Collections
// =============================================================================

/// A full replacement payload for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    Products(Vec<Product>),
    Sales(Vec<Sale>),
    Expenses(Vec<Expense>),
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Products(_) => "products",
            Collection::Sales(_) => "sales",
            Collection::Expenses(_) => "expenses",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::Products(records) => records.len(),
            Collection::Sales(records) => records.len(),
            Collection::Expenses(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails when two records share an id or an id is blank.
    pub fn check_ids(&self) -> DbResult<()> {
        let checked = match self {
            Collection::Products(records) => validate_unique_ids(records.iter().map(|r| r.id.as_str())),
            Collection::Sales(records) => validate_unique_ids(records.iter().map(|r| r.id.as_str())),
            Collection::Expenses(records) => validate_unique_ids(records.iter().map(|r| r.id.as_str())),
        };

        checked.map_err(|e| match e {
            ValidationError::Duplicate { value, .. } => {
                DbError::duplicate(format!("{}.id", self.name()), value)
            }
            other => DbError::ConstraintViolation(other.to_string()),
        })
    }
}

// =============================================================================
// RecordStore
// =============================================================================

/// Whole-collection persistence.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_products(&self) -> DbResult<Vec<Product>>;

    async fn list_sales(&self) -> DbResult<Vec<Sale>>;

    async fn list_expenses(&self) -> DbResult<Vec<Expense>>;

    /// Replaces every record of the collection with `collection`'s contents.
    async fn replace_all(&self, collection: &Collection) -> DbResult<()>;
}

#[async_trait]
impl RecordStore for Database {
    async fn list_products(&self) -> DbResult<Vec<Product>> {
        self.products().list().await
    }

    async fn list_sales(&self) -> DbResult<Vec<Sale>> {
        self.sales().list().await
    }

    async fn list_expenses(&self) -> DbResult<Vec<Expense>> {
        self.expenses().list().await
    }

    async fn replace_all(&self, collection: &Collection) -> DbResult<()> {
        collection.check_ids()?;

        match collection {
            Collection::Products(records) => self.products().replace_all(records).await,
            Collection::Sales(records) => self.sales().replace_all(records).await,
            Collection::Expenses(records) => self.expenses().replace_all(records).await,
        }
    }
}

#[async_trait]
impl RecordStore for SnapshotCache {
    async fn list_products(&self) -> DbResult<Vec<Product>> {
        self.load_products().await
    }

    async fn list_sales(&self) -> DbResult<Vec<Sale>> {
        self.load_sales().await
    }

    async fn list_expenses(&self) -> DbResult<Vec<Expense>> {
        self.load_expenses().await
    }

    async fn replace_all(&self, collection: &Collection) -> DbResult<()> {
        collection.check_ids()?;

        match collection {
            Collection::Products(records) => self.store_products(records).await,
            Collection::Sales(records) => self.store_sales(records).await,
            Collection::Expenses(records) => self.store_expenses(records).await,
        }
    }
}

// =============================================================================
// Storage Policy
// =============================================================================

/// Which tiers a [`TieredStore`] uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoragePolicy {
    /// SQLite first, snapshot cache when SQLite is unreachable.
    #[default]
    PrimaryWithFallback,
    /// Snapshot cache only.
    LocalOnly,
}

impl fmt::Display for StoragePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoragePolicy::PrimaryWithFallback => write!(f, "primary_with_fallback"),
            StoragePolicy::LocalOnly => write!(f, "local_only"),
        }
    }
}

impl FromStr for StoragePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "primary_with_fallback" | "primary" => Ok(StoragePolicy::PrimaryWithFallback),
            "local_only" | "local" => Ok(StoragePolicy::LocalOnly),
            other => Err(format!("unknown storage mode: {other}")),
        }
    }
}

// =============================================================================
// TieredStore
// =============================================================================

/// Primary store plus snapshot cache, combined under a [`StoragePolicy`].
#[derive(Debug, Clone)]
pub struct TieredStore<P = Database, C = SnapshotCache> {
    primary: Option<P>,
    cache: C,
}

impl<P, C> TieredStore<P, C> {
    pub fn with_fallback(primary: P, cache: C) -> Self {
        TieredStore {
            primary: Some(primary),
            cache,
        }
    }

    pub fn policy(&self) -> StoragePolicy {
        if self.primary.is_some() {
            StoragePolicy::PrimaryWithFallback
        } else {
            StoragePolicy::LocalOnly
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<C> TieredStore<Database, C> {
    /// A store that never touches SQLite.
    pub fn local_only(cache: C) -> Self {
        TieredStore {
            primary: None,
            cache,
        }
    }
}

/// Decides whether a primary result is final.
///
/// `None` means the primary was unreachable and the cache should answer.
fn settle<T>(result: DbResult<T>, collection: &str, action: &str) -> Option<DbResult<T>> {
    match result {
        Ok(value) => Some(Ok(value)),
        Err(e) if e.is_rejection() => Some(Err(e)),
        Err(e) => {
            warn!(
                collection,
                action,
                error = %e,
                "Primary store unavailable, using snapshot cache"
            );
            None
        }
    }
}

#[async_trait]
impl<P, C> RecordStore for TieredStore<P, C>
where
    P: RecordStore,
    C: RecordStore,
{
    async fn list_products(&self) -> DbResult<Vec<Product>> {
        if let Some(primary) = &self.primary {
            if let Some(result) = settle(primary.list_products().await, "products", "read") {
                return result;
            }
        }
        self.cache.list_products().await
    }

    async fn list_sales(&self) -> DbResult<Vec<Sale>> {
        if let Some(primary) = &self.primary {
            if let Some(result) = settle(primary.list_sales().await, "sales", "read") {
                return result;
            }
        }
        self.cache.list_sales().await
    }

    async fn list_expenses(&self) -> DbResult<Vec<Expense>> {
        if let Some(primary) = &self.primary {
            if let Some(result) = settle(primary.list_expenses().await, "expenses", "read") {
                return result;
            }
        }
        self.cache.list_expenses().await
    }

    async fn replace_all(&self, collection: &Collection) -> DbResult<()> {
        collection.check_ids()?;

        if let Some(primary) = &self.primary {
            match settle(primary.replace_all(collection).await, collection.name(), "write") {
                Some(Ok(())) => {
                    // The primary has committed, so the write stands even if
                    // the mirror fails.
                    if let Err(e) = self.cache.replace_all(collection).await {
                        warn!(
                            collection = collection.name(),
                            error = %e,
                            "Snapshot cache mirror failed, primary write kept"
                        );
                    }
                    debug!(
                        collection = collection.name(),
                        count = collection.len(),
                        "Collection replaced"
                    );
                    return Ok(());
                }
                Some(Err(e)) => return Err(e),
                None => {}
            }
        }

        self.cache.replace_all(collection).await?;
        debug!(
            collection = collection.name(),
            count = collection.len(),
            "Collection replaced"
        );
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use crate::repository::fixtures::{expense, product, sale};

    /// A primary that is never reachable.
    struct Offline;

    #[async_trait]
    impl RecordStore for Offline {
        async fn list_products(&self) -> DbResult<Vec<Product>> {
            Err(DbError::ConnectionFailed("offline".to_string()))
        }

        async fn list_sales(&self) -> DbResult<Vec<Sale>> {
            Err(DbError::ConnectionFailed("offline".to_string()))
        }

        async fn list_expenses(&self) -> DbResult<Vec<Expense>> {
            Err(DbError::ConnectionFailed("offline".to_string()))
        }

        async fn replace_all(&self, _collection: &Collection) -> DbResult<()> {
            Err(DbError::ConnectionFailed("offline".to_string()))
        }
    }

    async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[test]
    fn test_collection_ids() {
        let ok = Collection::Products(vec![product("p1", "A", 1), product("p2", "B", 1)]);
        assert!(ok.check_ids().is_ok());
        assert_eq!(ok.name(), "products");
        assert_eq!(ok.len(), 2);

        let dup = Collection::Sales(vec![sale("s1", "p1", 1, 1), sale("s1", "p1", 1, 1)]);
        assert!(matches!(dup.check_ids(), Err(DbError::UniqueViolation { .. })));

        let blank = Collection::Expenses(vec![expense(" ", 1)]);
        assert!(matches!(blank.check_ids(), Err(DbError::ConstraintViolation(_))));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("local_only".parse::<StoragePolicy>().unwrap(), StoragePolicy::LocalOnly);
        assert_eq!("Local-Only".parse::<StoragePolicy>().unwrap(), StoragePolicy::LocalOnly);
        assert_eq!(
            "primary".parse::<StoragePolicy>().unwrap(),
            StoragePolicy::PrimaryWithFallback
        );
        assert!("cloud".parse::<StoragePolicy>().is_err());
        assert_eq!(StoragePolicy::default().to_string(), "primary_with_fallback");
    }

    #[tokio::test]
    async fn test_database_as_record_store() {
        let db = database().await;
        let products = vec![product("p1", "Widget", 5)];

        db.replace_all(&Collection::Products(products.clone())).await.unwrap();

        assert_eq!(db.list_products().await.unwrap(), products);
        assert!(db.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_reach_both_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let db = database().await;
        let store = TieredStore::with_fallback(db.clone(), SnapshotCache::new(dir.path()));

        let sales = vec![sale("s1", "p1", 2, 2000)];
        store.replace_all(&Collection::Sales(sales.clone())).await.unwrap();

        assert_eq!(db.list_sales().await.unwrap(), sales);
        assert_eq!(store.cache().load_sales().await.unwrap(), sales);
        assert_eq!(store.policy(), StoragePolicy::PrimaryWithFallback);
    }

    #[tokio::test]
    async fn test_unreachable_primary_falls_back_to_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = TieredStore::with_fallback(Offline, SnapshotCache::new(dir.path()));

        let expenses = vec![expense("e1", 500)];
        store.replace_all(&Collection::Expenses(expenses.clone())).await.unwrap();

        assert_eq!(store.list_expenses().await.unwrap(), expenses);
        assert!(store.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_pool_falls_back_to_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path());
        let db = database().await;
        let store = TieredStore::with_fallback(db.clone(), cache.clone());

        let products = vec![product("p1", "Widget", 5)];
        store.replace_all(&Collection::Products(products.clone())).await.unwrap();

        db.close().await;

        assert_eq!(store.list_products().await.unwrap(), products);
    }

    #[tokio::test]
    async fn test_failed_mirror_keeps_primary_write() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("cache");
        std::fs::write(&not_a_dir, b"occupied").unwrap();

        let db = database().await;
        let store = TieredStore::with_fallback(db.clone(), SnapshotCache::new(&not_a_dir));

        let products = vec![product("p1", "Widget", 5)];
        store.replace_all(&Collection::Products(products.clone())).await.unwrap();

        assert_eq!(db.list_products().await.unwrap(), products);
        assert_eq!(store.list_products().await.unwrap(), products);
    }

    #[tokio::test]
    async fn test_write_fails_when_no_tier_keeps_it() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("cache");
        std::fs::write(&not_a_dir, b"occupied").unwrap();

        let store = TieredStore::with_fallback(Offline, SnapshotCache::new(&not_a_dir));
        let err = store
            .replace_all(&Collection::Expenses(vec![expense("e1", 500)]))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::CacheIo(_)));
    }

    #[tokio::test]
    async fn test_rejection_does_not_touch_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = TieredStore::with_fallback(database().await, SnapshotCache::new(dir.path()));

        // Negative stock fails the CHECK constraint in SQLite.
        let invalid = Collection::Products(vec![product("p1", "Widget", -1)]);
        let err = store.replace_all(&invalid).await.unwrap_err();

        assert!(matches!(err, DbError::ConstraintViolation(_)));
        assert!(store.cache().load_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_only_never_uses_primary() {
        let dir = tempfile::tempdir().unwrap();
        let store = TieredStore::local_only(SnapshotCache::new(dir.path()));
        assert_eq!(store.policy(), StoragePolicy::LocalOnly);

        let products = vec![product("p1", "Widget", 5)];
        store.replace_all(&Collection::Products(products.clone())).await.unwrap();

        assert_eq!(store.list_products().await.unwrap(), products);
    }
}
