//! # stockbook-db: Persistence Layer for Stockbook
//!
//! SQLite primary store (via sqlx) plus a JSON snapshot cache, combined
//! behind the [`RecordStore`] trait.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (stockbook-server)                                       │
//! │       │  store.list_sales() / store.replace_all(Collection::Sales(..)) │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockbook-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐                                             │   │
//! │  │   │  TieredStore  │  StoragePolicy: primary_with_fallback       │   │
//! │  │   │  (store.rs)   │                 local_only                  │   │
//! │  │   └──────┬────────┘                                             │   │
//! │  │          │                                                      │   │
//! │  │   ┌──────┴────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │ Repositories  │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │◄───│ product.rs    │    │  (embedded)  │   │   │
//! │  │   │  SqlitePool   │    │ sale.rs       │    │ 001_init.sql │   │   │
//! │  │   └───────────────┘    │ expense.rs    │    └──────────────┘   │   │
//! │  │          │             └───────────────┘                       │   │
//! │  │          │ unreachable                                          │   │
//! │  │          ▼                                                      │   │
//! │  │   ┌───────────────┐                                             │   │
//! │  │   │ SnapshotCache │  products.json  sales.json  expenses.json   │   │
//! │  │   │  (cache.rs)   │                                             │   │
//! │  │   └───────────────┘                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per collection
//! - [`cache`] - JSON snapshot files
//! - [`store`] - `RecordStore` trait and the tiered store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockbook_db::{Collection, Database, DbConfig, RecordStore, SnapshotCache, TieredStore};
//!
//! let db = Database::new(DbConfig::new("stockbook.db")).await?;
//! let store = TieredStore::with_fallback(db, SnapshotCache::new("cache"));
//!
//! let mut products = store.list_products().await?;
//! products[0].quantity -= 1;
//! store.replace_all(&Collection::Products(products)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::SnapshotCache;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{Collection, RecordStore, StoragePolicy, TieredStore};

// Repository re-exports for convenience
pub use repository::expense::ExpenseRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
