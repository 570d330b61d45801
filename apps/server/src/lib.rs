//! # Stockbook Server
//!
//! JSON API over the record store, plus the weekly report exports.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Stockbook Server                              │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /api/products │  │  /api/sales    │  │  /api/reports/weekly       ││
//! │  │                │  │                │  │                            ││
//! │  │ • list/replace │  │ • list/replace │  │ • report      (JSON)       ││
//! │  │ • create       │  │ • record sale  │  │ • share       (text)       ││
//! │  │ • set quantity │  │ • delete       │  │ • summary     (JSON)       ││
//! │  │ • delete       │  │                │  │ • sales-document           ││
//! │  └────────────────┘  └────────────────┘  │ • stock-document           ││
//! │  ┌────────────────┐                      └────────────────────────────┘│
//! │  │  /api/expenses │                                                    │
//! │  └────────────────┘                                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Arc<dyn RecordStore>  (TieredStore: SQLite + JSON snapshots)    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]. Every setting has a `STOCKBOOK_*` environment override.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use tracing::{info, warn};

use stockbook_db::{Database, RecordStore, SnapshotCache, StoragePolicy, TieredStore};

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;

/// Shared application state.
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: AppConfig) -> Self {
        AppState { store, config }
    }
}

/// Builds the record store described by `config`.
///
/// If the SQLite file cannot be opened at startup the server keeps running
/// on the snapshot cache alone.
pub async fn open_store(config: &AppConfig) -> Arc<dyn RecordStore> {
    let cache = SnapshotCache::new(config.cache_dir());

    if config.storage.mode == StoragePolicy::LocalOnly {
        info!(cache_dir = %cache.dir().display(), "Using snapshot cache only");
        return Arc::new(TieredStore::local_only(cache));
    }

    let db_config = config.db_config();
    if let Some(parent) = db_config.database_path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            warn!(error = %e, dir = %parent.display(), "Could not create database directory");
        }
    }

    match Database::new(db_config).await {
        Ok(db) => {
            info!(
                db = %config.database_path().display(),
                cache_dir = %cache.dir().display(),
                "Using SQLite with snapshot fallback"
            );
            Arc::new(TieredStore::with_fallback(db, cache))
        }
        Err(e) => {
            warn!(error = %e, "Primary store unavailable at startup, using snapshot cache only");
            Arc::new(TieredStore::local_only(cache))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
