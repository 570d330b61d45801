//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! Everything Stockbook knows about products, sales, expenses and weekly
//! reports, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web UI (browser)                             │   │
//! │  │    Products ──► Record Sale ──► Expenses ──► Weekly Reports     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockbook-server (axum)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  types   │ │   week   │ │  report  │ │  export  │          │   │
//! │  │   │ Product  │ │ WeekWin- │ │ Weekly-  │ │ share    │          │   │
//! │  │   │ Sale     │ │ dow      │ │ Report   │ │ docs     │          │   │
//! │  │   │ Expense  │ │          │ │          │ │ summary  │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │   money • validation • inventory                               │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockbook-db (Persistence)                   │   │
//! │  │          SQLite primary store + JSON snapshot cache             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, Sale, Expense and their inputs
//! - [`money`] - Integer cents and currency display
//! - [`error`] - Domain error types
//! - [`validation`] - Input rules
//! - [`inventory`] - Creating records and moving stock
//! - [`week`] - Sunday-to-Saturday week windows
//! - [`report`] - Weekly aggregation
//! - [`export`] - Share text, tabular documents, JSON summary
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use stockbook_core::money::CurrencyFormat;
//! use stockbook_core::report::build_report;
//! use stockbook_core::week::week_range;
//! use stockbook_core::{export, Product, Sale};
//!
//! let widget = Product {
//!     id: "p1".into(),
//!     name: "Widget".into(),
//!     sku: None,
//!     category: None,
//!     quantity: 5,
//!     price_cents: 1000,
//!     last_updated: Utc::now(),
//! };
//! let sale = Sale {
//!     id: "s1".into(),
//!     product_id: "p1".into(),
//!     product_name: "Widget".into(),
//!     quantity: 2,
//!     total_cents: 2000,
//!     sold_at: Utc.with_ymd_and_hms(2026, 10, 20, 10, 0, 0).unwrap(),
//! };
//!
//! let week = week_range(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), 0).unwrap();
//! let report = build_report(&[widget], &[sale], &week);
//!
//! assert_eq!(report.total_revenue_cents, 2000);
//! assert!(export::share_text(&report, &CurrencyFormat::default()).contains("Low Stock Alert:"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod export;
pub mod inventory;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;
pub mod week;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CurrencyFormat, Money};
pub use report::{WeeklyReport, build_report};
pub use types::*;
pub use week::{WeekWindow, week_range};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Products with fewer units than this appear in low stock alerts.
pub const LOW_STOCK_THRESHOLD: i64 = 10;
