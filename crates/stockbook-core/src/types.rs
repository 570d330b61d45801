//! # Domain Types
//!
//! The three record collections Stockbook persists, plus the input shapes
//! used to create them.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Expense      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  product_id     │   │  id (UUID)      │       │
//! │  │  name           │   │  product_name   │   │  description    │       │
//! │  │  quantity       │   │  quantity       │   │  amount_cents   │       │
//! │  │  price_cents    │   │  total_cents    │   │  spent_at       │       │
//! │  │  last_updated   │   │  sold_at        │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Mutable:  Product (stock decremented on sale, manual edits)           │
//! │  Append:   Sale, Expense (never edited, only deleted)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `Sale::product_name` freezes the product's name at sale time. Renaming or
//! deleting the product later leaves historic sales readable.
//!
//! All JSON payloads use camelCase keys (`priceCents`, `soldAt`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Product
// =============================================================================

/// A stocked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, also used as the sales grouping key in reports.
    pub name: String,

    /// Optional stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,

    /// Optional free-text category.
    #[serde(default)]
    pub category: Option<String>,

    /// Units currently in stock.
    pub quantity: i64,

    /// Unit price in cents.
    pub price_cents: i64,

    /// When the product was created or last changed.
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// True when stock has dropped below [`LOW_STOCK_THRESHOLD`].
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity < LOW_STOCK_THRESHOLD
    }

    /// Checks whether `quantity` units can be taken from stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.quantity
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale of a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Amount charged. Either `price × quantity` or a manual override.
    pub total_cents: i64,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Expense
// =============================================================================

/// Money spent by the business (rent, restocking, transport).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub spent_at: DateTime<Utc>,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Input for creating a product. The id and timestamp are assigned.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    pub price_cents: i64,
}

/// Input for recording a sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub product_id: String,
    pub quantity: i64,
    /// Manual amount that replaces `price × quantity` when present.
    #[serde(default)]
    pub total_cents: Option<i64>,
}

/// Input for recording an expense.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub description: String,
    pub amount_cents: i64,
    /// Defaults to the time the expense is recorded.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub spent_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================
