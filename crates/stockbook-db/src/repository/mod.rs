//! # Repository Module
//!
//! One repository per collection, each a thin wrapper around the pool.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  RecordStore for Database (store.rs)                                   │
//! │       │                                                                 │
//! │       │  db.products().replace_all(&products)                          │
//! │       ▼                                                                 │
//! │  ProductRepository / SaleRepository / ExpenseRepository                │
//! │  ├── list(&self)                 insertion order                       │
//! │  └── replace_all(&self, records) one transaction                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are checked at runtime (`query_as::<_, T>` with `FromRow`), so
//! building the workspace never needs a live database.

pub mod expense;
pub mod product;
pub mod sale;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};
    use stockbook_core::{Expense, Product, Sale};

    pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
    }

    pub fn product(id: &str, name: &str, quantity: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            sku: Some(format!("{}-SKU", name.to_uppercase())),
            category: None,
            quantity,
            price_cents: 1000,
            last_updated: at(18, 8),
        }
    }

    pub fn sale(id: &str, product_id: &str, quantity: i64, total_cents: i64) -> Sale {
        Sale {
            id: id.to_string(),
            product_id: product_id.to_string(),
            product_name: "Widget".to_string(),
            quantity,
            total_cents,
            sold_at: at(19, 10),
        }
    }

    pub fn expense(id: &str, amount_cents: i64) -> Expense {
        Expense {
            id: id.to_string(),
            description: "Transport".to_string(),
            amount_cents,
            spent_at: at(20, 9),
        }
    }
}
