//! # Product Repository
//!
//! Database operations for products.
//!
//! Products are listed in insertion order, which is the order low stock
//! alerts follow. Every write is a replace-all from the record store.
//!
//! ## Replace-All
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    DELETE FROM products                                                │
//! │    INSERT products[0]                                                  │
//! │    INSERT products[1]          any failure ──► ROLLBACK, table intact  │
//! │    ...                                                                  │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::DbResult;
use stockbook_core::Product;

const SELECT_PRODUCTS: &str = r#"
    SELECT id, name, sku, category, quantity, price_cents, last_updated
    FROM products
"#;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products =
            sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCTS} ORDER BY rowid"))
                .fetch_all(&self.pool)
                .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Replaces the whole collection in one transaction.
    pub async fn replace_all(&self, products: &[Product]) -> DbResult<()> {
        debug!(count = products.len(), "Replacing all products");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
        for product in products {
            insert_in(&mut tx, product).await?;
        }

        tx.commit().await?;
        Ok(())
    }

}

async fn insert_in(tx: &mut Transaction<'_, Sqlite>, product: &Product) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO products (id, name, sku, category, quantity, price_cents, last_updated)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&product.id)
    .bind(&product.name)
    .bind(&product.sku)
    .bind(&product.category)
    .bind(product.quantity)
    .bind(product.price_cents)
    .bind(product.last_updated)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
