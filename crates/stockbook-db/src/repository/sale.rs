//! # Sale Repository
//!
//! Sales are never edited in place. The product name is a snapshot, so
//! there is no join to products.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::DbResult;
use stockbook_core::Sale;

const SELECT_SALES: &str = r#"
    SELECT id, product_id, product_name, quantity, total_cents, sold_at
    FROM sales
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists all sales in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!("{SELECT_SALES} ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Replaces the whole collection in one transaction.
    pub async fn replace_all(&self, sales: &[Sale]) -> DbResult<()> {
        debug!(count = sales.len(), "Replacing all sales");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sales").execute(&mut *tx).await?;
        for sale in sales {
            insert_in(&mut tx, sale).await?;
        }

        tx.commit().await?;
        Ok(())
    }

}

async fn insert_in(tx: &mut Transaction<'_, Sqlite>, sale: &Sale) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales (id, product_id, product_name, quantity, total_cents, sold_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.product_id)
    .bind(&sale.product_name)
    .bind(sale.quantity)
    .bind(sale.total_cents)
    .bind(sale.sold_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
