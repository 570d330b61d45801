//! # Expense Repository

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::DbResult;
use stockbook_core::Expense;

const SELECT_EXPENSES: &str = r#"
    SELECT id, description, amount_cents, spent_at
    FROM expenses
"#;

#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Lists all expenses in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(&format!("{SELECT_EXPENSES} ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = expenses.len(), "Listed expenses");
        Ok(expenses)
    }

    /// Replaces the whole collection in one transaction.
    pub async fn replace_all(&self, expenses: &[Expense]) -> DbResult<()> {
        debug!(count = expenses.len(), "Replacing all expenses");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM expenses").execute(&mut *tx).await?;
        for expense in expenses {
            insert_in(&mut tx, expense).await?;
        }

        tx.commit().await?;
        Ok(())
    }

}

async fn insert_in(tx: &mut Transaction<'_, Sqlite>, expense: &Expense) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO expenses (id, description, amount_cents, spent_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&expense.id)
    .bind(&expense.description)
    .bind(expense.amount_cents)
    .bind(expense.spent_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::expense;
    use crate::{Database, DbConfig};

    async fn repo() -> ExpenseRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().expenses()
    }

    #[tokio::test]
    async fn test_replace_all() {
        let repo = repo().await;
        repo.replace_all(&[expense("old", 1)]).await.unwrap();

        let fresh = vec![expense("e2", 200), expense("e1", 100)];
        repo.replace_all(&fresh).await.unwrap();

        assert_eq!(repo.list().await.unwrap(), fresh);
    }

    #[tokio::test]
    async fn test_replace_with_nothing_empties_table() {
        let repo = repo().await;
        repo.replace_all(&[expense("e1", 100)]).await.unwrap();

        repo.replace_all(&[]).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }
}
