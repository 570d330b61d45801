//! Expense endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;

use stockbook_core::validation::{validate_description, validate_expense_amount};
use stockbook_core::{inventory, CoreError, Expense, NewExpense};
use stockbook_db::Collection;

use crate::error::ApiResult;
use crate::AppState;

/// # GET /api/expenses
pub async fn list_expenses(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.store.list_expenses().await?))
}

/// # PUT /api/expenses
pub async fn replace_expenses(
    State(state): State<Arc<AppState>>,
    Json(expenses): Json<Vec<Expense>>,
) -> ApiResult<Json<Vec<Expense>>> {
    for expense in &expenses {
        validate_description(&expense.description)?;
        validate_expense_amount(expense.amount_cents)?;
    }

    state
        .store
        .replace_all(&Collection::Expenses(expenses.clone()))
        .await?;
    info!(count = expenses.len(), "Expenses replaced");

    Ok(Json(expenses))
}

/// # POST /api/expenses
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewExpense>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let expense = inventory::new_expense(input, Utc::now())?;

    let mut expenses = state.store.list_expenses().await?;
    expenses.push(expense.clone());
    state.store.replace_all(&Collection::Expenses(expenses)).await?;

    info!(id = %expense.id, amount_cents = expense.amount_cents, "Expense recorded");
    Ok((StatusCode::CREATED, Json(expense)))
}

/// # DELETE /api/expenses/{id}
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut expenses = state.store.list_expenses().await?;
    let before = expenses.len();
    expenses.retain(|e| e.id != id);

    if expenses.len() == before {
        return Err(CoreError::ExpenseNotFound(id).into());
    }

    state.store.replace_all(&Collection::Expenses(expenses)).await?;
    info!(id = %id, "Expense deleted");
    Ok(StatusCode::NO_CONTENT)
}
