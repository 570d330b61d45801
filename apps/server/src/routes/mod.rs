//! # HTTP Routes
//!
//! Every write handler follows the same cycle: load the affected
//! collections, apply a `stockbook_core` operation to them, then replace
//! them in the store. Each request awaits its store calls one at a time.

pub mod expenses;
pub mod products;
pub mod reports;
pub mod sales;

use std::sync::Arc;

use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/products",
            get(products::list_products)
                .put(products::replace_products)
                .post(products::create_product),
        )
        .route("/api/products/{id}", delete(products::delete_product))
        .route("/api/products/{id}/quantity", patch(products::update_quantity))
        .route(
            "/api/sales",
            get(sales::list_sales)
                .put(sales::replace_sales)
                .post(sales::record_sale),
        )
        .route("/api/sales/{id}", delete(sales::delete_sale))
        .route(
            "/api/expenses",
            get(expenses::list_expenses)
                .put(expenses::replace_expenses)
                .post(expenses::create_expense),
        )
        .route("/api/expenses/{id}", delete(expenses::delete_expense))
        .route("/api/reports/weekly", get(reports::weekly_report))
        .route("/api/reports/weekly/share", get(reports::share))
        .route("/api/reports/weekly/summary", get(reports::summary))
        .route("/api/reports/weekly/sales-document", get(reports::sales_document))
        .route("/api/reports/weekly/stock-document", get(reports::stock_document))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// # GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
