//! Sale endpoints.
//!
//! ## Recording a Sale
//! ```text
//! POST /api/sales {productId, quantity, totalCents?}
//!      │
//!      ▼
//! load products ──► inventory::record_sale ──► InsufficientStock? ──► 409
//!      │                                         (nothing written)
//!      ▼
//! replace products (stock decremented)
//!      │
//!      ▼
//! load sales, append, replace sales ──► 201 {sale}
//! ```
//!
//! The stock check and the decrement are separate store calls, so two
//! concurrent sales of the last unit can both pass the check.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;

use stockbook_core::validation::{validate_sale_quantity, validate_sale_total_cents};
use stockbook_core::{inventory, CoreError, NewSale, Sale};
use stockbook_db::Collection;

use crate::error::ApiResult;
use crate::AppState;

/// # GET /api/sales
pub async fn list_sales(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Sale>>> {
    Ok(Json(state.store.list_sales().await?))
}

/// # PUT /api/sales
pub async fn replace_sales(
    State(state): State<Arc<AppState>>,
    Json(sales): Json<Vec<Sale>>,
) -> ApiResult<Json<Vec<Sale>>> {
    for sale in &sales {
        validate_sale_quantity(sale.quantity)?;
        validate_sale_total_cents(sale.total_cents)?;
    }

    state.store.replace_all(&Collection::Sales(sales.clone())).await?;
    info!(count = sales.len(), "Sales replaced");

    Ok(Json(sales))
}

/// # POST /api/sales
pub async fn record_sale(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewSale>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    let products = state.store.list_products().await?;
    let (sale, updated) = inventory::record_sale(&products, &input, Utc::now())?;

    let products = inventory::replace_product(products, updated.clone())?;
    state.store.replace_all(&Collection::Products(products)).await?;

    let mut sales = state.store.list_sales().await?;
    sales.push(sale.clone());
    state.store.replace_all(&Collection::Sales(sales)).await?;

    info!(
        id = %sale.id,
        product = %sale.product_name,
        quantity = sale.quantity,
        total_cents = sale.total_cents,
        remaining = updated.quantity,
        "Sale recorded"
    );
    Ok((StatusCode::CREATED, Json(sale)))
}

/// # DELETE /api/sales/{id}
/// Stock is not given back.
pub async fn delete_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut sales = state.store.list_sales().await?;
    let before = sales.len();
    sales.retain(|s| s.id != id);

    if sales.len() == before {
        return Err(CoreError::SaleNotFound(id).into());
    }

    state.store.replace_all(&Collection::Sales(sales)).await?;
    info!(id = %id, "Sale deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::routes::test_support::TestApp;

    async fn widget(app: &TestApp, quantity: i64) -> String {
        let (_, created) = app
            .send(
                Method::POST,
                "/api/products",
                Some(json!({ "name": "Widget", "quantity": quantity, "priceCents": 1000 })),
            )
            .await;
        created["id"].as_str().unwrap().to_string()
    }

    async fn stock(app: &TestApp) -> Value {
        let (_, products) = app.send(Method::GET, "/api/products", None).await;
        products[0]["quantity"].clone()
    }

    #[tokio::test]
    async fn test_record_sale_decrements_stock() {
        let app = TestApp::new().await;
        let id = widget(&app, 5).await;

        let (status, sale) = app
            .send(Method::POST, "/api/sales", Some(json!({ "productId": id, "quantity": 2 })))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(sale["totalCents"], 2000);
        assert_eq!(sale["productName"], "Widget");
        assert_eq!(stock(&app).await, 3);

        let (_, sales) = app.send(Method::GET, "/api/sales", None).await;
        assert_eq!(sales.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_manual_total_overrides_price() {
        let app = TestApp::new().await;
        let id = widget(&app, 5).await;

        let (_, sale) = app
            .send(
                Method::POST,
                "/api/sales",
                Some(json!({ "productId": id, "quantity": 2, "totalCents": 1500 })),
            )
            .await;

        assert_eq!(sale["totalCents"], 1500);
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let app = TestApp::new().await;
        let id = widget(&app, 3).await;

        let (status, body) = app
            .send(Method::POST, "/api/sales", Some(json!({ "productId": id, "quantity": 5 })))
            .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INSUFFICIENT_STOCK");
        assert_eq!(stock(&app).await, 3);

        let (_, sales) = app.send(Method::GET, "/api/sales", None).await;
        assert!(sales.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_and_bad_quantity() {
        let app = TestApp::new().await;
        let id = widget(&app, 3).await;

        let (status, _) = app
            .send(Method::POST, "/api/sales", Some(json!({ "productId": "nope", "quantity": 1 })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(Method::POST, "/api/sales", Some(json!({ "productId": id, "quantity": 0 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_total_is_rejected() {
        let app = TestApp::new().await;
        let (status, created) = app
            .send(
                Method::POST,
                "/api/products",
                Some(json!({ "name": "Tractor", "quantity": 5, "priceCents": 1_000_000_000_000_i64 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap();

        let (status, body) = app
            .send(Method::POST, "/api/sales", Some(json!({ "productId": id, "quantity": 2 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(stock(&app).await, 5);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/products",
                Some(json!({ "name": "Yacht", "quantity": 1, "priceCents": i64::MAX })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_sale_keeps_stock() {
        let app = TestApp::new().await;
        let id = widget(&app, 5).await;
        let (_, sale) = app
            .send(Method::POST, "/api/sales", Some(json!({ "productId": id, "quantity": 2 })))
            .await;

        let uri = format!("/api/sales/{}", sale["id"].as_str().unwrap());
        let (status, _) = app.send(Method::DELETE, &uri, None).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(stock(&app).await, 3);

        let (status, _) = app.send(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
