//! Product endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use stockbook_core::validation::{
    validate_category, validate_price_cents, validate_product_name, validate_sku,
    validate_stock_level,
};
use stockbook_core::{inventory, CoreError, NewProduct, Product};
use stockbook_db::Collection;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: i64,
}

/// # GET /api/products
pub async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.store.list_products().await?))
}

/// # PUT /api/products
/// Replaces the whole product list.
pub async fn replace_products(
    State(state): State<Arc<AppState>>,
    Json(products): Json<Vec<Product>>,
) -> ApiResult<Json<Vec<Product>>> {
    for product in &products {
        validate_product_name(&product.name)?;
        validate_sku(product.sku.as_deref())?;
        validate_category(product.category.as_deref())?;
        validate_stock_level(product.quantity)?;
        validate_price_cents(product.price_cents)?;
    }

    state
        .store
        .replace_all(&Collection::Products(products.clone()))
        .await?;
    info!(count = products.len(), "Products replaced");

    Ok(Json(products))
}

/// # POST /api/products
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = inventory::new_product(input, Utc::now())?;

    let mut products = state.store.list_products().await?;
    products.push(product.clone());
    state.store.replace_all(&Collection::Products(products)).await?;

    info!(id = %product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// # PATCH /api/products/{id}/quantity
/// Manual stock correction.
pub async fn update_quantity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<QuantityUpdate>,
) -> ApiResult<Json<Product>> {
    let products = state.store.list_products().await?;
    let current = products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| CoreError::ProductNotFound(id.clone()))?;

    let updated = inventory::set_quantity(current, update.quantity, Utc::now())?;
    let products = inventory::replace_product(products, updated.clone())?;
    state.store.replace_all(&Collection::Products(products)).await?;

    info!(id = %id, quantity = updated.quantity, "Stock level set");
    Ok(Json(updated))
}

/// # DELETE /api/products/{id}
/// Past sales keep their product name snapshot.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut products = state.store.list_products().await?;
    let before = products.len();
    products.retain(|p| p.id != id);

    if products.len() == before {
        return Err(CoreError::ProductNotFound(id).into());
    }

    state.store.replace_all(&Collection::Products(products)).await?;
    info!(id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Unit Tests
// =============================================================================
