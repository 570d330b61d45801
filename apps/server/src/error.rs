//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stockbook                              │
//! │                                                                         │
//! │  Handler: Result<Json<T>, ApiError>                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Store error?      ─── DbError::UniqueViolation ─────┐                 │
//! │         │                                            │                 │
//! │         ▼                                            ▼                 │
//! │  Business error?   ─── CoreError::InsufficientStock ─► ApiError        │
//! │         │                                            │                 │
//! │         ▼                                            ▼                 │
//! │  Success ──► 200 JSON                  409 {"code": "INSUFFICIENT_STOCK",│
//! │                                             "message": "Not enough..."}│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rejection happens before any collection is written, so a 4xx
//! response means nothing changed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use stockbook_core::{CoreError, ValidationError};
use stockbook_db::DbError;

/// Error body returned to HTTP clients.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: p-123"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Two records share an id (409)
    Duplicate,

    /// Not enough stock for a sale (409)
    InsufficientStock,

    /// Neither storage tier could serve the request (503)
    StorageUnavailable,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Duplicate | ErrorCode::InsufficientStock => StatusCode::CONFLICT,
            ErrorCode::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts store errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::new(ErrorCode::Duplicate, format!("{field} '{value}' already exists"))
            }
            DbError::ConstraintViolation(message) => {
                tracing::warn!(%message, "Constraint violation");
                ApiError::validation("Record violates a storage constraint")
            }
            DbError::ConnectionFailed(_) | DbError::PoolExhausted | DbError::CacheIo(_) => {
                tracing::error!(error = %err, "Storage unavailable");
                ApiError::new(ErrorCode::StorageUnavailable, "Storage is unavailable")
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, "Storage operation failed");
                ApiError::internal("Storage operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::SaleNotFound(id) => ApiError::not_found("Sale", &id),
            CoreError::ExpenseNotFound(id) => ApiError::not_found("Expense", &id),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::Serialization(e) => {
                tracing::error!(error = %e, "Serialization failed");
                ApiError::internal("Serialization failed")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_is_conflict() {
        let api: ApiError = CoreError::InsufficientStock {
            product: "Widget".to_string(),
            available: 3,
            requested: 5,
        }
        .into();

        assert_eq!(api.code, ErrorCode::InsufficientStock);
        assert_eq!(api.code.status(), StatusCode::CONFLICT);
        assert_eq!(api.message, "Not enough stock for Widget: available 3, requested 5");
    }

    #[test]
    fn test_validation_is_bad_request() {
        let api: ApiError = CoreError::from(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        })
        .into();
        assert_eq!(api.code.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_db_errors() {
        let api: ApiError = DbError::duplicate("products.id", "p1").into();
        assert_eq!(api.code, ErrorCode::Duplicate);

        let api: ApiError = DbError::ConnectionFailed("gone".into()).into();
        assert_eq!(api.code.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(api.message, "Storage is unavailable");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::not_found("Sale", "s1")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Sale not found: s1");
    }
}
