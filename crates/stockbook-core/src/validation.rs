//! # Validation Module
//!
//! Input validation for products, sales and expenses.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web UI                                                       │
//! │  └── Required fields, numeric inputs                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (serde)                                         │
//! │  └── Shape and type of the JSON body                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  └── Business rules (lengths, signs, unique ids)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: SQLite                                                       │
//! │  └── NOT NULL, PRIMARY KEY, CHECK constraints                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbook_core::validation::{validate_product_name, validate_sale_quantity};
//!
//! assert!(validate_product_name("Widget").is_ok());
//! assert!(validate_sale_quantity(0).is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_SKU_LEN: usize = 50;
pub const MAX_CATEGORY_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Largest stock level or sale quantity accepted.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Largest single amount accepted, in cents (ten billion in major units).
/// Over nine million sales at this cap are needed before a total leaves
/// the `i64` range.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

fn at_most(field: &str, value: i64, min: i64, max: i64) -> ValidationResult<()> {
    if value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }

    Ok(())
}

fn optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        _ => Ok(()),
    }
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required_text("name", name, MAX_NAME_LEN)
}

/// Validates an optional SKU. Absent is fine; present must fit 50 characters.
pub fn validate_sku(sku: Option<&str>) -> ValidationResult<()> {
    optional_text("sku", sku, MAX_SKU_LEN)
}

pub fn validate_category(category: Option<&str>) -> ValidationResult<()> {
    optional_text("category", category, MAX_CATEGORY_LEN)
}

/// Validates an expense description (required, at most 500 characters).
pub fn validate_description(description: &str) -> ValidationResult<()> {
    required_text("description", description, MAX_DESCRIPTION_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the quantity of a sale.
///
/// ## Rules
/// - Must be positive (> 0)
/// - At most [`MAX_QUANTITY`]
///
/// Whether enough stock exists is a business rule checked in
/// [`crate::inventory::record_sale`], not here.
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    at_most("quantity", qty, 1, MAX_QUANTITY)
}

/// Validates a stock level. Zero is a valid (sold out) level.
pub fn validate_stock_level(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    at_most("quantity", qty, 0, MAX_QUANTITY)
}

/// Validates a price in cents.
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());     // Free item
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    at_most("price", cents, 0, MAX_AMOUNT_CENTS)
}

/// Validates a manual sale total. Zero is allowed (giveaways), negative is not.
pub fn validate_sale_total_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "total".to_string(),
        });
    }

    at_most("total", cents, 0, MAX_AMOUNT_CENTS)
}

/// Validates an expense amount in cents. Must be positive.
pub fn validate_expense_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    at_most("amount", cents, 1, MAX_AMOUNT_CENTS)
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Rejects a collection in which two records share an id.
///
/// Used before a replace-all write, since the store keys every record by id.
pub fn validate_unique_ids<'a, I>(ids: I) -> ValidationResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();

    for id in ids {
        if id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            });
        }
        if !seen.insert(id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: id.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Widget").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
        assert!(validate_product_name(&"A".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_optional_text() {
        assert!(validate_sku(None).is_ok());
        assert!(validate_sku(Some("WID-01")).is_ok());
        assert!(validate_sku(Some(&"S".repeat(51))).is_err());
        assert!(validate_category(Some(&"C".repeat(101))).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("Rent").is_ok());
        assert!(matches!(
            validate_description(" "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_quantities() {
        assert!(validate_sale_quantity(1).is_ok());
        assert!(validate_sale_quantity(0).is_err());
        assert!(validate_sale_quantity(-3).is_err());

        assert!(validate_stock_level(0).is_ok());
        assert!(validate_stock_level(-1).is_err());

        assert!(validate_stock_level(MAX_QUANTITY).is_ok());
        assert!(matches!(
            validate_stock_level(MAX_QUANTITY + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_sale_quantity(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_sale_total_cents(0).is_ok());
        assert!(validate_sale_total_cents(-1).is_err());
        assert!(validate_expense_amount(1).is_ok());
        assert!(validate_expense_amount(0).is_err());

        assert!(validate_price_cents(MAX_AMOUNT_CENTS).is_ok());
        assert!(validate_price_cents(MAX_AMOUNT_CENTS + 1).is_err());
        assert!(validate_sale_total_cents(i64::MAX).is_err());
        assert!(validate_expense_amount(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_unique_ids() {
        assert!(validate_unique_ids(["a", "b", "c"]).is_ok());
        assert!(validate_unique_ids(Vec::<&str>::new()).is_ok());
        assert!(matches!(
            validate_unique_ids(["a", "b", "a"]),
            Err(ValidationError::Duplicate { .. })
        ));
        assert!(validate_unique_ids(["a", ""]).is_err());
    }
}
