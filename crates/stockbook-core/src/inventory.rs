//! # Inventory Rules
//!
//! Creating records and moving stock. Every function here is pure: it takes
//! the current state plus the time, and returns new values for the caller to
//! persist. Nothing is returned on error, so a rejected request leaves the
//! caller's collections untouched.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(products, NewSale { product_id, quantity, total? }, now)   │
//! │                                                                         │
//! │  1. find product by id          ──► ProductNotFound                    │
//! │  2. quantity > 0                ──► Validation(MustBePositive)          │
//! │  3. quantity <= product stock   ──► InsufficientStock                  │
//! │  4. total = override or price × quantity ──► Validation(OutOfRange)    │
//! │  5. Sale { product_name: snapshot, sold_at: now }                      │
//! │  6. Product { quantity - sold, last_updated: now }                     │
//! │                                                                         │
//! │  Caller persists BOTH (products first, then sales).                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::types::{Expense, NewExpense, NewProduct, NewSale, Product, Sale};
use crate::validation::{
    validate_category, validate_description, validate_expense_amount, validate_price_cents,
    validate_product_name, validate_sale_quantity, validate_sale_total_cents, validate_sku,
    validate_stock_level,
};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Trims an optional text field, treating blank as absent.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates the input and builds a product with a fresh id.
pub fn new_product(input: NewProduct, now: DateTime<Utc>) -> CoreResult<Product> {
    validate_product_name(&input.name)?;
    validate_sku(input.sku.as_deref())?;
    validate_category(input.category.as_deref())?;
    validate_stock_level(input.quantity)?;
    validate_price_cents(input.price_cents)?;

    Ok(Product {
        id: new_id(),
        name: input.name.trim().to_string(),
        sku: clean(input.sku),
        category: clean(input.category),
        quantity: input.quantity,
        price_cents: input.price_cents,
        last_updated: now,
    })
}

/// Checks a sale against current stock and returns the sale together with
/// the product's new state.
pub fn record_sale(
    products: &[Product],
    input: &NewSale,
    now: DateTime<Utc>,
) -> CoreResult<(Sale, Product)> {
    let product = products
        .iter()
        .find(|p| p.id == input.product_id)
        .ok_or_else(|| CoreError::ProductNotFound(input.product_id.clone()))?;

    validate_sale_quantity(input.quantity)?;

    if !product.can_sell(input.quantity) {
        return Err(CoreError::InsufficientStock {
            product: product.name.clone(),
            available: product.quantity,
            requested: input.quantity,
        });
    }

    let total_cents = match input.total_cents {
        Some(cents) => cents,
        None => product
            .price()
            .checked_multiply_quantity(input.quantity)
            .map_or(i64::MAX, |total| total.cents()),
    };
    validate_sale_total_cents(total_cents)?;

    let sale = Sale {
        id: new_id(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        quantity: input.quantity,
        total_cents,
        sold_at: now,
    };

    let updated = Product {
        quantity: product.quantity - input.quantity,
        last_updated: now,
        ..product.clone()
    };

    Ok((sale, updated))
}

pub fn new_expense(input: NewExpense, now: DateTime<Utc>) -> CoreResult<Expense> {
    validate_description(&input.description)?;
    validate_expense_amount(input.amount_cents)?;

    Ok(Expense {
        id: new_id(),
        description: input.description.trim().to_string(),
        amount_cents: input.amount_cents,
        spent_at: input.spent_at.unwrap_or(now),
    })
}

/// Manual stock correction.
pub fn set_quantity(product: &Product, quantity: i64, now: DateTime<Utc>) -> CoreResult<Product> {
    validate_stock_level(quantity)?;

    Ok(Product {
        quantity,
        last_updated: now,
        ..product.clone()
    })
}

/// Returns `products` with the entry sharing `updated.id` swapped out.
/// Order is preserved.
pub fn replace_product(products: Vec<Product>, updated: Product) -> CoreResult<Vec<Product>> {
    if !products.iter().any(|p| p.id == updated.id) {
        return Err(CoreError::ProductNotFound(updated.id));
    }

    Ok(products
        .into_iter()
        .map(|p| if p.id == updated.id { updated.clone() } else { p })
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::validation::MAX_AMOUNT_CENTS;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn widget(quantity: i64) -> Product {
        Product {
            id: "p-widget".to_string(),
            name: "Widget".to_string(),
            sku: Some("WID-1".to_string()),
            category: None,
            quantity,
            price_cents: 1000,
            last_updated: Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap(),
        }
    }

    fn sell(quantity: i64, total_cents: Option<i64>) -> NewSale {
        NewSale {
            product_id: "p-widget".to_string(),
            quantity,
            total_cents,
        }
    }

    #[test]
    fn test_new_product() {
        let input = NewProduct {
            name: "  Widget ".to_string(),
            sku: Some("  ".to_string()),
            category: Some("Hardware".to_string()),
            quantity: 12,
            price_cents: 1000,
        };

        let product = new_product(input, now()).unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.sku, None);
        assert_eq!(product.category.as_deref(), Some("Hardware"));
        assert_eq!(product.last_updated, now());
        assert!(Uuid::parse_str(&product.id).is_ok());
    }

    #[test]
    fn test_new_product_rejects_bad_input() {
        let base = NewProduct {
            name: "Widget".to_string(),
            sku: None,
            category: None,
            quantity: 1,
            price_cents: 100,
        };

        let no_name = NewProduct {
            name: String::new(),
            ..base.clone()
        };
        assert!(new_product(no_name, now()).is_err());

        let negative_stock = NewProduct {
            quantity: -1,
            ..base.clone()
        };
        assert!(new_product(negative_stock, now()).is_err());

        let negative_price = NewProduct {
            price_cents: -5,
            ..base
        };
        assert!(new_product(negative_price, now()).is_err());
    }

    #[test]
    fn test_record_sale_uses_price_times_quantity() {
        let products = vec![widget(5)];

        let (sale, updated) = record_sale(&products, &sell(2, None), now()).unwrap();

        assert_eq!(sale.total_cents, 2000);
        assert_eq!(sale.product_name, "Widget");
        assert_eq!(sale.sold_at, now());
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.last_updated, now());
        assert_eq!(updated.sku, products[0].sku);
    }

    #[test]
    fn test_record_sale_override_amount() {
        let (sale, _) = record_sale(&[widget(5)], &sell(2, Some(1500)), now()).unwrap();
        assert_eq!(sale.total_cents, 1500);
    }

    #[test]
    fn test_record_sale_can_empty_stock() {
        let (_, updated) = record_sale(&[widget(5)], &sell(5, None), now()).unwrap();
        assert_eq!(updated.quantity, 0);
    }

    #[test]
    fn test_record_sale_rejects_more_than_stock() {
        let products = vec![widget(5)];

        let err = record_sale(&products, &sell(6, None), now()).unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            }
        ));
        assert_eq!(products[0].quantity, 5);
    }

    #[test]
    fn test_record_sale_rejects_unknown_product_and_bad_quantity() {
        let mut input = sell(1, None);
        input.product_id = "missing".to_string();
        assert!(matches!(
            record_sale(&[widget(5)], &input, now()),
            Err(CoreError::ProductNotFound(_))
        ));

        assert!(matches!(
            record_sale(&[widget(5)], &sell(0, None), now()),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        assert!(record_sale(&[widget(5)], &sell(1, Some(-1)), now()).is_err());
    }

    #[test]
    fn test_record_sale_rejects_total_too_large() {
        let mut pricey = widget(5);
        pricey.price_cents = i64::MAX / 2 + 1;

        let err = record_sale(&[pricey.clone()], &sell(2, None), now()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));

        pricey.price_cents = MAX_AMOUNT_CENTS;
        assert!(record_sale(&[pricey.clone()], &sell(1, None), now()).is_ok());
        assert!(record_sale(&[pricey], &sell(2, None), now()).is_err());
    }

    #[test]
    fn test_new_expense() {
        let expense = new_expense(
            NewExpense {
                description: "Rent".to_string(),
                amount_cents: 50_000,
                spent_at: None,
            },
            now(),
        )
        .unwrap();
        assert_eq!(expense.spent_at, now());

        let missing = NewExpense {
            description: " ".to_string(),
            amount_cents: 100,
            spent_at: None,
        };
        assert!(new_expense(missing, now()).is_err());

        let zero = NewExpense {
            description: "Rent".to_string(),
            amount_cents: 0,
            spent_at: None,
        };
        assert!(new_expense(zero, now()).is_err());
    }

    #[test]
    fn test_set_quantity() {
        let updated = set_quantity(&widget(5), 40, now()).unwrap();
        assert_eq!(updated.quantity, 40);
        assert_eq!(updated.last_updated, now());
        assert!(set_quantity(&widget(5), -1, now()).is_err());
    }

    #[test]
    fn test_replace_product_keeps_order() {
        let mut other = widget(1);
        other.id = "p-other".to_string();
        let products = vec![other, widget(5)];

        let replaced = replace_product(products, widget(2)).unwrap();

        assert_eq!(replaced[0].id, "p-other");
        assert_eq!(replaced[1].quantity, 2);

        let mut stranger = widget(1);
        stranger.id = "nope".to_string();
        assert!(replace_product(replaced, stranger).is_err());
    }
}
