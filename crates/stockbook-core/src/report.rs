//! # Weekly Report Aggregation
//!
//! Turns the raw collections into the numbers shown on the reports page.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      build_report(products, sales, window)              │
//! │                                                                         │
//! │   sales ──► filter (window.contains) ──► group by key ──► rank          │
//! │                        │                   sum qty/rev     revenue desc │
//! │                        │                                   (stable)     │
//! │                        └──► total_sales = count                        │
//! │                             total_revenue = Σ total (in order)         │
//! │                                                                         │
//! │   products ──► quantity < LOW_STOCK_THRESHOLD ──► low_stock            │
//! │                (input order, ignores the window)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because money is integer cents, the sum of the grouped revenues always
//! equals `total_revenue`.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Expense, Product, Sale};
use crate::week::WeekWindow;

// =============================================================================
// Report Types
// =============================================================================

/// One row of the "top products" ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    /// Product id of the first sale seen in this group.
    pub product_id: String,
    /// Display name of the first sale seen in this group.
    pub product_name: String,
    pub quantity: i64,
    pub revenue_cents: i64,
}

impl ProductSales {
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

/// Aggregated figures for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    #[ts(as = "String")]
    pub week_start: NaiveDate,
    #[ts(as = "String")]
    pub week_end: NaiveDate,
    /// Number of sales in the window.
    pub total_sales: i64,
    pub total_revenue_cents: i64,
    /// Ranked by revenue, highest first.
    pub products_sold: Vec<ProductSales>,
    /// Products below the low-stock threshold, in list order.
    pub low_stock: Vec<Product>,
}

impl WeeklyReport {
    #[inline]
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }
}

// =============================================================================
// Options
// =============================================================================

/// How sales are bucketed into ranking rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Group by the name frozen on each sale.
    ///
    /// Two products sharing a name merge into one row, and a renamed product
    /// splits into two rows.
    #[default]
    ProductName,
    /// Group by product id. The name of the first sale is kept for display.
    ProductId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub grouping: Grouping,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Builds the weekly report with the default options.
pub fn build_report(products: &[Product], sales: &[Sale], window: &WeekWindow) -> WeeklyReport {
    build_report_with(products, sales, window, &ReportOptions::default())
}

pub fn build_report_with(
    products: &[Product],
    sales: &[Sale],
    window: &WeekWindow,
    options: &ReportOptions,
) -> WeeklyReport {
    let week_sales = sales_in_window(sales, window);

    let mut products_sold = group_sales(&week_sales, options.grouping);
    // sort_by is stable, so equal revenues keep first-seen order
    products_sold.sort_by(|a, b| b.revenue_cents.cmp(&a.revenue_cents));

    let total_revenue: Money = week_sales.iter().map(|s| s.total()).sum();

    WeeklyReport {
        week_start: window.start,
        week_end: window.end,
        total_sales: week_sales.len() as i64,
        total_revenue_cents: total_revenue.cents(),
        products_sold,
        low_stock: low_stock(products),
    }
}

fn group_sales(sales: &[&Sale], grouping: Grouping) -> Vec<ProductSales> {
    let mut rows: Vec<ProductSales> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sale in sales {
        let key = match grouping {
            Grouping::ProductName => sale.product_name.as_str(),
            Grouping::ProductId => sale.product_id.as_str(),
        };

        match index.get(key) {
            Some(&i) => {
                rows[i].quantity = rows[i].quantity.saturating_add(sale.quantity);
                rows[i].revenue_cents = rows[i].revenue_cents.saturating_add(sale.total_cents);
            }
            None => {
                index.insert(key, rows.len());
                rows.push(ProductSales {
                    product_id: sale.product_id.clone(),
                    product_name: sale.product_name.clone(),
                    quantity: sale.quantity,
                    revenue_cents: sale.total_cents,
                });
            }
        }
    }

    rows
}

/// Products whose stock is below the low-stock threshold, in input order.
pub fn low_stock(products: &[Product]) -> Vec<Product> {
    products.iter().filter(|p| p.is_low_stock()).cloned().collect()
}

/// Sales whose local date falls inside the window, in input order.
pub fn sales_in_window<'a>(sales: &'a [Sale], window: &WeekWindow) -> Vec<&'a Sale> {
    sales.iter().filter(|s| window.contains(s.sold_at)).collect()
}

pub fn expenses_in_window<'a>(expenses: &'a [Expense], window: &WeekWindow) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|e| window.contains(e.spent_at))
        .collect()
}

/// Total spent during the window.
pub fn expense_total(expenses: &[Expense], window: &WeekWindow) -> Money {
    expenses_in_window(expenses, window)
        .into_iter()
        .map(|e| e.amount())
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
