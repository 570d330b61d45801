//! # Report Export
//!
//! Renders weekly figures into the formats the business hands out:
//!
//! | Output | Function | Consumer |
//! |--------|----------|----------|
//! | Share text | [`share_text`] | Messaging apps, clipboard |
//! | Sales document | [`weekly_sales_document`] | PDF renderer |
//! | Stock document | [`stock_document`] | PDF renderer |
//! | JSON summary | [`WeeklySummary::to_json`] | Archiving, other tools |
//!
//! This module produces document *content* only. Drawing pages, saving files
//! and sharing are done by whoever receives the [`TabularDocument`].
//!
//! ## Sales Document Layout
//! ```text
//! ┌──────────────────────────────────────────────┐  y = 20
//! │ Week 3 Sales (from 18/10/2026 through ...)   │  +15
//! │                                              │
//! │ Sunday, 18/10/2026                           │  +8   ◄─ break first if y > 240
//! │ ┌────┬────────┬──────────┬─────────┐         │
//! │ │ SN │ Items  │ Quantity │ Amount  │         │  +8 per row
//! │ ├────┼────────┼──────────┼─────────┤         │
//! │ │ 1  │ Widget │ 2        │ K 20.00 │         │
//! │ └────┴────────┴──────────┴─────────┘         │  +10
//! │ ...one block per day with sales...           │
//! │                                              │
//! │ Weekly Summary                               │  +10  ◄─ break first if y > 200
//! │ Total Sales / Revenue / Expenses / Net       │
//! └──────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::{CurrencyFormat, Money};
use crate::report::{expenses_in_window, sales_in_window, ProductSales, WeeklyReport};
use crate::types::{Expense, Product, Sale};
use crate::week::WeekWindow;

/// How many ranked products the share text lists.
pub const SHARE_TOP_PRODUCTS: usize = 5;

// =============================================================================
// Share Text
// =============================================================================

/// Plain-text report for messaging apps.
///
/// ```text
/// Weekly Sales Report
/// Oct 18, 2026 - Oct 24, 2026
///
/// Total Sales: 1
/// Total Revenue: K 20.00
///
/// Top Products:
/// 1. Widget - 2 units - K 20.00
///
/// Low Stock Alert:
/// - Widget: 5 units remaining
/// ```
/// The low stock section is left out when nothing is low.
pub fn share_text(report: &WeeklyReport, currency: &CurrencyFormat) -> String {
    let mut lines = vec![
        "Weekly Sales Report".to_string(),
        format!(
            "{} - {}",
            report.week_start.format("%b %-d, %Y"),
            report.week_end.format("%b %-d, %Y")
        ),
        String::new(),
        format!("Total Sales: {}", report.total_sales),
        format!("Total Revenue: {}", currency.format(report.total_revenue())),
        String::new(),
        "Top Products:".to_string(),
    ];

    for (i, p) in report
        .products_sold
        .iter()
        .take(SHARE_TOP_PRODUCTS)
        .enumerate()
    {
        lines.push(format!(
            "{}. {} - {} units - {}",
            i + 1,
            p.product_name,
            p.quantity,
            currency.format(p.revenue())
        ));
    }

    if !report.low_stock.is_empty() {
        lines.push(String::new());
        lines.push("Low Stock Alert:".to_string());
        for p in &report.low_stock {
            lines.push(format!("- {}: {} units remaining", p.name, p.quantity));
        }
    }

    lines.join("\n").trim().to_string()
}

// =============================================================================
// Tabular Document
// =============================================================================

/// A document made of headings, tables and page breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TabularDocument {
    pub title: String,
    /// Suggested file name for the rendered PDF.
    pub file_name: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Heading { text: String },
    Table(Table),
    PageBreak,
}

/// A grid of text cells. An empty `columns` means the table has no header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn with_columns(columns: &[&str]) -> Self {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows drawn, counting the header.
    fn drawn_rows(&self) -> u32 {
        let header = u32::from(!self.columns.is_empty());
        header + self.rows.len() as u32
    }

    fn render_text(&self, out: &mut Vec<String>) {
        let column_count = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.columns.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![0usize; column_count];
        for row in std::iter::once(&self.columns).chain(self.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let render_row = |row: &[String]| {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, &w)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{cell:<w$}")
                })
                .collect();
            cells.join(" | ").trim_end().to_string()
        };

        if !self.columns.is_empty() {
            out.push(render_row(&self.columns));
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push(rule.join("-+-"));
        }
        for row in &self.rows {
            out.push(render_row(row));
        }
    }
}

impl TabularDocument {
    /// Plain-text rendering. Page breaks become form feed lines.
    pub fn render_text(&self) -> String {
        let mut out = vec![self.title.clone(), String::new()];

        for block in &self.blocks {
            match block {
                Block::Heading { text } => out.push(text.clone()),
                Block::Table(table) => {
                    table.render_text(&mut out);
                    out.push(String::new());
                }
                Block::PageBreak => out.push("\u{000C}".to_string()),
            }
        }

        let mut text = out.join("\n").trim_end().to_string();
        text.push('\n');
        text
    }

    /// Number of pages the document spans.
    pub fn page_count(&self) -> usize {
        1 + self
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::PageBreak))
            .count()
    }
}

// =============================================================================
// Page Layout
// =============================================================================

/// Vertical layout units, in the same scale as an A4 page in millimetres.
pub mod layout {
    pub const PAGE_TOP: u32 = 20;
    pub const PAGE_BOTTOM: u32 = 280;
    pub const TITLE_ADVANCE: u32 = 15;
    pub const DAY_HEADING_ADVANCE: u32 = 8;
    pub const SUMMARY_HEADING_ADVANCE: u32 = 10;
    pub const ROW_HEIGHT: u32 = 8;
    pub const TABLE_GAP: u32 = 10;
    /// A day block starting below this line moves to a new page.
    pub const DAY_BREAK_THRESHOLD: u32 = 240;
    /// The summary block starting below this line moves to a new page.
    pub const SUMMARY_BREAK_THRESHOLD: u32 = 200;
}

/// Tracks the vertical cursor while blocks are appended.
struct PageCursor {
    y: u32,
    blocks: Vec<Block>,
}

impl PageCursor {
    fn new() -> Self {
        PageCursor {
            y: layout::PAGE_TOP + layout::TITLE_ADVANCE,
            blocks: Vec::new(),
        }
    }

    fn break_if_below(&mut self, threshold: u32) {
        if self.y > threshold {
            self.blocks.push(Block::PageBreak);
            self.y = layout::PAGE_TOP;
        }
    }

    fn heading(&mut self, text: String, advance: u32) {
        self.blocks.push(Block::Heading { text });
        self.y += advance;
    }

    fn table(&mut self, table: Table) {
        self.y += table.drawn_rows() * layout::ROW_HEIGHT;
        // long tables continue on the next page
        while self.y > layout::PAGE_BOTTOM {
            self.y = layout::PAGE_TOP + (self.y - layout::PAGE_BOTTOM);
        }
        self.y += layout::TABLE_GAP;
        self.blocks.push(Block::Table(table));
    }
}

// =============================================================================
// Sales Document
// =============================================================================

/// Weekly sales document: one table per day with sales, then a summary.
pub fn weekly_sales_document(
    window: &WeekWindow,
    sales: &[Sale],
    expenses: &[Expense],
    currency: &CurrencyFormat,
) -> TabularDocument {
    let week_sales = sales_in_window(sales, window);

    let mut by_day: BTreeMap<NaiveDate, Vec<&Sale>> = BTreeMap::new();
    for sale in &week_sales {
        by_day
            .entry(window.local_date(sale.sold_at))
            .or_default()
            .push(sale);
    }

    let mut cursor = PageCursor::new();

    for (day, day_sales) in by_day {
        cursor.break_if_below(layout::DAY_BREAK_THRESHOLD);
        cursor.heading(
            day.format("%A, %d/%m/%Y").to_string(),
            layout::DAY_HEADING_ADVANCE,
        );

        let mut table = Table::with_columns(&["SN", "Items", "Quantity", "Amount"]);
        for (i, sale) in day_sales.iter().enumerate() {
            table.rows.push(vec![
                (i + 1).to_string(),
                sale.product_name.clone(),
                sale.quantity.to_string(),
                currency.format(sale.total()),
            ]);
        }
        cursor.table(table);
    }

    let revenue: Money = week_sales.iter().map(|s| s.total()).sum();
    let spent: Money = expenses_in_window(expenses, window)
        .into_iter()
        .map(|e| e.amount())
        .sum();

    cursor.break_if_below(layout::SUMMARY_BREAK_THRESHOLD);
    cursor.heading("Weekly Summary".to_string(), layout::SUMMARY_HEADING_ADVANCE);
    cursor.table(Table {
        columns: Vec::new(),
        rows: vec![
            vec!["Total Sales".to_string(), week_sales.len().to_string()],
            vec!["Total Revenue".to_string(), currency.format(revenue)],
            vec!["Total Expenses".to_string(), currency.format(spent)],
            vec!["Net Revenue".to_string(), currency.format(revenue - spent)],
        ],
    });

    TabularDocument {
        title: format!(
            "Week {} Sales (from {} through {})",
            window.week_of_month(),
            window.start.format("%d/%m/%Y"),
            window.end.format("%d/%m/%Y")
        ),
        file_name: sales_document_file_name(window),
        blocks: cursor.blocks,
    }
}

// =============================================================================
// Stock Document
// =============================================================================

/// Stock sheet listing every product and its quantity, in list order.
pub fn stock_document(window: &WeekWindow, products: &[Product]) -> TabularDocument {
    let mut table = Table::with_columns(&["SN", "Items", "Quantity"]);
    for (i, p) in products.iter().enumerate() {
        table
            .rows
            .push(vec![(i + 1).to_string(), p.name.clone(), p.quantity.to_string()]);
    }

    TabularDocument {
        title: format!(
            "Week {} - Stock as at {}",
            window.week_of_month(),
            window.start.format("%A, %-d %B %Y")
        ),
        file_name: stock_document_file_name(window),
        blocks: vec![Block::Table(table)],
    }
}

pub fn sales_document_file_name(window: &WeekWindow) -> String {
    format!("weekly-sales-report-{}.pdf", window.start.format("%Y-%m-%d"))
}

pub fn stock_document_file_name(window: &WeekWindow) -> String {
    format!("weekly-stock-report-{}.pdf", window.start.format("%Y-%m-%d"))
}

// =============================================================================
// JSON Summary
// =============================================================================

/// A product that was low on stock when the summary was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
}

/// Self-contained weekly figures, suitable for archiving as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    #[ts(as = "String")]
    pub week_start: NaiveDate,
    #[ts(as = "String")]
    pub week_end: NaiveDate,
    pub total_sales: i64,
    pub total_revenue_cents: i64,
    pub total_expenses_cents: i64,
    pub net_revenue_cents: i64,
    pub products_sold: Vec<ProductSales>,
    pub low_stock: Vec<LowStockItem>,
}

impl WeeklySummary {
    pub fn from_report(report: &WeeklyReport, expenses_total: Money) -> Self {
        let revenue = report.total_revenue();

        WeeklySummary {
            week_start: report.week_start,
            week_end: report.week_end,
            total_sales: report.total_sales,
            total_revenue_cents: revenue.cents(),
            total_expenses_cents: expenses_total.cents(),
            net_revenue_cents: (revenue - expenses_total).cents(),
            products_sold: report.products_sold.clone(),
            low_stock: report
                .low_stock
                .iter()
                .map(|p| LowStockItem {
                    product_id: p.id.clone(),
                    name: p.name.clone(),
                    quantity: p.quantity,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
