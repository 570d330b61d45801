//! Weekly report endpoints.
//!
//! All of them take `?offset=N` (weeks relative to the current one, default
//! 0) and an optional `?date=YYYY-MM-DD` that replaces today as the
//! reference day. Week and day boundaries use the configured UTC offset.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use stockbook_core::export::{self, TabularDocument, WeeklySummary};
use stockbook_core::report::{build_report_with, expense_total};
use stockbook_core::week::{week_range_at, week_range_in};
use stockbook_core::{WeekWindow, WeeklyReport};

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl ReportQuery {
    /// Offsets that push the week past chrono's calendar are a 400.
    fn window(&self, state: &AppState) -> ApiResult<WeekWindow> {
        let utc_offset = state.config.utc_offset();
        let window = match self.date {
            Some(date) => week_range_in(date, self.offset, utc_offset),
            None => week_range_at(Utc::now(), self.offset, utc_offset),
        }?;
        debug!(start = %window.start, end = %window.end, offset = self.offset, "Report window");
        Ok(window)
    }
}

async fn load_report(state: &AppState, window: &WeekWindow) -> ApiResult<WeeklyReport> {
    let products = state.store.list_products().await?;
    let sales = state.store.list_sales().await?;
    Ok(build_report_with(
        &products,
        &sales,
        window,
        &state.config.report_options(),
    ))
}

/// # GET /api/reports/weekly
pub async fn weekly_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<WeeklyReport>> {
    let window = query.window(&state)?;
    Ok(Json(load_report(&state, &window).await?))
}

/// # GET /api/reports/weekly/share
/// Plain text for pasting into a message.
pub async fn share(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<String> {
    let window = query.window(&state)?;
    let report = load_report(&state, &window).await?;
    Ok(export::share_text(&report, &state.config.currency()))
}

/// # GET /api/reports/weekly/summary
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<WeeklySummary>> {
    let window = query.window(&state)?;
    let report = load_report(&state, &window).await?;
    let expenses = state.store.list_expenses().await?;

    Ok(Json(WeeklySummary::from_report(
        &report,
        expense_total(&expenses, &window),
    )))
}

/// # GET /api/reports/weekly/sales-document
pub async fn sales_document(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<TabularDocument>> {
    let window = query.window(&state)?;
    let sales = state.store.list_sales().await?;
    let expenses = state.store.list_expenses().await?;

    Ok(Json(export::weekly_sales_document(
        &window,
        &sales,
        &expenses,
        &state.config.currency(),
    )))
}

/// # GET /api/reports/weekly/stock-document
pub async fn stock_document(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<TabularDocument>> {
    let window = query.window(&state)?;
    let products = state.store.list_products().await?;

    Ok(Json(export::stock_document(&window, &products)))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::routes::test_support::TestApp;

    /// Week of Sunday 2026-10-18 to Saturday 2026-10-24.
    const WEEK: &str = "date=2026-10-21";

    async fn seeded() -> TestApp {
        let app = TestApp::new().await;

        let products = json!([
            { "id": "p1", "name": "Widget", "quantity": 5, "priceCents": 1000,
              "lastUpdated": "2026-10-18T08:00:00Z" },
            { "id": "p2", "name": "Gadget", "quantity": 40, "priceCents": 500,
              "lastUpdated": "2026-10-18T08:00:00Z" }
        ]);
        let sales = json!([
            { "id": "s0", "productId": "p2", "productName": "Gadget", "quantity": 9,
              "totalCents": 4500, "soldAt": "2026-10-10T10:00:00Z" },
            { "id": "s1", "productId": "p1", "productName": "Widget", "quantity": 2,
              "totalCents": 2000, "soldAt": "2026-10-19T10:00:00Z" },
            { "id": "s2", "productId": "p2", "productName": "Gadget", "quantity": 1,
              "totalCents": 500, "soldAt": "2026-10-20T10:00:00Z" }
        ]);
        let expenses = json!([
            { "id": "e1", "description": "Fuel", "amountCents": 300,
              "spentAt": "2026-10-20T09:00:00Z" }
        ]);

        for (uri, body) in [
            ("/api/products", products),
            ("/api/sales", sales),
            ("/api/expenses", expenses),
        ] {
            let (status, _) = app.send(Method::PUT, uri, Some(body)).await;
            assert_eq!(status, StatusCode::OK);
        }
        app
    }

    #[tokio::test]
    async fn test_weekly_report() {
        let app = seeded().await;
        let (status, report) = app
            .send(Method::GET, &format!("/api/reports/weekly?{WEEK}"), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["weekStart"], "2026-10-18");
        assert_eq!(report["weekEnd"], "2026-10-24");
        assert_eq!(report["totalSales"], 2);
        assert_eq!(report["totalRevenueCents"], 2500);
        assert_eq!(report["productsSold"][0]["productName"], "Widget");
        assert_eq!(report["productsSold"][1]["productName"], "Gadget");
        assert_eq!(report["lowStock"].as_array().unwrap().len(), 1);
        assert_eq!(report["lowStock"][0]["name"], "Widget");
    }

    #[tokio::test]
    async fn test_previous_week_offset() {
        let app = seeded().await;
        let (_, report) = app
            .send(Method::GET, &format!("/api/reports/weekly?offset=-1&{WEEK}"), None)
            .await;

        assert_eq!(report["weekStart"], "2026-10-11");
        assert_eq!(report["totalSales"], 0);

        let (_, report) = app
            .send(Method::GET, &format!("/api/reports/weekly?offset=-2&{WEEK}"), None)
            .await;
        assert_eq!(report["weekStart"], "2026-10-04");
        assert_eq!(report["totalRevenueCents"], 4500);
    }

    #[tokio::test]
    async fn test_share_text() {
        let app = seeded().await;
        let (status, bytes) = app
            .send_raw(Method::GET, &format!("/api/reports/weekly/share?{WEEK}"), None)
            .await;
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(text.starts_with("Weekly Sales Report\nOct 18, 2026 - Oct 24, 2026"));
        assert!(text.contains("Total Revenue: K 25.00"));
        assert!(text.contains("1. Widget - 2 units - K 20.00"));
        assert!(text.ends_with("- Widget: 5 units remaining"));
    }

    #[tokio::test]
    async fn test_summary_nets_expenses() {
        let app = seeded().await;
        let (_, summary) = app
            .send(Method::GET, &format!("/api/reports/weekly/summary?{WEEK}"), None)
            .await;

        assert_eq!(summary["totalRevenueCents"], 2500);
        assert_eq!(summary["totalExpensesCents"], 300);
        assert_eq!(summary["netRevenueCents"], 2200);
        assert_eq!(summary["lowStock"][0]["productId"], "p1");
    }

    #[tokio::test]
    async fn test_documents() {
        let app = seeded().await;

        let (status, doc) = app
            .send(Method::GET, &format!("/api/reports/weekly/sales-document?{WEEK}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["fileName"], "weekly-sales-report-2026-10-18.pdf");
        let headings: Vec<&Value> = doc["blocks"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|b| b["type"] == "heading")
            .map(|b| &b["text"])
            .collect();
        assert!(headings.contains(&&json!("Monday, 19/10/2026")));
        assert!(headings.contains(&&json!("Tuesday, 20/10/2026")));

        let (status, doc) = app
            .send(Method::GET, &format!("/api/reports/weekly/stock-document?{WEEK}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["fileName"], "weekly-stock-report-2026-10-18.pdf");
    }

    #[tokio::test]
    async fn test_offset_beyond_calendar_is_rejected() {
        let app = seeded().await;

        for uri in [
            "/api/reports/weekly?offset=1000000000",
            "/api/reports/weekly/share?offset=-1000000000",
            "/api/reports/weekly/summary?offset=9223372036854775807",
            "/api/reports/weekly?date=2026-10-21&offset=-9223372036854775808",
        ] {
            let (status, body) = app.send(Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["code"], "VALIDATION_ERROR", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_bad_offset_is_rejected() {
        let app = seeded().await;
        let (status, _) = app
            .send(Method::GET, "/api/reports/weekly?offset=soon", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
