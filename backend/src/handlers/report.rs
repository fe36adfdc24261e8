//! Reporting handlers for sales analytics and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::report::{ProfitSummary, ReportFilter, ReportService};
use crate::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub format: Option<String>, // "csv" or "json"
}

impl ReportQuery {
    fn filter(&self) -> ReportFilter {
        ReportFilter {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Get aggregate revenue, cost and profit figures
pub async fn get_profit_summary(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<ProfitSummary>> {
    let service = ReportService::new(state.db);
    let summary = service.get_profit_summary(&query.filter()).await?;
    Ok(Json(summary))
}

/// Export sales history (CSV by default, JSON on request)
pub async fn export_sales(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<axum::response::Response> {
    let service = ReportService::new(state.db);
    let data = service.get_sales_export(&query.filter()).await?;

    if query.format.as_deref() == Some("json") {
        return Ok(Json(data).into_response());
    }

    let csv = ReportService::export_to_csv(&data)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sales_history.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
