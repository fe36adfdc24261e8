//! Reporting service for sales analytics and data export

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::AppResult;

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// Aggregate profit figures over a period
#[derive(Debug, Serialize)]
pub struct ProfitSummary {
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
    pub record_count: i64,
}

/// Report filter parameters
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Sales record row for CSV export
#[derive(Debug, Serialize, FromRow)]
pub struct SalesExportRow {
    pub product_name: String,
    pub unit_type: String,
    pub quantity: i64,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    pub currency: String,
    pub sale_date: DateTime<Utc>,
}

/// Row for the profit summary query
#[derive(Debug, FromRow)]
struct SummaryRow {
    total_revenue: Decimal,
    total_cost: Decimal,
    total_profit: Decimal,
    record_count: i64,
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Aggregate revenue, cost and profit across sales records
    pub async fn get_profit_summary(&self, filter: &ReportFilter) -> AppResult<ProfitSummary> {
        let start = filter
            .start_date
            .unwrap_or(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        let end = filter
            .end_date
            .unwrap_or(NaiveDate::from_ymd_opt(2100, 12, 31).unwrap());

        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT COALESCE(SUM(revenue), 0) as total_revenue,
                   COALESCE(SUM(cost), 0) as total_cost,
                   COALESCE(SUM(profit), 0) as total_profit,
                   COUNT(*) as record_count
            FROM sales_records
            WHERE sale_date::date BETWEEN $1 AND $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await?;

        Ok(ProfitSummary {
            total_revenue: row.total_revenue,
            total_cost: row.total_cost,
            total_profit: row.total_profit,
            record_count: row.record_count,
        })
    }

    /// Fetch sales history rows for export, newest first
    pub async fn get_sales_export(&self, filter: &ReportFilter) -> AppResult<Vec<SalesExportRow>> {
        let start = filter
            .start_date
            .unwrap_or(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        let end = filter
            .end_date
            .unwrap_or(NaiveDate::from_ymd_opt(2100, 12, 31).unwrap());

        let rows = sqlx::query_as::<_, SalesExportRow>(
            r#"
            SELECT p.product_name, sr.unit_type, sr.quantity,
                   sr.revenue, sr.cost, sr.profit, sr.currency, sr.sale_date
            FROM sales_records sr
            JOIN products p ON p.id = sr.product_id
            WHERE sr.sale_date::date BETWEEN $1 AND $2
            ORDER BY sr.sale_date DESC, sr.id DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
