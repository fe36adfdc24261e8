//! Sale service: FIFO depletion, profit accounting and the sale transaction

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::{plan_depletion, BatchLot, SalesRecord, UnitType};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation;

use crate::error::{AppError, AppResult};
use crate::services::batch::recompute_total_quantity;

/// Currency recorded on sales
const DEFAULT_CURRENCY: &str = "NGN";

/// Sale service for selling stock and reading sales history
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
}

/// One line item of a sell request
#[derive(Debug, Clone, Deserialize)]
pub struct SellRequestItem {
    pub product_id: Uuid,
    pub unit_type: UnitType,
    pub quantity: i64,
    pub selling_price: Decimal,
}

/// Multi-item sell request
#[derive(Debug, Deserialize)]
pub struct SellManyInput {
    pub products: Vec<SellRequestItem>,
}

/// Outcome of selling one product
#[derive(Debug, Clone, Serialize)]
pub struct SaleLineOutcome {
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_type: UnitType,
    pub quantity_requested: i64,
    pub units_sold: i64,
    pub shortfall: i64,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

/// Totals across a multi-item sale
#[derive(Debug, Clone, Serialize)]
pub struct SaleTotals {
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

/// Result of an atomic multi-item sale
#[derive(Debug, Serialize)]
pub struct SaleSummary {
    pub lines: Vec<SaleLineOutcome>,
    pub totals: SaleTotals,
}

/// Sales record joined with its product name for history listings
#[derive(Debug, Clone, Serialize)]
pub struct SalesRecordWithProduct {
    #[serde(flatten)]
    pub record: SalesRecord,
    pub product_name: String,
}

/// Row for the sales history query
#[derive(Debug, FromRow)]
struct HistoryRow {
    id: Uuid,
    product_id: Uuid,
    product_name: String,
    unit_type: String,
    quantity: i64,
    revenue: Decimal,
    cost: Decimal,
    profit: Decimal,
    currency: String,
    sale_date: DateTime<Utc>,
}

fn to_record(row: HistoryRow) -> AppResult<SalesRecordWithProduct> {
    let unit_type = UnitType::from_str(&row.unit_type)
        .ok_or_else(|| AppError::Internal(format!("Unknown unit type: {}", row.unit_type)))?;

    Ok(SalesRecordWithProduct {
        record: SalesRecord {
            id: row.id,
            product_id: row.product_id,
            unit_type,
            quantity: row.quantity,
            revenue: row.revenue,
            cost: row.cost,
            profit: row.profit,
            currency: row.currency,
            sale_date: row.sale_date,
        },
        product_name: row.product_name,
    })
}

/// Row for product lookup during a sale
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    product_name: String,
}

/// Row for batch lots read under lock
#[derive(Debug, FromRow)]
struct LotRow {
    id: Uuid,
    quantity: i64,
    cost_price: Decimal,
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Sell a single product
    ///
    /// Partial fulfillment is allowed: when stock covers only part of the
    /// request, the available units are sold and the shortfall reported.
    /// The sale fails with `InsufficientStock` only when nothing can be sold.
    pub async fn sell_single(&self, item: SellRequestItem) -> AppResult<SaleLineOutcome> {
        let mut tx = self.db.begin().await?;

        let outcome = sell_item(&mut tx, &item).await?;

        tx.commit().await?;

        Ok(outcome)
    }

    /// Sell several products in one all-or-nothing transaction
    ///
    /// Any line-item failure rolls back every mutation from every line:
    /// batch updates and deletions, sales records, and the stock
    /// projections. The error reports which item failed and why.
    pub async fn sell_many(&self, input: SellManyInput) -> AppResult<SaleSummary> {
        if input.products.is_empty() {
            return Err(AppError::ValidationError(
                "Sale must contain at least one item".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let mut lines = Vec::with_capacity(input.products.len());
        let mut totals = SaleTotals {
            revenue: Decimal::ZERO,
            cost: Decimal::ZERO,
            profit: Decimal::ZERO,
        };

        for (index, item) in input.products.iter().enumerate() {
            // Returning the error drops the transaction and rolls back the
            // mutations already made for earlier lines.
            let outcome = sell_item(&mut tx, item)
                .await
                .map_err(|err| abort_sale(index, err))?;

            totals.revenue += outcome.revenue;
            totals.cost += outcome.cost;
            totals.profit += outcome.profit;
            lines.push(outcome);
        }

        tx.commit().await?;

        Ok(SaleSummary { lines, totals })
    }

    /// List sales history, newest first
    pub async fn list_sales(
        &self,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<SalesRecordWithProduct>> {
        let total_items = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sales_records")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT sr.id, sr.product_id, p.product_name, sr.unit_type, sr.quantity,
                   sr.revenue, sr.cost, sr.profit, sr.currency, sr.sale_date
            FROM sales_records sr
            JOIN products p ON p.id = sr.product_id
            ORDER BY sr.sale_date DESC, sr.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(pagination.per_page))
        .bind(pagination.offset() as i64)
        .fetch_all(&self.db)
        .await?;

        let records = rows
            .into_iter()
            .map(to_record)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse {
            data: records,
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }
}

/// Sell one line item inside the caller's transaction
///
/// The product's batch rows are read `FOR UPDATE`: concurrent sells on the
/// same product serialize on the row locks and cannot double-consume a batch.
async fn sell_item(
    tx: &mut Transaction<'_, Postgres>,
    item: &SellRequestItem,
) -> AppResult<SaleLineOutcome> {
    validation::validate_quantity(item.quantity).map_err(|msg| AppError::Validation {
        field: "quantity".to_string(),
        message: msg.to_string(),
    })?;
    validation::validate_price(item.selling_price).map_err(|msg| AppError::Validation {
        field: "selling_price".to_string(),
        message: msg.to_string(),
    })?;

    let product =
        sqlx::query_as::<_, ProductRow>("SELECT id, product_name FROM products WHERE id = $1")
            .bind(item.product_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    let unit_registered = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM unit_measurements WHERE product_id = $1 AND unit_type = $2)",
    )
    .bind(item.product_id)
    .bind(item.unit_type.as_str())
    .fetch_one(&mut **tx)
    .await?;

    if !unit_registered {
        return Err(AppError::InvalidUnit {
            product: product.product_name,
            unit_type: item.unit_type.as_str().to_string(),
        });
    }

    // Oldest first; seq is the collision-free FIFO ordinal
    let lots = sqlx::query_as::<_, LotRow>(
        r#"
        SELECT id, quantity, cost_price
        FROM product_batches
        WHERE product_id = $1
        ORDER BY seq ASC
        FOR UPDATE
        "#,
    )
    .bind(item.product_id)
    .fetch_all(&mut **tx)
    .await?;

    let lots: Vec<BatchLot> = lots
        .into_iter()
        .map(|lot| BatchLot {
            id: lot.id,
            quantity: lot.quantity,
            cost_price: lot.cost_price,
        })
        .collect();

    let plan = plan_depletion(&lots, item.quantity);

    if plan.units_sold == 0 {
        return Err(AppError::InsufficientStock(format!(
            "No stock available for {}",
            product.product_name
        )));
    }

    // Apply the plan: exhausted lots are deleted, never stored at zero
    for consumption in &plan.consumed {
        if consumption.exhausted {
            sqlx::query("DELETE FROM product_batches WHERE id = $1")
                .bind(consumption.batch_id)
                .execute(&mut **tx)
                .await?;
        } else {
            sqlx::query("UPDATE product_batches SET quantity = quantity - $1 WHERE id = $2")
                .bind(consumption.consumed)
                .bind(consumption.batch_id)
                .execute(&mut **tx)
                .await?;
        }
    }

    let revenue = Decimal::from(plan.units_sold) * item.selling_price;
    let cost = plan.total_cost;
    let profit = revenue - cost;

    sqlx::query(
        r#"
        INSERT INTO sales_records (product_id, unit_type, quantity, revenue, cost, profit, currency)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(item.product_id)
    .bind(item.unit_type.as_str())
    .bind(plan.units_sold)
    .bind(revenue)
    .bind(cost)
    .bind(profit)
    .bind(DEFAULT_CURRENCY)
    .execute(&mut **tx)
    .await?;

    recompute_total_quantity(tx, item.product_id).await?;

    Ok(SaleLineOutcome {
        product_id: product.id,
        product_name: product.product_name,
        unit_type: item.unit_type,
        quantity_requested: item.quantity,
        units_sold: plan.units_sold,
        shortfall: plan.shortfall,
        revenue,
        cost,
        profit,
    })
}

/// Map a per-line failure to the transaction-level abort error
fn abort_sale(item_index: usize, err: AppError) -> AppError {
    let code = match &err {
        AppError::NotFound(_) => "NOT_FOUND",
        AppError::InvalidUnit { .. } => "INVALID_UNIT",
        AppError::InsufficientStock(_) => "INSUFFICIENT_STOCK",
        AppError::Validation { .. } | AppError::ValidationError(_) => "VALIDATION_ERROR",
        AppError::DatabaseError(_) => "DATABASE_ERROR",
        _ => "INTERNAL_ERROR",
    };

    AppError::TransactionAborted {
        item_index,
        code: code.to_string(),
        message: err.to_string(),
    }
}
