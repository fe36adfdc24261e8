//! Batch ledger service: stock lots, FIFO ordering and the stock projection

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::ProductBatch;
use shared::validation;

use crate::error::{AppError, AppResult};

/// Batch ledger service for stock additions and FIFO-ordered reads
#[derive(Clone)]
pub struct BatchService {
    db: PgPool,
}

/// Input for adding a stock batch
#[derive(Debug, Deserialize)]
pub struct AddBatchInput {
    pub quantity: i64,
    pub cost_price: Decimal,
}

/// Summary returned after adding a batch
#[derive(Debug, Serialize)]
pub struct AddBatchSummary {
    pub quantity: i64,
    pub cost_price: Decimal,
}

/// Row mapping for product_batches
#[derive(Debug, FromRow)]
struct BatchRow {
    id: Uuid,
    product_id: Uuid,
    seq: i64,
    quantity: i64,
    cost_price: Decimal,
    added_on: DateTime<Utc>,
}

impl From<BatchRow> for ProductBatch {
    fn from(row: BatchRow) -> Self {
        ProductBatch {
            id: row.id,
            product_id: row.product_id,
            seq: row.seq,
            quantity: row.quantity,
            cost_price: row.cost_price,
            added_on: row.added_on,
        }
    }
}

impl BatchService {
    /// Create a new BatchService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Add a batch of stock to a product
    ///
    /// Pure append: a new lot is created even when an existing batch has the
    /// same cost price, preserving FIFO granularity and the audit trail.
    pub async fn add_batch(&self, product_id: Uuid, input: AddBatchInput) -> AppResult<ProductBatch> {
        validation::validate_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;
        validation::validate_price(input.cost_price).map_err(|msg| AppError::Validation {
            field: "cost_price".to_string(),
            message: msg.to_string(),
        })?;

        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        // Start transaction
        let mut tx = self.db.begin().await?;

        let batch = sqlx::query_as::<_, BatchRow>(
            r#"
            INSERT INTO product_batches (product_id, quantity, cost_price)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, seq, quantity, cost_price, added_on
            "#,
        )
        .bind(product_id)
        .bind(input.quantity)
        .bind(input.cost_price)
        .fetch_one(&mut *tx)
        .await?;

        // Keep the derived aggregate in step with the ledger
        recompute_total_quantity(&mut tx, product_id).await?;

        tx.commit().await?;

        Ok(batch.into())
    }

    /// List a product's batches in FIFO order (oldest first)
    pub async fn list_batches(&self, product_id: Uuid) -> AppResult<Vec<ProductBatch>> {
        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let batches = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT id, product_id, seq, quantity, cost_price, added_on
            FROM product_batches
            WHERE product_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(batches.into_iter().map(ProductBatch::from).collect())
    }
}

/// Recompute the owning product's derived `total_quantity` from its batches.
///
/// Runs inside the caller's transaction: the aggregate must never be stale
/// for another reader once the triggering batch mutation commits.
pub(crate) async fn recompute_total_quantity(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE products
        SET total_quantity = COALESCE(
                (SELECT SUM(quantity) FROM product_batches WHERE product_id = $1), 0),
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(product_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
