//! Product batch models and the FIFO depletion planner

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A discrete lot of stock with its own acquisition cost
///
/// Batches are consumed oldest-first when stock is sold. A batch whose
/// quantity reaches zero is deleted, never stored at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductBatch {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Monotonic ordinal assigned at insertion; defines FIFO order
    pub seq: i64,
    pub quantity: i64,
    pub cost_price: Decimal,
    pub added_on: DateTime<Utc>,
}

/// A batch as seen by the depletion planner: identity, units remaining
/// and per-unit acquisition cost, already in FIFO order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLot {
    pub id: Uuid,
    pub quantity: i64,
    pub cost_price: Decimal,
}

/// Consumption of a single batch within a depletion plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConsumption {
    pub batch_id: Uuid,
    pub consumed: i64,
    pub cost_price: Decimal,
    /// The batch is fully consumed and must be deleted
    pub exhausted: bool,
}

/// Outcome of planning a FIFO depletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepletionPlan {
    pub consumed: Vec<BatchConsumption>,
    pub units_sold: i64,
    pub total_cost: Decimal,
    /// Requested units that could not be satisfied from the ledger
    pub shortfall: i64,
}

impl DepletionPlan {
    /// An empty plan: nothing consumed, the full request outstanding
    pub fn empty(requested: i64) -> Self {
        Self {
            consumed: Vec::new(),
            units_sold: 0,
            total_cost: Decimal::ZERO,
            shortfall: requested.max(0),
        }
    }
}

/// Plan the FIFO consumption of `requested` units against `batches`.
///
/// Batches must already be in FIFO order (oldest first). For each batch the
/// planner takes `min(batch.quantity, remaining)` units and accumulates
/// `taken * cost_price` into the total cost as exact decimals. Planning
/// never fails: a zero request or an empty ledger yields an empty plan, and
/// an oversized request is answered with whatever stock exists plus the
/// shortfall. Treating zero units sold as a failure is the caller's call.
pub fn plan_depletion(batches: &[BatchLot], requested: i64) -> DepletionPlan {
    let requested = requested.max(0);
    let mut remaining = requested;
    let mut consumed = Vec::new();
    let mut total_cost = Decimal::ZERO;

    for batch in batches {
        if remaining == 0 {
            break;
        }
        let take = batch.quantity.min(remaining);
        if take == 0 {
            continue;
        }
        total_cost += Decimal::from(take) * batch.cost_price;
        consumed.push(BatchConsumption {
            batch_id: batch.id,
            consumed: take,
            cost_price: batch.cost_price,
            exhausted: take == batch.quantity,
        });
        remaining -= take;
    }

    DepletionPlan {
        consumed,
        units_sold: requested - remaining,
        total_cost,
        shortfall: remaining,
    }
}
