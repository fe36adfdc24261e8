//! Sales accounting models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnitType;

/// Immutable record of one product sold within a sale
///
/// Append-only history: records survive later batch mutation and are never
/// updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    pub id: Uuid,
    pub product_id: Uuid,
    pub unit_type: UnitType,
    pub quantity: i64,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    pub currency: String,
    pub sale_date: DateTime<Utc>,
}
