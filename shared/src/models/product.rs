//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product categories carried by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Drugs,
    Cosmetics,
    Food,
    Clothing,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Drugs => "drugs",
            ProductCategory::Cosmetics => "cosmetics",
            ProductCategory::Food => "food",
            ProductCategory::Clothing => "clothing",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "drugs" => Some(ProductCategory::Drugs),
            "cosmetics" => Some(ProductCategory::Cosmetics),
            "food" => Some(ProductCategory::Food),
            "clothing" => Some(ProductCategory::Clothing),
            _ => None,
        }
    }
}

/// Sellable packaging units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Piece,
    Kg,
    Carton,
    Bag,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Piece => "piece",
            UnitType::Kg => "kg",
            UnitType::Carton => "carton",
            UnitType::Bag => "bag",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "piece" => Some(UnitType::Piece),
            "kg" => Some(UnitType::Kg),
            "carton" => Some(UnitType::Carton),
            "bag" => Some(UnitType::Bag),
            _ => None,
        }
    }
}

/// A catalogued product
///
/// `total_quantity` is a derived aggregate: it always equals the sum of the
/// product's current batch quantities. The batch ledger is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub product_name: String,
    pub category: ProductCategory,
    /// Reference acquisition price captured at catalogue time
    pub cost_price: Decimal,
    pub total_quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A sellable unit of a product with its own selling price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitMeasurement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub unit_type: UnitType,
    pub selling_price: Decimal,
    /// Optional stock count expressed in this unit
    pub quantity: Option<i64>,
}

/// Product together with its configured unit measurements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithUnits {
    #[serde(flatten)]
    pub product: Product,
    pub unit_measurements: Vec<UnitMeasurement>,
}
