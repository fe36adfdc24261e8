//! Product catalog service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{Product, ProductCategory, ProductWithUnits, UnitMeasurement, UnitType};
use shared::validation;

use crate::error::{AppError, AppResult};

/// Product catalog service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating a product with its unit measurements
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub product_name: String,
    pub cost_price: Decimal,
    pub category: ProductCategory,
    pub unit_measurements: Vec<UnitMeasurementInput>,
}

/// One unit measurement of a new product
#[derive(Debug, Deserialize)]
pub struct UnitMeasurementInput {
    pub unit_type: UnitType,
    pub selling_price: Decimal,
    pub quantity: Option<i64>,
}

/// Row mapping for products
#[derive(Debug, FromRow)]
struct ProductRowFull {
    id: Uuid,
    product_name: String,
    category: String,
    cost_price: Decimal,
    total_quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row mapping for unit_measurements
#[derive(Debug, FromRow)]
struct UnitRow {
    id: Uuid,
    product_id: Uuid,
    unit_type: String,
    selling_price: Decimal,
    quantity: Option<i64>,
}

fn to_product(row: ProductRowFull) -> AppResult<Product> {
    let category = ProductCategory::from_str(&row.category)
        .ok_or_else(|| AppError::Internal(format!("Unknown product category: {}", row.category)))?;

    Ok(Product {
        id: row.id,
        product_name: row.product_name,
        category,
        cost_price: row.cost_price,
        total_quantity: row.total_quantity,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn to_unit(row: UnitRow) -> AppResult<UnitMeasurement> {
    let unit_type = UnitType::from_str(&row.unit_type)
        .ok_or_else(|| AppError::Internal(format!("Unknown unit type: {}", row.unit_type)))?;

    Ok(UnitMeasurement {
        id: row.id,
        product_id: row.product_id,
        unit_type,
        selling_price: row.selling_price,
        quantity: row.quantity,
    })
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product together with its unit measurements
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<ProductWithUnits> {
        validation::validate_product_name(&input.product_name).map_err(|msg| {
            AppError::Validation {
                field: "product_name".to_string(),
                message: msg.to_string(),
            }
        })?;
        validation::validate_price(input.cost_price).map_err(|msg| AppError::Validation {
            field: "cost_price".to_string(),
            message: msg.to_string(),
        })?;

        if input.unit_measurements.is_empty() {
            return Err(AppError::Validation {
                field: "unit_measurements".to_string(),
                message: "At least one unit measurement is required".to_string(),
            });
        }

        let unit_types: Vec<UnitType> = input
            .unit_measurements
            .iter()
            .map(|u| u.unit_type)
            .collect();
        if let Some(duplicate) = validation::find_duplicate_unit(&unit_types) {
            return Err(AppError::DuplicateEntry(format!(
                "unit_type {}",
                duplicate.as_str()
            )));
        }

        for unit in &input.unit_measurements {
            validation::validate_price(unit.selling_price).map_err(|msg| {
                AppError::Validation {
                    field: "selling_price".to_string(),
                    message: msg.to_string(),
                }
            })?;
            if let Some(quantity) = unit.quantity {
                if quantity < 0 {
                    return Err(AppError::Validation {
                        field: "quantity".to_string(),
                        message: "Unit quantity cannot be negative".to_string(),
                    });
                }
            }
        }

        // Start transaction
        let mut tx = self.db.begin().await?;

        let product_row = sqlx::query_as::<_, ProductRowFull>(
            r#"
            INSERT INTO products (product_name, category, cost_price)
            VALUES ($1, $2, $3)
            RETURNING id, product_name, category, cost_price, total_quantity,
                      created_at, updated_at
            "#,
        )
        .bind(input.product_name.trim())
        .bind(input.category.as_str())
        .bind(input.cost_price)
        .fetch_one(&mut *tx)
        .await?;

        let mut units = Vec::with_capacity(input.unit_measurements.len());
        for unit in &input.unit_measurements {
            let unit_row = sqlx::query_as::<_, UnitRow>(
                r#"
                INSERT INTO unit_measurements (product_id, unit_type, selling_price, quantity)
                VALUES ($1, $2, $3, $4)
                RETURNING id, product_id, unit_type, selling_price, quantity
                "#,
            )
            .bind(product_row.id)
            .bind(unit.unit_type.as_str())
            .bind(unit.selling_price)
            .bind(unit.quantity)
            .fetch_one(&mut *tx)
            .await?;

            units.push(to_unit(unit_row)?);
        }

        tx.commit().await?;

        Ok(ProductWithUnits {
            product: to_product(product_row)?,
            unit_measurements: units,
        })
    }

    /// Get a product with its unit measurements
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<ProductWithUnits> {
        let product_row = sqlx::query_as::<_, ProductRowFull>(
            r#"
            SELECT id, product_name, category, cost_price, total_quantity,
                   created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let units = self.units_for(product_id).await?;

        Ok(ProductWithUnits {
            product: to_product(product_row)?,
            unit_measurements: units,
        })
    }

    /// List all products with their unit measurements, newest first
    pub async fn list_products(&self) -> AppResult<Vec<ProductWithUnits>> {
        let product_rows = sqlx::query_as::<_, ProductRowFull>(
            r#"
            SELECT id, product_name, category, cost_price, total_quantity,
                   created_at, updated_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut products = Vec::with_capacity(product_rows.len());
        for row in product_rows {
            let units = self.units_for(row.id).await?;
            products.push(ProductWithUnits {
                product: to_product(row)?,
                unit_measurements: units,
            });
        }

        Ok(products)
    }

    async fn units_for(&self, product_id: Uuid) -> AppResult<Vec<UnitMeasurement>> {
        let unit_rows = sqlx::query_as::<_, UnitRow>(
            r#"
            SELECT id, product_id, unit_type, selling_price, quantity
            FROM unit_measurements
            WHERE product_id = $1
            ORDER BY unit_type
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        unit_rows.into_iter().map(to_unit).collect()
    }
}
