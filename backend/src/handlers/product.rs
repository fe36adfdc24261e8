//! HTTP handlers for product catalog and stock batch endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{ProductBatch, ProductWithUnits};
use crate::services::batch::{AddBatchInput, AddBatchSummary, BatchService};
use crate::services::product::{CreateProductInput, ProductService};
use crate::AppState;

/// Create a product with its unit measurements
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<ProductWithUnits>> {
    let service = ProductService::new(state.db);
    let product = service.create_product(input).await?;
    Ok(Json(product))
}

/// List all products
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductWithUnits>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Get a product with its unit measurements
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductWithUnits>> {
    let service = ProductService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

/// Add a stock batch to a product
pub async fn add_batch(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<AddBatchInput>,
) -> AppResult<Json<AddBatchSummary>> {
    let service = BatchService::new(state.db);
    let batch = service.add_batch(product_id, input).await?;
    Ok(Json(AddBatchSummary {
        quantity: batch.quantity,
        cost_price: batch.cost_price,
    }))
}

/// List a product's batches in FIFO order
pub async fn list_batches(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProductBatch>>> {
    let service = BatchService::new(state.db);
    let batches = service.list_batches(product_id).await?;
    Ok(Json(batches))
}
