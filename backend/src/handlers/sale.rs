//! HTTP handlers for sales endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use shared::types::{PaginatedResponse, Pagination};

use crate::error::AppResult;
use crate::services::sale::{
    SaleLineOutcome, SaleService, SaleSummary, SalesRecordWithProduct, SellManyInput,
    SellRequestItem,
};
use crate::AppState;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Sell a single product
pub async fn sell_product(
    State(state): State<AppState>,
    Json(item): Json<SellRequestItem>,
) -> AppResult<Json<SaleLineOutcome>> {
    let service = SaleService::new(state.db);
    let outcome = service.sell_single(item).await?;
    Ok(Json(outcome))
}

/// Sell several products in one atomic transaction
pub async fn sell_products(
    State(state): State<AppState>,
    Json(input): Json<SellManyInput>,
) -> AppResult<Json<SaleSummary>> {
    let service = SaleService::new(state.db);
    let summary = service.sell_many(input).await?;
    Ok(Json(summary))
}

/// List sales history, newest first
pub async fn list_sales_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<PaginatedResponse<SalesRecordWithProduct>>> {
    let pagination = Pagination {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };

    let service = SaleService::new(state.db);
    let history = service.list_sales(pagination).await?;
    Ok(Json(history))
}
