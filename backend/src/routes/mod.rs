//! Route definitions for the Retail Stock & Sales Accounting Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Product catalog and stock batches
        .nest("/products", product_routes())
        // Sales
        .nest("/sales", sale_routes())
        // Reporting
        .nest("/reports", report_routes())
}

/// Product catalog and batch ledger routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/:product_id", get(handlers::get_product))
        .route(
            "/:product_id/batches",
            get(handlers::list_batches).post(handlers::add_batch),
        )
}

/// Sales routes
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_sales_history).post(handlers::sell_product),
        )
        .route("/bulk", post(handlers::sell_products))
}

/// Reporting routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/profit-summary", get(handlers::get_profit_summary))
        .route("/sales/export", get(handlers::export_sales))
}
