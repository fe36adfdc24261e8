//! Database models for the Retail Stock & Sales Accounting Platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
