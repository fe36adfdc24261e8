//! Shared types and models for the Retail Stock & Sales Accounting Platform
//!
//! This crate contains types shared between the backend and other components
//! of the system, plus the pure (database-free) FIFO depletion planner.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
