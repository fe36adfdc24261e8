//! Validation utilities for the Retail Stock & Sales Accounting Platform

use rust_decimal::Decimal;

use crate::models::UnitType;

/// Validate that a stock or sale quantity is at least one unit
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity < 1 {
        return Err("Quantity must be at least 1");
    }
    Ok(())
}

/// Validate that a money amount is non-negative with at most 2 decimal places
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    if price.normalize().scale() > 2 {
        return Err("Price must have at most 2 decimal places");
    }
    Ok(())
}

/// Validate a product display name
pub fn validate_product_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Product name cannot be empty");
    }
    if trimmed.len() > 250 {
        return Err("Product name must be at most 250 characters");
    }
    Ok(())
}

/// Find the first unit type that appears more than once
pub fn find_duplicate_unit(units: &[UnitType]) -> Option<UnitType> {
    for (i, unit) in units.iter().enumerate() {
        if units[..i].contains(unit) {
            return Some(*unit);
        }
    }
    None
}
