//! Sale accounting tests
//!
//! Tests for the sale path including:
//! - Revenue, cost and profit arithmetic
//! - Partial-fulfillment policy
//! - All-or-nothing multi-item sales

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{plan_depletion, BatchLot};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn lot(quantity: i64, cost: &str) -> BatchLot {
    BatchLot {
        id: Uuid::new_v4(),
        quantity,
        cost_price: dec(cost),
    }
}

// ============================================================================
// Simulation Helpers
// ============================================================================

/// Outcome of selling one product against an in-memory ledger
#[derive(Debug, Clone, PartialEq)]
struct SimulatedSale {
    units_sold: i64,
    shortfall: i64,
    revenue: Decimal,
    cost: Decimal,
    profit: Decimal,
}

/// Sell against a single ledger the way the sale service does: plan the
/// depletion, treat a zero fill as a business failure, otherwise apply the
/// plan and price the outcome.
fn simulate_sale(
    ledger: &mut Vec<BatchLot>,
    quantity: i64,
    selling_price: Decimal,
) -> Result<SimulatedSale, &'static str> {
    if quantity < 1 {
        return Err("Quantity must be at least 1");
    }

    let plan = plan_depletion(ledger, quantity);
    if plan.units_sold == 0 {
        return Err("Insufficient stock");
    }

    for consumption in &plan.consumed {
        if consumption.exhausted {
            ledger.retain(|b| b.id != consumption.batch_id);
        } else if let Some(batch) = ledger.iter_mut().find(|b| b.id == consumption.batch_id) {
            batch.quantity -= consumption.consumed;
        }
    }

    let revenue = Decimal::from(plan.units_sold) * selling_price;
    let cost = plan.total_cost;
    Ok(SimulatedSale {
        units_sold: plan.units_sold,
        shortfall: plan.shortfall,
        revenue,
        cost,
        profit: revenue - cost,
    })
}

/// Sell several items atomically: on any failure the ledgers are left
/// exactly as they were, mirroring the transaction rollback.
fn simulate_sell_many(
    ledgers: &mut HashMap<Uuid, Vec<BatchLot>>,
    items: &[(Uuid, i64, Decimal)],
) -> Result<Vec<SimulatedSale>, (usize, &'static str)> {
    let mut working = ledgers.clone();
    let mut outcomes = Vec::with_capacity(items.len());

    for (index, (product_id, quantity, price)) in items.iter().enumerate() {
        let ledger = working
            .get_mut(product_id)
            .ok_or((index, "Product not found"))?;
        let outcome = simulate_sale(ledger, *quantity, *price).map_err(|e| (index, e))?;
        outcomes.push(outcome);
    }

    *ledgers = working;
    Ok(outcomes)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Worked example: batches [(5 @ 10.00), (3 @ 12.00)], sell 6 @ 20.00
    #[test]
    fn test_profit_on_sale_spanning_batches() {
        let mut ledger = vec![lot(5, "10.00"), lot(3, "12.00")];

        let sale = simulate_sale(&mut ledger, 6, dec("20.00")).unwrap();

        assert_eq!(sale.units_sold, 6);
        assert_eq!(sale.cost, dec("62.00"));
        assert_eq!(sale.revenue, dec("120.00"));
        assert_eq!(sale.profit, dec("58.00"));

        // First batch deleted, second reduced to 2
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].quantity, 2);
    }

    /// Partial fulfillment: available units are sold, shortfall reported
    #[test]
    fn test_partial_fulfillment() {
        let mut ledger = vec![lot(8, "5.00")];

        let sale = simulate_sale(&mut ledger, 100, dec("9.00")).unwrap();

        assert_eq!(sale.units_sold, 8);
        assert_eq!(sale.shortfall, 92);
        assert_eq!(sale.revenue, dec("72.00"));
        assert!(ledger.is_empty());
    }

    /// A sale with nothing available fails and mutates nothing
    #[test]
    fn test_zero_stock_rejected() {
        let mut ledger: Vec<BatchLot> = Vec::new();

        let result = simulate_sale(&mut ledger, 5, dec("9.00"));

        assert!(result.is_err());
        assert!(ledger.is_empty());
    }

    /// Selling at a price below cost yields a negative profit, not an error
    #[test]
    fn test_loss_making_sale() {
        let mut ledger = vec![lot(4, "10.00")];

        let sale = simulate_sale(&mut ledger, 4, dec("8.00")).unwrap();

        assert_eq!(sale.revenue, dec("32.00"));
        assert_eq!(sale.cost, dec("40.00"));
        assert_eq!(sale.profit, dec("-8.00"));
    }

    /// Multi-item sale aggregates totals across lines
    #[test]
    fn test_multi_item_totals() {
        let pencils = Uuid::new_v4();
        let soap = Uuid::new_v4();
        let mut ledgers = HashMap::from([
            (pencils, vec![lot(10, "1.00")]),
            (soap, vec![lot(5, "3.00")]),
        ]);

        let outcomes = simulate_sell_many(
            &mut ledgers,
            &[(pencils, 4, dec("2.50")), (soap, 2, dec("5.00"))],
        )
        .unwrap();

        let revenue: Decimal = outcomes.iter().map(|o| o.revenue).sum();
        let cost: Decimal = outcomes.iter().map(|o| o.cost).sum();
        let profit: Decimal = outcomes.iter().map(|o| o.profit).sum();

        assert_eq!(revenue, dec("20.00"));
        assert_eq!(cost, dec("10.00"));
        assert_eq!(profit, dec("10.00"));
    }

    /// Atomicity: a failing middle item rolls back every line
    #[test]
    fn test_multi_item_failure_rolls_back() {
        let pencils = Uuid::new_v4();
        let soap = Uuid::new_v4();
        let empty = Uuid::new_v4();
        let mut ledgers = HashMap::from([
            (pencils, vec![lot(10, "1.00")]),
            (soap, vec![lot(5, "3.00")]),
            (empty, Vec::new()),
        ]);
        let before = ledgers.clone();

        let result = simulate_sell_many(
            &mut ledgers,
            &[
                (pencils, 4, dec("2.50")),
                (empty, 1, dec("5.00")),
                (soap, 2, dec("5.00")),
            ],
        );

        assert_eq!(result.unwrap_err(), (1, "Insufficient stock"));
        assert_eq!(ledgers, before);
    }

    /// An unknown product aborts the sale with the failing index
    #[test]
    fn test_unknown_product_aborts() {
        let pencils = Uuid::new_v4();
        let mut ledgers = HashMap::from([(pencils, vec![lot(10, "1.00")])]);
        let before = ledgers.clone();

        let result = simulate_sell_many(
            &mut ledgers,
            &[
                (pencils, 2, dec("2.50")),
                (Uuid::new_v4(), 1, dec("1.00")),
            ],
        );

        assert_eq!(result.unwrap_err(), (1, "Product not found"));
        assert_eq!(ledgers, before);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 1000.00
    }

    fn ledger_strategy() -> impl Strategy<Value = Vec<BatchLot>> {
        prop::collection::vec((1i64..=500, price_strategy()), 0..8).prop_map(|lots| {
            lots.into_iter()
                .map(|(quantity, cost_price)| BatchLot {
                    id: Uuid::new_v4(),
                    quantity,
                    cost_price,
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Profit is always revenue minus cost
        #[test]
        fn prop_profit_identity(
            ledger in ledger_strategy(),
            quantity in 1i64..=2000,
            price in price_strategy()
        ) {
            let mut ledger = ledger;

            if let Ok(sale) = simulate_sale(&mut ledger, quantity, price) {
                prop_assert_eq!(sale.profit, sale.revenue - sale.cost);
                prop_assert_eq!(sale.revenue, Decimal::from(sale.units_sold) * price);
            }
        }

        /// A sale never sells more than requested or more than available
        #[test]
        fn prop_units_bounded(
            ledger in ledger_strategy(),
            quantity in 1i64..=2000,
            price in price_strategy()
        ) {
            let available: i64 = ledger.iter().map(|b| b.quantity).sum();
            let mut ledger = ledger;

            if let Ok(sale) = simulate_sale(&mut ledger, quantity, price) {
                prop_assert!(sale.units_sold <= quantity);
                prop_assert!(sale.units_sold <= available);
                prop_assert_eq!(sale.units_sold + sale.shortfall, quantity);
            }
        }

        /// Stock on hand decreases by exactly the units sold
        #[test]
        fn prop_stock_decreases_by_units_sold(
            ledger in ledger_strategy(),
            quantity in 1i64..=2000,
            price in price_strategy()
        ) {
            let before: i64 = ledger.iter().map(|b| b.quantity).sum();
            let mut ledger = ledger;

            if let Ok(sale) = simulate_sale(&mut ledger, quantity, price) {
                let after: i64 = ledger.iter().map(|b| b.quantity).sum();
                prop_assert_eq!(before - after, sale.units_sold);
            }
        }

        /// A failed multi-item sale leaves all ledgers untouched
        #[test]
        fn prop_failed_multi_sale_is_a_no_op(
            ledger in ledger_strategy(),
            quantity in 1i64..=2000,
            price in price_strategy()
        ) {
            let product = Uuid::new_v4();
            let empty = Uuid::new_v4();
            let mut ledgers = HashMap::from([
                (product, ledger),
                (empty, Vec::new()),
            ]);
            let before = ledgers.clone();

            // Second line can never be filled, so the whole sale must abort
            let result = simulate_sell_many(
                &mut ledgers,
                &[(product, quantity, price), (empty, 1, price)],
            );

            prop_assert!(result.is_err());
            prop_assert_eq!(ledgers, before);
        }
    }
}
