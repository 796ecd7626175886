//! Property-based tests for the pricing strategies and slot diffing.
//!
//! Uses proptest to verify invariants that should hold for all inputs.
//!
//! Run with: cargo test -p maker strategy_properties --release

use maker::config::{AmmConfig, Band, BandsConfig};
use maker::constants::MIN_SIZE;
use maker::strategies::diff::diff_orders;
use maker::strategies::{AmmStrategy, BandsStrategy, TargetPrices};
use maker::{Balances, Order, Side, Token};
use proptest::prelude::*;

fn amm() -> AmmStrategy {
    AmmStrategy::new(AmmConfig {
        p_min: 0.01,
        p_max: 0.99,
        spread: 0.02,
        delta: 0.01,
        depth: 0.05,
        max_collateral: 100.0,
    })
}

fn bands(amounts: &[(f64, f64)]) -> BandsStrategy {
    BandsStrategy::new(BandsConfig {
        bands: amounts
            .iter()
            .enumerate()
            .map(|(i, &(min_amount, avg_amount))| Band {
                min_margin: 0.005 + 0.02 * i as f64,
                avg_margin: 0.01 + 0.02 * i as f64,
                max_margin: 0.02 + 0.02 * i as f64,
                min_amount,
                avg_amount,
                max_amount: avg_amount + 2.0,
            })
            .collect(),
    })
}

fn with_ids(orders: &[Order]) -> Vec<Order> {
    orders
        .iter()
        .enumerate()
        .map(|(i, o)| o.clone().with_id(format!("ord-{}", i)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A second pass over unchanged state yields an empty diff: no churn
    /// when nothing changed.
    #[test]
    fn amm_is_idempotent(
        price in 0.10..0.90f64,
        collateral in 0.0..200.0f64,
        inv_a in 0.0..100.0f64,
        inv_b in 0.0..100.0f64,
    ) {
        let strategy = amm();
        let prices = TargetPrices::from_price_a(price);
        let balances = Balances::known(collateral, inv_a, inv_b);

        let first = strategy.expected_orders(&prices, &balances);
        let open = with_ids(&first);
        let second = strategy.expected_orders(&prices, &balances);

        let diff = diff_orders(&open, &second);
        prop_assert!(diff.is_empty(), "second pass churned: {:?}", diff);
    }

    /// Every quoted order has a sane price and a tradable size.
    #[test]
    fn amm_orders_are_well_formed(
        price in 0.10..0.90f64,
        collateral in 0.0..200.0f64,
        inventory in 0.0..100.0f64,
    ) {
        let strategy = amm();
        let prices = TargetPrices::from_price_a(price);
        let balances = Balances::known(collateral, inventory, inventory);

        for order in strategy.expected_orders(&prices, &balances) {
            prop_assert!(order.price > 0.0 && order.price < 1.0);
            prop_assert!(order.size >= MIN_SIZE);
            prop_assert!(order.size.is_finite());
        }
    }

    /// The buy ladder never spends more collateral than its allocation and
    /// the sell ladder never quotes more than the inventory.
    #[test]
    fn amm_respects_budgets(
        price in 0.10..0.90f64,
        collateral in 0.0..500.0f64,
        inv_a in 0.0..100.0f64,
        inv_b in 0.0..100.0f64,
    ) {
        let strategy = amm();
        let prices = TargetPrices::from_price_a(price);
        let balances = Balances::known(collateral, inv_a, inv_b);
        let orders = strategy.expected_orders(&prices, &balances);

        let working = collateral.min(100.0);
        for (token, inventory) in [(Token::A, inv_a), (Token::B, inv_b)] {
            let spent: f64 = orders.iter()
                .filter(|o| o.token == token && o.side == Side::Buy)
                .map(|o| o.price * o.size)
                .sum();
            prop_assert!(spent <= working * prices.get(token) + 1e-6);

            let quoted: f64 = orders.iter()
                .filter(|o| o.token == token && o.side == Side::Sell)
                .map(|o| o.size)
                .sum();
            prop_assert!(quoted <= inventory + 1e-6);
        }
    }

    /// Bands deplete their budgets in config order and never overdraw.
    #[test]
    fn bands_respect_budgets(
        price in 0.20..0.80f64,
        collateral in 0.0..50.0f64,
        inventory in 0.0..50.0f64,
    ) {
        let strategy = bands(&[(5.0, 6.0), (5.0, 7.0)]);
        let prices = TargetPrices::from_price_a(price);
        let balances = Balances::known(collateral, inventory, 0.0);
        let orders = strategy.expected_orders(&prices, &balances);

        let bought: f64 = orders.iter()
            .filter(|o| o.side == Side::Buy)
            .map(|o| o.size)
            .sum();
        prop_assert!(bought <= collateral + 1e-9);

        let sold: f64 = orders.iter()
            .filter(|o| o.side == Side::Sell)
            .map(|o| o.size)
            .sum();
        prop_assert!(sold <= inventory + 1e-9);

        for order in &orders {
            prop_assert!(order.size >= 5.0, "below min_amount: {}", order.size);
        }
    }

    /// Bands are idempotent through the shared diff as well.
    #[test]
    fn bands_are_idempotent(
        price in 0.20..0.80f64,
        collateral in 0.0..50.0f64,
        inventory in 0.0..50.0f64,
    ) {
        let strategy = bands(&[(5.0, 6.0), (5.0, 7.0)]);
        let prices = TargetPrices::from_price_a(price);
        let balances = Balances::known(collateral, inventory, 0.0);

        let first = strategy.expected_orders(&prices, &balances);
        let open = with_ids(&first);
        let second = strategy.expected_orders(&prices, &balances);

        let diff = diff_orders(&open, &second);
        prop_assert!(diff.is_empty());
    }

    /// An under-sized slot places exactly the shortfall; open size plus the
    /// placement add up to the expectation.
    #[test]
    fn diff_places_exactly_the_shortfall(
        price in 0.05..0.95f64,
        open_size in 1.0..50.0f64,
        extra in 1.0..50.0f64,
    ) {
        let price = (price * 1000.0).round() / 1000.0;
        let open_size = (open_size * 100.0).round() / 100.0;
        let extra = (extra * 100.0).round() / 100.0;

        let open = vec![Order::new(price, open_size, Side::Buy, Token::A).with_id("1")];
        let expected = vec![Order::new(price, open_size + extra, Side::Buy, Token::A)];

        let diff = diff_orders(&open, &expected);
        prop_assert!(diff.to_cancel.is_empty());
        prop_assert_eq!(diff.to_place.len(), 1);
        prop_assert!((diff.to_place[0].size - extra).abs() < 1e-9);
    }

    /// An over-sized slot is cancelled wholesale and re-placed at the
    /// expected size.
    #[test]
    fn diff_replaces_oversized_slots(
        price in 0.05..0.95f64,
        expected_size in 1.0..50.0f64,
        excess in 0.01..50.0f64,
    ) {
        let price = (price * 1000.0).round() / 1000.0;
        let expected_size = (expected_size * 100.0).round() / 100.0;
        let excess = (excess * 100.0).round() / 100.0;
        prop_assume!(excess > 0.0);

        let open = vec![
            Order::new(price, expected_size + excess, Side::Buy, Token::A).with_id("1"),
        ];
        let expected = vec![Order::new(price, expected_size, Side::Buy, Token::A)];

        let diff = diff_orders(&open, &expected);
        prop_assert_eq!(diff.to_cancel.len(), 1);
        prop_assert_eq!(diff.to_place.len(), 1);
        prop_assert!((diff.to_place[0].size - expected_size).abs() < 1e-9);
    }
}
