//! AMM strategy: ladders of resting orders around the target price.
//!
//! Per token the strategy quotes a buy ladder descending from
//! `target - spread` and a sell ladder climbing from `target + spread`, both
//! in `delta` steps and bounded by `depth` and the [`p_min`, `p_max`] range.
//! Buy rungs spend a collateral allocation, sell rungs distribute the
//! token inventory, each with concentrated-liquidity (square-root) weights
//! so size thins out away from the touch.

use super::TargetPrices;
use crate::config::AmmConfig;
use crate::constants::{MAX_DECIMALS, MIN_SIZE, SIZE_DECIMALS};
use crate::domain::math::{round_down, round_to};
use crate::domain::{Balances, Order, Side, Token};

const EPS: f64 = 1e-9;

pub struct AmmStrategy {
    config: AmmConfig,
}

impl AmmStrategy {
    pub fn new(config: AmmConfig) -> Self {
        Self { config }
    }

    /// The full desired order set for both tokens.
    ///
    /// The collateral put to work is `min(collateral, max_collateral)`,
    /// split between the tokens proportionally to their target prices.
    pub fn expected_orders(&self, prices: &TargetPrices, balances: &Balances) -> Vec<Order> {
        let collateral = balances
            .collateral
            .unwrap_or(0.0)
            .min(self.config.max_collateral);

        let mut expected = Vec::new();
        for token in [Token::A, Token::B] {
            let target = prices.get(token);
            let allocation = collateral * target;
            let inventory = balances.token(token).unwrap_or(0.0);
            self.extend_token_ladders(&mut expected, token, target, inventory, allocation);
        }
        expected
    }

    fn extend_token_ladders(
        &self,
        expected: &mut Vec<Order>,
        token: Token,
        target: f64,
        inventory: f64,
        allocation: f64,
    ) {
        let config = &self.config;
        let lower = (target - config.depth).max(config.p_min);
        let upper = (target + config.depth).min(config.p_max);

        let buy_prices = ladder_down(target - config.spread, lower, config.delta);
        for (price, share) in weighted(&buy_prices) {
            let size = round_down(allocation * share / price, SIZE_DECIMALS);
            if size >= MIN_SIZE {
                expected.push(Order::new(price, size, Side::Buy, token));
            }
        }

        let sell_prices = ladder_up(target + config.spread, upper, config.delta);
        for (price, share) in weighted(&sell_prices) {
            let size = round_down(inventory * share, SIZE_DECIMALS);
            if size >= MIN_SIZE {
                expected.push(Order::new(price, size, Side::Sell, token));
            }
        }
    }
}

/// Prices descending from `start` to `end` in `step` increments. Empty when
/// the range is degenerate.
fn ladder_down(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut prices = Vec::new();
    let mut i = 0u32;
    loop {
        let price = start - f64::from(i) * step;
        if price < end - EPS {
            break;
        }
        prices.push(round_to(price, MAX_DECIMALS));
        i += 1;
    }
    prices
}

/// Prices climbing from `start` to `end` in `step` increments.
fn ladder_up(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut prices = Vec::new();
    let mut i = 0u32;
    loop {
        let price = start + f64::from(i) * step;
        if price > end + EPS {
            break;
        }
        prices.push(round_to(price, MAX_DECIMALS));
        i += 1;
    }
    prices
}

/// Pair each price with its normalized `1/sqrt(price)` weight.
fn weighted(prices: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = prices.iter().map(|p| 1.0 / p.sqrt()).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    prices
        .iter()
        .map(|&p| (p, (1.0 / p.sqrt()) / total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderBook;
    use crate::strategies::diff::diff_orders;

    fn strategy() -> AmmStrategy {
        AmmStrategy::new(AmmConfig {
            p_min: 0.01,
            p_max: 0.99,
            spread: 0.02,
            delta: 0.01,
            depth: 0.05,
            max_collateral: 100.0,
        })
    }

    #[test]
    fn ladder_down_covers_the_range() {
        let prices = ladder_down(0.08, 0.05, 0.01);
        assert_eq!(prices, vec![0.08, 0.07, 0.06, 0.05]);
    }

    #[test]
    fn ladder_up_covers_the_range() {
        let prices = ladder_up(0.12, 0.15, 0.01);
        assert_eq!(prices, vec![0.12, 0.13, 0.14, 0.15]);
    }

    #[test]
    fn degenerate_range_is_empty() {
        assert!(ladder_down(0.04, 0.05, 0.01).is_empty());
        assert!(ladder_up(0.16, 0.15, 0.01).is_empty());
    }

    #[test]
    fn buy_ladder_never_outspends_allocation() {
        let strategy = strategy();
        let prices = TargetPrices::from_price_a(0.10);
        let balances = Balances::known(50.0, 0.0, 0.0);
        let orders = strategy.expected_orders(&prices, &balances);

        for token in [Token::A, Token::B] {
            let allocation = 50.0 * prices.get(token);
            let spent: f64 = orders
                .iter()
                .filter(|o| o.token == token && o.side == Side::Buy)
                .map(|o| o.price * o.size)
                .sum();
            assert!(
                spent <= allocation + 1e-6,
                "token {} spent {} of allocation {}",
                token,
                spent,
                allocation
            );
        }
    }

    #[test]
    fn sell_ladder_never_exceeds_inventory() {
        let strategy = strategy();
        let prices = TargetPrices::from_price_a(0.5);
        let balances = Balances::known(0.0, 40.0, 25.0);
        let orders = strategy.expected_orders(&prices, &balances);

        for (token, inventory) in [(Token::A, 40.0), (Token::B, 25.0)] {
            let quoted: f64 = orders
                .iter()
                .filter(|o| o.token == token && o.side == Side::Sell)
                .map(|o| o.size)
                .sum();
            assert!(quoted <= inventory + 1e-6);
        }
    }

    #[test]
    fn no_inventory_means_no_sells() {
        let strategy = strategy();
        let prices = TargetPrices::from_price_a(0.5);
        let balances = Balances::known(50.0, 0.0, 0.0);
        let orders = strategy.expected_orders(&prices, &balances);
        assert!(orders.iter().all(|o| o.side == Side::Buy));
    }

    #[test]
    fn unchanged_state_is_idempotent() {
        let strategy = strategy();
        let prices = TargetPrices::from_price_a(0.5);
        let balances = Balances::known(50.0, 40.0, 25.0);

        let expected = strategy.expected_orders(&prices, &balances);
        assert!(!expected.is_empty());

        // Book already holds exactly the expected orders.
        let open: Vec<Order> = expected
            .iter()
            .enumerate()
            .map(|(i, o)| o.clone().with_id(format!("ord-{}", i)))
            .collect();
        let book = OrderBook::new(open, balances);

        let second = strategy.expected_orders(&prices, &balances);
        let diff = diff_orders(&book.orders, &second);
        assert!(diff.is_empty(), "second pass should not churn: {:?}", diff);
    }
}
