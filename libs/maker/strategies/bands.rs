//! Bands strategy: a few quotes at fixed margins around the target price.
//!
//! Each configured band yields at most one buy at `target - avg_margin` and
//! one sell at `target + avg_margin` on the primary token's book. Amounts
//! come from the band's min/avg/max schedule: `avg_amount` while the budget
//! covers it, the remaining budget while it still clears `min_amount`, and
//! nothing below that. Buy legs deplete the collateral budget, sell legs the
//! token inventory, in config order.
//!
//! Bands are evaluated independently per side; two bands resolving to the
//! same price collapse into one slot at the diff stage.

use super::TargetPrices;
use crate::config::BandsConfig;
use crate::constants::{MAX_DECIMALS, SIZE_DECIMALS};
use crate::domain::math::{round_down, round_to};
use crate::domain::{Balances, Order, Side, Token};

pub struct BandsStrategy {
    config: BandsConfig,
}

impl BandsStrategy {
    pub fn new(config: BandsConfig) -> Self {
        Self { config }
    }

    /// Desired orders on the token A book around its target price.
    pub fn expected_orders(&self, prices: &TargetPrices, balances: &Balances) -> Vec<Order> {
        let target = prices.get(Token::A);
        let mut collateral_left = balances.collateral.unwrap_or(0.0);
        let mut inventory_left = balances.token(Token::A).unwrap_or(0.0);
        let mut expected = Vec::new();

        for band in &self.config.bands {
            let buy_price = round_to(target - band.avg_margin, MAX_DECIMALS);
            if in_price_range(buy_price) {
                if let Some(amount) =
                    band_amount(collateral_left, band.min_amount, band.avg_amount)
                {
                    collateral_left -= amount;
                    expected.push(Order::new(buy_price, amount, Side::Buy, Token::A));
                }
            }

            let sell_price = round_to(target + band.avg_margin, MAX_DECIMALS);
            if in_price_range(sell_price) {
                if let Some(amount) =
                    band_amount(inventory_left, band.min_amount, band.avg_amount)
                {
                    inventory_left -= amount;
                    expected.push(Order::new(sell_price, amount, Side::Sell, Token::A));
                }
            }
        }

        expected
    }
}

fn in_price_range(price: f64) -> bool {
    price > 0.0 && price < 1.0
}

/// Amount a band quotes given its remaining budget, or `None` when the
/// budget cannot clear the band's minimum.
fn band_amount(budget: f64, min_amount: f64, avg_amount: f64) -> Option<f64> {
    let amount = if budget >= avg_amount {
        avg_amount
    } else {
        round_down(budget, SIZE_DECIMALS)
    };
    (amount >= min_amount).then_some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Band;

    fn two_bands() -> BandsStrategy {
        BandsStrategy::new(BandsConfig {
            bands: vec![
                Band {
                    min_margin: 0.005,
                    avg_margin: 0.01,
                    max_margin: 0.02,
                    min_amount: 5.0,
                    avg_amount: 6.0,
                    max_amount: 8.0,
                },
                Band {
                    min_margin: 0.02,
                    avg_margin: 0.03,
                    max_margin: 0.04,
                    min_amount: 5.0,
                    avg_amount: 7.0,
                    max_amount: 10.0,
                },
            ],
        })
    }

    #[test]
    fn worked_example_two_buys_no_sells() {
        // target 0.085, collateral 18, no inventory:
        // buys at 0.075 (size 6) and 0.055 (size 7), both at avg size
        // since 6 + 7 = 13 <= 18; no sells without tokens.
        let strategy = two_bands();
        let prices = TargetPrices::from_price_a(0.085);
        let balances = Balances::known(18.0, 0.0, 0.0);
        let orders = strategy.expected_orders(&prices, &balances);

        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.side == Side::Buy));
        assert_eq!(orders[0].price, 0.075);
        assert_eq!(orders[0].size, 6.0);
        assert_eq!(orders[1].price, 0.055);
        assert_eq!(orders[1].size, 7.0);
    }

    #[test]
    fn shrinking_collateral_scales_down_then_omits() {
        let strategy = two_bands();
        let prices = TargetPrices::from_price_a(0.085);

        // 11.5 covers band 1 at avg (6) and leaves 5.5 for band 2,
        // below its avg (7) but above its min (5).
        let orders =
            strategy.expected_orders(&prices, &Balances::known(11.5, 0.0, 0.0));
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].size, 6.0);
        assert_eq!(orders[1].size, 5.5);

        // 8.0 covers band 1 only; the 2.0 left is below band 2's min.
        let orders =
            strategy.expected_orders(&prices, &Balances::known(8.0, 0.0, 0.0));
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].size, 6.0);
    }

    #[test]
    fn sells_require_inventory() {
        let strategy = two_bands();
        let prices = TargetPrices::from_price_a(0.085);
        let orders =
            strategy.expected_orders(&prices, &Balances::known(18.0, 13.0, 0.0));

        let sells: Vec<_> = orders.iter().filter(|o| o.side == Side::Sell).collect();
        assert_eq!(sells.len(), 2);
        assert_eq!(sells[0].price, 0.095);
        assert_eq!(sells[0].size, 6.0);
        assert_eq!(sells[1].price, 0.115);
        assert_eq!(sells[1].size, 7.0);
    }

    #[test]
    fn out_of_range_legs_are_omitted() {
        // target 0.015: band 2's buy leg would land at -0.015.
        let strategy = two_bands();
        let prices = TargetPrices::from_price_a(0.015);
        let orders =
            strategy.expected_orders(&prices, &Balances::known(18.0, 0.0, 0.0));
        let buys: Vec<_> = orders.iter().filter(|o| o.side == Side::Buy).collect();
        assert_eq!(buys.len(), 1);
        assert_eq!(buys[0].price, 0.005);
    }

    #[test]
    fn identical_price_bands_collapse_to_one_slot() {
        // Both bands share avg_margin, so their buy legs land on the same
        // slot; the diff merges them into a single placement.
        let strategy = BandsStrategy::new(BandsConfig {
            bands: vec![
                Band {
                    min_margin: 0.005,
                    avg_margin: 0.01,
                    max_margin: 0.02,
                    min_amount: 5.0,
                    avg_amount: 6.0,
                    max_amount: 8.0,
                },
                Band {
                    min_margin: 0.005,
                    avg_margin: 0.01,
                    max_margin: 0.02,
                    min_amount: 5.0,
                    avg_amount: 7.0,
                    max_amount: 10.0,
                },
            ],
        });
        let prices = TargetPrices::from_price_a(0.5);
        let expected =
            strategy.expected_orders(&prices, &Balances::known(100.0, 0.0, 0.0));
        assert_eq!(expected.len(), 2);

        let diff = crate::strategies::diff::diff_orders(&[], &expected);
        assert_eq!(diff.to_place.len(), 1);
        assert_eq!(diff.to_place[0].price, 0.49);
        assert_eq!(diff.to_place[0].size, 13.0);
    }
}
