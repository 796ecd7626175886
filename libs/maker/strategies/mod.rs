//! Pricing strategies and the synchronization driver.

pub mod amm;
pub mod bands;
pub mod diff;
pub mod manager;

pub use amm::AmmStrategy;
pub use bands::BandsStrategy;
pub use manager::StrategyManager;

use crate::config::StrategyConfig;
use crate::constants::MAX_DECIMALS;
use crate::domain::math::round_to;
use crate::domain::{Order, OrderBook, Token};
use thiserror::Error;
use tracing::warn;

/// Errors from strategy construction and execution.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("invalid strategy configuration: {0}")]
    InvalidConfig(String),
}

/// Target prices for both outcome tokens of one cycle. Complements sum to 1
/// up to price rounding.
#[derive(Debug, Clone, Copy)]
pub struct TargetPrices {
    price_a: f64,
    price_b: f64,
}

impl TargetPrices {
    /// Derive both prices from the feed price of token A.
    pub fn from_price_a(price_a: f64) -> Self {
        let price_a = round_to(price_a, MAX_DECIMALS);
        Self {
            price_a,
            price_b: round_to(1.0 - price_a, MAX_DECIMALS),
        }
    }

    pub fn get(&self, token: Token) -> f64 {
        match token {
            Token::A => self.price_a,
            Token::B => self.price_b,
        }
    }
}

/// The (cancel-list, place-list) pair reconciling actual state toward
/// desired state for one cycle.
#[derive(Debug, Default)]
pub struct OrderDiff {
    pub to_cancel: Vec<Order>,
    pub to_place: Vec<Order>,
}

impl OrderDiff {
    pub fn is_empty(&self) -> bool {
        self.to_cancel.is_empty() && self.to_place.is_empty()
    }
}

/// The active pricing strategy, selected once at construction.
///
/// Strategies are pure: each call recomputes the desired order set from the
/// snapshot and target prices alone, with no cross-cycle state.
pub enum Strategy {
    Amm(AmmStrategy),
    Bands(BandsStrategy),
}

impl Strategy {
    /// Build the strategy from a validated config. Validation runs again
    /// here so a hand-constructed config cannot bypass it.
    pub fn from_config(config: &StrategyConfig) -> Result<Self, StrategyError> {
        config
            .validate()
            .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
        Ok(match config {
            StrategyConfig::Amm(amm) => Strategy::Amm(AmmStrategy::new(amm.clone())),
            StrategyConfig::Bands(bands) => Strategy::Bands(BandsStrategy::new(bands.clone())),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Amm(_) => "amm",
            Strategy::Bands(_) => "bands",
        }
    }

    /// Desired changes for this cycle. Fails soft: a computation producing
    /// non-finite values yields an empty diff so one bad cycle never halts
    /// the loop.
    pub fn get_orders(&self, book: &OrderBook, prices: &TargetPrices) -> OrderDiff {
        let expected = match self {
            Strategy::Amm(amm) => amm.expected_orders(prices, &book.balances),
            Strategy::Bands(bands) => bands.expected_orders(prices, &book.balances),
        };
        if !orders_are_finite(&expected) {
            warn!(
                "[{}] non-finite expected orders, returning empty diff",
                self.name()
            );
            return OrderDiff::default();
        }
        diff::diff_orders(&book.orders, &expected)
    }
}

fn orders_are_finite(orders: &[Order]) -> bool {
    orders
        .iter()
        .all(|order| order.price.is_finite() && order.size.is_finite())
}
