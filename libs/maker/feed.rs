//! Price feed collaborator.

use crate::domain::Token;
use crate::exchange::ExchangeError;
use async_trait::async_trait;
use parking_lot::RwLock;

/// Source of target prices, in [0, 1]. The feed guarantees that the prices
/// of complementary tokens sum to 1.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn get_price(&self, token: Token) -> Result<f64, ExchangeError>;
}

/// Fixed price feed, settable from outside. The paper keeper drives it with
/// a small random walk; tests pin it.
pub struct StaticPriceFeed {
    price_a: RwLock<f64>,
}

impl StaticPriceFeed {
    pub fn new(price_a: f64) -> Self {
        Self {
            price_a: RwLock::new(price_a),
        }
    }

    pub fn set_price(&self, price_a: f64) {
        *self.price_a.write() = price_a;
    }

    pub fn price(&self) -> f64 {
        *self.price_a.read()
    }
}

#[async_trait]
impl PriceFeed for StaticPriceFeed {
    async fn get_price(&self, token: Token) -> Result<f64, ExchangeError> {
        let price_a = *self.price_a.read();
        Ok(match token {
            Token::A => price_a,
            Token::B => 1.0 - price_a,
        })
    }
}
