//! Balances and the immutable order book snapshot.

use super::order::Order;
use super::token::Token;

/// Keeper balances: settlement collateral plus the two outcome tokens.
///
/// `None` means "unknown / not yet fetched" and is a distinct state from
/// `Some(0.0)`: unknown balances block trading, zero balances do not.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Balances {
    pub collateral: Option<f64>,
    pub token_a: Option<f64>,
    pub token_b: Option<f64>,
}

impl Balances {
    /// Balances with every value known.
    pub fn known(collateral: f64, token_a: f64, token_b: f64) -> Self {
        Self {
            collateral: Some(collateral),
            token_a: Some(token_a),
            token_b: Some(token_b),
        }
    }

    /// Balance of one outcome token.
    pub fn token(&self, token: Token) -> Option<f64> {
        match token {
            Token::A => self.token_a,
            Token::B => self.token_b,
        }
    }

    /// All three balances have been fetched successfully.
    pub fn is_complete(&self) -> bool {
        self.collateral.is_some() && self.token_a.is_some() && self.token_b.is_some()
    }
}

/// Immutable point-in-time view of the keeper's state on the exchange:
/// the currently open orders (with ids) and the balances.
///
/// A snapshot is created whole by the refresh cycle and replaced whole by
/// the next one; readers never observe a torn mix of old orders and new
/// balances.
#[derive(Debug, Clone)]
pub struct OrderBook {
    pub orders: Vec<Order>,
    pub balances: Balances,
}

impl OrderBook {
    pub fn new(orders: Vec<Order>, balances: Balances) -> Self {
        Self { orders, balances }
    }
}
