//! Resting order descriptor and its diffing identity.

use super::math::{key_to_price, price_to_key};
use super::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A resting limit order. Immutable once constructed; a "modified" order is
/// cancel-old + place-new, never in-place mutation.
///
/// `id` is absent for not-yet-placed orders and present once the exchange
/// assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub price: f64,
    pub size: f64,
    pub side: Side,
    pub token: Token,
    pub id: Option<String>,
}

impl Order {
    /// A new order, not yet submitted to the exchange.
    pub fn new(price: f64, size: f64, side: Side, token: Token) -> Self {
        Self {
            price,
            size,
            side,
            token,
            id: None,
        }
    }

    /// The same order with the exchange-assigned id attached.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The quoting slot this order occupies.
    pub fn slot(&self) -> Slot {
        Slot {
            price_key: price_to_key(self.price),
            side: self.side,
            token: self.token,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2} {} @ {:.3}",
            self.side, self.size, self.token, self.price
        )?;
        if let Some(id) = &self.id {
            write!(f, " [{}]", id)?;
        }
        Ok(())
    }
}

/// Diff identity of an order: the (price, side, token) triple. Two orders
/// with the same slot are the same quote; only their sizes may differ.
/// Order ids are never matched across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    price_key: i64,
    pub side: Side,
    pub token: Token,
}

impl Slot {
    /// The slot's price, recovered from the fixed grid.
    pub fn price(&self) -> f64 {
        key_to_price(self.price_key)
    }
}
