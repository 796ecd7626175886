//! Value model: tokens, orders, balances and the order book snapshot.

pub mod math;
mod order;
mod orderbook;
mod token;

pub use order::{Order, Side, Slot};
pub use orderbook::{Balances, OrderBook};
pub use token::Token;
