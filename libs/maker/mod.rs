//! Market-Maker Keeper Core
//!
//! Order-book reconciliation engine for a binary-outcome prediction market:
//! keeps resting limit orders on the two complementary outcome tokens aligned
//! with a target price and an inventory policy.

pub mod config;
pub mod constants;
pub mod domain;
pub mod exchange;
pub mod feed;
pub mod orderbook;
pub mod strategies;
pub mod utils;

// Re-export commonly used items
pub use config::{AmmConfig, Band, BandsConfig, ConfigError, KeeperConfig, StrategyConfig};
pub use domain::{Balances, Order, OrderBook, Side, Slot, Token};
pub use exchange::{ExchangeClient, ExchangeError, PaperExchange};
pub use feed::{PriceFeed, StaticPriceFeed};
pub use orderbook::{OrderBookManager, StateError};
pub use strategies::{OrderDiff, Strategy, StrategyError, StrategyManager, TargetPrices};
pub use utils::{init_tracing, Heartbeat, ShutdownManager};
