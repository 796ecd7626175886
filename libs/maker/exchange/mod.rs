//! Exchange collaborator interface.
//!
//! All exchange access is injected through this trait, constructed once and
//! passed in as `Arc<dyn ExchangeClient>`. Transport concerns (signing,
//! proxies, retries, request timeouts) live behind the implementation.

mod paper;

pub use paper::{MutationEvent, PaperExchange};

use crate::domain::{Balances, Order};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from exchange calls. Each failed call affects that item only;
/// the engine recomputes the diff from fresh state next cycle.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("exchange rejected request: {0}")]
    Rejected(String),

    #[error("exchange call timed out")]
    Timeout,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),
}

/// Async exchange operations the reconciliation engine depends on.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Currently open orders for the keeper on this market.
    async fn fetch_open_orders(&self) -> Result<Vec<Order>, ExchangeError>;

    /// Current balances. A value the exchange could not produce is returned
    /// as unknown (`None`) inside [`Balances`], never coerced to zero.
    async fn fetch_balances(&self) -> Result<Balances, ExchangeError>;

    /// Cancel one order by id.
    async fn submit_cancel(&self, order_id: &str) -> Result<(), ExchangeError>;

    /// Place one order; returns the exchange-assigned id.
    async fn submit_place(&self, order: &Order) -> Result<String, ExchangeError>;

    /// Cancel every open order for the keeper.
    async fn submit_cancel_all(&self) -> Result<(), ExchangeError>;
}
