//! In-memory exchange for paper trading and tests.
//!
//! Assigns order ids, tracks open orders and balances, and records every
//! mutating call so tests can assert submission ordering. Failures and
//! unknown balances are scriptable.

use super::{ExchangeClient, ExchangeError};
use crate::domain::{Balances, Order, Side};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// One mutating call as seen by the exchange, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationEvent {
    Cancel(String),
    Place { price: f64, size: f64, side: Side },
    CancelAll,
}

#[derive(Default)]
struct Inner {
    open_orders: Vec<Order>,
    balances: Balances,
    next_id: u64,
    mutations: Vec<MutationEvent>,
}

/// Scriptable in-memory [`ExchangeClient`].
#[derive(Default)]
pub struct PaperExchange {
    inner: Mutex<Inner>,
    fail_order_fetch: AtomicBool,
    fail_balance_fetch: AtomicBool,
    fail_place: AtomicBool,
}

impl PaperExchange {
    pub fn new(balances: Balances) -> Self {
        let exchange = Self::default();
        exchange.inner.lock().balances = balances;
        exchange
    }

    /// Replace the reported balances (`None` values simulate an exchange
    /// that cannot produce that balance).
    pub fn set_balances(&self, balances: Balances) {
        self.inner.lock().balances = balances;
    }

    /// Make `fetch_open_orders` fail until reset.
    pub fn fail_order_fetch(&self, fail: bool) {
        self.fail_order_fetch.store(fail, Ordering::Release);
    }

    /// Make `fetch_balances` fail until reset.
    pub fn fail_balance_fetch(&self, fail: bool) {
        self.fail_balance_fetch.store(fail, Ordering::Release);
    }

    /// Make `submit_place` reject orders until reset.
    pub fn fail_place(&self, fail: bool) {
        self.fail_place.store(fail, Ordering::Release);
    }

    /// Orders currently resting on the paper book.
    pub fn open_orders(&self) -> Vec<Order> {
        self.inner.lock().open_orders.clone()
    }

    /// Every mutating call received so far, in order.
    pub fn mutation_log(&self) -> Vec<MutationEvent> {
        self.inner.lock().mutations.clone()
    }

    /// Forget recorded mutations (keeps orders and balances).
    pub fn clear_mutation_log(&self) {
        self.inner.lock().mutations.clear();
    }
}

#[async_trait]
impl ExchangeClient for PaperExchange {
    async fn fetch_open_orders(&self) -> Result<Vec<Order>, ExchangeError> {
        if self.fail_order_fetch.load(Ordering::Acquire) {
            return Err(ExchangeError::Transport("order fetch unavailable".into()));
        }
        Ok(self.inner.lock().open_orders.clone())
    }

    async fn fetch_balances(&self) -> Result<Balances, ExchangeError> {
        if self.fail_balance_fetch.load(Ordering::Acquire) {
            return Err(ExchangeError::Transport("balance fetch unavailable".into()));
        }
        Ok(self.inner.lock().balances)
    }

    async fn submit_cancel(&self, order_id: &str) -> Result<(), ExchangeError> {
        let mut inner = self.inner.lock();
        inner.mutations.push(MutationEvent::Cancel(order_id.to_string()));
        let before = inner.open_orders.len();
        inner
            .open_orders
            .retain(|order| order.id.as_deref() != Some(order_id));
        if inner.open_orders.len() == before {
            return Err(ExchangeError::OrderNotFound(order_id.to_string()));
        }
        debug!("[Paper] cancelled {}", order_id);
        Ok(())
    }

    async fn submit_place(&self, order: &Order) -> Result<String, ExchangeError> {
        let mut inner = self.inner.lock();
        inner.mutations.push(MutationEvent::Place {
            price: order.price,
            size: order.size,
            side: order.side,
        });
        if self.fail_place.load(Ordering::Acquire) {
            return Err(ExchangeError::Rejected("placement disabled".into()));
        }
        inner.next_id += 1;
        let id = format!("paper-{}", inner.next_id);
        inner.open_orders.push(order.clone().with_id(id.clone()));
        debug!("[Paper] placed {} as {}", order, id);
        Ok(id)
    }

    async fn submit_cancel_all(&self) -> Result<(), ExchangeError> {
        let mut inner = self.inner.lock();
        inner.mutations.push(MutationEvent::CancelAll);
        let n = inner.open_orders.len();
        inner.open_orders.clear();
        debug!("[Paper] cancelled all ({} orders)", n);
        Ok(())
    }
}
