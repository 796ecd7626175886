//! Order Book Manager
//!
//! Single authoritative source of "what is the order book right now",
//! decoupled from the synchronize cadence, and the only component allowed to
//! issue order-mutating calls to the exchange.
//!
//! A background task refreshes the snapshot on its own timer; mutations flow
//! through a command channel consumed by one dispatcher task, so every cancel
//! batch of a cycle finishes before that cycle's placements start.

use crate::constants::CANCEL_ALL_TIMEOUT;
use crate::domain::{Order, OrderBook};
use crate::exchange::ExchangeClient;
use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Why no usable snapshot is available. Callers treat this as "do nothing
/// this cycle", never as zero balances.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("no order book snapshot has been published yet")]
    NoSnapshot,

    #[error("latest balances are unknown or partial")]
    PartialBalances,
}

/// Work for the dispatcher task. Batches are processed FIFO; this ordering
/// is what keeps a cycle's cancels ahead of its placements.
enum Command {
    Cancel(Vec<Order>),
    Place(Vec<Order>),
    CancelAll(oneshot::Sender<()>),
    Flush(oneshot::Sender<()>),
}

/// Owns the authoritative order book snapshot and the mutation pipeline.
pub struct OrderBookManager {
    exchange: Arc<dyn ExchangeClient>,
    refresh_interval: Duration,
    max_workers: usize,
    snapshot: Arc<RwLock<Option<Arc<OrderBook>>>>,
    balances_valid: Arc<AtomicBool>,
    command_tx: mpsc::UnboundedSender<Command>,
    command_rx: Mutex<Option<mpsc::UnboundedReceiver<Command>>>,
    refresh_handle: Mutex<Option<JoinHandle<()>>>,
    worker_handle: Mutex<Option<JoinHandle<()>>>,
}

impl OrderBookManager {
    /// `max_workers` bounds outbound concurrency *within* one batch; the
    /// default of 1 preserves submission order to the exchange.
    pub fn new(
        exchange: Arc<dyn ExchangeClient>,
        refresh_interval: Duration,
        max_workers: usize,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        Self {
            exchange,
            refresh_interval,
            max_workers: max_workers.max(1),
            snapshot: Arc::new(RwLock::new(None)),
            balances_valid: Arc::new(AtomicBool::new(true)),
            command_tx,
            command_rx: Mutex::new(Some(command_rx)),
            refresh_handle: Mutex::new(None),
            worker_handle: Mutex::new(None),
        }
    }

    /// Latest published snapshot, non-blocking. Never triggers a fetch.
    ///
    /// Fails while no snapshot has ever been published, or while the most
    /// recent successful balances fetch contained an unknown value.
    pub fn get_order_book(&self) -> Result<Arc<OrderBook>, StateError> {
        if !self.balances_valid.load(Ordering::Acquire) {
            return Err(StateError::PartialBalances);
        }
        self.snapshot
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(StateError::NoSnapshot)
    }

    /// Start the periodic refresh task and the mutation dispatcher.
    ///
    /// Performs one immediate refresh attempt; its failure is logged, not
    /// fatal. `shutdown_flag` follows the `true = running` convention.
    pub async fn start(&self, shutdown_flag: Arc<AtomicBool>) {
        refresh_once(&self.exchange, &self.snapshot, &self.balances_valid).await;

        let exchange = Arc::clone(&self.exchange);
        let snapshot = Arc::clone(&self.snapshot);
        let balances_valid = Arc::clone(&self.balances_valid);
        let interval = self.refresh_interval;
        let flag = Arc::clone(&shutdown_flag);

        let refresh = tokio::spawn(async move {
            while flag.load(Ordering::Acquire) {
                tokio::time::sleep(interval).await;
                if !flag.load(Ordering::Acquire) {
                    break;
                }
                refresh_once(&exchange, &snapshot, &balances_valid).await;
            }
            info!("[OrderBook] refresh task stopped");
        });
        *self.refresh_handle.lock() = Some(refresh);

        if let Some(mut command_rx) = self.command_rx.lock().take() {
            let exchange = Arc::clone(&self.exchange);
            let max_workers = self.max_workers;
            let worker = tokio::spawn(async move {
                while let Some(command) = command_rx.recv().await {
                    match command {
                        Command::Cancel(orders) => {
                            run_cancels(&exchange, max_workers, orders).await;
                        }
                        Command::Place(orders) => {
                            run_places(&exchange, max_workers, orders).await;
                        }
                        Command::CancelAll(done) => {
                            if let Err(e) = exchange.submit_cancel_all().await {
                                warn!("[OrderBook] cancel-all failed: {}", e);
                            }
                            let _ = done.send(());
                        }
                        Command::Flush(done) => {
                            let _ = done.send(());
                        }
                    }
                }
            });
            *self.worker_handle.lock() = Some(worker);
        }

        info!(
            "[OrderBook] manager started: refresh every {:?}, max_workers={}",
            self.refresh_interval, self.max_workers
        );
    }

    /// One refresh cycle on demand (startup settle, tests).
    pub async fn refresh_now(&self) {
        refresh_once(&self.exchange, &self.snapshot, &self.balances_valid).await;
    }

    /// Enqueue cancellations for the given orders. Each id cancels
    /// independently; an individual failure never aborts the batch. The
    /// result shows up in a later snapshot, not immediately.
    pub fn cancel_orders(&self, orders: Vec<Order>) {
        if orders.is_empty() {
            return;
        }
        if self.command_tx.send(Command::Cancel(orders)).is_err() {
            warn!("[OrderBook] dispatcher gone, dropping cancel batch");
        }
    }

    /// Enqueue placements. Each order submits independently and is never
    /// retried within this call; the next cycle recomputes the diff.
    pub fn place_orders(&self, orders: Vec<Order>) {
        if orders.is_empty() {
            return;
        }
        if self.command_tx.send(Command::Place(orders)).is_err() {
            warn!("[OrderBook] dispatcher gone, dropping place batch");
        }
    }

    /// Best-effort cancel of every open order, bounded by
    /// [`CANCEL_ALL_TIMEOUT`]. Shutdown only; on timeout the remaining
    /// orders stay live on the exchange.
    pub async fn cancel_all_orders(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.command_tx.send(Command::CancelAll(done_tx)).is_err() {
            warn!("[OrderBook] dispatcher gone, cannot cancel all");
            return;
        }
        match timeout(CANCEL_ALL_TIMEOUT, done_rx).await {
            Ok(_) => info!("[OrderBook] cancel-all complete"),
            Err(_) => warn!(
                "[OrderBook] cancel-all timed out after {:?}; remaining orders left on the exchange",
                CANCEL_ALL_TIMEOUT
            ),
        }
    }

    /// Wait until every previously enqueued batch has been executed.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.command_tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Abort the background tasks, refresh first.
    pub async fn stop(&self) {
        let refresh = self.refresh_handle.lock().take();
        if let Some(handle) = refresh {
            handle.abort();
            let _ = handle.await;
        }
        let worker = self.worker_handle.lock().take();
        if let Some(handle) = worker {
            handle.abort();
            let _ = handle.await;
        }
        info!("[OrderBook] manager stopped");
    }
}

/// One refresh cycle: fetch orders and balances, and only if both succeed
/// and the balances are complete, publish a brand-new snapshot with a single
/// `Arc` swap. Any failure leaves the previous snapshot untouched, so
/// readers always see a fully-consistent view.
async fn refresh_once(
    exchange: &Arc<dyn ExchangeClient>,
    snapshot: &RwLock<Option<Arc<OrderBook>>>,
    balances_valid: &AtomicBool,
) {
    let orders = match exchange.fetch_open_orders().await {
        Ok(orders) => orders,
        Err(e) => {
            warn!("[OrderBook] order fetch failed, keeping previous snapshot: {}", e);
            return;
        }
    };
    let balances = match exchange.fetch_balances().await {
        Ok(balances) => balances,
        Err(e) => {
            warn!("[OrderBook] balance fetch failed, keeping previous snapshot: {}", e);
            return;
        }
    };
    if !balances.is_complete() {
        // A successful fetch with an unknown key invalidates reads until a
        // complete fetch comes through.
        balances_valid.store(false, Ordering::Release);
        warn!("[OrderBook] balances incomplete, snapshot not published");
        return;
    }

    let book = Arc::new(OrderBook::new(orders, balances));
    debug!(
        "[OrderBook] snapshot published: {} open orders, collateral {:?}",
        book.orders.len(),
        book.balances.collateral
    );
    *snapshot.write() = Some(book);
    balances_valid.store(true, Ordering::Release);
}

async fn run_cancels(exchange: &Arc<dyn ExchangeClient>, max_workers: usize, orders: Vec<Order>) {
    let semaphore = Arc::new(Semaphore::new(max_workers));
    let tasks = orders.into_iter().map(|order| {
        let exchange = Arc::clone(exchange);
        let semaphore = Arc::clone(&semaphore);
        async move {
            let Ok(_permit) = semaphore.acquire().await else {
                return;
            };
            let Some(id) = order.id.as_deref() else {
                warn!("[OrderBook] cannot cancel order without id: {}", order);
                return;
            };
            match exchange.submit_cancel(id).await {
                Ok(()) => debug!("[OrderBook] cancelled {}", order),
                Err(e) => warn!("[OrderBook] cancel of {} failed: {}", order, e),
            }
        }
    });
    join_all(tasks).await;
}

async fn run_places(exchange: &Arc<dyn ExchangeClient>, max_workers: usize, orders: Vec<Order>) {
    let semaphore = Arc::new(Semaphore::new(max_workers));
    let tasks = orders.into_iter().map(|order| {
        let exchange = Arc::clone(exchange);
        let semaphore = Arc::clone(&semaphore);
        async move {
            let Ok(_permit) = semaphore.acquire().await else {
                return;
            };
            match exchange.submit_place(&order).await {
                Ok(id) => debug!("[OrderBook] placed {} as {}", order, id),
                Err(e) => warn!("[OrderBook] placement of {} failed: {}", order, e),
            }
        }
    });
    join_all(tasks).await;
}
