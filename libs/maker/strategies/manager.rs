//! Strategy Manager
//!
//! Drives one synchronization cycle: price feed -> snapshot -> strategy ->
//! diff submission. Nothing propagates past `synchronize`; a transient data
//! gap degrades to "do nothing this cycle".

use super::{Strategy, StrategyError, TargetPrices};
use crate::config::StrategyConfig;
use crate::domain::Token;
use crate::feed::PriceFeed;
use crate::orderbook::OrderBookManager;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StrategyManager {
    strategy: Strategy,
    price_feed: Arc<dyn PriceFeed>,
    book_manager: Arc<OrderBookManager>,
}

impl StrategyManager {
    /// Fails fast with [`StrategyError::InvalidConfig`] on a bad config;
    /// the process should not start on that error.
    pub fn new(
        config: &StrategyConfig,
        price_feed: Arc<dyn PriceFeed>,
        book_manager: Arc<OrderBookManager>,
    ) -> Result<Self, StrategyError> {
        let strategy = Strategy::from_config(config)?;
        info!("[Strategy] using {} strategy", strategy.name());
        Ok(Self {
            strategy,
            price_feed,
            book_manager,
        })
    }

    /// One reconciliation cycle. Cancellations are always submitted before
    /// placements, so a resized slot never briefly exceeds its intended
    /// exposure.
    pub async fn synchronize(&self) {
        debug!("[Strategy] synchronizing...");

        let book = match self.book_manager.get_order_book() {
            Ok(book) => book,
            Err(e) => {
                debug!("[Strategy] skipping cycle: {}", e);
                return;
            }
        };

        let price_a = match self.price_feed.get_price(Token::A).await {
            Ok(price) => price,
            Err(e) => {
                warn!("[Strategy] price feed failed, skipping cycle: {}", e);
                return;
            }
        };
        let prices = TargetPrices::from_price_a(price_a);

        let diff = self.strategy.get_orders(&book, &prices);
        debug!(
            "[Strategy] diff: {} to cancel, {} to place",
            diff.to_cancel.len(),
            diff.to_place.len()
        );

        if !diff.to_cancel.is_empty() {
            info!("[Strategy] cancelling {} orders", diff.to_cancel.len());
            self.book_manager.cancel_orders(diff.to_cancel);
        }
        if !diff.to_place.is_empty() {
            info!("[Strategy] placing {} orders", diff.to_place.len());
            self.book_manager.place_orders(diff.to_place);
        }

        debug!("[Strategy] synchronized");
    }
}
