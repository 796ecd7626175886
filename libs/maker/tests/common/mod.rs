//! Common test utilities for maker integration tests

use maker::{Band, BandsConfig, OrderBookManager, PaperExchange, StrategyConfig};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// The two-band fixture from the strategy worked example.
pub fn two_band_config() -> StrategyConfig {
    StrategyConfig::Bands(BandsConfig {
        bands: vec![
            Band {
                min_margin: 0.005,
                avg_margin: 0.01,
                max_margin: 0.02,
                min_amount: 5.0,
                avg_amount: 6.0,
                max_amount: 8.0,
            },
            Band {
                min_margin: 0.02,
                avg_margin: 0.03,
                max_margin: 0.04,
                min_amount: 5.0,
                avg_amount: 7.0,
                max_amount: 10.0,
            },
        ],
    })
}

/// An order book manager wired to the paper exchange, with its dispatcher
/// running and a refresh interval long enough to stay out of the way.
pub async fn started_manager(
    exchange: Arc<PaperExchange>,
) -> (Arc<OrderBookManager>, Arc<AtomicBool>) {
    let manager = Arc::new(OrderBookManager::new(
        exchange,
        Duration::from_secs(3600),
        1,
    ));
    let flag = Arc::new(AtomicBool::new(true));
    manager.start(Arc::clone(&flag)).await;
    (manager, flag)
}
