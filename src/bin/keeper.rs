//! Keeper Binary - Market-Maker Control Loop
//!
//! Runs the order-book reconciliation engine in paper mode: an in-memory
//! exchange, a static price feed driven by a small random walk, and the
//! configured pricing strategy. Graceful shutdown cancels all resting
//! orders before exit.
//!
//! Usage:
//!   KEEPER_CONFIG_PATH=config/keeper.yaml ./keeper

use anyhow::Result;
use maker::{
    Balances, Heartbeat, KeeperConfig, OrderBookManager, PaperExchange, ShutdownManager,
    StaticPriceFeed, StrategyManager,
};
use poly_maker_keeper::bin_common::{load_config_from_env, ConfigType};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load config
    let config_path = load_config_from_env(ConfigType::Keeper);
    let config = KeeperConfig::load(&config_path)?;

    // Initialize logging
    maker::init_tracing(&config.log_level);
    config.log();
    print_banner(config.strategy.name());

    let shutdown = Arc::new(ShutdownManager::new());
    shutdown.spawn_signal_handler();

    // Paper collaborators
    let exchange = Arc::new(PaperExchange::new(Balances::known(
        config.paper.collateral_balance,
        config.paper.token_a_balance,
        config.paper.token_b_balance,
    )));
    let feed = Arc::new(StaticPriceFeed::new(config.paper.initial_price));

    // Engine
    let book_manager = Arc::new(OrderBookManager::new(
        exchange.clone(),
        Duration::from_secs_f64(config.refresh_interval_secs),
        config.max_workers,
    ));
    book_manager.start(shutdown.flag()).await;

    let strategy_manager =
        StrategyManager::new(&config.strategy, feed.clone(), Arc::clone(&book_manager))?;

    info!(
        "[Keeper] settling for {:.1}s before trading...",
        config.startup_delay_secs
    );
    shutdown
        .interruptible_sleep(Duration::from_secs_f64(config.startup_delay_secs))
        .await;

    // Main loop: synchronize every sync interval until shutdown
    let sync_interval = Duration::from_secs_f64(config.sync_interval_secs);
    let mut heartbeat = Heartbeat::new(config.heartbeat_interval_secs);

    while shutdown.is_running() {
        strategy_manager.synchronize().await;

        if heartbeat.should_beat() {
            heartbeat.beat();
            match book_manager.get_order_book() {
                Ok(book) => info!(
                    "[Keeper] heartbeat: {} open orders, target price {:.3}",
                    book.orders.len(),
                    feed.price()
                ),
                Err(e) => info!("[Keeper] heartbeat: no snapshot ({})", e),
            }
        }

        walk_price(&feed, config.paper.price_drift);
        shutdown.interruptible_sleep(sync_interval).await;
    }

    info!("[Keeper] shutting down...");
    book_manager.cancel_all_orders().await;
    book_manager.stop().await;
    print_shutdown();
    Ok(())
}

/// Nudge the static feed so the paper keeper keeps re-quoting.
fn walk_price(feed: &StaticPriceFeed, drift: f64) {
    if drift <= 0.0 {
        return;
    }
    let step = rand::thread_rng().gen_range(-drift..=drift);
    let next = (feed.price() + step).clamp(0.01, 0.99);
    feed.set_price(next);
}

fn print_banner(strategy: &str) {
    info!("");
    info!("========================================");
    info!("Keeper - Market Maker");
    info!("  Strategy: {}", strategy);
    info!("  Mode: paper");
    info!("  Press Ctrl+C to stop");
    info!("========================================");
    info!("");
}

fn print_shutdown() {
    info!("");
    info!("========================================");
    info!("Keeper stopped");
    info!("========================================");
}
