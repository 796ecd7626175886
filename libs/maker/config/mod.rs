//! Keeper configuration
//!
//! Strongly-typed configuration, rejected eagerly at load time rather than
//! deep inside a strategy computation. YAML and JSON files are both
//! accepted, chosen by extension.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level keeper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds between synchronize cycles
    #[serde(default = "default_sync_interval")]
    pub sync_interval_secs: f64,

    /// Seconds between background order book refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: f64,

    /// Outbound concurrency within one cancel/place batch. 1 preserves
    /// submission order to the exchange.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Startup settle delay so the first refresh lands before trading
    #[serde(default = "default_startup_delay")]
    pub startup_delay_secs: f64,

    /// Heartbeat log interval
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    /// Paper exchange setup
    #[serde(default)]
    pub paper: PaperConfig,

    /// Active pricing strategy
    pub strategy: StrategyConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sync_interval() -> f64 {
    5.0
}

fn default_refresh_interval() -> f64 {
    1.0
}

fn default_max_workers() -> usize {
    1
}

fn default_startup_delay() -> f64 {
    5.0
}

fn default_heartbeat_interval() -> u64 {
    60
}

/// Paper-mode exchange and price feed setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperConfig {
    #[serde(default = "default_collateral")]
    pub collateral_balance: f64,

    #[serde(default)]
    pub token_a_balance: f64,

    #[serde(default)]
    pub token_b_balance: f64,

    /// Starting price of token A
    #[serde(default = "default_initial_price")]
    pub initial_price: f64,

    /// Max per-cycle random walk step applied to the static feed
    #[serde(default = "default_price_drift")]
    pub price_drift: f64,
}

fn default_collateral() -> f64 {
    18.0
}

fn default_initial_price() -> f64 {
    0.085
}

fn default_price_drift() -> f64 {
    0.002
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            collateral_balance: default_collateral(),
            token_a_balance: 0.0,
            token_b_balance: 0.0,
            initial_price: default_initial_price(),
            price_drift: default_price_drift(),
        }
    }
}

/// Closed strategy selection, dispatched once at construction. No runtime
/// string matching inside the hot loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StrategyConfig {
    Amm(AmmConfig),
    Bands(BandsConfig),
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            StrategyConfig::Amm(config) => config.validate(),
            StrategyConfig::Bands(config) => config.validate(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyConfig::Amm(_) => "amm",
            StrategyConfig::Bands(_) => "bands",
        }
    }
}

/// AMM ladder parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmmConfig {
    /// Lowest quotable price
    pub p_min: f64,
    /// Highest quotable price
    pub p_max: f64,
    /// Distance of the first rung from the target price
    pub spread: f64,
    /// Price step between rungs
    pub delta: f64,
    /// Ladder height from the target price
    pub depth: f64,
    /// Collateral cap put to work across both tokens
    pub max_collateral: f64,
}

impl AmmConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0 < self.p_min && self.p_min < 1.0) {
            return Err(ConfigError::ValidationError(
                "p_min must be in (0, 1)".to_string(),
            ));
        }
        if !(0.0 < self.p_max && self.p_max < 1.0) {
            return Err(ConfigError::ValidationError(
                "p_max must be in (0, 1)".to_string(),
            ));
        }
        if self.p_min >= self.p_max {
            return Err(ConfigError::ValidationError(
                "p_min must be less than p_max".to_string(),
            ));
        }
        if self.spread < 0.0 {
            return Err(ConfigError::ValidationError(
                "spread must be non-negative".to_string(),
            ));
        }
        if self.delta <= 0.0 {
            return Err(ConfigError::ValidationError(
                "delta must be positive".to_string(),
            ));
        }
        if self.depth <= 0.0 {
            return Err(ConfigError::ValidationError(
                "depth must be positive".to_string(),
            ));
        }
        if self.max_collateral <= 0.0 {
            return Err(ConfigError::ValidationError(
                "max_collateral must be positive".to_string(),
            ));
        }
        // A delta far smaller than the quoting range would generate an
        // unbounded ladder and stall the cycle.
        let rungs = (self.spread + self.depth) / self.delta;
        if rungs > crate::constants::MAX_LADDER_RUNGS as f64 {
            return Err(ConfigError::ValidationError(format!(
                "delta {} is too small for spread {} + depth {}: ladder would exceed {} rungs",
                self.delta,
                self.spread,
                self.depth,
                crate::constants::MAX_LADDER_RUNGS
            )));
        }
        Ok(())
    }
}

/// Bands strategy parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandsConfig {
    pub bands: Vec<Band>,
}

/// One (margin, amount) rule producing at most one quote on each side of
/// the target price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Band {
    pub min_margin: f64,
    pub avg_margin: f64,
    pub max_margin: f64,
    pub min_amount: f64,
    pub avg_amount: f64,
    pub max_amount: f64,
}

impl BandsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bands.is_empty() {
            return Err(ConfigError::ValidationError(
                "bands list must not be empty".to_string(),
            ));
        }
        for (i, band) in self.bands.iter().enumerate() {
            band.validate()
                .map_err(|e| ConfigError::ValidationError(format!("band {}: {}", i, e)))?;
        }
        Ok(())
    }
}

impl Band {
    fn validate(&self) -> std::result::Result<(), String> {
        if !(0.0 < self.min_margin && self.max_margin < 1.0) {
            return Err("margins must be in (0, 1)".to_string());
        }
        if !(self.min_margin <= self.avg_margin && self.avg_margin <= self.max_margin) {
            return Err("margins must satisfy min <= avg <= max".to_string());
        }
        if self.min_amount <= 0.0 {
            return Err("min_amount must be positive".to_string());
        }
        if !(self.min_amount <= self.avg_amount && self.avg_amount <= self.max_amount) {
            return Err("amounts must satisfy min <= avg <= max".to_string());
        }
        Ok(())
    }
}

impl KeeperConfig {
    /// Load and validate a config file. `.json` parses as JSON, anything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: KeeperConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sync_interval_secs <= 0.0 {
            return Err(ConfigError::ValidationError(
                "sync_interval_secs must be positive".to_string(),
            ));
        }
        if self.refresh_interval_secs <= 0.0 {
            return Err(ConfigError::ValidationError(
                "refresh_interval_secs must be positive".to_string(),
            ));
        }
        if self.max_workers == 0 {
            return Err(ConfigError::ValidationError(
                "max_workers must be at least 1".to_string(),
            ));
        }
        self.strategy.validate()
    }

    /// Log the loaded configuration at startup.
    pub fn log(&self) {
        info!("[Config] strategy: {}", self.strategy.name());
        info!(
            "[Config] sync every {:.1}s, refresh every {:.1}s, max_workers={}",
            self.sync_interval_secs, self.refresh_interval_secs, self.max_workers
        );
        info!(
            "[Config] paper: collateral {:.2}, tokens {:.2}/{:.2}, price {:.3} (drift {:.3})",
            self.paper.collateral_balance,
            self.paper.token_a_balance,
            self.paper.token_b_balance,
            self.paper.initial_price,
            self.paper.price_drift
        );
    }
}
