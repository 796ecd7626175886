//! Engine-wide constants.

use std::time::Duration;

/// Decimal places prices are rounded to.
pub const MAX_DECIMALS: u32 = 3;

/// Decimal places order sizes are rounded to.
pub const SIZE_DECIMALS: u32 = 2;

/// Smallest order size the exchange accepts; anything below is not quoted.
pub const MIN_SIZE: f64 = 1.0;

/// Scaling factor for integer price keys (4 decimals covers the price tick).
pub const PRICE_KEY_SCALE: f64 = 10_000.0;

/// Most rungs an AMM ladder side may hold; bounds the work per cycle and
/// rejects a `delta` too small for the configured `depth`.
pub const MAX_LADDER_RUNGS: usize = 100;

/// Upper bound on the shutdown cancel-all wait; remaining orders are
/// abandoned to the exchange after this.
pub const CANCEL_ALL_TIMEOUT: Duration = Duration::from_secs(10);
