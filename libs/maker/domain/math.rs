//! Float rounding helpers.
//!
//! Prices and sizes are plain `f64` with fixed decimal rounding; integer
//! price keys give `Eq + Hash` identity without float-equality hazards.

use crate::constants::PRICE_KEY_SCALE;

/// Round half-away-from-zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Round toward zero to `decimals` places. Used for budget-derived sizes so
/// a ladder never exceeds its funding.
pub fn round_down(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).floor() / scale
}

/// Integer key for a price, on a fixed 4-decimal grid.
pub fn price_to_key(price: f64) -> i64 {
    (price * PRICE_KEY_SCALE).round() as i64
}

/// Inverse of [`price_to_key`].
pub fn key_to_price(key: i64) -> f64 {
    key as f64 / PRICE_KEY_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_half_up() {
        assert_eq!(round_to(0.0855, 3), 0.086);
        assert_eq!(round_to(0.0854, 3), 0.085);
        assert_eq!(round_to(1.005, 2), 1.01);
    }

    #[test]
    fn round_down_never_exceeds() {
        assert_eq!(round_down(4.999, 2), 4.99);
        assert_eq!(round_down(4.991, 2), 4.99);
        assert!(round_down(7.123456, 2) <= 7.123456);
    }

    #[test]
    fn price_key_round_trips_on_grid() {
        for price in [0.001, 0.055, 0.075, 0.5, 0.915, 0.999] {
            assert_eq!(key_to_price(price_to_key(price)), price);
        }
    }

    #[test]
    fn nearby_prices_map_to_distinct_keys() {
        assert_ne!(price_to_key(0.085), price_to_key(0.086));
    }
}
