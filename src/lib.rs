//! Poly Maker Keeper - Main Library
//!
//! Thin composition layer over the `maker` workspace crate: re-exports the
//! reconciliation engine and provides shared helpers for the binaries.

pub use maker;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{load_config_from_env, parse_args, ConfigType};
}
