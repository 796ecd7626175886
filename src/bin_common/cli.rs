//! CLI utilities for binaries
//!
//! Handles configuration loading and environment variables
//! for the keeper executables.

use std::path::PathBuf;

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Keeper configuration (config/keeper.yaml)
    Keeper,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Keeper => "config/keeper.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Environment variable that overrides the path
    pub fn env_var_name(&self) -> &str {
        match self {
            ConfigType::Keeper => "KEEPER_CONFIG_PATH",
            ConfigType::Custom(_) => "CONFIG_PATH",
        }
    }
}

/// Load the configuration path from the environment or fall back to the
/// default for the config type.
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    std::env::var(config_type.env_var_name())
        .unwrap_or_else(|_| config_type.default_path().to_string())
        .into()
}

/// Command line arguments, excluding the program name.
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_type_paths() {
        assert_eq!(ConfigType::Keeper.default_path(), "config/keeper.yaml");

        let custom = ConfigType::Custom("custom/path.yaml".to_string());
        assert_eq!(custom.default_path(), "custom/path.yaml");
    }

    #[test]
    fn test_config_type_env_vars() {
        assert_eq!(ConfigType::Keeper.env_var_name(), "KEEPER_CONFIG_PATH");
        assert_eq!(
            ConfigType::Custom("x".into()).env_var_name(),
            "CONFIG_PATH"
        );
    }
}
