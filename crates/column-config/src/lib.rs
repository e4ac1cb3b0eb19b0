// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Cortical Column Configuration
//!
//! Type-safe configuration loader for the cortical column visualizer with support for:
//! - TOML file parsing (`column_configuration.toml`)
//! - Environment variable overrides (`COLUMN_*`)
//! - CLI argument overrides
//!
//! ## Usage
//!
//! ```rust,no_run
//! use column_config::load_config_or_default;
//!
//! let config = load_config_or_default(None, None).expect("Failed to load config");
//!
//! println!("Phase dwell: {} ms", config.animation.phase_dwell_ms);
//! println!("Frame rate: {} Hz", config.animation.frame_rate_hz);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name searched for when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "column_configuration.toml";

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    load_config_or_default,
};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = ColumnConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: ColumnConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.animation.phase_dwell_ms, 1400);
        assert_eq!(parsed.controls.initial_phase, "all");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err: ConfigError = toml::from_str::<ColumnConfig>("[animation\nphase_dwell_ms = 3")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
