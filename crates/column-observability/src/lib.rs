// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # column-observability
//!
//! Logging setup shared by every cortical column crate, with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: per-crate JSON log files with rotation and retention (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "column-config",
    "column-structures",
    "column-animation",
    "cortical-column",
];

/// Tracing target for a crate name (`column-animation` -> `column_animation`)
pub fn tracing_target(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_target() {
        assert_eq!(tracing_target("column-animation"), "column_animation");
        assert_eq!(tracing_target("cortical_column"), "cortical_column");
    }
}
