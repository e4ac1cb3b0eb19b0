// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # column-structures
//!
//! The static side of the cortical column diagram: typed nodes (excitatory/inhibitory
//! populations, thalamic relay, apical sites, output sinks), typed signal edges and the
//! immutable [`Topology`] that owns them.
//!
//! A topology is validated once when it is built; every edge endpoint must name an existing
//! node. Nothing here changes after construction.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod topology;

pub use error::{TopologyError, TopologyResult};
pub use topology::*;
