// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # cortical-column
//!
//! Animated cortical column microcircuit: a fixed six-layer circuit of neural populations whose
//! connections pulse and carry moving markers according to the current processing phase
//! (inference, prediction, error-driven update).
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Instant;
//! use cortical_column::prelude::*;
//!
//! let topology = Arc::new(Topology::cortical_column().unwrap());
//! let now = Instant::now();
//! let mut animator = ColumnAnimator::new(topology, &AnimationSettings::default(), now).unwrap();
//!
//! animator.apply(ControlCommand::SetPlaying(true), now);
//! let frame = animator.step(now);
//! assert_eq!(frame.snapshot.phase, Phase::Infer);
//! assert_eq!(frame.active_edge_ids().len(), 8);
//!
//! let svg = render_svg(animator.topology(), &frame, &SvgOptions::default());
//! assert!(svg.contains("Layer IV"));
//! ```
//!
//! ## Feature Flags
//!
//! - `file-logging`: per-crate JSON log files with retention (desktop only)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  cortical-column (binary)                               │
//! │  (headless frames, JSON lines, SVG snapshots, realtime) │
//! └─────────────────────────────────────────────────────────┘
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  column-animation                                       │
//! │  (phase/frame clocks, activity policy, particles,       │
//! │   pulse, animator, frame loop runner, SVG)              │
//! └─────────────────────────────────────────────────────────┘
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  column-structures                                      │
//! │  (nodes, edges, layers, topology store)                 │
//! └─────────────────────────────────────────────────────────┘
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  column-config / column-observability                   │
//! │  (TOML configuration, logging and debug flags)          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use column_config as config;
pub use column_observability as observability;

// Re-export data layer
pub use column_structures as structures;

// Re-export algorithms
pub use column_animation as animation;

use column_config::ColumnConfig;
use column_structures::{Topology, TopologyResult};
use tracing::info;

/// Load the topology named by `config.topology.path`, or the built-in cortical column
pub fn load_topology(config: &ColumnConfig) -> TopologyResult<Topology> {
    match &config.topology.path {
        Some(path) => Topology::from_json_file(path),
        None => {
            let topology = Topology::cortical_column()?;
            info!(
                "[TOPOLOGY] Using built-in cortical column ({} nodes, {} edges)",
                topology.nodes().len(),
                topology.edges().len()
            );
            Ok(topology)
        }
    }
}

/// SVG options from the render and particle sections of the configuration
pub fn svg_options(config: &ColumnConfig) -> animation::SvgOptions {
    animation::SvgOptions {
        view_width: config.render.view_width,
        view_height: config.render.view_height,
        marker_radius: config.particles.marker_radius,
    }
}

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{load_config_or_default, validate_config, ColumnConfig};
    pub use crate::structures::{
        CorticalLayer, Edge, EdgeKind, LoopMembership, Node, NodeKind, Point2D, Topology,
    };
    pub use crate::animation::{
        is_active, is_visible, render_svg, AnimationSettings, ColumnAnimator, ControlCommand,
        ControlQueue, ControlState, FrameLoopRunner, FramePublisher, Phase, RenderFrame,
        SvgOptions, SvgSnapshotWriter, Toggle,
    };
}
