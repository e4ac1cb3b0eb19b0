// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # column-animation
//!
//! Animation and highlight engine for the cortical column diagram.
//!
//! - [`PhaseClock`]: cycles infer → predict → update on a fixed dwell while playing
//! - [`FrameClock`]: per-frame tick driving the pulse oscillation
//! - [`activity`]: which edges pulse in a phase, and which are drawn at all
//! - [`ParticleAdvancer`]: per-edge markers travelling along each edge path
//! - [`PulseParams`]: shared oscillation and width/opacity modulation
//! - [`ColumnAnimator`]: combines all of the above into one [`RenderFrame`] per step
//! - [`FrameLoopRunner`]: runs the animator on a dedicated frame loop thread
//!
//! No neural dynamics are simulated; activity is a presentation schedule keyed on the phase.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Instant;
//! use column_animation::{AnimationSettings, ColumnAnimator, ControlCommand, Phase};
//! use column_structures::Topology;
//!
//! let topology = Arc::new(Topology::cortical_column().unwrap());
//! let now = Instant::now();
//! let mut animator = ColumnAnimator::new(topology, &AnimationSettings::default(), now).unwrap();
//!
//! animator.apply(ControlCommand::SetPlaying(true), now);
//! let frame = animator.step(now);
//! assert_eq!(frame.snapshot.phase, Phase::Infer);
//! assert!(frame.edge("T_to_L4E").unwrap().active);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod activity;
pub mod animator;
pub mod controls;
pub mod error;
pub mod frame_clock;
pub mod frame_loop_runner;
pub mod geometry;
pub mod particles;
pub mod phase;
pub mod phase_clock;
pub mod pulse;
pub mod settings;
pub mod svg;
pub mod svg_writer;

pub use activity::{is_active, is_edge_active, is_visible};
pub use animator::{ColumnAnimator, EdgeRender, FrameSnapshot, NodeRender, RenderFrame};
pub use controls::{ControlCommand, ControlQueue, ControlState, Toggle};
pub use error::{AnimationError, AnimationResult};
pub use frame_clock::FrameClock;
pub use frame_loop_runner::{FrameLoopRunner, FramePublisher};
pub use geometry::{CubicSegment, EdgePath, EdgeShape};
pub use particles::ParticleAdvancer;
pub use phase::Phase;
pub use phase_clock::{PhaseClock, PhaseListener};
pub use pulse::{EdgeStyle, PulseParams};
pub use settings::AnimationSettings;
pub use svg::{render_svg, SvgOptions};
pub use svg_writer::SvgSnapshotWriter;
