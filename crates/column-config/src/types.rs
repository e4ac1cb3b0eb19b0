// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `column_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub system: SystemConfig,
    pub animation: AnimationConfig,
    pub pulse: PulseConfig,
    pub particles: ParticleConfig,
    pub controls: ControlsConfig,
    pub topology: TopologyConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

/// System-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub log_level: String,
    pub debug: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            debug: false,
        }
    }
}

/// Clock cadence for the phase-dwell timer and the display refresh loop
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// How long each phase is held while playing
    pub phase_dwell_ms: u64,
    /// Target display refresh rate for the frame loop
    pub frame_rate_hz: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            phase_dwell_ms: 1400,
            frame_rate_hz: 60.0,
        }
    }
}

/// Shape of the shared pulse oscillation applied to active edges
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Radians advanced per frame tick
    pub rate: f64,
    /// Width multiplier at full pulse (`width = base * (1 + gain * pulse)`)
    pub width_gain: f64,
    pub opacity_floor: f64,
    pub opacity_gain: f64,
    pub opacity_ceiling: f64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            rate: 0.12,
            width_gain: 0.8,
            opacity_floor: 0.45,
            opacity_gain: 0.5,
            opacity_ceiling: 0.95,
        }
    }
}

/// Particle marker configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Fraction of the path travelled per frame
    pub step_per_frame: f64,
    /// Fixed seed for initial particle offsets (None = fresh entropy each seeding)
    pub seed: Option<u64>,
    pub marker_radius: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            step_per_frame: 0.006,
            seed: None,
            marker_radius: 2.2,
        }
    }
}

/// Initial state of the control panel
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub show_feedforward: bool,
    pub show_feedback: bool,
    pub show_recurrent: bool,
    pub animate_particles: bool,
    pub show_labels: bool,
    /// One of `infer`, `predict`, `update`, `all`
    pub initial_phase: String,
    /// Start phase playback immediately
    pub autoplay: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            show_feedforward: true,
            show_feedback: true,
            show_recurrent: true,
            animate_particles: true,
            show_labels: true,
            initial_phase: "all".to_string(),
            autoplay: false,
        }
    }
}

/// Topology source
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// JSON topology document; the built-in cortical column is used when unset
    pub path: Option<PathBuf>,
}

/// SVG snapshot output
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub output_dir: PathBuf,
    /// Write one snapshot every N frames
    pub snapshot_every: u64,
    pub view_width: u32,
    pub view_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./frames"),
            snapshot_every: 30,
            view_width: 1100,
            view_height: 780,
        }
    }
}

/// Log file retention
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file_logging: bool,
    pub log_dir: PathBuf,
    pub retention_days: u64,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_logging: false,
            log_dir: PathBuf::from("./logs"),
            retention_days: 30,
            retention_runs: 10,
        }
    }
}

impl ColumnConfig {
    /// Phase dwell as a `Duration`
    pub fn phase_dwell(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.animation.phase_dwell_ms)
    }

    /// Frame interval derived from the refresh rate (falls back to 60 Hz if unset or invalid)
    pub fn frame_interval(&self) -> std::time::Duration {
        let hz = self.animation.frame_rate_hz;
        let hz = if hz.is_finite() && hz > 0.0 { hz } else { 60.0 };
        std::time::Duration::try_from_secs_f64(1.0 / hz)
            .unwrap_or_else(|_| std::time::Duration::from_secs_f64(1.0 / 60.0))
    }
}
