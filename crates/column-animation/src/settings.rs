// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use column_config::ColumnConfig;
use std::time::Duration;

use crate::controls::ControlState;
use crate::error::AnimationResult;
use crate::phase::Phase;
use crate::pulse::PulseParams;

/// Runtime parameters of the animation engine
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSettings {
    pub phase_dwell: Duration,
    pub frame_interval: Duration,
    pub pulse: PulseParams,
    pub particle_step: f64,
    pub particle_seed: Option<u64>,
    pub marker_radius: f64,
    pub controls: ControlState,
    pub initial_phase: Phase,
    pub autoplay: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            phase_dwell: Duration::from_millis(1400),
            frame_interval: Duration::from_secs_f64(1.0 / 60.0),
            pulse: PulseParams::default(),
            particle_step: 0.006,
            particle_seed: None,
            marker_radius: 2.2,
            controls: ControlState::default(),
            initial_phase: Phase::All,
            autoplay: false,
        }
    }
}

impl AnimationSettings {
    /// Build settings from a loaded (and validated) configuration
    pub fn from_config(config: &ColumnConfig) -> AnimationResult<Self> {
        let pulse = &config.pulse;
        let controls = &config.controls;

        Ok(Self {
            phase_dwell: config.phase_dwell(),
            frame_interval: config.frame_interval(),
            pulse: PulseParams {
                rate: pulse.rate,
                width_gain: pulse.width_gain,
                opacity_floor: pulse.opacity_floor,
                opacity_gain: pulse.opacity_gain,
                opacity_ceiling: pulse.opacity_ceiling,
            },
            particle_step: config.particles.step_per_frame,
            particle_seed: config.particles.seed,
            marker_radius: config.particles.marker_radius,
            controls: ControlState {
                show_feedforward: controls.show_feedforward,
                show_feedback: controls.show_feedback,
                show_recurrent: controls.show_recurrent,
                animate_particles: controls.animate_particles,
                show_labels: controls.show_labels,
            },
            initial_phase: controls.initial_phase.parse()?,
            autoplay: controls.autoplay,
        })
    }
}
