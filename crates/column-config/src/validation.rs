// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are within valid ranges before any clock or loop is built
//! from them. All problems are collected and reported together.

use crate::{ColumnConfig, ConfigError, ConfigResult};

/// Phase names accepted by `controls.initial_phase`
pub const PHASE_NAMES: &[&str] = &["infer", "predict", "update", "all"];

/// Lowest accepted `animation.frame_rate_hz` (one frame every 100 seconds)
pub const MIN_FRAME_RATE_HZ: f64 = 0.01;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every failed check
pub fn validate_config(config: &ColumnConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_clocks(config, &mut errors);
    validate_pulse(config, &mut errors);
    validate_particles(config, &mut errors);
    validate_controls(config, &mut errors);
    validate_render(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn invalid(field: &str, reason: &str) -> ConfigValidationError {
    ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_clocks(config: &ColumnConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.animation.phase_dwell_ms == 0 {
        errors.push(invalid("animation.phase_dwell_ms", "must be positive"));
    }

    let hz = config.animation.frame_rate_hz;
    if !hz.is_finite() || hz < MIN_FRAME_RATE_HZ {
        errors.push(invalid(
            "animation.frame_rate_hz",
            "must be finite and at least 0.01",
        ));
    }
}

fn validate_pulse(config: &ColumnConfig, errors: &mut Vec<ConfigValidationError>) {
    let pulse = &config.pulse;
    if !pulse.rate.is_finite() {
        errors.push(invalid("pulse.rate", "must be finite"));
    }
    if !pulse.width_gain.is_finite() || pulse.width_gain < 0.0 {
        errors.push(invalid("pulse.width_gain", "must be finite and >= 0"));
    }
    for (field, value) in [
        ("pulse.opacity_floor", pulse.opacity_floor),
        ("pulse.opacity_ceiling", pulse.opacity_ceiling),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(invalid(field, "must be between 0.0 and 1.0"));
        }
    }
    if pulse.opacity_floor > pulse.opacity_ceiling {
        errors.push(invalid(
            "pulse.opacity_floor",
            "must not exceed pulse.opacity_ceiling",
        ));
    }
    if !pulse.opacity_gain.is_finite() || pulse.opacity_gain < 0.0 {
        errors.push(invalid("pulse.opacity_gain", "must be finite and >= 0"));
    }
}

fn validate_particles(config: &ColumnConfig, errors: &mut Vec<ConfigValidationError>) {
    let step = config.particles.step_per_frame;
    if !(step > 0.0 && step < 1.0) {
        errors.push(invalid(
            "particles.step_per_frame",
            "must be between 0.0 and 1.0 (exclusive)",
        ));
    }
    if !(config.particles.marker_radius > 0.0) {
        errors.push(invalid("particles.marker_radius", "must be positive"));
    }
}

fn validate_controls(config: &ColumnConfig, errors: &mut Vec<ConfigValidationError>) {
    let phase = config.controls.initial_phase.as_str();
    if phase.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "controls.initial_phase".to_string(),
        });
    } else if !PHASE_NAMES.contains(&phase) {
        errors.push(invalid(
            "controls.initial_phase",
            "must be one of 'infer', 'predict', 'update', 'all'",
        ));
    }
}

fn validate_render(config: &ColumnConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.render.snapshot_every == 0 {
        errors.push(invalid("render.snapshot_every", "must be at least 1"));
    }
    if config.render.view_width == 0 || config.render.view_height == 0 {
        errors.push(invalid("render.view_width/view_height", "must be positive"));
    }
}
