// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shared pulse oscillation and the width/opacity modulation of active edges.

use serde::{Deserialize, Serialize};

/// Oscillation and modulation constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseParams {
    /// Radians per frame tick
    pub rate: f64,
    /// Extra width at full pulse, as a fraction of the base width
    pub width_gain: f64,
    pub opacity_floor: f64,
    pub opacity_gain: f64,
    pub opacity_ceiling: f64,
}

impl Default for PulseParams {
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

/// Rendered stroke of one edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub width: f64,
    pub opacity: f64,
}

impl PulseParams {
    /// Pulse intensity in [0, 1] for a frame tick, shared by every edge of the frame
    pub fn pulse_at(&self, tick: u64) -> f64 {
        0.5 + 0.5 * (tick as f64 * self.rate).sin()
    }

    /// Stroke for an edge with static `base_width`
    ///
    /// Inactive edges keep their base width at full opacity. `base_width` must be the
    /// declared width, never a previously modulated one.
    pub fn modulate(&self, base_width: f64, active: bool, pulse: f64) -> EdgeStyle {
        if !active {
            return EdgeStyle {
                width: base_width,
                opacity: 1.0,
            };
        }
        EdgeStyle {
            width: base_width * (1.0 + self.width_gain * pulse),
            opacity: (self.opacity_floor + self.opacity_gain * pulse).min(self.opacity_ceiling),
        }
    }
}
