// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Monotonic per-frame tick counter
///
/// Advanced once per rendered frame, whether or not phases are playing. Only the pulse
/// oscillation reads it.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    tick: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Move to the next frame and return the new tick
    pub fn advance(&mut self) -> u64 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }
}
