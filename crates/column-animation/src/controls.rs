// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Control panel state and the command queue that feeds it into the frame loop.

UI threads push [`ControlCommand`]s into a [`ControlQueue`]; the frame loop drains the queue
once at the start of every frame, so all edges of a frame observe the same toggle and phase
snapshot.
*/

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::phase::Phase;

/// The five user toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub show_feedforward: bool,
    pub show_feedback: bool,
    /// Covers both recurrent and inhibitory edges
    pub show_recurrent: bool,
    pub animate_particles: bool,
    pub show_labels: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            show_feedforward: true,
            show_feedback: true,
            show_recurrent: true,
            animate_particles: true,
            show_labels: true,
        }
    }
}

/// Names one of the [`ControlState`] toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    Feedforward,
    Feedback,
    Recurrent,
    Particles,
    Labels,
}

impl ControlState {
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Feedforward => self.show_feedforward,
            Toggle::Feedback => self.show_feedback,
            Toggle::Recurrent => self.show_recurrent,
            Toggle::Particles => self.animate_particles,
            Toggle::Labels => self.show_labels,
        }
    }

    pub fn set(&mut self, toggle: Toggle, value: bool) {
        let slot = match toggle {
            Toggle::Feedforward => &mut self.show_feedforward,
            Toggle::Feedback => &mut self.show_feedback,
            Toggle::Recurrent => &mut self.show_recurrent,
            Toggle::Particles => &mut self.animate_particles,
            Toggle::Labels => &mut self.show_labels,
        };
        *slot = value;
    }

    /// Invert a toggle and return its new value
    pub fn flip(&mut self, toggle: Toggle) -> bool {
        let value = !self.get(toggle);
        self.set(toggle, value);
        value
    }
}

/// A single control panel action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum ControlCommand {
    SetToggle(Toggle, bool),
    FlipToggle(Toggle),
    SelectPhase(Phase),
    SetPlaying(bool),
    TogglePlaying,
}

impl ControlCommand {
    /// Keyboard shortcuts: F, B, R and P flip the feedforward, feedback, recurrent and
    /// particle toggles
    pub fn from_key(key: char) -> Option<Self> {
        let toggle = match key.to_ascii_lowercase() {
            'f' => Toggle::Feedforward,
            'b' => Toggle::Feedback,
            'r' => Toggle::Recurrent,
            'p' => Toggle::Particles,
            _ => return None,
        };
        Some(ControlCommand::FlipToggle(toggle))
    }
}

/// Thread-safe FIFO of pending control commands
///
/// Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct ControlQueue {
    queue: Arc<Mutex<VecDeque<ControlCommand>>>,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a command (called from UI/input threads)
    pub fn push(&self, command: ControlCommand) {
        self.queue.lock().push_back(command);
    }

    /// Take every pending command in arrival order (called from the frame loop)
    pub fn drain_all(&self) -> Vec<ControlCommand> {
        self.queue.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
