// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Phase clock: cycles infer → predict → update on a fixed dwell while playing.

The clock does not own a timer thread. Whoever drives the frame loop calls [`PhaseClock::poll`]
with the current instant, so phase changes happen on the same loop that renders frames and
a stopped clock can never emit late. Time is passed in explicitly, which also lets tests and
headless runs drive it with a simulated clock.
*/

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::phase::Phase;

/// Callback invoked with every phase the clock emits or is set to
pub type PhaseListener = Arc<dyn Fn(Phase) + Send + Sync>;

pub struct PhaseClock {
    dwell: Duration,
    current: Phase,
    cycle_index: usize,
    /// Deadline of the next automatic advance; `None` while stopped
    next_tick: Option<Instant>,
    listeners: Vec<PhaseListener>,
}

impl PhaseClock {
    /// Create a stopped clock holding `initial`
    ///
    /// A zero dwell is raised to one millisecond.
    pub fn new(dwell: Duration, initial: Phase) -> Self {
        Self {
            dwell: dwell.max(Duration::from_millis(1)),
            current: initial,
            cycle_index: 0,
            next_tick: None,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for phase changes
    pub fn subscribe(&mut self, listener: PhaseListener) {
        self.listeners.push(listener);
    }

    /// Start cycling at `now`; the first phase is emitted immediately
    ///
    /// Restarting a running clock begins again from the first phase.
    pub fn start(&mut self, now: Instant) {
        self.cycle_index = 0;
        self.next_tick = Some(now + self.dwell);
        info!(
            "[PHASE-CLOCK] Playback started ({} ms dwell)",
            self.dwell.as_millis()
        );
        self.emit(Phase::CYCLE[0]);
    }

    /// Cancel automatic advancing; the current phase is kept as is
    pub fn stop(&mut self) {
        if self.next_tick.take().is_some() {
            info!("[PHASE-CLOCK] Playback stopped at phase '{}'", self.current);
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Manual selection; visible until the next automatic advance if running
    pub fn set_phase(&mut self, phase: Phase) {
        debug!("[PHASE-CLOCK] Phase set to '{}'", phase);
        self.emit(phase);
    }

    /// Advance through every dwell deadline that has passed by `now`
    ///
    /// Returns `true` if at least one automatic advance happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut advanced = false;
        while let Some(deadline) = self.next_tick {
            if now < deadline {
                break;
            }
            self.cycle_index = (self.cycle_index + 1) % Phase::CYCLE.len();
            self.next_tick = Some(deadline + self.dwell);
            self.emit(Phase::CYCLE[self.cycle_index]);
            advanced = true;
        }
        advanced
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Deadline of the next automatic advance, if running
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    fn emit(&mut self, phase: Phase) {
        self.current = phase;
        for listener in &self.listeners {
            listener(phase);
        }
    }
}

impl std::fmt::Debug for PhaseClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseClock")
            .field("dwell", &self.dwell)
            .field("current", &self.current)
            .field("running", &self.is_running())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
