// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Per-frame animation core.

[`ColumnAnimator::step`] is a pure function of the animator state and the instant it is
given: it polls the phase clock, freezes one [`FrameSnapshot`], advances particles and derives
every edge's render attributes from that single snapshot, then advances the frame clock. The
result is a plain [`RenderFrame`] that any presentation layer can apply.
*/

use column_structures::{EdgeKind, NodeKind, Point2D, Topology, TopologyError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::activity::{is_active, is_visible};
use crate::controls::{ControlCommand, ControlState};
use crate::error::AnimationResult;
use crate::frame_clock::FrameClock;
use crate::geometry::EdgePath;
use crate::particles::ParticleAdvancer;
use crate::phase::Phase;
use crate::phase_clock::{PhaseClock, PhaseListener};
use crate::pulse::PulseParams;
use crate::settings::AnimationSettings;

/// State every edge of one frame is computed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: Phase,
    pub tick: u64,
    pub playing: bool,
    pub controls: ControlState,
}

/// Render attributes of one edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRender {
    pub id: String,
    pub kind: EdgeKind,
    pub visible: bool,
    pub active: bool,
    pub width: f64,
    pub opacity: f64,
    /// Arc-length fraction of the particle marker
    pub progress: f64,
    pub particle: Point2D,
    /// SVG path data of the edge geometry the particle travels along
    pub path: String,
}

/// Render attributes of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRender {
    pub id: String,
    pub kind: NodeKind,
    pub position: Point2D,
    /// Present only while labels are shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub snapshot: FrameSnapshot,
    /// Revision of the topology the frame was computed from
    pub topology_revision: u64,
    pub pulse: f64,
    pub edges: Vec<EdgeRender>,
    pub nodes: Vec<NodeRender>,
}

impl RenderFrame {
    pub fn edge(&self, id: &str) -> Option<&EdgeRender> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn node(&self, id: &str) -> Option<&NodeRender> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Ids of the edges pulsing in this frame
    pub fn active_edge_ids(&self) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.active)
            .map(|e| e.id.as_str())
            .collect()
    }
}

/// Owns the clocks, particles and control state of one visualization session
pub struct ColumnAnimator {
    topology: Arc<Topology>,
    paths: Vec<EdgePath>,
    /// `paths` as SVG path data, built once per topology
    path_data: Vec<String>,
    /// Declared widths, captured once per topology
    base_widths: Vec<f64>,
    phase_clock: PhaseClock,
    frame_clock: FrameClock,
    particles: ParticleAdvancer,
    controls: ControlState,
    pulse: PulseParams,
}

impl ColumnAnimator {
    /// Create an animator; with `autoplay` the phase clock starts at `now`
    pub fn new(
        topology: Arc<Topology>,
        settings: &AnimationSettings,
        now: Instant,
    ) -> AnimationResult<Self> {
        let (paths, base_widths) = build_paths(&topology)?;
        let path_data = svg_path_data(&paths);
        let mut particles = ParticleAdvancer::new(settings.particle_step, settings.particle_seed);
        particles.sync(&topology);

        let mut animator = Self {
            topology,
            paths,
            path_data,
            base_widths,
            phase_clock: PhaseClock::new(settings.phase_dwell, settings.initial_phase),
            frame_clock: FrameClock::new(),
            particles,
            controls: settings.controls,
            pulse: settings.pulse,
        };

        info!(
            "[ANIMATOR] Ready: {} nodes, {} edges, phase '{}'",
            animator.topology.nodes().len(),
            animator.topology.edges().len(),
            animator.phase()
        );

        if settings.autoplay {
            animator.phase_clock.start(now);
        }
        Ok(animator)
    }

    /// Replace the topology; particles are re-seeded for the new edge collection
    pub fn set_topology(&mut self, topology: Arc<Topology>) -> AnimationResult<()> {
        let (paths, base_widths) = build_paths(&topology)?;
        self.path_data = svg_path_data(&paths);
        self.paths = paths;
        self.base_widths = base_widths;
        self.topology = topology;
        self.particles.sync(&self.topology);
        info!(
            "[ANIMATOR] Topology replaced (revision {})",
            self.topology.revision()
        );
        Ok(())
    }

    /// Apply one control panel command
    pub fn apply(&mut self, command: ControlCommand, now: Instant) {
        debug!("[ANIMATOR] Applying {:?}", command);
        match command {
            ControlCommand::SetToggle(toggle, value) => self.controls.set(toggle, value),
            ControlCommand::FlipToggle(toggle) => {
                self.controls.flip(toggle);
            }
            ControlCommand::SelectPhase(phase) => self.phase_clock.set_phase(phase),
            ControlCommand::SetPlaying(true) => {
                if !self.phase_clock.is_running() {
                    self.phase_clock.start(now);
                }
            }
            ControlCommand::SetPlaying(false) => self.phase_clock.stop(),
            ControlCommand::TogglePlaying => {
                if self.phase_clock.is_running() {
                    self.phase_clock.stop();
                } else {
                    self.phase_clock.start(now);
                }
            }
        }
    }

    /// Register a listener for phase changes
    pub fn subscribe_phase(&mut self, listener: PhaseListener) {
        self.phase_clock.subscribe(listener);
    }

    /// State the next frame would be computed from (without polling the clock)
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            phase: self.phase_clock.current(),
            tick: self.frame_clock.tick(),
            playing: self.phase_clock.is_running(),
            controls: self.controls,
        }
    }

    /// Compute one frame at `now`
    pub fn step(&mut self, now: Instant) -> RenderFrame {
        self.phase_clock.poll(now);
        let snapshot = self.snapshot();

        if snapshot.controls.animate_particles {
            self.particles.advance();
        }

        let pulse = self.pulse.pulse_at(snapshot.tick);

        let edges = self
            .topology
            .edges()
            .iter()
            .enumerate()
            .map(|(idx, edge)| {
                let active = snapshot.playing && is_active(snapshot.phase, edge);
                let style = self.pulse.modulate(self.base_widths[idx], active, pulse);
                let progress = self.particles.progress(idx).unwrap_or(0.0);
                EdgeRender {
                    id: edge.id().to_string(),
                    kind: edge.kind(),
                    visible: is_visible(snapshot.phase, edge, &snapshot.controls),
                    active,
                    width: style.width,
                    opacity: style.opacity,
                    progress,
                    particle: self.paths[idx].point_at_fraction(progress),
                    path: self.path_data[idx].clone(),
                }
            })
            .collect();

        let nodes = self
            .topology
            .nodes()
            .iter()
            .map(|node| NodeRender {
                id: node.id.clone(),
                kind: node.kind,
                position: node.position(),
                label: snapshot
                    .controls
                    .show_labels
                    .then(|| node.display_label().to_string()),
            })
            .collect();

        self.frame_clock.advance();

        RenderFrame {
            snapshot,
            topology_revision: self.topology.revision(),
            pulse,
            edges,
            nodes,
        }
    }

    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    pub fn paths(&self) -> &[EdgePath] {
        &self.paths
    }

    pub fn phase(&self) -> Phase {
        self.phase_clock.current()
    }

    pub fn tick(&self) -> u64 {
        self.frame_clock.tick()
    }

    pub fn is_playing(&self) -> bool {
        self.phase_clock.is_running()
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn particles(&self) -> &ParticleAdvancer {
        &self.particles
    }
}

/// Paths and base widths, indexed like `topology.edges()`
fn svg_path_data(paths: &[EdgePath]) -> Vec<String> {
    paths.iter().map(EdgePath::svg_path_data).collect()
}

fn build_paths(topology: &Topology) -> AnimationResult<(Vec<EdgePath>, Vec<f64>)> {
    let mut paths = Vec::with_capacity(topology.edges().len());
    let mut widths = Vec::with_capacity(topology.edges().len());

    for edge in topology.edges() {
        let (from, to) = topology
            .endpoints(edge)
            .ok_or_else(|| TopologyError::UnknownEndpoint {
                edge_id: edge.id().to_string(),
                node_id: format!("{} -> {}", edge.from(), edge.to()),
            })?;
        paths.push(EdgePath::between(from, to));
        widths.push(edge.base_width());
    }

    Ok((paths, widths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Toggle;
    use std::time::Duration;

    fn animator() -> (ColumnAnimator, Instant) {
        let settings = AnimationSettings {
            particle_seed: Some(11),
            ..AnimationSettings::default()
        };
        let t0 = Instant::now();
        let topology = Arc::new(Topology::cortical_column().unwrap());
        (ColumnAnimator::new(topology, &settings, t0).unwrap(), t0)
    }

    #[test]
    fn test_first_frame_uses_tick_zero() {
        let (mut animator, t0) = animator();
        let frame = animator.step(t0);
        assert_eq!(frame.snapshot.tick, 0);
        assert!((frame.pulse - 0.5).abs() < 1e-12);
        assert_eq!(animator.tick(), 1);
    }

    #[test]
    fn test_stopped_animator_never_pulses() {
        let (mut animator, t0) = animator();
        animator.apply(ControlCommand::SelectPhase(Phase::Infer), t0);
        let frame = animator.step(t0);
        assert!(frame.active_edge_ids().is_empty());
        assert!(frame.edges.iter().all(|e| e.opacity == 1.0));
    }

    #[test]
    fn test_particles_frozen_when_toggle_off() {
        let (mut animator, t0) = animator();
        animator.step(t0);
        animator.apply(ControlCommand::FlipToggle(Toggle::Particles), t0);

        let before = animator.particles().progress_values().to_vec();
        let frame = animator.step(t0);
        assert_eq!(before, animator.particles().progress_values());
        assert_eq!(frame.edges[0].progress, before[0]);
    }

    #[test]
    fn test_labels_follow_toggle() {
        let (mut animator, t0) = animator();
        let frame = animator.step(t0);
        assert_eq!(
            frame.node("L4_T").unwrap().label.as_deref(),
            Some("Thalamus (core)")
        );

        animator.apply(ControlCommand::SetToggle(Toggle::Labels, false), t0);
        let frame = animator.step(t0);
        assert!(frame.nodes.iter().all(|n| n.label.is_none()));
    }

    #[test]
    fn test_toggle_playing_restarts_at_infer() {
        let (mut animator, t0) = animator();
        animator.apply(ControlCommand::TogglePlaying, t0);
        let frame = animator.step(t0 + Duration::from_millis(1500));
        assert_eq!(frame.snapshot.phase, Phase::Predict);

        animator.apply(ControlCommand::TogglePlaying, t0 + Duration::from_millis(1600));
        assert!(!animator.is_playing());
        animator.apply(ControlCommand::TogglePlaying, t0 + Duration::from_millis(1700));
        assert_eq!(animator.phase(), Phase::Infer);
    }

    #[test]
    fn test_set_topology_reseeds_particles() {
        let (mut animator, t0) = animator();
        animator.step(t0);
        let old_revision = animator.particles().revision();

        animator
            .set_topology(Arc::new(Topology::cortical_column().unwrap()))
            .unwrap();
        assert_ne!(animator.particles().revision(), old_revision);
        assert_eq!(animator.paths().len(), 33);
    }

    #[test]
    fn test_autoplay_starts_immediately() {
        let settings = AnimationSettings {
            autoplay: true,
            ..AnimationSettings::default()
        };
        let t0 = Instant::now();
        let topology = Arc::new(Topology::cortical_column().unwrap());
        let animator = ColumnAnimator::new(topology, &settings, t0).unwrap();
        assert!(animator.is_playing());
        assert_eq!(animator.phase(), Phase::Infer);
    }
}
