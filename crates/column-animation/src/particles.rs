// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Particle advancer: one progress value in [0, 1) per edge, advanced by a fixed step each frame.

Progress is indexed like [`Topology::edges`]. Whenever the edge collection changes (a new
topology revision) every value is re-seeded independently, so particles never start in lockstep.
*/

use column_structures::Topology;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

pub struct ParticleAdvancer {
    step: f64,
    progress: Vec<f64>,
    revision: Option<u64>,
    rng: StdRng,
}

impl ParticleAdvancer {
    /// `seed` makes re-seeding reproducible; `None` draws from OS entropy
    pub fn new(step: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            step,
            progress: Vec::new(),
            revision: None,
            rng,
        }
    }

    /// Re-seed if `topology` is a different edge collection than the last one seen
    ///
    /// Returns `true` when progress was re-seeded.
    pub fn sync(&mut self, topology: &Topology) -> bool {
        if self.revision == Some(topology.revision()) {
            return false;
        }
        self.reseed(topology.edges().len());
        self.revision = Some(topology.revision());
        true
    }

    /// Assign every edge an independent random progress in [0, 1)
    pub fn reseed(&mut self, edge_count: usize) {
        let rng = &mut self.rng;
        self.progress = (0..edge_count).map(|_| rng.gen::<f64>()).collect();
        debug!("[PARTICLES] Re-seeded {} particles", edge_count);
    }

    /// Move every particle forward one frame, wrapping into [0, 1)
    ///
    /// A negative step runs particles backwards along their paths.
    pub fn advance(&mut self) {
        let step = self.step;
        for p in self.progress.iter_mut() {
            let wrapped = (*p + step).rem_euclid(1.0);
            // rem_euclid rounds up to exactly 1.0 for tiny negative sums
            *p = if wrapped < 1.0 { wrapped } else { 0.0 };
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn progress(&self, edge_index: usize) -> Option<f64> {
        self.progress.get(edge_index).copied()
    }

    pub fn progress_values(&self) -> &[f64] {
        &self.progress
    }

    /// Revision of the edge collection the progress belongs to
    pub fn revision(&self) -> Option<u64> {
        self.revision
    }
}

impl std::fmt::Debug for ParticleAdvancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleAdvancer")
            .field("step", &self.step)
            .field("particles", &self.progress.len())
            .field("revision", &self.revision)
            .finish()
    }
}
