// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use column_structures::Topology;

use crate::animator::RenderFrame;
use crate::error::{AnimationError, AnimationResult};
use crate::frame_loop_runner::FramePublisher;
use crate::svg::{render_svg, SvgOptions};

/// Writes every `every`-th frame as `frame_NNNNNN.svg`
pub struct SvgSnapshotWriter {
    output_dir: PathBuf,
    every: u64,
    topology: Arc<Topology>,
    options: SvgOptions,
    written: AtomicU64,
}

impl SvgSnapshotWriter {
    /// Create the writer, creating `output_dir` if needed
    ///
    /// `every` of zero is treated as one.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        every: u64,
        topology: Arc<Topology>,
        options: SvgOptions,
    ) -> AnimationResult<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        info!(
            "[SVG-WRITER] Writing every {} frame(s) to {}",
            every.max(1),
            output_dir.display()
        );
        Ok(Self {
            output_dir,
            every: every.max(1),
            topology,
            options,
            written: AtomicU64::new(0),
        })
    }

    /// File a frame with `tick` would be written to
    pub fn snapshot_path(&self, tick: u64) -> PathBuf {
        self.output_dir.join(format!("frame_{:06}.svg", tick))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of files written so far
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }
}

impl FramePublisher for SvgSnapshotWriter {
    fn publish(&self, frame: &RenderFrame) -> AnimationResult<()> {
        let tick = frame.snapshot.tick;
        if tick % self.every != 0 {
            return Ok(());
        }
        if frame.topology_revision != self.topology.revision() {
            return Err(AnimationError::Publish(format!(
                "frame {} was computed from topology revision {}, writer holds revision {}",
                tick,
                frame.topology_revision,
                self.topology.revision()
            )));
        }
        let path = self.snapshot_path(tick);
        std::fs::write(&path, render_svg(&self.topology, frame, &self.options))?;
        self.written.fetch_add(1, Ordering::Relaxed);
        debug!("[SVG-WRITER] Wrote {}", path.display());
        Ok(())
    }
}
