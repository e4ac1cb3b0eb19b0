// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cortical column animation driver.
//!
//! Headless mode steps the animator on a simulated clock (one frame interval per frame), so the
//! output only depends on the configuration and the particle seed. Realtime mode runs the
//! threaded frame loop for a fixed duration and accepts F/B/R/P (and space to play/pause) on
//! stdin.

use std::collections::HashMap;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use cortical_column::animation::{
    AnimationError, AnimationResult, AnimationSettings, ColumnAnimator, ControlCommand,
    ControlQueue, FrameLoopRunner, FramePublisher, RenderFrame, SvgSnapshotWriter,
};
use cortical_column::config::{load_config_or_default, validate_config, ColumnConfig};
use cortical_column::observability::{parse_debug_flags, CrateDebugFlags, LoggingGuard};
use cortical_column::{load_topology, svg_options};

#[derive(Parser, Debug)]
#[command(
    name = "cortical-column",
    version,
    about = "Animate the cortical column microcircuit and export frames"
)]
struct Cli {
    /// Configuration file (searched for when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON topology document (built-in cortical column when omitted)
    #[arg(long)]
    topology: Option<PathBuf>,

    /// Number of frames to produce in headless mode
    #[arg(long, default_value_t = 420)]
    frames: u64,

    /// Start playing immediately (phase cycle restarts at infer)
    #[arg(long)]
    play: bool,

    /// Initial phase: infer, predict, update or all
    #[arg(long)]
    phase: Option<String>,

    /// Particle seed for reproducible marker positions
    #[arg(long)]
    seed: Option<u64>,

    /// Write SVG snapshots into this directory
    #[arg(long)]
    svg_dir: Option<PathBuf>,

    /// Write one SVG snapshot every N frames
    #[arg(long)]
    every: Option<u64>,

    /// Print every frame as one JSON line on stdout
    #[arg(long)]
    json: bool,

    /// Run the threaded frame loop for this many seconds instead of headless
    #[arg(long, value_name = "SECS")]
    realtime: Option<f64>,

    /// Enable debug logging for a crate (repeatable, `all` for every crate)
    #[arg(long = "debug", value_name = "CRATE")]
    debug: Vec<String>,

    /// Default log level for crates without a debug flag
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(path) = &self.topology {
            overrides.insert("topology_path".to_string(), path.display().to_string());
        }
        if self.play {
            overrides.insert("autoplay".to_string(), "true".to_string());
        }
        if let Some(phase) = &self.phase {
            overrides.insert("initial_phase".to_string(), phase.clone());
        }
        if let Some(seed) = self.seed {
            overrides.insert("particle_seed".to_string(), seed.to_string());
        }
        if let Some(dir) = &self.svg_dir {
            overrides.insert("output_dir".to_string(), dir.display().to_string());
        }
        if let Some(every) = self.every {
            overrides.insert("snapshot_every".to_string(), every.to_string());
        }
        if let Some(level) = &self.log_level {
            overrides.insert("log_level".to_string(), level.clone());
        }
        overrides
    }
}

/// Writes every frame as one JSON line on stdout
struct JsonLinesPublisher;

impl FramePublisher for JsonLinesPublisher {
    fn publish(&self, frame: &RenderFrame) -> AnimationResult<()> {
        let line =
            serde_json::to_string(frame).map_err(|e| AnimationError::Publish(e.to_string()))?;
        let mut out = io::stdout().lock();
        writeln!(out, "{}", line)?;
        Ok(())
    }
}

fn init_logging(config: &ColumnConfig, debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    let level = config.system.log_level.as_str();

    #[cfg(feature = "file-logging")]
    {
        if config.logging.file_logging {
            return cortical_column::observability::init_logging(
                debug_flags,
                level,
                Some(config.logging.log_dir.clone()),
                Some(config.logging.retention_days),
                Some(config.logging.retention_runs),
            );
        }
    }

    #[cfg(not(feature = "file-logging"))]
    {
        if config.logging.file_logging {
            eprintln!(
                "Warning: logging.file_logging requires the `file-logging` feature, using console only"
            );
        }
    }

    cortical_column::observability::init_console_logging(debug_flags, level)
}

fn snapshot_writer(
    cli: &Cli,
    config: &ColumnConfig,
    animator: &ColumnAnimator,
) -> Result<Option<SvgSnapshotWriter>> {
    if cli.svg_dir.is_none() {
        return Ok(None);
    }
    let writer = SvgSnapshotWriter::new(
        config.render.output_dir.clone(),
        config.render.snapshot_every,
        animator.topology().clone(),
        svg_options(config),
    )
    .with_context(|| {
        format!(
            "Failed to prepare snapshot directory {}",
            config.render.output_dir.display()
        )
    })?;
    Ok(Some(writer))
}

fn run_headless(
    mut animator: ColumnAnimator,
    start: Instant,
    frame_interval: Duration,
    frames: u64,
    json: bool,
    writer: Option<SvgSnapshotWriter>,
) -> Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    let mut now = start;

    for _ in 0..frames {
        let frame = animator.step(now);
        if json {
            serde_json::to_writer(&mut out, &frame)?;
            writeln!(out)?;
        }
        if let Some(writer) = &writer {
            writer.publish(&frame)?;
        }
        now += frame_interval;
    }
    out.flush()?;

    info!(
        "[HEADLESS] Produced {} frame(s), final phase {}, playing {}",
        frames,
        animator.phase(),
        animator.is_playing()
    );
    if let Some(writer) = &writer {
        info!(
            "[HEADLESS] Wrote {} snapshot(s) to {}",
            writer.written(),
            writer.output_dir().display()
        );
    }
    Ok(())
}

fn spawn_key_reader(controls: ControlQueue) -> Result<()> {
    std::thread::Builder::new()
        .name("column-key-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                for key in line.chars() {
                    let command = if key == ' ' {
                        Some(ControlCommand::TogglePlaying)
                    } else {
                        ControlCommand::from_key(key)
                    };
                    if let Some(command) = command {
                        controls.push(command);
                    }
                }
            }
        })
        .context("Failed to spawn key reader thread")?;
    Ok(())
}

fn run_realtime(
    animator: ColumnAnimator,
    frame_interval: Duration,
    seconds: f64,
    json: bool,
    writer: Option<SvgSnapshotWriter>,
) -> Result<()> {
    let duration = Duration::try_from_secs_f64(seconds)
        .with_context(|| format!("Invalid --realtime duration: {}", seconds))?;

    let mut runner = FrameLoopRunner::new(animator, frame_interval);
    if json {
        runner.add_publisher(Arc::new(JsonLinesPublisher));
    }
    if let Some(writer) = writer {
        runner.add_publisher(Arc::new(writer));
    }

    spawn_key_reader(runner.control_queue())?;
    runner.start()?;
    std::thread::sleep(duration);
    runner.stop();

    info!(
        "[REALTIME] Ran {:.1}s: {} frame(s), final phase {}",
        seconds,
        runner.frame_count(),
        runner.current_phase()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut debug_flags = parse_debug_flags();
    debug_flags
        .enabled_crates
        .extend(CrateDebugFlags::from_crate_names(&cli.debug).enabled_crates);

    let overrides = cli.overrides();
    let config = load_config_or_default(cli.config.as_deref(), Some(&overrides))
        .context("Failed to load configuration")?;
    validate_config(&config).context("Invalid configuration")?;

    let _logging = init_logging(&config, &debug_flags)?;
    info!("Starting cortical-column v{}", env!("CARGO_PKG_VERSION"));

    let topology = load_topology(&config).context("Failed to load topology")?;
    let settings = AnimationSettings::from_config(&config)?;
    let start = Instant::now();
    let animator = ColumnAnimator::new(Arc::new(topology), &settings, start)?;
    let writer = snapshot_writer(&cli, &config, &animator)?;

    if config.particles.seed.is_none() && (cli.json || writer.is_some()) {
        warn!("No particle seed set; marker positions will differ between runs");
    }

    match cli.realtime {
        Some(seconds) => run_realtime(animator, settings.frame_interval, seconds, cli.json, writer),
        None => run_headless(
            animator,
            start,
            settings.frame_interval,
            cli.frames,
            cli.json,
            writer,
        ),
    }
}
