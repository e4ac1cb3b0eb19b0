// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// End-to-end tests: configuration -> topology -> animator -> JSON frames and SVG snapshots
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cortical_column::prelude::*;
use cortical_column::{load_topology, svg_options};

fn write_config(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("column_configuration.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

fn animator_from(config: &ColumnConfig, now: Instant) -> ColumnAnimator {
    validate_config(config).unwrap();
    let topology = Arc::new(load_topology(config).unwrap());
    let settings = AnimationSettings::from_config(config).unwrap();
    ColumnAnimator::new(topology, &settings, now).unwrap()
}

// ===== TEST 1: Configured autoplay walks the phase cycle =====
#[test]
fn test_config_file_drives_phase_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "[animation]\nphase_dwell_ms = 100\nframe_rate_hz = 50.0\n\n\
         [particles]\nseed = 9\n\n[controls]\nautoplay = true\n",
    );
    let config = load_config_or_default(Some(path.as_path()), None).unwrap();
    let start = Instant::now();
    let mut animator = animator_from(&config, start);

    let interval = config.frame_interval();
    assert_eq!(interval, Duration::from_millis(20));

    let mut phases = Vec::new();
    let mut now = start;
    for _ in 0..16 {
        let frame = animator.step(now);
        if phases.last() != Some(&frame.snapshot.phase) {
            phases.push(frame.snapshot.phase);
        }
        now += interval;
    }

    assert_eq!(
        phases,
        vec![Phase::Infer, Phase::Predict, Phase::Update, Phase::Infer]
    );
}

// ===== TEST 2: Same seed, same frames =====
#[test]
fn test_seeded_runs_produce_identical_json() {
    let mut config = ColumnConfig::default();
    config.particles.seed = Some(42);
    config.controls.autoplay = true;

    let run = |config: &ColumnConfig| -> Vec<String> {
        let start = Instant::now();
        let mut animator = animator_from(config, start);
        (0..30)
            .map(|i| {
                let now = start + config.frame_interval() * i;
                serde_json::to_string(&animator.step(now)).unwrap()
            })
            .collect()
    };

    assert_eq!(run(&config), run(&config));
}

// ===== TEST 3: Frame JSON shape =====
#[test]
fn test_frame_json_shape() {
    let mut config = ColumnConfig::default();
    config.particles.seed = Some(1);
    config.controls.initial_phase = "predict".to_string();
    let now = Instant::now();
    let mut animator = animator_from(&config, now);

    let value = serde_json::to_value(animator.step(now)).unwrap();
    assert_eq!(value["snapshot"]["phase"], "predict");
    assert_eq!(value["snapshot"]["tick"], 0);
    assert_eq!(value["edges"].as_array().unwrap().len(), 33);
    assert_eq!(value["nodes"].as_array().unwrap().len(), 17);

    let relay = value["edges"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == "T_to_L4E")
        .unwrap();
    assert_eq!(relay["visible"], false);
    assert_eq!(relay["active"], false);
    assert_eq!(relay["kind"], "ff");
}

// ===== TEST 4: Custom topology document end to end =====
#[test]
fn test_custom_topology_renders() {
    let dir = tempfile::tempdir().unwrap();
    let topology_path = dir.path().join("mini.json");
    std::fs::write(
        &topology_path,
        r#"{
            "nodes": [
                {"id": "T", "type": "T", "x": 170, "y": 310, "label": "Relay", "layer": "IV"},
                {"id": "E4", "type": "E", "x": 290, "y": 310, "layer": "IV"}
            ],
            "edges": [
                {"id": "T_to_L4E", "from": "T", "to": "E4", "kind": "ff", "width": 4},
                {"id": "E4_self", "from": "E4", "to": "E4", "kind": "rec"}
            ]
        }"#,
    )
    .unwrap();

    let mut config = ColumnConfig::default();
    config.topology.path = Some(topology_path);
    config.particles.seed = Some(3);
    let now = Instant::now();
    let mut animator = animator_from(&config, now);
    animator.apply(ControlCommand::SelectPhase(Phase::Update), now);
    let frame = animator.step(now);

    let relay = frame.edge("T_to_L4E").unwrap();
    assert!(relay.visible);
    assert!(!relay.active, "highlighting only runs while playing");
    let self_loop = frame.edge("E4_self").unwrap();
    assert!(!self_loop.visible);

    let svg = render_svg(animator.topology(), &frame, &svg_options(&config));
    assert_eq!(svg.matches("<path id=\"edge-").count(), 2);
    assert!(svg.contains(">Relay</text>"));
    assert!(svg.contains(">E4</text>"));
}

// ===== TEST 5: Dangling endpoint fails fast =====
#[test]
fn test_dangling_endpoint_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let topology_path = dir.path().join("broken.json");
    std::fs::write(
        &topology_path,
        r#"{"nodes": [{"id": "A", "type": "E", "x": 0, "y": 0, "layer": "I"}],
            "edges": [{"id": "A_to_B", "from": "A", "to": "B", "kind": "ff"}]}"#,
    )
    .unwrap();

    let mut config = ColumnConfig::default();
    config.topology.path = Some(topology_path);
    assert!(load_topology(&config).is_err());
}

// ===== TEST 6: Snapshots through the publisher seam =====
#[test]
fn test_snapshot_writer_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ColumnConfig::default();
    config.particles.seed = Some(8);
    config.render.output_dir = dir.path().join("frames");
    config.render.snapshot_every = 4;

    let now = Instant::now();
    let mut animator = animator_from(&config, now);
    let writer = SvgSnapshotWriter::new(
        config.render.output_dir.clone(),
        config.render.snapshot_every,
        animator.topology().clone(),
        svg_options(&config),
    )
    .unwrap();

    for _ in 0..9 {
        let frame = animator.step(now);
        writer.publish(&frame).unwrap();
    }

    assert_eq!(writer.written(), 3);
    let first = std::fs::read_to_string(writer.snapshot_path(0)).unwrap();
    assert!(first.contains("viewBox=\"0 0 1100 780\""));
}

// ===== TEST 7: Keyboard shortcuts through the control queue =====
#[test]
fn test_keyboard_commands_via_queue() {
    let mut config = ColumnConfig::default();
    config.particles.seed = Some(2);
    let now = Instant::now();
    let mut animator = animator_from(&config, now);

    let queue = ControlQueue::default();
    for key in ['f', 'B', 'x'] {
        if let Some(command) = ControlCommand::from_key(key) {
            queue.push(command);
        }
    }
    assert_eq!(queue.len(), 2);
    for command in queue.drain_all() {
        animator.apply(command, now);
    }

    let frame = animator.step(now);
    assert!(!frame.snapshot.controls.show_feedforward);
    assert!(!frame.snapshot.controls.show_feedback);
    assert!(!frame.edge("T_to_L4E").unwrap().visible);
    assert!(frame.edge("L4_EI").unwrap().visible);
}
