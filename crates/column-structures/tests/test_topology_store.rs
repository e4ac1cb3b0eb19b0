// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Integration tests for the topology store
///
/// Covers the built-in column dataset, JSON documents and load-time validation
use column_structures::{
    CorticalLayer, EdgeKind, LoopMembership, NodeKind, Topology, TopologyError,
};
use std::collections::HashSet;
use std::io::Write;

fn ids_where(topology: &Topology, pred: impl Fn(&column_structures::Edge) -> bool) -> HashSet<String> {
    topology
        .edges()
        .iter()
        .filter(|e| pred(e))
        .map(|e| e.id().to_string())
        .collect()
}

// ============================================================================
// Built-in dataset
// ============================================================================

#[test]
fn test_cortical_column_shape() {
    let topology = Topology::cortical_column().expect("built-in topology must validate");

    assert_eq!(topology.nodes().len(), 17);
    assert_eq!(topology.edges().len(), 33);
    assert_eq!(topology.bands().len(), 6);

    let count = |kind: EdgeKind| topology.edges().iter().filter(|e| e.kind() == kind).count();
    assert_eq!(count(EdgeKind::Feedforward), 8);
    assert_eq!(count(EdgeKind::Feedback), 9);
    assert_eq!(count(EdgeKind::Recurrent), 11);
    assert_eq!(count(EdgeKind::Inhibitory), 5);

    let self_loops = topology.edges().iter().filter(|e| e.is_self_loop()).count();
    assert_eq!(self_loops, 6);

    let sinks = topology
        .nodes()
        .iter()
        .filter(|n| n.kind == NodeKind::OutputSink)
        .count();
    assert_eq!(sinks, 2);
}

#[test]
fn test_mismatch_loop_membership() {
    let topology = Topology::cortical_column().unwrap();
    let mismatch = ids_where(&topology, |e| e.membership() == LoopMembership::MismatchLoop);

    let expected: HashSet<String> = ["T_to_L4E", "L4_EE", "L4_EI", "L4_IE", "L4_to_L2", "L4_to_L3"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(mismatch, expected);
}

#[test]
fn test_apical_membership() {
    let topology = Topology::cortical_column().unwrap();
    let apical = ids_where(&topology, |e| e.membership() == LoopMembership::Apical);

    assert_eq!(apical.len(), 5);
    // Every apical edge is a feedback edge in the built-in column
    for id in &apical {
        assert_eq!(topology.edge(id).unwrap().kind(), EdgeKind::Feedback);
    }
}

#[test]
fn test_every_endpoint_resolves() {
    let topology = Topology::cortical_column().unwrap();
    for edge in topology.edges() {
        assert!(topology.endpoints(edge).is_some(), "{} has a dangling endpoint", edge.id());
    }
}

#[test]
fn test_layer_assignment() {
    let topology = Topology::cortical_column().unwrap();
    assert_eq!(topology.node("OUT_THAL").unwrap().layer, CorticalLayer::VI);
    assert_eq!(topology.node("I_TD").unwrap().layer, CorticalLayer::I);
    assert_eq!(topology.node("L4_T").unwrap().display_label(), "Thalamus (core)");
}

// ============================================================================
// JSON documents
// ============================================================================

const SMALL_DOCUMENT: &str = r#"{
    "nodes": [
        {"id": "T", "type": "T", "x": 100, "y": 300, "layer": "IV"},
        {"id": "E", "type": "E", "x": 220, "y": 300, "label": "Stellate", "layer": "IV"}
    ],
    "edges": [
        {"id": "T_to_L4E", "from": "T", "to": "E", "kind": "ff"},
        {"id": "E_self", "from": "E", "to": "E", "kind": "rec", "width": 1.5}
    ]
}"#;

#[test]
fn test_load_from_json_str() {
    let topology = Topology::from_json_str(SMALL_DOCUMENT).unwrap();

    assert_eq!(topology.nodes().len(), 2);
    let relay = topology.edge("T_to_L4E").unwrap();
    assert_eq!(relay.base_width(), 3.0);
    assert_eq!(relay.membership(), LoopMembership::MismatchLoop);
    assert_eq!(topology.edge("E_self").unwrap().base_width(), 1.5);
    assert_eq!(topology.node("T").unwrap().display_label(), "T");
}

#[test]
fn test_load_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SMALL_DOCUMENT.as_bytes()).unwrap();

    let topology = Topology::from_json_file(file.path()).unwrap();
    assert_eq!(topology.edges().len(), 2);
}

#[test]
fn test_document_round_trip_keeps_dataset() {
    let topology = Topology::cortical_column().unwrap();
    let json = serde_json::to_string(&topology.to_document()).unwrap();
    let reloaded = Topology::from_json_str(&json).unwrap();

    assert_eq!(reloaded.nodes(), topology.nodes());
    assert_eq!(reloaded.edges(), topology.edges());
    assert_ne!(reloaded.revision(), topology.revision());
}

#[test]
fn test_dangling_endpoint_fails_fast() {
    let json = r#"{
        "nodes": [{"id": "A", "type": "E", "x": 0, "y": 0, "layer": "II"}],
        "edges": [{"id": "A_to_B", "from": "A", "to": "B", "kind": "ff"}]
    }"#;

    match Topology::from_json_str(json) {
        Err(TopologyError::UnknownEndpoint { edge_id, node_id }) => {
            assert_eq!(edge_id, "A_to_B");
            assert_eq!(node_id, "B");
        }
        other => panic!("expected UnknownEndpoint, got {:?}", other),
    }
}

#[test]
fn test_unknown_edge_kind_is_parse_error() {
    let json = r#"{
        "nodes": [{"id": "A", "type": "E", "x": 0, "y": 0, "layer": "II"}],
        "edges": [{"id": "A_self", "from": "A", "to": "A", "kind": "sideways"}]
    }"#;
    assert!(matches!(
        Topology::from_json_str(json),
        Err(TopologyError::Parse(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Topology::from_json_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(TopologyError::Io(_))));
}
