// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Built-in six-layer cortical column microcircuit and its background bands.

use serde::{Deserialize, Serialize};

use super::edge::{Edge, EdgeKind};
use super::node::{CorticalLayer, Node, NodeKind, Point2D};

/// Diagram width the built-in layout is drawn for
pub const DIAGRAM_WIDTH: f64 = 1100.0;

const X_LEFT: f64 = 170.0;
const X_RIGHT: f64 = 940.0;
const X_MID: f64 = (X_LEFT + X_RIGHT) / 2.0;

/// Band top sits this far above the layer's node row
pub const BAND_OFFSET: f64 = 36.0;
/// Band height in diagram units
pub const BAND_HEIGHT: f64 = 80.0;

/// Node row (y coordinate) of each layer
pub fn layer_y(layer: CorticalLayer) -> f64 {
    match layer {
        CorticalLayer::I => 70.0,
        CorticalLayer::II => 140.0,
        CorticalLayer::III => 220.0,
        CorticalLayer::IV => 310.0,
        CorticalLayer::V => 430.0,
        CorticalLayer::VI => 560.0,
    }
}

/// Background shading band for one layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerBand {
    pub layer: CorticalLayer,
    /// Top edge of the band
    pub y: f64,
    pub height: f64,
}

impl LayerBand {
    pub fn for_layer(layer: CorticalLayer) -> Self {
        Self {
            layer,
            y: layer_y(layer) - BAND_OFFSET,
            height: BAND_HEIGHT,
        }
    }

    /// Bands for all six layers, top to bottom
    pub fn all() -> Vec<LayerBand> {
        CorticalLayer::ALL.iter().map(|l| LayerBand::for_layer(*l)).collect()
    }
}

fn node(
    id: &str,
    kind: NodeKind,
    x: f64,
    layer: CorticalLayer,
    dy: f64,
    label: &str,
) -> Node {
    Node::new(
        id,
        kind,
        Point2D::new(x, layer_y(layer) + dy),
        Some(label),
        layer,
    )
}

/// Populations and sites of the built-in column
pub(crate) fn nodes() -> Vec<Node> {
    use CorticalLayer::*;
    use NodeKind::*;

    vec![
        // Layer I: top-down input and apical sites
        node("I_TD", Excitatory, X_LEFT, I, 0.0, "Top-down (L1)"),
        node("I_A23", Apical, X_MID - 80.0, I, 0.0, "Apical→II/III"),
        node("I_A5", Apical, X_MID + 80.0, I, 0.0, "Apical→V"),
        node("L2_E", Excitatory, X_LEFT + 120.0, II, 0.0, "L2 E (IT)"),
        node("L2_I", Inhibitory, X_LEFT + 152.0, II, 22.0, "L2 I"),
        node("L3_E", Excitatory, X_LEFT + 120.0, III, 0.0, "L3 E (IT)"),
        node("L3_I", Inhibitory, X_LEFT + 152.0, III, 22.0, "L3 I"),
        node("L4_T", Thalamic, X_LEFT, IV, 0.0, "Thalamus (core)"),
        node("L4_E", Excitatory, X_LEFT + 120.0, IV, 0.0, "L4 E (spiny stellate)"),
        node("L4_I", Inhibitory, X_LEFT + 152.0, IV, 22.0, "L4 I"),
        node("L5_E", Excitatory, X_LEFT + 120.0, V, 0.0, "L5 E (PT/IT)"),
        node("L5_I", Inhibitory, X_LEFT + 152.0, V, 22.0, "L5 I"),
        node("OUT_UP", OutputSink, X_RIGHT - 20.0, V, 0.0, "→ Higher areas"),
        // Layer VI splits into corticothalamic and intratelencephalic
        node("L6_CT", Excitatory, X_LEFT + 120.0, VI, 0.0, "L6 E (CT)"),
        node("L6_I", Inhibitory, X_LEFT + 152.0, VI, 22.0, "L6 I"),
        node("L6_IT", Excitatory, X_LEFT + 200.0, VI, 0.0, "L6 E (IT)"),
        node("OUT_THAL", OutputSink, X_RIGHT - 20.0, VI, 0.0, "→ Thalamus"),
    ]
}

/// E→E, E→I and I→E edges of one intralaminar microcircuit
fn microcircuit(prefix: &str, excitatory: &str, inhibitory: &str, edges: &mut Vec<Edge>) {
    edges.push(Edge::new(
        format!("{}_EE", prefix),
        excitatory,
        excitatory,
        EdgeKind::Recurrent,
        Some(2.0),
    ));
    edges.push(Edge::new(
        format!("{}_EI", prefix),
        excitatory,
        inhibitory,
        EdgeKind::Recurrent,
        Some(2.0),
    ));
    edges.push(Edge::new(
        format!("{}_IE", prefix),
        inhibitory,
        excitatory,
        EdgeKind::Inhibitory,
        Some(2.2),
    ));
}

/// Signal pathways of the built-in column
pub(crate) fn edges() -> Vec<Edge> {
    use EdgeKind::{Feedback, Feedforward, Recurrent};

    let mut edges = Vec::with_capacity(33);

    for layer in ["L2", "L3", "L4", "L5"] {
        let e = format!("{}_E", layer);
        let i = format!("{}_I", layer);
        microcircuit(layer, &e, &i, &mut edges);
    }
    microcircuit("L6CT", "L6_CT", "L6_I", &mut edges);
    edges.push(Edge::new("L6IT_EE", "L6_IT", "L6_IT", Recurrent, Some(2.0)));

    let pathways: [(&str, &str, &str, EdgeKind, f64); 17] = [
        // Feedforward chain
        ("T_to_L4E", "L4_T", "L4_E", Feedforward, 3.0),
        ("L4_to_L2", "L4_E", "L2_E", Feedforward, 3.0),
        ("L4_to_L3", "L4_E", "L3_E", Feedforward, 2.7),
        ("L2_to_L3", "L2_E", "L3_E", Feedforward, 2.0),
        ("L23_to_L5", "L3_E", "L5_E", Feedforward, 3.0),
        ("L5_to_L6CT", "L5_E", "L6_CT", Feedforward, 2.4),
        ("L5_to_L6IT", "L5_E", "L6_IT", Feedforward, 2.0),
        ("L5_to_UP", "L5_E", "OUT_UP", Feedforward, 3.0),
        // Corticothalamic and intracortical feedback from layer VI
        ("L6CT_to_L4E", "L6_CT", "L4_E", Feedback, 3.0),
        ("L6CT_to_L4I", "L6_CT", "L4_I", Feedback, 2.4),
        ("L6CT_to_THAL", "L6_CT", "OUT_THAL", Feedback, 2.6),
        ("L6IT_to_L5", "L6_IT", "L5_E", Feedback, 2.0),
        // Layer I apical feedback
        ("I_to_A23", "I_TD", "I_A23", Feedback, 2.0),
        ("I_to_A5", "I_TD", "I_A5", Feedback, 2.0),
        ("A23_to_L2", "I_A23", "L2_E", Feedback, 2.0),
        ("A23_to_L3", "I_A23", "L3_E", Feedback, 2.0),
        ("A5_to_L5", "I_A5", "L5_E", Feedback, 2.0),
    ];

    edges.extend(
        pathways
            .iter()
            .map(|(id, from, to, kind, width)| Edge::new(*id, *from, *to, *kind, Some(*width))),
    );

    edges
}
