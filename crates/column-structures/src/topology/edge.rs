// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Edge definitions: typed, directed signal pathways between nodes.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stroke width used when an edge does not declare one
pub const DEFAULT_BASE_WIDTH: f64 = 3.0;

/// Id of the thalamus to layer IV relay edge
pub const THALAMIC_RELAY_EDGE_ID: &str = "T_to_L4E";

/// Direction/sign category of a signal edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    #[serde(rename = "ff")]
    Feedforward,
    #[serde(rename = "fb")]
    Feedback,
    #[serde(rename = "rec")]
    Recurrent,
    #[serde(rename = "inh")]
    Inhibitory,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 4] = [
        EdgeKind::Feedforward,
        EdgeKind::Feedback,
        EdgeKind::Recurrent,
        EdgeKind::Inhibitory,
    ];

    /// Short code used in topology documents and CSS classes
    pub fn code(&self) -> &'static str {
        match self {
            EdgeKind::Feedforward => "ff",
            EdgeKind::Feedback => "fb",
            EdgeKind::Recurrent => "rec",
            EdgeKind::Inhibitory => "inh",
        }
    }

    /// Recurrent and inhibitory edges share one visibility toggle
    pub fn is_local(&self) -> bool {
        matches!(self, EdgeKind::Recurrent | EdgeKind::Inhibitory)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Anatomical loop an edge belongs to, fixed when the edge is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMembership {
    /// Thalamic relay into layer IV and the layer IV intralaminar loop
    MismatchLoop,
    /// Layer I top-down input onto apical dendrites, and apical outputs
    Apical,
    #[default]
    Unassigned,
}

impl LoopMembership {
    /// Derive membership from the edge id naming convention
    ///
    /// `T_to_L4E` and `L4_*` form the mismatch loop; `I_*` and `A*` are apical.
    pub fn classify(edge_id: &str) -> Self {
        if edge_id == THALAMIC_RELAY_EDGE_ID || edge_id.starts_with("L4_") {
            LoopMembership::MismatchLoop
        } else if edge_id.starts_with("I_") || edge_id.starts_with('A') {
            LoopMembership::Apical
        } else {
            LoopMembership::Unassigned
        }
    }
}

/// Serialized form of an edge; membership is derived, never read from documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    pub id: String,
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// A directed signal edge; `from == to` denotes a self-loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EdgeDescriptor", into = "EdgeDescriptor")]
pub struct Edge {
    id: String,
    from: String,
    to: String,
    kind: EdgeKind,
    width: Option<f64>,
    membership: LoopMembership,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        kind: EdgeKind,
        width: Option<f64>,
    ) -> Self {
        let id = id.into();
        let membership = LoopMembership::classify(&id);
        Self {
            id,
            from: from.into(),
            to: to.into(),
            kind,
            width,
            membership,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Declared width, if any
    pub fn declared_width(&self) -> Option<f64> {
        self.width
    }

    /// Static stroke width: the declared width or [`DEFAULT_BASE_WIDTH`]
    pub fn base_width(&self) -> f64 {
        self.width.unwrap_or(DEFAULT_BASE_WIDTH)
    }

    pub fn membership(&self) -> LoopMembership {
        self.membership
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl From<EdgeDescriptor> for Edge {
    fn from(d: EdgeDescriptor) -> Self {
        Edge::new(d.id, d.from, d.to, d.kind, d.width)
    }
}

impl From<Edge> for EdgeDescriptor {
    fn from(e: Edge) -> Self {
        EdgeDescriptor {
            id: e.id,
            from: e.from,
            to: e.to,
            kind: e.kind,
            width: e.width,
        }
    }
}
