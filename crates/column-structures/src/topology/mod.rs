// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Topology store: the immutable node and edge set of a column diagram.

A [`Topology`] is validated when it is built and never mutated afterwards. Each instance
carries a process-unique revision number; consumers holding per-edge state compare revisions
to detect that the edge collection has been replaced.
*/

pub mod cortical_column;
pub mod edge;
pub mod node;

pub use cortical_column::{layer_y, LayerBand, BAND_HEIGHT, BAND_OFFSET, DIAGRAM_WIDTH};
pub use edge::{
    Edge, EdgeDescriptor, EdgeKind, LoopMembership, DEFAULT_BASE_WIDTH, THALAMIC_RELAY_EDGE_ID,
};
pub use node::{CorticalLayer, Node, NodeKind, Point2D};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::error::{TopologyError, TopologyResult};

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// On-disk topology document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Validated, immutable set of nodes and edges
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_lookup: AHashMap<String, usize>,
    edge_lookup: AHashMap<String, usize>,
    bands: Vec<LayerBand>,
    revision: u64,
}

impl Topology {
    /// Build a topology, failing on duplicate ids or dangling edge endpoints
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> TopologyResult<Self> {
        let mut node_lookup = AHashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if node_lookup.insert(node.id.clone(), idx).is_some() {
                return Err(TopologyError::DuplicateNode(node.id.clone()));
            }
        }

        let mut edge_lookup = AHashMap::with_capacity(edges.len());
        for (idx, edge) in edges.iter().enumerate() {
            if edge_lookup.insert(edge.id().to_string(), idx).is_some() {
                return Err(TopologyError::DuplicateEdge(edge.id().to_string()));
            }
            for endpoint in [edge.from(), edge.to()] {
                if !node_lookup.contains_key(endpoint) {
                    return Err(TopologyError::UnknownEndpoint {
                        edge_id: edge.id().to_string(),
                        node_id: endpoint.to_string(),
                    });
                }
            }
        }

        let revision = NEXT_REVISION.fetch_add(1, Ordering::Relaxed);
        debug!(
            "[TOPOLOGY] Built revision {} with {} nodes and {} edges",
            revision,
            nodes.len(),
            edges.len()
        );

        Ok(Self {
            nodes,
            edges,
            node_lookup,
            edge_lookup,
            bands: LayerBand::all(),
            revision,
        })
    }

    /// The built-in six-layer cortical column
    pub fn cortical_column() -> TopologyResult<Self> {
        Self::from_parts(cortical_column::nodes(), cortical_column::edges())
    }

    /// Parse a JSON topology document
    pub fn from_json_str(json: &str) -> TopologyResult<Self> {
        let document: TopologyDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Load a JSON topology document from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> TopologyResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let topology = Self::from_json_str(&contents)?;
        info!(
            "[TOPOLOGY] Loaded {} nodes and {} edges from {}",
            topology.nodes.len(),
            topology.edges.len(),
            path.display()
        );
        Ok(topology)
    }

    pub fn from_document(document: TopologyDocument) -> TopologyResult<Self> {
        Self::from_parts(document.nodes, document.edges)
    }

    /// Serializable copy of the node and edge set
    pub fn to_document(&self) -> TopologyDocument {
        TopologyDocument {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn bands(&self) -> &[LayerBand] {
        &self.bands
    }

    /// Identity of this edge collection
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_lookup.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_lookup.get(id).map(|&idx| &self.edges[idx])
    }

    /// Position of an edge in [`Topology::edges`]
    pub fn edge_index(&self, id: &str) -> Option<usize> {
        self.edge_lookup.get(id).copied()
    }

    /// Source and target nodes of an edge
    ///
    /// Always `Some` for edges owned by this topology.
    pub fn endpoints(&self, edge: &Edge) -> Option<(&Node, &Node)> {
        Some((self.node(edge.from())?, self.node(edge.to())?))
    }
}
