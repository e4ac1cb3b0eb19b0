// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Error type for building and loading a topology.
///
/// All variants are configuration errors: the topology is trusted static data, so any of
/// these aborts startup rather than being recovered from.
///
/// # Examples
/// ```
/// use column_structures::{Edge, EdgeKind, Topology, TopologyError};
///
/// let edge = Edge::new("ghost", "A", "B", EdgeKind::Feedforward, None);
/// let err = Topology::from_parts(Vec::new(), vec![edge]).unwrap_err();
/// assert!(matches!(err, TopologyError::UnknownEndpoint { .. }));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// An edge references a node id that does not exist
    #[error("Edge '{edge_id}' references unknown node '{node_id}'")]
    UnknownEndpoint { edge_id: String, node_id: String },
    /// Two nodes share an id
    #[error("Duplicate node id '{0}'")]
    DuplicateNode(String),
    /// Two edges share an id
    #[error("Duplicate edge id '{0}'")]
    DuplicateEdge(String),
    /// Malformed topology document
    #[error("Failed to parse topology document: {0}")]
    Parse(#[from] serde_json::Error),
    /// Failed to read topology document
    #[error("Failed to read topology document: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;
