// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use column_structures::TopologyError;

/// Errors raised by the animation engine and its frame loop
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("Frame loop already running")]
    AlreadyRunning,

    #[error("Failed to spawn frame loop thread: {0}")]
    ThreadSpawn(String),

    #[error("Frame publisher failed: {0}")]
    Publish(String),

    #[error("Unknown phase '{0}' (expected infer, predict, update or all)")]
    UnknownPhase(String),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for animation operations
pub type AnimationResult<T> = Result<T, AnimationError>;
