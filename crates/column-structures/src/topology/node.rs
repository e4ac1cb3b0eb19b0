// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Node definitions: populations and sites placed on the column diagram.

Pure data - positions are diagram coordinates, not anatomical measurements.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in diagram coordinates (x grows right, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other` (`t` = 0 gives `self`, 1 gives `other`)
    pub fn lerp(&self, other: &Point2D, t: f64) -> Point2D {
        Point2D::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Translate by a relative offset
    pub fn offset(&self, dx: f64, dy: f64) -> Point2D {
        Point2D::new(self.x + dx, self.y + dy)
    }
}

/// Functional role of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Excitatory population (pyramidal / spiny stellate)
    #[serde(rename = "E")]
    Excitatory,
    /// Inhibitory interneuron population
    #[serde(rename = "I")]
    Inhibitory,
    /// Thalamic relay input
    #[serde(rename = "T")]
    Thalamic,
    /// Apical dendrite site in layer I
    #[serde(rename = "A")]
    Apical,
    /// Projection target outside the column
    #[serde(rename = "OUT")]
    OutputSink,
}

impl NodeKind {
    /// Short code used in topology documents
    pub fn code(&self) -> &'static str {
        match self {
            NodeKind::Excitatory => "E",
            NodeKind::Inhibitory => "I",
            NodeKind::Thalamic => "T",
            NodeKind::Apical => "A",
            NodeKind::OutputSink => "OUT",
        }
    }
}

/// One of the six cortical strata, used only for visual grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CorticalLayer {
    I,
    II,
    III,
    IV,
    V,
    VI,
}

impl CorticalLayer {
    /// All layers, top (pia) to bottom (white matter)
    pub const ALL: [CorticalLayer; 6] = [
        CorticalLayer::I,
        CorticalLayer::II,
        CorticalLayer::III,
        CorticalLayer::IV,
        CorticalLayer::V,
        CorticalLayer::VI,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CorticalLayer::I => "I",
            CorticalLayer::II => "II",
            CorticalLayer::III => "III",
            CorticalLayer::IV => "IV",
            CorticalLayer::V => "V",
            CorticalLayer::VI => "VI",
        }
    }
}

impl fmt::Display for CorticalLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A population or site on the diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub layer: CorticalLayer,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        kind: NodeKind,
        position: Point2D,
        label: Option<&str>,
        layer: CorticalLayer,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            x: position.x,
            y: position.y,
            label: label.map(str::to_string),
            layer,
        }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Display text: the label when present, otherwise the id
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}
