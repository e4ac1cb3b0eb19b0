// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Edge path geometry.

Connecting edges are cubic S-curves with both control points on the horizontal midpoint, each
at its own endpoint's height. Self-loops are a small fixed teardrop above-left of the node,
built from two quadratic arcs (stored as cubics). Particles are placed by arc-length fraction,
using a flattened polyline with cumulative lengths.
*/

use column_structures::{Node, Point2D};

/// Polyline samples per cubic segment when building the arc-length table
pub const SAMPLES_PER_SEGMENT: usize = 64;

/// Offset of the self-loop anchor from the node centre
const LOOP_ANCHOR: (f64, f64) = (-16.0, -14.0);

/// A cubic bezier segment: start, two control points, end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub points: [Point2D; 4],
}

impl CubicSegment {
    pub fn new(start: Point2D, control1: Point2D, control2: Point2D, end: Point2D) -> Self {
        Self {
            points: [start, control1, control2, end],
        }
    }

    /// Quadratic bezier expressed as a cubic (controls at 2/3 towards the quadratic control)
    pub fn quadratic(start: Point2D, control: Point2D, end: Point2D) -> Self {
        let two_thirds = 2.0 / 3.0;
        Self::new(
            start,
            start.lerp(&control, two_thirds),
            end.lerp(&control, two_thirds),
            end,
        )
    }

    /// Point at curve parameter `t` in [0, 1]
    pub fn evaluate(&self, t: f64) -> Point2D {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let [p0, p1, p2, p3] = self.points;

        Point2D::new(
            mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x,
            mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y,
        )
    }
}

/// Shape an edge is drawn with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeShape {
    Curve { from: Point2D, to: Point2D },
    SelfLoop { center: Point2D },
}

/// Renderable path of one edge, with its arc-length table
#[derive(Debug, Clone)]
pub struct EdgePath {
    shape: EdgeShape,
    segments: Vec<CubicSegment>,
    samples: Vec<Point2D>,
    /// Arc length from the path start to each sample
    cumulative: Vec<f64>,
}

impl EdgePath {
    /// Path between two nodes; identical ids produce a self-loop
    pub fn between(from: &Node, to: &Node) -> Self {
        if from.id == to.id {
            Self::self_loop(from.position())
        } else {
            Self::curve(from.position(), to.position())
        }
    }

    /// S-curve from `from` to `to`
    pub fn curve(from: Point2D, to: Point2D) -> Self {
        let cx = (from.x + to.x) / 2.0;
        let segment = CubicSegment::new(
            from,
            Point2D::new(cx, from.y),
            Point2D::new(cx, to.y),
            to,
        );
        Self::from_segments(EdgeShape::Curve { from, to }, vec![segment])
    }

    /// Teardrop loop anchored above-left of `center`
    pub fn self_loop(center: Point2D) -> Self {
        let start = center.offset(LOOP_ANCHOR.0, LOOP_ANCHOR.1);
        let far = start.offset(32.0, 0.0);
        let outbound = CubicSegment::quadratic(start, start.offset(16.0, -10.0), far);
        let inbound = CubicSegment::quadratic(far, far.offset(-16.0, 10.0), start);
        Self::from_segments(EdgeShape::SelfLoop { center }, vec![outbound, inbound])
    }

    fn from_segments(shape: EdgeShape, segments: Vec<CubicSegment>) -> Self {
        let mut samples = Vec::with_capacity(segments.len() * SAMPLES_PER_SEGMENT + 1);
        let mut cumulative = Vec::with_capacity(samples.capacity());

        if let Some(first) = segments.first() {
            samples.push(first.points[0]);
            cumulative.push(0.0);
        }
        for segment in &segments {
            for i in 1..=SAMPLES_PER_SEGMENT {
                let point = segment.evaluate(i as f64 / SAMPLES_PER_SEGMENT as f64);
                let prev_len = cumulative.last().copied().unwrap_or(0.0);
                let step = samples.last().map_or(0.0, |prev: &Point2D| prev.distance_to(&point));
                samples.push(point);
                cumulative.push(prev_len + step);
            }
        }

        Self {
            shape,
            segments,
            samples,
            cumulative,
        }
    }

    pub fn shape(&self) -> EdgeShape {
        self.shape
    }

    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    /// Approximate total arc length
    pub fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Point at arc-length fraction `fraction` (clamped to [0, 1]) of the path
    pub fn point_at_fraction(&self, fraction: f64) -> Point2D {
        let Some(&first) = self.samples.first() else {
            return Point2D::default();
        };
        let total = self.total_length();
        if total <= 0.0 || !fraction.is_finite() {
            return first;
        }

        let target = fraction.clamp(0.0, 1.0) * total;
        // First sample at or beyond the target length
        let upper = self
            .cumulative
            .partition_point(|&len| len < target)
            .clamp(1, self.samples.len() - 1);
        let lower = upper - 1;

        let span = self.cumulative[upper] - self.cumulative[lower];
        let t = if span > 0.0 {
            (target - self.cumulative[lower]) / span
        } else {
            0.0
        };
        self.samples[lower].lerp(&self.samples[upper], t)
    }

    /// SVG path data (`d` attribute)
    pub fn svg_path_data(&self) -> String {
        match self.shape {
            EdgeShape::Curve { from, to } => {
                let cx = (from.x + to.x) / 2.0;
                format!(
                    "M {} {} C {} {}, {} {}, {} {}",
                    from.x, from.y, cx, from.y, cx, to.y, to.x, to.y
                )
            }
            EdgeShape::SelfLoop { center } => format!(
                "M {} {} q 16 -10 32 0 q -16 10 -32 0 z",
                center.x + LOOP_ANCHOR.0,
                center.y + LOOP_ANCHOR.1
            ),
        }
    }
}
