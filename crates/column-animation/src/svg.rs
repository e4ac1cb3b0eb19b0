// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! SVG rendering of a [`RenderFrame`].
//!
//! Layer bands first, then edges (with their particle dots) beneath the nodes. Hidden edges
//! stay in the document inside a group classed `hidden`.

use column_structures::{EdgeKind, NodeKind, Topology};

use crate::animator::{EdgeRender, NodeRender, RenderFrame};

const BAND_X: f64 = 120.0;
const BAND_WIDTH: f64 = 860.0;
const BAND_LABEL_X: f64 = 40.0;

const STYLE: &str = r#"<style>
  .hidden { display: none; }
  .bubble { fill: #1b2230; stroke: #5b6b85; stroke-width: 1; }
  .bubble.exc { fill: #24344f; stroke: #8fb3ff; }
  .bubble.inh { fill: #3a2030; stroke: #ff7a9c; }
  .bubble.thal { fill: #2f2a1c; stroke: #ffd27a; }
  .path { fill: none; }
  .path.ff { stroke: #4aa3ff; }
  .path.fb { stroke: #ff9f43; }
  .path.rec { stroke: #7bd389; }
  .path.inhEdge { stroke: #ff5c7a; }
  .layerLabel { fill: #9aa7bd; font: 14px sans-serif; }
  .nodeLabel { fill: #d8e0ee; font: 11px sans-serif; }
</style>"#;

/// Drawing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgOptions {
    pub view_width: u32,
    pub view_height: u32,
    pub marker_radius: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            view_width: 1100,
            view_height: 780,
            marker_radius: 2.2,
        }
    }
}

fn edge_class(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Feedforward => "path ff",
        EdgeKind::Feedback => "path fb",
        EdgeKind::Recurrent => "path rec",
        EdgeKind::Inhibitory => "path inhEdge",
    }
}

fn marker_color(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Feedforward => "#4aa3ff",
        EdgeKind::Feedback => "#ff9f43",
        EdgeKind::Recurrent => "#7bd389",
        EdgeKind::Inhibitory => "#ff5c7a",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render one frame as a standalone SVG document
///
/// Edge geometry comes from the frame itself; `topology` only supplies the layer bands.
pub fn render_svg(topology: &Topology, frame: &RenderFrame, options: &SvgOptions) -> String {
    let mut out = String::with_capacity(16 * 1024);
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\" aria-label=\"Neocortical column\" data-phase=\"{}\" data-tick=\"{}\">\n",
        options.view_width, options.view_height, frame.snapshot.phase, frame.snapshot.tick
    ));
    out.push_str(STYLE);
    out.push('\n');

    for band in topology.bands() {
        out.push_str(&format!(
            "<g><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"10\" ry=\"10\" class=\"bubble\" /><text x=\"{}\" y=\"{}\" class=\"layerLabel\">Layer {}</text></g>\n",
            BAND_X,
            band.y,
            BAND_WIDTH,
            band.height,
            BAND_LABEL_X,
            band.y + 48.0,
            band.layer
        ));
    }

    for edge in &frame.edges {
        write_edge(&mut out, edge, options);
    }

    for node in &frame.nodes {
        write_node(&mut out, node);
    }

    out.push_str("</svg>\n");
    out
}

fn write_edge(out: &mut String, render: &EdgeRender, options: &SvgOptions) {
    let group_class = if render.visible { "" } else { " class=\"hidden\"" };
    out.push_str(&format!(
        "<g{}><path id=\"edge-{id}\" d=\"{}\" class=\"{}\" stroke-width=\"{:.3}\" opacity=\"{:.3}\" /><circle id=\"dot-{id}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\" /></g>\n",
        group_class,
        render.path,
        edge_class(render.kind),
        render.width,
        render.opacity,
        render.particle.x,
        render.particle.y,
        options.marker_radius,
        marker_color(render.kind),
        id = escape(&render.id),
    ));
}

fn write_node(out: &mut String, node: &NodeRender) {
    let (x, y) = (node.position.x, node.position.y);
    let shape = match node.kind {
        NodeKind::Inhibitory => format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"10\" class=\"bubble inh\" />",
            x, y
        ),
        NodeKind::Thalamic => format!(
            "<rect x=\"{}\" y=\"{}\" width=\"28\" height=\"20\" rx=\"4\" ry=\"4\" class=\"bubble thal\" />",
            x - 14.0,
            y - 10.0
        ),
        NodeKind::Apical => triangle(x, y, 8.0),
        NodeKind::Excitatory | NodeKind::OutputSink => triangle(x, y, 14.0),
    };

    let label = node
        .label
        .as_deref()
        .map(|text| {
            format!(
                "<text x=\"{}\" y=\"{}\" class=\"nodeLabel\">{}</text>",
                x + 18.0,
                y + 3.0,
                escape(text)
            )
        })
        .unwrap_or_default();

    out.push_str(&format!(
        "<g id=\"{}\">{}{}</g>\n",
        escape(&node.id),
        shape,
        label
    ));
}

/// Right-pointing triangle with half-size `r` centred on (x, y)
fn triangle(x: f64, y: f64, r: f64) -> String {
    format!(
        "<polygon points=\"{},{} {},{} {},{}\" class=\"bubble exc\" />",
        x - r,
        y - r,
        x - r,
        y + r,
        x + r,
        y
    )
}
