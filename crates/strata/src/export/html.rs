//! Interactive HTML backend.
//!
//! Produces a single HTML page that loads vis-network and runs a
//! force-directed simulation over the graph. Nodes start at their layout
//! positions, are colored by layer and, when a [`NodeSizeMap`] is part of the
//! scene, scaled by centrality. A fixed overlay in the corner lists the
//! layers present.
//!
//! [`NodeSizeMap`]: crate::centrality::NodeSizeMap

use std::fmt::Write as _;

use log::{debug, info};
use serde::Serialize;
use serde_json::{Value, json};

use strata_core::layer::LayerTag;

use super::{Error, InteractiveArtifact, Renderer, Scene};
use crate::{assign::Palette, config::InteractiveStyle};

#[derive(Debug, Serialize)]
struct VisNode<'a> {
    id: &'a str,
    label: &'a str,
    color: String,
    x: f64,
    y: f64,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<f64>,
}

#[derive(Debug, Serialize)]
struct VisEdge<'a> {
    from: &'a str,
    to: &'a str,
    value: f64,
    title: String,
}

/// Renders graphs into self-contained vis-network pages.
///
/// # Examples
///
/// ```
/// # use strata::export::{Renderer, Scene, html::InteractiveSceneRenderer};
/// # use strata::{assign::LayerAssigner, graph::{Graph, Node, ThresholdPolicy}};
/// # use strata::{layer::{LayerSet, LayerTag}, layout::Layout};
///
/// let graph = Graph::from_parts(
///     LayerSet::all(),
///     ThresholdPolicy::single(0.175).unwrap(),
///     [Node::new("LB", LayerTag::NeuroTests)],
///     Vec::new(),
/// );
/// let renderer = InteractiveSceneRenderer::new(LayerAssigner::default().palette().clone());
///
/// let artifact = renderer.render(&Scene::new(&graph, &Layout::new())).unwrap();
/// assert!(artifact.html().contains("\"id\":\"LB\""));
/// ```
#[derive(Debug, Clone)]
pub struct InteractiveSceneRenderer {
    palette: Palette,
    style: InteractiveStyle,
}

impl InteractiveSceneRenderer {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            style: InteractiveStyle::default(),
        }
    }

    pub fn with_style(mut self, style: InteractiveStyle) -> Self {
        self.style = style;
        self
    }

    fn nodes_json(&self, scene: &Scene<'_>) -> Result<String, Error> {
        let scale = self.style.position_scale();
        let nodes: Vec<VisNode<'_>> = scene
            .graph()
            .nodes()
            .map(|node| {
                let position = scene.position_of(node);
                VisNode {
                    id: node.name(),
                    label: node.name(),
                    color: self.palette.color_of(node.layer()).to_string(),
                    x: f64::from(position.x()) * scale,
                    y: f64::from(position.y()) * scale,
                    title: format!("{} ({})", node.name(), self.palette.name_of(node.layer())),
                    size: scene.sizes().and_then(|sizes| sizes.get(node.name())),
                }
            })
            .collect();
        to_script_json(&nodes)
    }

    fn edges_json(&self, scene: &Scene<'_>) -> Result<String, Error> {
        let edges: Vec<VisEdge<'_>> = scene
            .graph()
            .edges()
            .map(|edge| VisEdge {
                from: edge.source().name(),
                to: edge.target().name(),
                value: edge.weight().abs() * self.style.edge_weight_scale(),
                title: format!("{:.3}", edge.weight()),
            })
            .collect();
        to_script_json(&edges)
    }

    fn options(&self, sized: bool) -> Value {
        let physics = self.style.physics();
        let mut nodes = json!({
            "shape": "dot",
            "font": { "face": self.style.font_face() },
        });
        if sized {
            let (min, max) = self.style.size_range();
            nodes["scaling"] = json!({ "min": min, "max": max });
        }

        json!({
            "nodes": nodes,
            "edges": {
                "color": {
                    "color": self.style.edge_color(),
                    "highlight": self.style.highlight_color(),
                    "hover": self.style.highlight_color(),
                },
                "smooth": false,
            },
            "interaction": {
                "hover": false,
                "tooltipDelay": self.style.tooltip_delay(),
            },
            "physics": {
                "barnesHut": {
                    "gravitationalConstant": physics.gravitational_constant(),
                    "centralGravity": physics.central_gravity(),
                    "springLength": physics.spring_length(),
                    "springConstant": physics.spring_constant(),
                    "damping": physics.damping(),
                },
                "minVelocity": physics.min_velocity(),
                "solver": "barnesHut",
            },
        })
    }

    /// The fixed overlay listing all three layers, in plane order from the top.
    fn legend(&self) -> String {
        let mut layers = LayerTag::ALL;
        layers.sort_by_key(|layer| std::cmp::Reverse(layer.plane()));

        let mut legend = String::from(
            "<div id=\"legend\" style=\"position:absolute; top:10px; right:10px; \
             background:white; padding:10px; border:1px solid #ccc; \
             font-family:Tahoma; font-size:14px; z-index:999;\">\n",
        );
        let _ = writeln!(
            legend,
            "  <strong>{}</strong><br>",
            escape_html(self.style.legend_title())
        );
        for layer in layers {
            let _ = writeln!(
                legend,
                "  <span style=\"color:{};\">&#9632;</span> {}<br>",
                escape_html(&self.palette.color_of(layer).to_string()),
                layer.code(),
            );
        }
        legend.push_str("</div>");
        legend
    }

    fn document(&self, scene: &Scene<'_>) -> Result<String, Error> {
        let nodes = self.nodes_json(scene)?;
        let edges = self.edges_json(scene)?;
        let options = to_script_json(&self.options(scene.sizes().is_some()))?;

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script type="text/javascript" src="{script}"></script>
<style>
  body {{ margin: 0; }}
  #network {{ width: {width}; height: {height}; border: 1px solid lightgray; position: relative; }}
</style>
</head>
<body>
<div id="network"></div>
{legend}
<script type="text/javascript">
  var nodes = new vis.DataSet({nodes});
  var edges = new vis.DataSet({edges});
  var container = document.getElementById("network");
  var data = {{ nodes: nodes, edges: edges }};
  var options = {options};
  var network = new vis.Network(container, data, options);
</script>
</body>
</html>
"#,
            title = escape_html(self.style.title()),
            script = escape_html(self.style.script_url()),
            width = escape_html(self.style.width()),
            height = escape_html(self.style.height()),
            legend = self.legend(),
        ))
    }
}

impl Renderer for InteractiveSceneRenderer {
    type Artifact = InteractiveArtifact;

    fn render(&self, scene: &Scene<'_>) -> Result<InteractiveArtifact, Error> {
        info!(
            nodes = scene.graph().node_count(),
            edges = scene.graph().edge_count(),
            sized = scene.sizes().is_some();
            "Rendering interactive scene"
        );

        let html = self.document(scene)?;
        debug!(bytes = html.len(); "HTML document rendered");
        Ok(InteractiveArtifact { html })
    }
}

/// Serializes `value` for embedding inside a `<script>` element.
fn to_script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_string(value)
        .map_err(|err| Error::Render(format!("Failed to serialize scene data: {err}")))?;
    // A literal `</` would end the script element early
    Ok(json.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
