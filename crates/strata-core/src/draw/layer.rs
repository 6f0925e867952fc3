//! Paint-order layers for SVG scenes.
//!
//! A scene is assembled out of order (a node's label is produced together with
//! the node, an edge may be added after its endpoints) but must be painted
//! bottom to top: layer planes first, then edges, nodes and finally labels.
//! [`LayeredOutput`] collects nodes tagged with a [`RenderLayer`] and emits one
//! `<g data-layer="...">` group per non-empty layer in paint order.
//!
//! # Example
//!
//! ```
//! # use strata_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::{Circle, Polygon};
//!
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Node, Box::new(Circle::new()));
//! output.add_to_layer(RenderLayer::Plane, Box::new(Polygon::new()));
//!
//! // Planes are painted before nodes regardless of insertion order
//! let groups = output.render();
//! assert_eq!(groups.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Paint-order layers of a scene, bottom first.
///
/// The derived `Ord` follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Background fill of the page
    Background,
    /// Translucent layer planes
    Plane,
    /// Correlation edges
    Edge,
    /// Node markers
    Node,
    /// Node indices, legend entries and titles
    Label,
}

impl RenderLayer {
    /// Returns the value written to the group's `data-layer` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Plane => "plane",
            Self::Edge => "edge",
            Self::Node => "node",
            Self::Label => "label",
        }
    }
}

/// SVG nodes grouped by paint layer.
///
/// Within one layer, nodes keep their insertion order.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node to `layer`.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Moves every node of `other` into this output.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of nodes collected so far, across all layers.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Renders the collected nodes into one group per non-empty layer.
    ///
    /// Groups come out bottom layer first and carry a `data-layer` attribute.
    /// Consumes the output to avoid cloning SVG nodes.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable sort keeps insertion order inside each layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);
                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }

            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);

        result
    }
}

#[cfg(test)]
mod tests {
    use svg::node::element::{Circle, Line, Polygon, Text};

    use super::*;

    fn render_to_string(output: LayeredOutput) -> String {
        output
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_layered_output_new() {
        let output = LayeredOutput::new();
        assert!(output.is_empty());
        assert!(output.render().is_empty());
    }

    #[test]
    fn test_layered_output_groups_by_layer() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Edge, Box::new(Line::new()));
        output.add_to_layer(RenderLayer::Edge, Box::new(Line::new()));
        output.add_to_layer(RenderLayer::Node, Box::new(Circle::new()));
        assert_eq!(output.len(), 3);

        assert_eq!(output.render().len(), 2);
    }

    #[test]
    fn test_layered_output_paint_order() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Label, Box::new(Text::new("1")));
        output.add_to_layer(RenderLayer::Node, Box::new(Circle::new()));
        output.add_to_layer(RenderLayer::Edge, Box::new(Line::new()));
        output.add_to_layer(RenderLayer::Plane, Box::new(Polygon::new()));

        let rendered = render_to_string(output);
        let position = |layer: RenderLayer| {
            rendered
                .find(&format!("data-layer=\"{}\"", layer.name()))
                .unwrap()
        };

        assert!(position(RenderLayer::Plane) < position(RenderLayer::Edge));
        assert!(position(RenderLayer::Edge) < position(RenderLayer::Node));
        assert!(position(RenderLayer::Node) < position(RenderLayer::Label));
    }

    #[test]
    fn test_layered_output_merge() {
        let mut first = LayeredOutput::new();
        first.add_to_layer(RenderLayer::Node, Box::new(Circle::new()));

        let mut second = LayeredOutput::new();
        second.add_to_layer(RenderLayer::Node, Box::new(Circle::new()));
        second.add_to_layer(RenderLayer::Label, Box::new(Text::new("2")));

        first.merge(second);

        assert_eq!(first.len(), 3);
        assert_eq!(first.render().len(), 2);
    }
}
