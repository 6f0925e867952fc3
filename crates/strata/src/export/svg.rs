//! Static SVG backend.
//!
//! Renders the multilayer scene as seen by a fixed orthographic camera: one
//! translucent plane per layer, edges between the planes, nodes colored by
//! layer and labeled with their legend index. The legend mapping each index
//! to a node name is a separate SVG document.

use log::{debug, info};
use svg::{
    Document,
    node::element::{Circle, Group, Line, Polygon, Rectangle, Text},
};

use strata_core::{
    apply_stroke,
    draw::{LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::{Bounds, Point, Position3, Size},
    layer::LayerTag,
};

use super::{Error, Renderer, Scene, StaticArtifact};
use crate::{assign::Palette, config::StaticStyle, graph::Node, layout::Layout};

/// Page margin around the drawn content.
const MARGIN: f32 = 50.0;

/// Inner padding of the legend document.
const LEGEND_PADDING: f32 = 10.0;

/// Rough advance of one character relative to the font size.
const CHAR_WIDTH_RATIO: f32 = 0.6;

/// Renders graphs into a scene SVG and a legend SVG.
///
/// # Examples
///
/// ```
/// # use strata::export::{Renderer, Scene, svg::StaticSceneRenderer};
/// # use strata::{assign::LayerAssigner, graph::{Graph, Node, ThresholdPolicy}};
/// # use strata::{layer::{LayerSet, LayerTag}, layout::LayeredLayoutEngine};
///
/// let assigner = LayerAssigner::default();
/// let graph = Graph::from_parts(
///     LayerSet::all(),
///     ThresholdPolicy::dual(0.175).unwrap(),
///     [Node::new("LB", LayerTag::NeuroTests)],
///     Vec::new(),
/// );
/// let layout = LayeredLayoutEngine::new(assigner.palette()).layout(&graph);
///
/// let renderer = StaticSceneRenderer::new(assigner.palette().clone());
/// let artifact = renderer.render(&Scene::new(&graph, &layout)).unwrap();
/// assert!(artifact.legend().contains("1: LB"));
/// ```
#[derive(Debug, Clone)]
pub struct StaticSceneRenderer {
    palette: Palette,
    style: StaticStyle,
    plane_padding: f32,
}

impl StaticSceneRenderer {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            style: StaticStyle::default(),
            plane_padding: 0.1,
        }
    }

    pub fn with_style(mut self, style: StaticStyle) -> Self {
        self.style = style;
        self
    }

    /// Relative padding of the layer planes around the node extent.
    pub fn with_plane_padding(mut self, plane_padding: f32) -> Self {
        self.plane_padding = plane_padding;
        self
    }

    fn render_scene(&self, scene: &Scene<'_>) -> Document {
        let graph = scene.graph();
        let projection = self.style.projection();
        let mut output = LayeredOutput::new();
        let mut page = PageBounds::default();

        let nodes: Vec<(&Node, Point)> = graph
            .nodes()
            .map(|node| (node, projection.project(scene.position_of(node))))
            .collect();

        // Planes, lowest first so that higher planes are painted over them
        if let Some(extent) = self.plane_extent(scene) {
            let mut layers: Vec<LayerTag> = graph.layers_present().into_iter().collect();
            layers.sort_by_key(|layer| layer.plane());

            for layer in layers {
                let z = f32::from(layer.plane());
                let corners = [
                    (extent.min_x(), extent.min_y()),
                    (extent.max_x(), extent.min_y()),
                    (extent.max_x(), extent.max_y()),
                    (extent.min_x(), extent.max_y()),
                ]
                .map(|(x, y)| projection.project(Position3::new(x, y, z)));
                corners.iter().for_each(|corner| page.include(*corner));

                let points = corners
                    .iter()
                    .map(|p| format!("{},{}", p.x(), p.y()))
                    .collect::<Vec<_>>()
                    .join(" ");
                let plane = Polygon::new()
                    .set("points", points)
                    .set("fill", self.palette.color_of(layer))
                    .set("fill-opacity", self.style.plane_alpha())
                    .set("stroke", "none")
                    .set("data-layer-code", layer.code());
                output.add_to_layer(RenderLayer::Plane, Box::new(plane));
            }
        }

        for edge in graph.edges() {
            let source = projection.project(scene.position_of(edge.source()));
            let target = projection.project(scene.position_of(edge.target()));
            let stroke = StrokeDefinition::for_weight(
                self.style.edge_color(),
                self.style.edge_width(),
                edge.weight(),
            );

            let line = Line::new()
                .set("x1", source.x())
                .set("y1", source.y())
                .set("x2", target.x())
                .set("y2", target.y())
                .set("data-weight", edge.weight());
            output.add_to_layer(RenderLayer::Edge, Box::new(apply_stroke!(line, &stroke)));
        }

        let radius = self.style.node_radius();
        for (index, (node, point)) in nodes.iter().enumerate() {
            page.include(point.add_point(Point::new(radius, radius)));
            page.include(point.sub_point(Point::new(radius, radius)));

            let marker = Circle::new()
                .set("cx", point.x())
                .set("cy", point.y())
                .set("r", radius)
                .set("fill", self.palette.color_of(node.layer()))
                .set("stroke", self.style.node_outline())
                .set("stroke-width", 0.5)
                .set("data-name", node.name());
            output.add_to_layer(RenderLayer::Node, Box::new(marker));

            let label = Text::new((index + 1).to_string())
                .set("x", point.x() + radius)
                .set("y", point.y() - radius)
                .set("font-family", self.style.font_family())
                .set("font-size", self.style.label_font_size())
                .set("font-weight", "bold")
                .set("fill", "black");
            output.add_to_layer(RenderLayer::Label, Box::new(label));
        }

        debug!(items = output.len(); "Scene assembled");
        self.document(page.bounds(), output)
    }

    fn render_legend(&self, scene: &Scene<'_>) -> Document {
        let graph = scene.graph();
        let font_size = self.style.legend_font_size();
        let line_height = font_size * 1.5;
        let marker_radius = font_size * 0.35;
        let title_height = line_height * 1.5;

        let entries: Vec<(LayerTag, String)> = graph
            .nodes()
            .enumerate()
            .map(|(index, node)| (node.layer(), format!("{}: {}", index + 1, node.name())))
            .collect();

        let columns = self.style.legend_columns().max(1);
        let rows = entries.len().div_ceil(columns);
        let column_width = entries
            .iter()
            .map(|(_, text)| text_width(text, font_size))
            .fold(0.0f32, f32::max)
            + marker_radius * 2.0
            + font_size;

        let mut output = LayeredOutput::new();

        let title = Text::new(self.style.legend_title())
            .set("x", LEGEND_PADDING)
            .set("y", LEGEND_PADDING + font_size)
            .set("font-family", self.style.font_family())
            .set("font-size", font_size + 2.0)
            .set("font-weight", "bold");
        output.add_to_layer(RenderLayer::Label, Box::new(title));

        // Columns are filled top to bottom before moving right
        for (position, (layer, text)) in entries.iter().enumerate() {
            let column = position / rows.max(1);
            let row = position % rows.max(1);
            let x = LEGEND_PADDING + column as f32 * column_width;
            let baseline = LEGEND_PADDING + title_height + (row as f32 + 0.75) * line_height;

            let marker = Circle::new()
                .set("cx", x + marker_radius)
                .set("cy", baseline - font_size * 0.35)
                .set("r", marker_radius)
                .set("fill", self.palette.color_of(*layer))
                .set("stroke", self.style.node_outline())
                .set("stroke-width", 0.5);
            output.add_to_layer(RenderLayer::Node, Box::new(marker));

            let label = Text::new(text.as_str())
                .set("x", x + marker_radius * 2.0 + font_size * 0.5)
                .set("y", baseline)
                .set("font-family", self.style.font_family())
                .set("font-size", font_size);
            output.add_to_layer(RenderLayer::Label, Box::new(label));
        }

        let used_columns = columns.min(entries.len()).max(1);
        let width = (used_columns as f32 * column_width)
            .max(text_width(self.style.legend_title(), font_size + 2.0))
            + LEGEND_PADDING * 2.0;
        let height = LEGEND_PADDING * 2.0 + title_height + rows as f32 * line_height;

        let doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);
        let doc = self.add_background(doc, Size::new(width, height));
        output
            .render()
            .into_iter()
            .fold(doc, |doc, group| doc.add(group))
    }

    /// The padded node extent, never degenerate. `None` without nodes.
    fn plane_extent(&self, scene: &Scene<'_>) -> Option<Bounds> {
        let positioned: Layout = scene
            .graph()
            .nodes()
            .map(|node| (node.name(), scene.position_of(node)))
            .collect();
        let extent = positioned.extent(self.plane_padding)?;

        // A single node (or a single line of nodes) still gets a visible plane
        if extent.width() == 0.0 || extent.height() == 0.0 {
            return Some(extent.pad_uniform(0.5));
        }
        Some(extent)
    }

    fn add_background(&self, doc: Document, size: Size) -> Document {
        match self.style.background_color() {
            Some(color) => doc.add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", size.width())
                    .set("height", size.height())
                    .set("fill", color)
                    .set("fill-opacity", color.alpha()),
            ),
            None => doc,
        }
    }

    /// Wraps the layered output into a document with a margin around `content`.
    fn document(&self, content: Bounds, output: LayeredOutput) -> Document {
        let size = content.pad_uniform(MARGIN).to_size();
        debug!("Final SVG dimensions: {}x{}", size.width(), size.height());

        let doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", size.width(), size.height()),
            )
            .set("width", size.width())
            .set("height", size.height());
        let doc = self.add_background(doc, size);

        let main_group = output.render().into_iter().fold(
            Group::new().set(
                "transform",
                format!(
                    "translate({}, {})",
                    MARGIN - content.min_x(),
                    MARGIN - content.min_y()
                ),
            ),
            |group, layer| group.add(layer),
        );

        doc.add(main_group)
    }
}

impl Renderer for StaticSceneRenderer {
    type Artifact = StaticArtifact;

    fn render(&self, scene: &Scene<'_>) -> Result<StaticArtifact, Error> {
        info!(
            nodes = scene.graph().node_count(),
            edges = scene.graph().edge_count();
            "Rendering static scene"
        );

        let artifact = StaticArtifact {
            scene: self.render_scene(scene).to_string(),
            legend: self.render_legend(scene).to_string(),
        };

        debug!("SVG documents rendered");
        Ok(artifact)
    }
}

fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * CHAR_WIDTH_RATIO
}

/// Bounding box of everything drawn on the page so far.
#[derive(Debug, Default)]
struct PageBounds {
    bounds: Option<Bounds>,
}

impl PageBounds {
    fn include(&mut self, point: Point) {
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.include(point),
            None => Bounds::from_point(point),
        });
    }

    fn bounds(&self) -> Bounds {
        self.bounds.unwrap_or_default()
    }
}
