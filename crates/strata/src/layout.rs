//! Layered 3D layout.
//!
//! Every layer of a graph is placed on its own horizontal plane. Inside a
//! plane the layer's nodes sit evenly spaced on a circle whose radius comes
//! from the palette; the plane height depends only on the layer tag (see
//! [`LayerTag::plane`]), so a layer keeps its height whatever other layers
//! are selected.
//!
//! Placement is closed-form and iterates nodes in name order: the same graph
//! always gets bit-identical coordinates.

use std::{collections::BTreeMap, f64::consts::TAU};

use log::{debug, trace};

use strata_core::{
    geometry::{Bounds, Point, Position3},
    layer::LayerTag,
};

use crate::{assign::Palette, error::LayoutError, graph::Graph};

/// Node positions keyed by node name, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: BTreeMap<String, Position3>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the position of `name`, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, position: Position3) -> Option<Position3> {
        self.positions.insert(name.into(), position)
    }

    pub fn get(&self, name: &str) -> Option<Position3> {
        self.positions.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Position3)> {
        self.positions
            .iter()
            .map(|(name, position)| (name.as_str(), *position))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The `x/y` bounding box of every position, grown by `pad` times its
    /// size on each side. `None` for an empty layout.
    pub fn extent(&self, pad: f32) -> Option<Bounds> {
        self.positions
            .values()
            .map(|p| Point::new(p.x(), p.y()))
            .fold(None, |bounds: Option<Bounds>, point| {
                Some(match bounds {
                    Some(bounds) => bounds.include(point),
                    None => Bounds::from_point(point),
                })
            })
            .map(|bounds| bounds.pad_relative(pad))
    }
}

impl<S: Into<String>> FromIterator<(S, Position3)> for Layout {
    fn from_iter<T: IntoIterator<Item = (S, Position3)>>(iter: T) -> Self {
        Self {
            positions: iter
                .into_iter()
                .map(|(name, position)| (name.into(), position))
                .collect(),
        }
    }
}

/// Places `names.len()` points evenly on a circle of `radius` around the origin.
///
/// Point `k` of `n` lies at angle `2πk/n`, starting on the positive `x` axis.
/// A single point sits at the center.
///
/// # Errors
///
/// - [`LayoutError::EmptyLayer`] - `names` is empty
/// - [`LayoutError::InvalidRadius`] - `radius` is not a positive number
///
/// # Examples
///
/// ```
/// # use strata::layout::circular_placement;
///
/// let points = circular_placement(&["A", "B"], 2.0).unwrap();
/// assert_eq!(points[0].x(), 2.0);
/// assert_eq!(points[1].x(), -2.0);
/// ```
pub fn circular_placement<S: AsRef<str>>(names: &[S], radius: f32) -> Result<Vec<Point>, LayoutError> {
    if names.is_empty() {
        return Err(LayoutError::EmptyLayer);
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(LayoutError::InvalidRadius(radius));
    }
    Ok(circle_points(names.len(), radius).collect())
}

fn circle_points(count: usize, radius: f32) -> impl Iterator<Item = Point> {
    let radius = f64::from(radius);
    (0..count).map(move |k| {
        if count == 1 {
            return Point::new(0.0, 0.0);
        }
        let angle = TAU * k as f64 / count as f64;
        Point::new(
            (radius * angle.cos()) as f32,
            (radius * angle.sin()) as f32,
        )
    })
}

/// Computes [`Layout`]s from graphs.
#[derive(Debug, Clone, Copy)]
pub struct LayeredLayoutEngine<'a> {
    palette: &'a Palette,
}

impl<'a> LayeredLayoutEngine<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette }
    }

    /// Places every node of `graph`.
    ///
    /// Only layers with nodes are visited, so this never fails.
    pub fn layout(&self, graph: &Graph) -> Layout {
        let mut layout = Layout::new();

        for layer in graph.layers_present() {
            let radius = self.palette.radius_of(layer);
            let z = f32::from(layer.plane());
            let nodes: Vec<&str> = graph.nodes_in_layer(layer).map(|node| node.name()).collect();

            trace!(layer:% = layer, nodes = nodes.len(), radius; "Placing layer");

            for (name, point) in nodes.iter().zip(circle_points(nodes.len(), radius)) {
                layout.insert(*name, Position3::new(point.x(), point.y(), z));
            }
        }

        debug!(positions = layout.len(); "Layout computed");
        layout
    }

    /// The plane height of `layer`.
    pub fn z_of(layer: LayerTag) -> f32 {
        f32::from(layer.plane())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::graph::{Node, ThresholdPolicy};
    use strata_core::layer::LayerSet;

    fn graph_of(nodes: &[(&str, LayerTag)]) -> Graph {
        Graph::from_parts(
            LayerSet::all(),
            ThresholdPolicy::dual(0.175).unwrap(),
            nodes.iter().map(|(name, layer)| Node::new(*name, *layer)),
            Vec::<(String, String, f64)>::new(),
        )
    }

    #[test]
    fn test_circular_placement() {
        let points = circular_placement(&["A", "B", "C", "D"], 2.0).unwrap();

        assert!(approx_eq!(f32, points[0].x(), 2.0, ulps = 2));
        assert!(approx_eq!(f32, points[0].y(), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, points[1].x(), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, points[1].y(), 2.0, ulps = 2));
        assert!(approx_eq!(f32, points[2].x(), -2.0, ulps = 2));
        assert!(approx_eq!(f32, points[3].y(), -2.0, ulps = 2));
    }

    #[test]
    fn test_single_node_sits_at_center() {
        let points = circular_placement(&["A"], 3.0).unwrap();
        assert_eq!(points, vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_placement_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(circular_placement(&empty, 1.0), Err(LayoutError::EmptyLayer));
        assert_eq!(
            circular_placement(&["A"], 0.0),
            Err(LayoutError::InvalidRadius(0.0))
        );
    }

    #[test]
    fn test_layers_are_stacked() {
        let palette = Palette::default();
        let graph = graph_of(&[
            ("LB", LayerTag::NeuroTests),
            ("SD_IFOF", LayerTag::SubcorticalDamage),
            ("CD_Insula", LayerTag::CorticalDamage),
        ]);

        let layout = LayeredLayoutEngine::new(&palette).layout(&graph);

        assert_eq!(layout.len(), 3);
        assert_eq!(layout.get("LB"), Some(Position3::new(0.0, 0.0, 2.0)));
        assert_eq!(layout.get("SD_IFOF").unwrap().z(), 1.0);
        assert_eq!(layout.get("CD_Insula").unwrap().z(), 0.0);
    }

    #[test]
    fn test_layer_radius_comes_from_palette() {
        let palette = Palette::default();
        let graph = graph_of(&[
            ("SD_A", LayerTag::SubcorticalDamage),
            ("SD_B", LayerTag::SubcorticalDamage),
        ]);

        let layout = LayeredLayoutEngine::new(&palette).layout(&graph);
        assert_eq!(layout.get("SD_A"), Some(Position3::new(3.0, 0.0, 1.0)));
        assert!(approx_eq!(f32, layout.get("SD_B").unwrap().x(), -3.0, ulps = 2));
    }

    #[test]
    fn test_z_does_not_depend_on_other_layers() {
        let palette = Palette::default();
        let engine = LayeredLayoutEngine::new(&palette);

        let alone = engine.layout(&graph_of(&[("CD_A", LayerTag::CorticalDamage)]));
        let mixed = engine.layout(&graph_of(&[
            ("CD_A", LayerTag::CorticalDamage),
            ("LB", LayerTag::NeuroTests),
        ]));

        assert_eq!(alone.get("CD_A").unwrap().z(), mixed.get("CD_A").unwrap().z());
        assert_eq!(LayeredLayoutEngine::z_of(LayerTag::CorticalDamage), 0.0);
    }

    #[test]
    fn test_extent_is_padded() {
        let layout: Layout = [
            ("A", Position3::new(-1.0, -2.0, 0.0)),
            ("B", Position3::new(1.0, 2.0, 1.0)),
        ]
        .into_iter()
        .collect();

        let extent = layout.extent(0.1).unwrap();
        assert!(approx_eq!(f32, extent.min_x(), -1.2, ulps = 4));
        assert!(approx_eq!(f32, extent.max_y(), 2.4, ulps = 4));
        assert!(Layout::new().extent(0.1).is_none());
    }

    proptest! {
        #[test]
        fn prop_layout_is_deterministic(names in proptest::collection::btree_set("[A-Z]{1,4}", 1..20)) {
            let palette = Palette::default();
            let nodes: Vec<(&str, LayerTag)> = names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.as_str(), LayerTag::ALL[i % 3]))
                .collect();
            let graph = graph_of(&nodes);
            let engine = LayeredLayoutEngine::new(&palette);

            let first = engine.layout(&graph);
            let second = engine.layout(&graph.clone());
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), graph.node_count());

            for node in graph.nodes() {
                let position = first.get(node.name()).unwrap();
                prop_assert_eq!(position.z(), f32::from(node.layer().plane()));
                let radius = (position.x().powi(2) + position.y().powi(2)).sqrt();
                prop_assert!(radius <= palette.radius_of(node.layer()) + 1e-4);
            }
        }
    }
}
