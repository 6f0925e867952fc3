//! Node sizes from precomputed centrality values.

use indexmap::IndexMap;
use log::{debug, trace};

use strata_core::matrix::CentralityMap;

use crate::graph::Graph;

/// Visual node sizes keyed by node name, in graph node order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSizeMap {
    sizes: IndexMap<String, f64>,
}

impl NodeSizeMap {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.sizes.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.sizes.iter().map(|(name, size)| (name.as_str(), *size))
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Scales centrality values into node sizes.
///
/// Nodes without a usable value (absent, negative or not finite) get
/// `default_value * scale_factor`, so a missing entry looks like a node of
/// centrality `default_value`.
///
/// # Examples
///
/// ```
/// # use strata::centrality::CentralityAnnotator;
/// # use strata::graph::{Graph, Node, ThresholdPolicy};
/// # use strata::{layer::{LayerSet, LayerTag}, matrix::CentralityMap};
///
/// let graph = Graph::from_parts(
///     LayerSet::all(),
///     ThresholdPolicy::dual(0.175).unwrap(),
///     [Node::new("LB", LayerTag::NeuroTests), Node::new("CD_Insula", LayerTag::CorticalDamage)],
///     Vec::new(),
/// );
/// let centrality: CentralityMap = [("LB".to_string(), 0.25)].into_iter().collect();
///
/// let sizes = CentralityAnnotator::default().annotate(&graph, &centrality);
/// assert_eq!(sizes.get("LB"), Some(25.0));
/// assert_eq!(sizes.get("CD_Insula"), Some(1000.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralityAnnotator {
    scale_factor: f64,
    default_value: f64,
}

impl CentralityAnnotator {
    pub fn new(scale_factor: f64, default_value: f64) -> Self {
        Self {
            scale_factor,
            default_value,
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Size of every node of `graph`. Never fails.
    pub fn annotate(&self, graph: &Graph, centrality: &CentralityMap) -> NodeSizeMap {
        let mut defaulted = 0usize;
        let sizes = graph
            .nodes()
            .map(|node| {
                let value = match centrality.get(node.name()) {
                    Some(value) if value.is_finite() && value >= 0.0 => value,
                    other => {
                        trace!(name = node.name(), value:? = other; "Using default centrality");
                        defaulted += 1;
                        self.default_value
                    }
                };
                (node.name().to_string(), value * self.scale_factor)
            })
            .collect();

        debug!(
            metric:? = centrality.metric(),
            nodes = graph.node_count(),
            defaulted;
            "Node sizes computed"
        );

        NodeSizeMap { sizes }
    }
}

impl Default for CentralityAnnotator {
    fn default() -> Self {
        Self::new(100.0, 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, ThresholdPolicy};
    use strata_core::layer::{LayerSet, LayerTag};

    fn graph() -> Graph {
        Graph::from_parts(
            LayerSet::all(),
            ThresholdPolicy::dual(0.175).unwrap(),
            ["C", "A", "B", "D"].map(|name| Node::new(name, LayerTag::NeuroTests)),
            Vec::new(),
        )
    }

    #[test]
    fn test_sizes_follow_node_order() {
        let mut centrality = CentralityMap::with_metric("degree");
        centrality.insert("A", 0.5);
        centrality.insert("C", 0.1);
        centrality.insert("unrelated", 3.0);

        let sizes = CentralityAnnotator::new(100.0, 10.0).annotate(&graph(), &centrality);

        assert_eq!(sizes.len(), 4);
        let names: Vec<&str> = sizes.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
        assert_eq!(sizes.get("A"), Some(50.0));
        assert_eq!(sizes.get("B"), Some(1000.0));
        assert_eq!(sizes.get("unrelated"), None);
    }

    #[test]
    fn test_unusable_values_get_default() {
        let mut centrality = CentralityMap::new();
        centrality.insert("A", -1.0);
        centrality.insert("B", f64::NAN);
        centrality.insert("C", f64::INFINITY);
        centrality.insert("D", 0.0);

        let sizes = CentralityAnnotator::new(2.0, 1.5).annotate(&graph(), &centrality);

        assert_eq!(sizes.get("A"), Some(3.0));
        assert_eq!(sizes.get("B"), Some(3.0));
        assert_eq!(sizes.get("C"), Some(3.0));
        assert_eq!(sizes.get("D"), Some(0.0));
    }

    #[test]
    fn test_empty_map_defaults_everything() {
        let sizes = CentralityAnnotator::default().annotate(&graph(), &CentralityMap::new());
        assert!(sizes.iter().all(|(_, size)| size == 1000.0));
    }
}
