//! Thresholded correlation graphs.
//!
//! A [`Graph`] holds the variables of one layer selection as nodes and the
//! correlations that passed a [`ThresholdPolicy`] as undirected, weighted
//! edges. Graphs are produced by [`GraphBuilder`] and never change afterwards.
//!
//! # Ordering
//!
//! Nodes are kept sorted by name: iteration, layer placement and legend
//! numbering all follow that order. Edges keep the order in which the builder
//! found them, which is matrix column order.

mod builder;
mod threshold;

pub use builder::GraphBuilder;
pub use threshold::{ThresholdMode, ThresholdPolicy};

use std::collections::BTreeSet;

use indexmap::IndexMap;
use petgraph::{
    graph::{NodeIndex, UnGraph},
    visit::EdgeRef,
};

use strata_core::layer::{LayerSet, LayerTag};

/// A matrix variable placed in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    layer: LayerTag,
}

impl Node {
    pub fn new(name: impl Into<String>, layer: LayerTag) -> Self {
        Self {
            name: name.into(),
            layer,
        }
    }

    /// The variable name, which is also the node's display label.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layer(&self) -> LayerTag {
        self.layer
    }
}

/// A borrowed view of one edge.
#[derive(Debug, Clone, Copy)]
pub struct Edge<'a> {
    source: &'a Node,
    target: &'a Node,
    weight: f64,
}

impl<'a> Edge<'a> {
    pub fn source(&self) -> &'a Node {
        self.source
    }

    pub fn target(&self) -> &'a Node {
        self.target
    }

    /// The signed correlation coefficient.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// An immutable correlation graph for one layer selection.
#[derive(Debug, Clone)]
pub struct Graph {
    layer_set: LayerSet,
    threshold: ThresholdPolicy,
    graph: UnGraph<Node, f64>,
    /// Node name to index, in name order.
    node_index: IndexMap<String, NodeIndex>,
}

impl Graph {
    /// Creates a graph from nodes (any order) and edges between node names.
    ///
    /// Edges naming an unknown node or a node twice are dropped. Used by
    /// [`GraphBuilder`]; handy for building fixtures directly.
    pub fn from_parts(
        layer_set: LayerSet,
        threshold: ThresholdPolicy,
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = (String, String, f64)>,
    ) -> Self {
        let mut nodes: Vec<Node> = nodes.into_iter().collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes.dedup_by(|a, b| a.name == b.name);

        let mut graph = UnGraph::with_capacity(nodes.len(), 0);
        let mut node_index = IndexMap::with_capacity(nodes.len());
        for node in nodes {
            let name = node.name.clone();
            let idx = graph.add_node(node);
            node_index.insert(name, idx);
        }

        for (source, target, weight) in edges {
            if source == target {
                continue;
            }
            if let (Some(&a), Some(&b)) = (node_index.get(&source), node_index.get(&target)) {
                graph.add_edge(a, b, weight);
            }
        }

        Self {
            layer_set,
            threshold,
            graph,
            node_index,
        }
    }

    pub fn layer_set(&self) -> &LayerSet {
        &self.layer_set
    }

    /// The policy the edges were filtered with.
    pub fn threshold(&self) -> ThresholdPolicy {
        self.threshold
    }

    /// Iterates the nodes in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_index.values().map(|&idx| &self.graph[idx])
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.node_index.get(name).map(|&idx| &self.graph[idx])
    }

    /// 1-based position of `name` in node order, as shown in legends.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.node_index.get_index_of(name).map(|position| position + 1)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Iterates the edges in the order they were added.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.graph.edge_references().map(|edge| Edge {
            source: &self.graph[edge.source()],
            target: &self.graph[edge.target()],
            weight: *edge.weight(),
        })
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Layers with at least one node, ascending.
    pub fn layers_present(&self) -> BTreeSet<LayerTag> {
        self.nodes().map(Node::layer).collect()
    }

    /// Nodes of one layer, in name order.
    pub fn nodes_in_layer(&self, layer: LayerTag) -> impl Iterator<Item = &Node> {
        self.nodes().filter(move |node| node.layer == layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        Graph::from_parts(
            LayerSet::all(),
            ThresholdPolicy::dual(0.175).unwrap(),
            [
                Node::new("C", LayerTag::SubcorticalDamage),
                Node::new("A", LayerTag::NeuroTests),
                Node::new("B", LayerTag::NeuroTests),
            ],
            [
                ("A".to_string(), "B".to_string(), 0.5),
                ("A".to_string(), "A".to_string(), 1.0),
                ("A".to_string(), "Z".to_string(), 0.9),
            ],
        )
    }

    #[test]
    fn test_nodes_are_sorted_by_name() {
        let graph = sample();
        let names: Vec<&str> = graph.nodes().map(Node::name).collect();

        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(graph.index_of("A"), Some(1));
        assert_eq!(graph.index_of("C"), Some(3));
        assert_eq!(graph.index_of("Z"), None);
    }

    #[test]
    fn test_self_and_dangling_edges_are_dropped() {
        let graph = sample();
        assert_eq!(graph.edge_count(), 1);

        let edge = graph.edges().next().unwrap();
        assert_eq!(edge.source().name(), "A");
        assert_eq!(edge.target().name(), "B");
        assert_eq!(edge.weight(), 0.5);
    }

    #[test]
    fn test_layers_present() {
        let graph = sample();

        assert_eq!(
            graph.layers_present().into_iter().collect::<Vec<_>>(),
            vec![LayerTag::NeuroTests, LayerTag::SubcorticalDamage]
        );
        assert_eq!(graph.nodes_in_layer(LayerTag::NeuroTests).count(), 2);
        assert_eq!(graph.nodes_in_layer(LayerTag::CorticalDamage).count(), 0);
    }
}
