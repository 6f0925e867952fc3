//! Turns a correlation matrix into a thresholded [`Graph`].

use std::collections::HashMap;

use log::{debug, info, trace};

use strata_core::{
    layer::{LayerSet, LayerTag},
    matrix::CorrelationMatrix,
};

use super::{Graph, Node, ThresholdPolicy};
use crate::{assign::LayerAssigner, error::GraphError};

/// A matrix column selected for the graph.
struct Included<'m> {
    name: &'m str,
    layer: LayerTag,
    row: usize,
    column: usize,
}

/// Builds graphs from correlation matrices.
///
/// The builder only reads the upper triangle: each unordered pair of
/// included variables is visited once, `i < j` in matrix column order, and
/// the value at (row of `i`, column of `j`) decides the edge. An asymmetric
/// input therefore never yields two different weights for one pair.
///
/// # Examples
///
/// ```
/// # use strata::{assign::LayerAssigner, graph::{GraphBuilder, ThresholdPolicy}};
/// # use strata::{layer::LayerSet, matrix::CorrelationMatrix};
///
/// let matrix = CorrelationMatrix::from_rows(
///     ["LB", "SD_IFOF"],
///     vec![vec![1.0, 0.3], vec![0.3, 1.0]],
/// ).unwrap();
/// let assigner = LayerAssigner::default();
///
/// let graph = GraphBuilder::new(&assigner)
///     .build(&matrix, &LayerSet::all(), ThresholdPolicy::dual(0.175).unwrap())
///     .unwrap();
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    assigner: &'a LayerAssigner,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(assigner: &'a LayerAssigner) -> Self {
        Self { assigner }
    }

    /// Builds the graph of `layer_set` from `matrix`.
    ///
    /// A layer of the set without any matrix variable contributes nothing.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DimensionMismatch`] - The matrix is not square
    /// - [`GraphError::DuplicateName`] - A row or column name repeats
    /// - [`GraphError::NameMismatch`] - Row and column names differ
    /// - [`GraphError::UnknownNode`] - A variable matches no layer rule and
    ///   the assigner rejects such variables
    pub fn build(
        &self,
        matrix: &CorrelationMatrix,
        layer_set: &LayerSet,
        threshold: ThresholdPolicy,
    ) -> Result<Graph, GraphError> {
        info!(
            layers = self.assigner.label_of(layer_set),
            threshold:% = threshold;
            "Building graph"
        );

        let included = self.select(matrix, layer_set)?;

        let mut edges = Vec::new();
        for (position, source) in included.iter().enumerate() {
            for target in &included[position + 1..] {
                let weight = matrix.value(source.row, target.column);
                if threshold.accepts(weight) {
                    trace!(source = source.name, target = target.name, weight; "Edge accepted");
                    edges.push((source.name.to_string(), target.name.to_string(), weight));
                }
            }
        }

        let nodes = included
            .iter()
            .map(|variable| Node::new(variable.name, variable.layer));
        let graph = Graph::from_parts(layer_set.clone(), threshold, nodes, edges);

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Graph built"
        );

        Ok(graph)
    }

    /// Validates the matrix shape and returns the included columns in
    /// column order.
    fn select<'m>(
        &self,
        matrix: &'m CorrelationMatrix,
        layer_set: &LayerSet,
    ) -> Result<Vec<Included<'m>>, GraphError> {
        if !matrix.is_square() {
            return Err(GraphError::DimensionMismatch {
                rows: matrix.rows(),
                columns: matrix.columns(),
            });
        }

        let rows = index_names(matrix.row_names())?;
        let columns = index_names(matrix.column_names())?;
        if let Some(name) = matrix
            .row_names()
            .iter()
            .find(|name| !columns.contains_key(name.as_str()))
        {
            return Err(GraphError::NameMismatch { name: name.clone() });
        }

        let mut included = Vec::new();
        for (column, name) in matrix.column_names().iter().enumerate() {
            let Some(&row) = rows.get(name.as_str()) else {
                return Err(GraphError::NameMismatch { name: name.clone() });
            };

            match self.assigner.layer_of(name)? {
                Some(layer) if layer_set.contains(layer) => included.push(Included {
                    name,
                    layer,
                    row,
                    column,
                }),
                Some(layer) => trace!(name, layer:% = layer; "Variable outside layer set"),
                None => {}
            }
        }

        Ok(included)
    }
}

/// Maps each name to its position, rejecting repeats.
fn index_names(names: &[String]) -> Result<HashMap<&str, usize>, GraphError> {
    let mut index = HashMap::with_capacity(names.len());
    for (position, name) in names.iter().enumerate() {
        if index.insert(name.as_str(), position).is_some() {
            return Err(GraphError::DuplicateName { name: name.clone() });
        }
    }
    Ok(index)
}
