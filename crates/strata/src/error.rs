//! Error types for Strata operations.
//!
//! This module provides the main error type [`StrataError`] which wraps the
//! error conditions of every pipeline stage, together with the stage errors
//! [`GraphError`] and [`LayoutError`]. `LayoutError` is only returned by
//! [`circular_placement`](crate::layout::circular_placement); the layout
//! engine itself never fails.

use std::{io, path::PathBuf};

use thiserror::Error;

use strata_core::layer::LayerError;
use strata_parser::error::ParseError;

/// The main error type for Strata operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the table source next to the structured
/// diagnostics so that callers can render the offending cells.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Invalid layer set: {0}")]
    LayerSet(#[from] LayerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("missing input `{}`", .0.display())]
    MissingInput(PathBuf),
}

impl From<crate::export::Error> for StrataError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl StrataError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

/// Errors raised while turning a matrix into a graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("matrix is not square: {rows} rows, {columns} columns")]
    DimensionMismatch { rows: usize, columns: usize },

    #[error("variable `{name}` has no matching row and column")]
    NameMismatch { name: String },

    #[error("variable `{name}` appears more than once")]
    DuplicateName { name: String },

    #[error("variable `{name}` matches no layer rule")]
    UnknownNode { name: String },

    #[error("invalid threshold {0}: expected 0 < threshold <= 1")]
    InvalidThreshold(f64),
}

/// Errors raised by layer placement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("cannot place an empty layer")]
    EmptyLayer,

    #[error("invalid layer radius {0}: expected a positive number")]
    InvalidRadius(f32),
}
