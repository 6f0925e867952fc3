//! # Strata Parser
//!
//! Reader for the `;`-delimited tables consumed by the Strata graph engine:
//! correlation matrices and centrality tables. Problems are reported as
//! [`error::Diagnostic`]s with error codes and byte spans into the source, and
//! every problem of a file is reported in one pass.
//!
//! ## Usage
//!
//! ```
//! # use strata_parser::{parse_matrix, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "Name;LB;CD_Insula\nLB;1;0.42\nCD_Insula;0.42;1\n";
//!     let matrix = parse_matrix(source)?;
//!     assert_eq!(matrix.column_names(), ["LB", "CD_Insula"]);
//!     Ok(())
//! }
//! ```

mod centrality;
pub mod error;
mod matrix;
mod span;
mod table;
mod values;

pub use span::{Span, Spanned};

use strata_core::matrix::{CentralityMap, CorrelationMatrix};

use error::ParseError;

/// Read a correlation matrix table.
///
/// The first line is the header: an identifier column followed by one column
/// per variable. Each following line holds a variable name and one coefficient
/// per column. Empty cells and `nan` are read as `NaN`.
///
/// The matrix is not checked for squareness or symmetry here.
///
/// # Errors
///
/// Returns a [`ParseError`] with every diagnostic found: lexical problems
/// (E0xx), structural problems such as ragged rows (E1xx) and cells that are
/// not numbers (E2xx).
pub fn parse_matrix(source: &str) -> Result<CorrelationMatrix, ParseError> {
    matrix::read(source)
}

/// Read a centrality table into a name → value map.
///
/// Only the first value column is read; further columns are ignored.
///
/// # Example
///
/// ```
/// # use strata_parser::parse_centrality;
///
/// let map = parse_centrality("Node;degree;closeness\nLB;0.25;0.1\nCD_Insula;0.5;0.2\n").unwrap();
/// assert_eq!(map.metric(), Some("degree"));
/// assert_eq!(map.get("CD_Insula"), Some(0.5));
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] when a value is missing or not a number, a name is
/// empty or repeated, or the table is malformed.
pub fn parse_centrality(source: &str) -> Result<CentralityMap, ParseError> {
    centrality::read(source)
}
