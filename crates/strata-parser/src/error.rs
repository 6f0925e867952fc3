//! Diagnostics of the table reader.
//!
//! Every problem found while reading a table becomes a [`Diagnostic`] with an
//! [`ErrorCode`], one or more labeled [`Span`](crate::Span)s and optional help.
//! A failed read returns all of them at once wrapped in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use strata_parser::error::{Diagnostic, ErrorCode};
//! # use strata_parser::Span;
//!
//! let diag = Diagnostic::error("row `LB` has 2 cells, expected 3")
//!     .with_code(ErrorCode::E101)
//!     .with_label(Span::new(14..20), "row is too short")
//!     .with_secondary_label(Span::new(0..13), "header declares 3 cells")
//!     .with_help("every row needs one cell per header column");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
