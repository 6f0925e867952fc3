//! Turns a [`StrataError`](strata::StrataError) into miette reports.
//!
//! Table errors become one report per reader diagnostic, pointing into the
//! table text. Every other error is a single report with a `strata::*` code
//! and, where one helps, a hint on how to fix the input.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use strata::StrataError;
use strata_parser::error::Diagnostic;

/// Adapter for a single table diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`StrataError`] variants without source locations.
pub struct ErrorAdapter<'a>(pub &'a StrataError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            StrataError::Io(_) => "strata::io",
            StrataError::Parse { .. } => return None,
            StrataError::Graph(_) => "strata::graph",
            StrataError::LayerSet(_) => "strata::layer_set",
            StrataError::Config(_) => "strata::config",
            StrataError::Export(_) => "strata::export",
            StrataError::MissingInput(_) => "strata::missing_input",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            StrataError::Graph(strata::GraphError::UnknownNode { .. }) => Some(Box::new(
                "add an `[assigner]` rule for it or set `assigner.unknown_nodes = \"exclude\"`",
            )),
            StrataError::LayerSet(_) => Some(Box::new(
                "list layers by number or code, e.g. `1,2,3` or `NT,CD`",
            )),
            StrataError::MissingInput(_) => {
                Some(Box::new("check the path or the `batch.matrix` template"))
            }
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// One miette report: a located table diagnostic or a plain error.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// Points at cells of the table source.
    Diagnostic(DiagnosticAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

fn span_to_miette(span: strata_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// The reports for `err`: one per reader diagnostic for a table that failed
/// to parse, a single one otherwise.
pub fn to_reportables(err: &StrataError) -> Vec<Reportable<'_>> {
    match err {
        StrataError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use strata_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    #[test]
    fn test_invalid_cell_is_one_report() {
        let diag = Diagnostic::error("invalid number `oops`")
            .with_code(ErrorCode::E200)
            .with_label(Span::new(11..15), "not a number")
            .with_help("use a decimal number, `nan` or leave the cell empty");
        let err = StrataError::new_parse_error(ParseError::from(diag), "Name;A\nA;1;oops\n");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "invalid number `oops`");
                assert_eq!(d.code().unwrap().to_string(), "E200");
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_each_diagnostic_is_reported() {
        let diags = vec![
            Diagnostic::error("row has 4 cells, header has 3")
                .with_code(ErrorCode::E101)
                .with_label(Span::new(9..16), "this row"),
            Diagnostic::error("invalid number `x`")
                .with_code(ErrorCode::E200)
                .with_label(Span::new(13..14), "not a number"),
        ];
        let err = StrataError::new_parse_error(ParseError::from(diags), "Name;A;B\nA;1;x;y\n");

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "row has 4 cells, header has 3");
        assert_eq!(reportables[1].to_string(), "invalid number `x`");
    }

    #[test]
    fn test_missing_input_has_code_and_help() {
        let err = StrataError::MissingInput(PathBuf::from("matrices/NT/L.csv"));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "missing input `matrices/NT/L.csv`");
                assert_eq!(e.code().unwrap().to_string(), "strata::missing_input");
                assert!(e.help().is_some());
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_layer_set_error() {
        let layer_err = "1,4".parse::<strata::layer::LayerSet>().unwrap_err();
        let err = StrataError::from(layer_err);

        match &to_reportables(&err)[0] {
            Reportable::Error(e) => {
                assert_eq!(e.code().unwrap().to_string(), "strata::layer_set");
                assert!(e.help().unwrap().to_string().contains("NT,CD"));
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_header_label_is_secondary() {
        let diag = Diagnostic::error("row has 2 cells, header has 3")
            .with_label(Span::new(0..5), "this row")
            .with_secondary_label(Span::new(10..15), "header");

        let adapter = DiagnosticAdapter::new(&diag, "some table source");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
        assert_eq!(labels[1].label(), Some("header"));
    }
}
