//! The core diagnostic type of the table reader.
//!
//! A [`Diagnostic`] is a single error or warning with an optional error code,
//! labeled source spans and help text.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    span::Span,
};

/// A diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E101]: row `TMT_A` has 3 cells, expected 4
///   --> matrix.csv:3:1
///    |
///  1 | Name;LB;TMT_A;SD_IFOF
///    | --------------------- header declares 4 cells
///  3 | TMT_A;0.2;1
///    | ^^^^^^^^^^^ row is too short
///    |
///    = help: every row needs one cell per header column
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use strata_parser::error::{Diagnostic, ErrorCode};
    /// # use strata_parser::Span;
    ///
    /// let diag = Diagnostic::error("invalid number `0,5`")
    ///     .with_code(ErrorCode::E200)
    ///     .with_label(Span::new(12..15), "not a number")
    ///     .with_help("use `.` as the decimal separator");
    /// assert_eq!(diag.to_string(), "error[E200]: invalid number `0,5`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label marking the offending text.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label pointing at related text, such as the header.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "missing header");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "missing header");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_labels_keep_order() {
        let diag = Diagnostic::error("row is too short")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(30..41), "3 cells")
            .with_secondary_label(Span::new(0..21), "header declares 4 cells");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
    }

    #[test]
    fn test_diagnostic_display() {
        let with_code = Diagnostic::error("invalid number `x`").with_code(ErrorCode::E200);
        assert_eq!(with_code.to_string(), "error[E200]: invalid number `x`");

        let warning = Diagnostic::warning("duplicate entry");
        assert_eq!(warning.to_string(), "warning: duplicate entry");
    }
}
