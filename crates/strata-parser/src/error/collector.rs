//! Collector for accumulating diagnostics while reading a table.
//!
//! Reading continues past bad cells and rows so that one run reports every
//! problem in the file instead of stopping at the first.

use log::warn;

use crate::error::{Diagnostic, ParseError};

#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. Any error makes [`finish`](Self::finish) fail.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Finish collection.
    ///
    /// Returns every diagnostic when at least one is an error. Otherwise the
    /// warnings are written to the log and `Ok(())` is returned.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            return Err(ParseError::new(self.diagnostics));
        }
        for diagnostic in &self.diagnostics {
            warn!(code:? = diagnostic.code(); "{diagnostic}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_collector_empty_is_ok() {
        assert!(DiagnosticCollector::new().finish().is_ok());
    }

    #[test]
    fn test_collector_warnings_only_is_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("duplicate entry"));

        assert!(!collector.has_errors());
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_keeps_all_diagnostics_on_error() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(
            Diagnostic::error("invalid number `x`")
                .with_code(ErrorCode::E200)
                .with_label(Span::new(10..11), "here"),
        );
        collector.emit(Diagnostic::warning("duplicate entry"));
        collector.emit(Diagnostic::error("invalid number `y`").with_code(ErrorCode::E200));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 3);
        assert_eq!(err.diagnostics()[0].message(), "invalid number `x`");
    }
}
