//! Labeled source spans for diagnostics.

use crate::span::Span;

/// A message attached to a span of the table source.
///
/// A primary label marks the offending text; secondary labels add context
/// such as "header declares 4 cells".
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_kinds() {
        let primary = Label::primary(Span::new(10..20), "not a number");
        assert_eq!(primary.span(), Span::new(10..20));
        assert_eq!(primary.message(), "not a number");
        assert!(primary.is_primary());

        let secondary = Label::secondary(Span::new(0..5), "column declared here");
        assert!(secondary.is_secondary());
    }
}
