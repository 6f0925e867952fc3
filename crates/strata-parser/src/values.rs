//! Numeric cell values.

use crate::{
    error::{Diagnostic, ErrorCode},
    table::Cell,
};

/// Read a matrix cell. Empty cells and `nan` (any case) are `NaN`.
pub(crate) fn matrix_value(cell: &Cell) -> Result<f64, Diagnostic> {
    let text = cell.inner();
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    number(cell)
}

/// Read a cell that must hold a number.
pub(crate) fn required_value(cell: &Cell) -> Result<f64, Diagnostic> {
    if cell.inner().is_empty() {
        return Err(Diagnostic::error("missing value")
            .with_code(ErrorCode::E201)
            .with_label(cell.span(), ErrorCode::E201.description())
            .with_help("provide a decimal number such as `0.25`"));
    }
    number(cell)
}

fn number(cell: &Cell) -> Result<f64, Diagnostic> {
    let text = cell.inner();
    text.parse::<f64>().map_err(|_| {
        let help = if text.replace(',', ".").parse::<f64>().is_ok() {
            "use `.` as the decimal separator"
        } else {
            "expected a decimal number such as `0.25`"
        };
        Diagnostic::error(format!("invalid number `{text}`"))
            .with_code(ErrorCode::E200)
            .with_label(cell.span(), "not a number")
            .with_help(help)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{Span, Spanned};

    fn cell(text: &str) -> Cell {
        Spanned::new(text.to_string(), Span::new(0..text.len()))
    }

    #[test]
    fn test_matrix_value() {
        assert_eq!(matrix_value(&cell("0.175")).unwrap(), 0.175);
        assert_eq!(matrix_value(&cell("-1")).unwrap(), -1.0);
        assert_eq!(matrix_value(&cell("1e-3")).unwrap(), 0.001);
        assert!(matrix_value(&cell("")).unwrap().is_nan());
        assert!(matrix_value(&cell("NaN")).unwrap().is_nan());
    }

    #[test]
    fn test_decimal_comma_gets_hint() {
        let diag = matrix_value(&cell("0,5")).unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(diag.help(), Some("use `.` as the decimal separator"));
    }

    #[test]
    fn test_required_value_rejects_empty() {
        let diag = required_value(&cell("")).unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E201));
        assert_eq!(required_value(&cell("0.3")).unwrap(), 0.3);
    }
}
