//! Correlation matrix tables.
//!
//! The header holds an identifier column followed by one column per variable;
//! every following line holds the row's variable name and its coefficients.
//! The identifier column is stripped: it names rows, it is not data.

use log::debug;
use strata_core::matrix::CorrelationMatrix;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    table::{Cell, Record, read_table},
    values::matrix_value,
};

pub(crate) fn read(source: &str) -> Result<CorrelationMatrix, ParseError> {
    let table = read_table(source)?;
    let mut diagnostics = DiagnosticCollector::new();

    let header = table.header().ok_or_else(|| missing_header(source.len()))?;
    if header.cells().len() < 2 {
        return Err(no_value_columns(header).into());
    }

    let column_names = names(&header.cells()[1..], &mut diagnostics);

    let mut row_names = Vec::with_capacity(table.rows().len());
    let mut values = Vec::with_capacity(table.rows().len() * column_names.len());

    for row in table.rows() {
        if row.cells().len() != header.cells().len() {
            diagnostics.emit(length_mismatch(row, header));
            continue;
        }

        row_names.extend(names(&row.cells()[..1], &mut diagnostics));
        for cell in &row.cells()[1..] {
            match matrix_value(cell) {
                Ok(value) => values.push(value),
                Err(diagnostic) => {
                    diagnostics.emit(diagnostic);
                    values.push(f64::NAN);
                }
            }
        }
    }

    diagnostics.finish()?;

    debug!(rows = row_names.len(), columns = column_names.len(); "Read correlation matrix");
    CorrelationMatrix::new(row_names, column_names, values)
        .map_err(|message| Diagnostic::error(message).into())
}

/// Collect names, reporting empty ones.
fn names(cells: &[Cell], diagnostics: &mut DiagnosticCollector) -> Vec<String> {
    cells
        .iter()
        .inspect(|cell| {
            if cell.inner().is_empty() {
                diagnostics.emit(
                    Diagnostic::error("empty variable name")
                        .with_code(ErrorCode::E103)
                        .with_label(cell.span(), ErrorCode::E103.description()),
                );
            }
        })
        .map(|cell| cell.inner().clone())
        .collect()
}

pub(crate) fn missing_header(source_len: usize) -> ParseError {
    Diagnostic::error("table has no header line")
        .with_code(ErrorCode::E100)
        .with_label(crate::Span::new(0..source_len), ErrorCode::E100.description())
        .with_help("the first line must name the identifier column and the variables")
        .into()
}

pub(crate) fn no_value_columns(header: &Record) -> Diagnostic {
    Diagnostic::error("header has no value columns")
        .with_code(ErrorCode::E102)
        .with_label(header.span(), "only the identifier column is present")
        .with_help("separate columns with `;`")
}

fn length_mismatch(row: &Record, header: &Record) -> Diagnostic {
    let name = row.cells()[0].inner();
    Diagnostic::error(format!(
        "row `{name}` has {} cells, expected {}",
        row.cells().len(),
        header.cells().len()
    ))
    .with_code(ErrorCode::E101)
    .with_label(row.span(), ErrorCode::E101.description())
    .with_secondary_label(
        header.span(),
        format!("header declares {} cells", header.cells().len()),
    )
    .with_help("every row needs one cell per header column")
}
