//! Centrality tables.
//!
//! A header line followed by `name;value[;more...]` rows. Only the first value
//! column is read, so multi-metric files can be passed unchanged. The header
//! cell of that column names the metric.

use std::collections::HashMap;

use log::debug;
use strata_core::matrix::CentralityMap;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    matrix::{missing_header, no_value_columns},
    span::Span,
    table::read_table,
    values::required_value,
};

pub(crate) fn read(source: &str) -> Result<CentralityMap, ParseError> {
    let table = read_table(source)?;
    let mut diagnostics = DiagnosticCollector::new();

    let header = table.header().ok_or_else(|| missing_header(source.len()))?;
    if header.cells().len() < 2 {
        return Err(no_value_columns(header).into());
    }

    let metric = header.cells()[1].inner();
    let mut map = if metric.is_empty() {
        CentralityMap::new()
    } else {
        CentralityMap::with_metric(metric.as_str())
    };
    let mut first_seen: HashMap<&str, Span> = HashMap::new();

    for row in table.rows() {
        let [name, value, ..] = row.cells() else {
            diagnostics.emit(
                Diagnostic::error(format!("row `{}` has no value", row.cells()[0].inner()))
                    .with_code(ErrorCode::E101)
                    .with_label(row.span(), ErrorCode::E101.description())
                    .with_help("write the value after the name, separated by `;`"),
            );
            continue;
        };

        if name.inner().is_empty() {
            diagnostics.emit(
                Diagnostic::error("empty node name")
                    .with_code(ErrorCode::E103)
                    .with_label(name.span(), ErrorCode::E103.description()),
            );
            continue;
        }

        if let Some(first) = first_seen.get(name.inner().as_str()) {
            diagnostics.emit(
                Diagnostic::error(format!("`{}` is listed more than once", name.inner()))
                    .with_code(ErrorCode::E104)
                    .with_label(name.span(), "listed again here")
                    .with_secondary_label(*first, "first listed here"),
            );
            continue;
        }
        first_seen.insert(name.inner().as_str(), name.span());

        match required_value(value) {
            Ok(v) => {
                map.insert(name.inner().as_str(), v);
            }
            Err(diagnostic) => diagnostics.emit(diagnostic),
        }
    }

    diagnostics.finish()?;

    debug!(entries = map.len(), metric:? = map.metric(); "Read centrality table");
    Ok(map)
}
