//! Materialized inputs of the graph engine.
//!
//! A [`CorrelationMatrix`] is the already-computed correlation table with its
//! identifier column removed; a [`CentralityMap`] associates node names with a
//! precomputed centrality value. Neither type validates symmetry or value
//! ranges: consumers decide what they accept.

use std::collections::HashMap;

/// A named, row-major matrix of correlation coefficients.
///
/// Row and column names are kept separately so that shape problems in the
/// input can be reported by the consumer instead of being silently fixed.
/// Missing cells are stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    row_names: Vec<String>,
    column_names: Vec<String>,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Creates a matrix from its names and row-major values.
    ///
    /// # Errors
    ///
    /// Returns a message when `values.len()` differs from
    /// `row_names.len() * column_names.len()`.
    pub fn new(
        row_names: Vec<String>,
        column_names: Vec<String>,
        values: Vec<f64>,
    ) -> Result<Self, String> {
        let expected = row_names.len() * column_names.len();
        if values.len() != expected {
            return Err(format!(
                "matrix of {} rows and {} columns needs {expected} values, got {}",
                row_names.len(),
                column_names.len(),
                values.len()
            ));
        }
        Ok(Self {
            row_names,
            column_names,
            values,
        })
    }

    /// Builds a square matrix from names and nested rows.
    ///
    /// Convenient for tests and programmatic callers.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_core::matrix::CorrelationMatrix;
    ///
    /// let m = CorrelationMatrix::from_rows(
    ///     ["A", "B"],
    ///     vec![vec![1.0, 0.5], vec![0.5, 1.0]],
    /// ).unwrap();
    /// assert_eq!(m.value(0, 1), 0.5);
    /// ```
    pub fn from_rows<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, String> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != names.len())
        {
            return Err(format!(
                "row {idx} has {} values, expected {}",
                row.len(),
                names.len()
            ));
        }
        let values = rows.into_iter().flatten().collect();
        Self::new(names.clone(), names, values)
    }

    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn rows(&self) -> usize {
        self.row_names.len()
    }

    pub fn columns(&self) -> usize {
        self.column_names.len()
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.columns()
    }

    /// Returns the value at `(row, column)`.
    ///
    /// # Panics
    ///
    /// Panics when either index is out of range.
    pub fn value(&self, row: usize, column: usize) -> f64 {
        assert!(
            row < self.rows() && column < self.columns(),
            "matrix index ({row}, {column}) out of range"
        );
        self.values[row * self.columns() + column]
    }
}

/// Precomputed centrality values keyed by node name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CentralityMap {
    metric: Option<String>,
    values: HashMap<String, f64>,
}

impl CentralityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map whose values come from the named metric column.
    pub fn with_metric(metric: impl Into<String>) -> Self {
        Self {
            metric: Some(metric.into()),
            values: HashMap::new(),
        }
    }

    /// Name of the metric column the values were read from, if known.
    pub fn metric(&self) -> Option<&str> {
        self.metric.as_deref()
    }

    /// Inserts or replaces the value for `name`, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for CentralityMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_new_checks_value_count() {
        let err = CorrelationMatrix::new(
            vec!["A".into(), "B".into()],
            vec!["A".into(), "B".into()],
            vec![1.0, 0.5, 0.5],
        )
        .unwrap_err();
        assert!(err.contains("needs 4 values"));
    }

    #[test]
    fn test_matrix_from_rows() {
        let m = CorrelationMatrix::from_rows(
            ["A", "B", "C"],
            vec![
                vec![1.0, 0.5, 0.2],
                vec![0.5, 1.0, -0.3],
                vec![0.2, -0.3, 1.0],
            ],
        )
        .unwrap();

        assert!(m.is_square());
        assert_eq!(m.value(1, 2), -0.3);
        assert_eq!(m.column_names()[2], "C");
    }

    #[test]
    fn test_matrix_from_rows_rejects_ragged() {
        let err = CorrelationMatrix::from_rows(["A", "B"], vec![vec![1.0, 0.5], vec![0.5]])
            .unwrap_err();
        assert!(err.contains("row 1"));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_matrix_value_out_of_range() {
        let m = CorrelationMatrix::from_rows(["A"], vec![vec![1.0]]).unwrap();
        m.value(0, 1);
    }

    #[test]
    fn test_centrality_map() {
        let mut map: CentralityMap = [("A", 0.25), ("B", 0.5)].into_iter().collect();
        assert_eq!(map.get("A"), Some(0.25));
        assert_eq!(map.get("C"), None);
        assert_eq!(map.insert("A", 0.75), Some(0.25));
        assert_eq!(map.len(), 2);
        assert!(map.metric().is_none());
        assert_eq!(
            CentralityMap::with_metric("degree_centrality").metric(),
            Some("degree_centrality")
        );
    }
}
