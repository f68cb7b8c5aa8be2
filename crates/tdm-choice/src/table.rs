//! Dense chooser × alternative tables.

use crate::{ChoiceError, ChoiceResult};

// ── ModelSpec ─────────────────────────────────────────────────────────────────

/// Identity of a choice model as seen by a [`UtilityEvaluator`].
///
/// The coefficients and expressions live with the evaluator; this struct only
/// names the model, the optional segment (e.g. a primary purpose) and the
/// alternative columns the evaluator must produce, in order.
///
/// [`UtilityEvaluator`]: crate::UtilityEvaluator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelSpec {
    pub name:         String,
    pub segment:      Option<String>,
    pub alternatives: Vec<String>,
}

impl ModelSpec {
    pub fn new<S: Into<String>>(name: impl Into<String>, alternatives: impl IntoIterator<Item = S>) -> Self {
        Self {
            name:         name.into(),
            segment:      None,
            alternatives: alternatives.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn alternative_index(&self, name: &str) -> Option<usize> {
        self.alternatives.iter().position(|a| a == name)
    }
}

// ── ChoiceTable ───────────────────────────────────────────────────────────────

/// Row-major `f64` table: one row per chooser, one named column per
/// alternative.  Holds utilities or probabilities.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceTable {
    columns: Vec<String>,
    rows:    usize,
    values:  Vec<f64>,
}

impl ChoiceTable {
    /// All-zero table.
    pub fn zeros(columns: Vec<String>, rows: usize) -> Self {
        let values = vec![0.0; rows * columns.len()];
        Self { columns, rows, values }
    }

    /// Build from row-major values.  `values.len()` must equal
    /// `rows * columns.len()`.
    pub fn from_values(columns: Vec<String>, rows: usize, values: Vec<f64>) -> ChoiceResult<Self> {
        let expected = rows * columns.len();
        if values.len() != expected {
            return Err(ChoiceError::ShapeMismatch { what: "choice table", expected, got: values.len() });
        }
        Ok(Self { columns, rows, values })
    }

    pub fn from_rows(columns: Vec<String>, rows: &[Vec<f64>]) -> ChoiceResult<Self> {
        let width = columns.len();
        let mut values = Vec::with_capacity(rows.len() * width);
        for row in rows {
            if row.len() != width {
                return Err(ChoiceError::ShapeMismatch { what: "choice table row", expected: width, got: row.len() });
            }
            values.extend_from_slice(row);
        }
        Ok(Self { columns, rows: rows.len(), values })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn row(&self, r: usize) -> &[f64] {
        let w = self.columns.len();
        &self.values[r * w..(r + 1) * w]
    }

    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [f64] {
        let w = self.columns.len();
        &mut self.values[r * w..(r + 1) * w]
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.values[r * self.columns.len() + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, v: f64) {
        let w = self.columns.len();
        self.values[r * w + c] = v;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // `max(1)` keeps `chunks` valid for zero-column tables.
        self.values.chunks(self.columns.len().max(1)).take(self.rows)
    }

    /// Values of column `c`, top to bottom.
    pub fn column(&self, c: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.rows).map(move |r| self.get(r, c))
    }

    /// New table holding only the rows listed in `keep`, in that order.
    pub fn select_rows(&self, keep: &[usize]) -> Self {
        let mut values = Vec::with_capacity(keep.len() * self.columns.len());
        for &r in keep {
            values.extend_from_slice(self.row(r));
        }
        Self { columns: self.columns.clone(), rows: keep.len(), values }
    }

    /// Check the shape against a model spec and chooser count.
    pub fn check_shape(&self, spec: &ModelSpec, n_choosers: usize) -> ChoiceResult<()> {
        if self.rows != n_choosers {
            return Err(ChoiceError::ShapeMismatch { what: "utility rows", expected: n_choosers, got: self.rows });
        }
        if self.columns != spec.alternatives {
            return Err(ChoiceError::ShapeMismatch {
                what:     "utility columns",
                expected: spec.alternatives.len(),
                got:      self.columns.len(),
            });
        }
        Ok(())
    }
}
