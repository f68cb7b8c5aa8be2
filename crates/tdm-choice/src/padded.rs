//! Ragged choice sets padded to a rectangle.
//!
//! # Layout
//!
//! Choosers with different numbers of alternatives share one row-major
//! matrix of width `max(len)`.  Row `r` holds its `valid[r]` real entries
//! first, then zero fillers:
//!
//! ```text
//! row 0: [0.2 0.5 0.3 │ 0.0 0.0]   valid = 3
//! row 1: [0.6 0.4 │ 0.0 0.0 0.0]   valid = 2
//! row 2: [0.1 0.1 0.2 0.3 0.3]     valid = 5
//! ```
//!
//! Zero fillers never move the cumulative sum, so a threshold-crossing
//! search cannot land on them.  [`PaddedMatrix::choose_positions`] still
//! checks every selected position against the valid count and reports a
//! [`ChoiceError::PaddingSelected`] if it ever happens.

use crate::{ChoiceError, ChoiceResult};

#[derive(Clone, Debug, PartialEq)]
pub struct PaddedMatrix {
    width:  usize,
    values: Vec<f64>,
    valid:  Vec<usize>,
}

impl PaddedMatrix {
    /// Pad contiguous groups of a flat column (`lengths[r]` values for row
    /// `r`).
    pub fn from_ragged(values: &[f64], lengths: &[usize]) -> ChoiceResult<Self> {
        let total: usize = lengths.iter().sum();
        if total != values.len() {
            return Err(ChoiceError::ShapeMismatch { what: "ragged values", expected: total, got: values.len() });
        }
        let width = lengths.iter().copied().max().unwrap_or(0);
        let mut padded = vec![0.0; width * lengths.len()];
        let mut start = 0;
        for (r, &len) in lengths.iter().enumerate() {
            padded[r * width..r * width + len].copy_from_slice(&values[start..start + len]);
            start += len;
        }
        Ok(Self { width, values: padded, valid: lengths.to_vec() })
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let lengths: Vec<usize> = rows.iter().map(Vec::len).collect();
        let width = lengths.iter().copied().max().unwrap_or(0);
        let mut values = vec![0.0; width * rows.len()];
        for (r, row) in rows.iter().enumerate() {
            values[r * width..r * width + row.len()].copy_from_slice(row);
        }
        Self { width, values, valid: lengths }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn n_rows(&self) -> usize {
        self.valid.len()
    }

    pub fn valid(&self, r: usize) -> usize {
        self.valid[r]
    }

    /// Full padded row, fillers included.
    #[inline]
    pub fn row(&self, r: usize) -> &[f64] {
        &self.values[r * self.width..(r + 1) * self.width]
    }

    /// Real entries of row `r`.
    #[inline]
    pub fn valid_row(&self, r: usize) -> &[f64] {
        &self.values[r * self.width..r * self.width + self.valid[r]]
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.values[r * self.width + c]
    }

    /// Divide every row by its sum.  Rows summing to zero stay zero.
    pub fn normalize_rows(&mut self) {
        if self.width == 0 {
            return;
        }
        for row in self.values.chunks_mut(self.width) {
            let sum: f64 = row.iter().sum();
            if sum > 0.0 {
                row.iter_mut().for_each(|v| *v /= sum);
            }
        }
    }

    /// Row-wise MNL over the valid entries, treating the values as
    /// utilities.  Fillers stay zero.
    pub fn utilities_to_probs(&mut self) -> ChoiceResult<()> {
        for r in 0..self.n_rows() {
            let start = r * self.width;
            let valid = self.valid[r];
            let utils = self.values[start..start + valid].to_vec();
            crate::logit::probabilities_into(r, &utils, &mut self.values[start..start + valid])?;
        }
        Ok(())
    }

    /// Threshold-crossing choice per row: the first position whose
    /// cumulative value exceeds `draws[r]`.
    ///
    /// `None` for rows summing to zero (nothing available).
    pub fn choose_positions(&self, draws: &[f64]) -> ChoiceResult<Vec<Option<usize>>> {
        if draws.len() != self.n_rows() {
            return Err(ChoiceError::ShapeMismatch { what: "draws", expected: self.n_rows(), got: draws.len() });
        }
        let positions = self.search_all(draws, 1);
        self.check_positions(positions, 1)
    }

    /// Like [`choose_positions`][Self::choose_positions] with `n` draws per
    /// row (row-major), returning `n` positions per row.
    pub fn choose_positions_n(&self, draws: &[f64], n: usize) -> ChoiceResult<Vec<Option<usize>>> {
        let expected = self.n_rows() * n;
        if draws.len() != expected {
            return Err(ChoiceError::ShapeMismatch { what: "draws", expected, got: draws.len() });
        }
        let positions = self.search_all(draws, n);
        self.check_positions(positions, n)
    }

    #[cfg(not(feature = "parallel"))]
    fn search_all(&self, draws: &[f64], n: usize) -> Vec<Option<usize>> {
        draws
            .iter()
            .enumerate()
            .map(|(i, &u)| threshold_position(self.row(i / n.max(1)), u))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn search_all(&self, draws: &[f64], n: usize) -> Vec<Option<usize>> {
        use rayon::prelude::*;

        draws
            .par_iter()
            .enumerate()
            .map(|(i, &u)| threshold_position(self.row(i / n.max(1)), u))
            .collect()
    }

    fn check_positions(&self, positions: Vec<Option<usize>>, n: usize) -> ChoiceResult<Vec<Option<usize>>> {
        for (i, p) in positions.iter().enumerate() {
            let row = i / n.max(1);
            if let Some(position) = *p {
                if position >= self.valid[row] {
                    return Err(ChoiceError::PaddingSelected { row, position, valid: self.valid[row] });
                }
            }
        }
        Ok(positions)
    }
}

/// First index whose running sum exceeds `u`.
///
/// When rounding leaves the total just below `u`, the last positive entry is
/// chosen.  `None` only for all-zero rows.
pub fn threshold_position(row: &[f64], u: f64) -> Option<usize> {
    let mut cum = 0.0;
    let mut last_positive = None;
    for (i, &p) in row.iter().enumerate() {
        if p > 0.0 {
            cum += p;
            last_positive = Some(i);
            if cum > u {
                return Some(i);
            }
        }
    }
    last_positive
}
