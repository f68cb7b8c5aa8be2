//! Multinomial logit probabilities and logsums.
//!
//! Utilities are shifted by the row maximum before exponentiation so `exp`
//! cannot overflow.  `NEG_INFINITY` marks an unavailable alternative; a row
//! with no available alternative gets all-zero probabilities and a logsum of
//! `NEG_INFINITY`.

use crate::{ChoiceError, ChoiceResult, ChoiceTable};

fn check_row(row: usize, utils: &[f64]) -> ChoiceResult<()> {
    for (col, &u) in utils.iter().enumerate() {
        if u.is_nan() || u == f64::INFINITY {
            return Err(ChoiceError::InvalidUtility { row, col, value: u });
        }
    }
    Ok(())
}

fn row_max(utils: &[f64]) -> f64 {
    utils.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// MNL probabilities of one row, written into `out`.
pub fn probabilities_into(row: usize, utils: &[f64], out: &mut [f64]) -> ChoiceResult<()> {
    check_row(row, utils)?;
    let max = row_max(utils);
    if max == f64::NEG_INFINITY {
        out.iter_mut().for_each(|p| *p = 0.0);
        return Ok(());
    }
    let mut sum = 0.0;
    for (p, &u) in out.iter_mut().zip(utils) {
        *p = (u - max).exp();
        sum += *p;
    }
    // sum >= 1 because the max element contributes exp(0).
    out.iter_mut().for_each(|p| *p /= sum);
    Ok(())
}

/// `max + ln Σ exp(u - max)`.
pub fn logsum_row(row: usize, utils: &[f64]) -> ChoiceResult<f64> {
    check_row(row, utils)?;
    let max = row_max(utils);
    if max == f64::NEG_INFINITY {
        return Ok(f64::NEG_INFINITY);
    }
    let sum: f64 = utils.iter().map(|&u| (u - max).exp()).sum();
    Ok(max + sum.ln())
}

/// Row-wise MNL probabilities.  Column names carry over.
pub fn utils_to_probs(utils: &ChoiceTable) -> ChoiceResult<ChoiceTable> {
    let mut probs = ChoiceTable::zeros(utils.columns().to_vec(), utils.n_rows());
    for r in 0..utils.n_rows() {
        probabilities_into(r, utils.row(r), probs.row_mut(r))?;
    }
    Ok(probs)
}

/// Row-wise logsums.
pub fn logsums(utils: &ChoiceTable) -> ChoiceResult<Vec<f64>> {
    (0..utils.n_rows()).map(|r| logsum_row(r, utils.row(r))).collect()
}

/// Logsum of each contiguous group of a flat utility column.
pub fn group_logsums(utils: &[f64], lengths: &[usize]) -> ChoiceResult<Vec<f64>> {
    let total: usize = lengths.iter().sum();
    if total != utils.len() {
        return Err(ChoiceError::ShapeMismatch { what: "grouped utilities", expected: total, got: utils.len() });
    }
    let mut start = 0;
    lengths
        .iter()
        .enumerate()
        .map(|(g, &len)| {
            let ls = logsum_row(g, &utils[start..start + len]);
            start += len;
            ls
        })
        .collect()
}
