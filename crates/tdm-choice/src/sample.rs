//! Alternative sampling with replacement.
//!
//! Each chooser row draws `sample_size` times from its probability row;
//! repeated picks collapse into one [`SampledAlt`] with a pick count.  With
//! `sample_size == 0` every alternative of positive probability is returned
//! once, unsampled.

use std::collections::BTreeMap;

use crate::{ChoiceError, ChoiceResult, PaddedMatrix};

/// One distinct sampled alternative of one chooser row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampledAlt {
    pub row:        usize,
    /// Position within the row's valid alternatives.
    pub alt:        usize,
    pub prob:       f64,
    pub pick_count: u32,
}

/// Sample every row of `probs`.
///
/// `draws` holds `probs.n_rows() * sample_size` uniforms, row-major.  Output
/// is ordered by row, then alternative position.  Rows with no positive
/// probability produce nothing.
pub fn sample_alternatives(
    probs:       &PaddedMatrix,
    sample_size: usize,
    draws:       &[f64],
) -> ChoiceResult<Vec<SampledAlt>> {
    let mut out = Vec::new();
    if sample_size == 0 {
        for row in 0..probs.n_rows() {
            for (alt, &prob) in probs.valid_row(row).iter().enumerate() {
                if prob > 0.0 {
                    out.push(SampledAlt { row, alt, prob, pick_count: 1 });
                }
            }
        }
        return Ok(out);
    }

    let expected = probs.n_rows() * sample_size;
    if draws.len() != expected {
        return Err(ChoiceError::ShapeMismatch { what: "sample draws", expected, got: draws.len() });
    }
    let positions = probs.choose_positions_n(draws, sample_size)?;
    for (row, picks) in positions.chunks(sample_size).enumerate() {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for alt in picks.iter().flatten() {
            *counts.entry(*alt).or_default() += 1;
        }
        out.extend(counts.into_iter().map(|(alt, pick_count)| SampledAlt {
            row,
            alt,
            prob: probs.get(row, alt),
            pick_count,
        }));
    }
    Ok(out)
}
