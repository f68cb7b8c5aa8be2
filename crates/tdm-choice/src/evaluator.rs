//! The `UtilityEvaluator` trait: the seam between the choice procedures and
//! whatever computes utilities (an expression engine, a fitted model, a test
//! fixture).

use crate::{ChoiceResult, ChoiceTable, ModelSpec};

/// Computes systematic utilities for a batch of choosers.
///
/// # Contract
///
/// Return one row per chooser, in input order, with one column per
/// `spec.alternatives` entry, in spec order.  `f64::NEG_INFINITY` marks an
/// unavailable alternative.  NaN and `+inf` are rejected downstream.
///
/// Interaction models (one chooser row per (chooser, alternative) pair, as
/// in destination sampling) use a spec with a single alternative column and
/// pass the pairs themselves as choosers.
///
/// Implementations are called from a single thread; they may cache but must
/// be deterministic for a given input.
pub trait UtilityEvaluator<C> {
    fn utilities(&self, spec: &ModelSpec, choosers: &[C]) -> ChoiceResult<ChoiceTable>;
}

impl<C, F> UtilityEvaluator<C> for F
where
    F: Fn(&ModelSpec, &[C]) -> ChoiceResult<ChoiceTable>,
{
    fn utilities(&self, spec: &ModelSpec, choosers: &[C]) -> ChoiceResult<ChoiceTable> {
        self(spec, choosers)
    }
}

/// Evaluate and verify the returned shape against `spec`.
pub fn evaluate<C>(
    evaluator: &dyn UtilityEvaluator<C>,
    spec:      &ModelSpec,
    choosers:  &[C],
) -> ChoiceResult<ChoiceTable> {
    let utils = evaluator.utilities(spec, choosers)?;
    utils.check_shape(spec, choosers.len())?;
    Ok(utils)
}

/// Evaluate a single-column interaction spec and return the column.
pub fn evaluate_column<C>(
    evaluator: &dyn UtilityEvaluator<C>,
    spec:      &ModelSpec,
    rows:      &[C],
) -> ChoiceResult<Vec<f64>> {
    let utils = evaluate(evaluator, spec, rows)?;
    if utils.n_cols() != 1 {
        return Err(crate::ChoiceError::ShapeMismatch {
            what:     "interaction utility columns",
            expected: 1,
            got:      utils.n_cols(),
        });
    }
    Ok(utils.column(0).collect())
}
