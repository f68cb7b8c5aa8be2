//! Choosers and `simple_simulate`.
//!
//! # Flow
//!
//! ```text
//! choosers ─► UtilityEvaluator ─► utilities ─► MNL ─► probs ─► Chooser ─► Choices
//! ```
//!
//! [`LogitChooser`] is the stock chooser: one draw per chooser, then the
//! cumulative-threshold rule.  Models that need to redraw until a group
//! constraint holds plug their own [`Chooser`] into [`simple_simulate`].

use tdm_core::{EntityKey, RandomDrawService};

use crate::{evaluate, logit, ChoiceError, ChoiceResult, ChoiceTable, ModelSpec, UtilityEvaluator};

// ── Choices ───────────────────────────────────────────────────────────────────

/// One entry per chooser, in chooser order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Choices {
    /// Chosen alternative column; `None` when nothing was available.
    pub choice: Vec<Option<usize>>,
    /// Uniform draw that produced each choice.
    pub rands:  Vec<f64>,
}

impl Choices {
    pub fn len(&self) -> usize {
        self.choice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choice.is_empty()
    }
}

/// Threshold-crossing choice for every row of `probs`.
pub fn make_choices(probs: &ChoiceTable, draws: &[f64]) -> ChoiceResult<Vec<Option<usize>>> {
    if draws.len() != probs.n_rows() {
        return Err(ChoiceError::ShapeMismatch { what: "draws", expected: probs.n_rows(), got: draws.len() });
    }
    Ok(probs
        .rows()
        .zip(draws)
        .map(|(row, &u)| crate::padded::threshold_position(row, u))
        .collect())
}

// ── Chooser ───────────────────────────────────────────────────────────────────

/// Turns a probability table into choices.
///
/// Receives ownership of the probabilities so implementations may rewrite
/// them between rounds.  Draws come from `draws`, keyed by each chooser's
/// [`EntityKey`].
pub trait Chooser<C> {
    type Error: From<ChoiceError>;

    fn choose(
        &mut self,
        probs:    ChoiceTable,
        choosers: &[C],
        draws:    &mut dyn RandomDrawService,
    ) -> Result<Choices, Self::Error>;
}

/// Stock MNL chooser drawing from one channel.
pub struct LogitChooser {
    pub channel: String,
}

impl LogitChooser {
    pub fn new(channel: impl Into<String>) -> Self {
        Self { channel: channel.into() }
    }
}

impl<C: EntityKey> Chooser<C> for LogitChooser {
    type Error = ChoiceError;

    fn choose(
        &mut self,
        probs:    ChoiceTable,
        choosers: &[C],
        draws:    &mut dyn RandomDrawService,
    ) -> ChoiceResult<Choices> {
        let keys: Vec<u64> = choosers.iter().map(EntityKey::entity_key).collect();
        let rands = draws.draw(&self.channel, &keys)?;
        let choice = make_choices(&probs, &rands)?;
        Ok(Choices { choice, rands })
    }
}

// ── simple_simulate ───────────────────────────────────────────────────────────

/// Evaluate utilities, convert to MNL probabilities, and hand them to
/// `chooser`.
pub fn simple_simulate<C, K>(
    evaluator: &dyn UtilityEvaluator<C>,
    spec:      &ModelSpec,
    choosers:  &[C],
    chooser:   &mut K,
    draws:     &mut dyn RandomDrawService,
) -> Result<Choices, K::Error>
where
    K: Chooser<C>,
{
    if choosers.is_empty() {
        return Ok(Choices::default());
    }
    let utils = evaluate(evaluator, spec, choosers)?;
    let probs = logit::utils_to_probs(&utils)?;
    log::debug!("{}: simulated {} choosers", spec.name, choosers.len());
    chooser.choose(probs, choosers, draws)
}
