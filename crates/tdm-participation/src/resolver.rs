//! Choose → check → rechoose until every joint tour's composition holds.
//!
//! # Algorithm
//!
//! ```text
//! remaining = all candidates
//! loop while remaining is not empty:
//!     iter += 1
//!     iter > cap      → report unsatisfied candidates
//!                       not forcing    → fail
//!                       iter > cap + 1 → fail
//!                       otherwise      → participate prob := 1 where > 0
//!     draw one uniform per remaining candidate, choose by threshold
//!     tours whose participants satisfy the composition are final:
//!         record their candidates' choices, drop them from `remaining`
//! ```
//!
//! Tours are satisfied as a whole.  A tour that fails the check has all of
//! its candidates redrawn next round, including the ones that chose to
//! participate.  Each redraw advances the candidate's own random stream.

use std::collections::BTreeSet;

use log::{debug, error, info, warn};

use tdm_choice::{make_choices, ChoiceTable, Chooser, Choices};
use tdm_core::{EntityKey, ParticipationSettings, RandomDrawService};

use crate::{
    tour_satisfaction, Candidate, ParticipationError, ParticipationObserver, UnsatisfiedCandidate,
};

/// Random channel the participation draws are taken from.
pub const PARTICIPATION_CHANNEL: &str = "joint_tour_participants";

/// [`Chooser`] enforcing joint tour composition.
///
/// Plugged into `simple_simulate` in place of the stock logit chooser.
/// Returned choices and draws are in input candidate order.
pub struct ParticipantsChooser<'a> {
    settings:   &'a ParticipationSettings,
    observer:   &'a mut dyn ParticipationObserver,
    iterations: u32,
}

impl<'a> ParticipantsChooser<'a> {
    pub fn new(settings: &'a ParticipationSettings, observer: &'a mut dyn ParticipationObserver) -> Self {
        Self { settings, observer, iterations: 0 }
    }

    /// Rounds used by the last `choose` call.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    fn report_unsatisfied(&mut self, iter: u32, probs: &ChoiceTable, remaining: &[usize], choosers: &[Candidate]) {
        let rows: Vec<UnsatisfiedCandidate> = remaining
            .iter()
            .enumerate()
            .map(|(row, &i)| {
                let c = &choosers[i];
                UnsatisfiedCandidate {
                    participant: c.id,
                    tour:        c.tour,
                    household:   c.household,
                    composition: c.composition,
                    is_adult:    c.is_adult,
                    probs:       probs.row(row).to_vec(),
                }
            })
            .collect();
        self.observer.on_unsatisfied(iter, probs.columns(), &rows);
    }
}

/// Participate probability becomes 1 where it was positive, else 0.  The
/// first other column takes the complement and any further columns 0.
fn force_participation(probs: &mut ChoiceTable, choice_col: usize) {
    let other_col = (0..probs.n_cols()).find(|&c| c != choice_col);
    for r in 0..probs.n_rows() {
        let forced = if probs.get(r, choice_col) > 0.0 { 1.0 } else { 0.0 };
        for c in 0..probs.n_cols() {
            let v = if c == choice_col {
                forced
            } else if Some(c) == other_col {
                1.0 - forced
            } else {
                0.0
            };
            probs.set(r, c, v);
        }
    }
}

impl Chooser<Candidate> for ParticipantsChooser<'_> {
    type Error = ParticipationError;

    fn choose(
        &mut self,
        probs:    ChoiceTable,
        choosers: &[Candidate],
        draws:    &mut dyn RandomDrawService,
    ) -> Result<Choices, ParticipationError> {
        let choice_col = probs
            .column_index(&self.settings.participation_choice)
            .ok_or_else(|| ParticipationError::MissingChoiceColumn(self.settings.participation_choice.clone()))?;
        let max_iterations = self.settings.max_iterations;

        let n = choosers.len();
        let mut choices = Choices { choice: vec![None; n], rands: vec![0.0; n] };
        let mut probs = probs;
        let mut remaining: Vec<usize> = (0..n).collect();
        let mut tours_remaining = choosers.iter().map(|c| c.tour).collect::<BTreeSet<_>>().len();

        info!("joint tour participation: {tours_remaining} joint tours to satisfy");

        let mut iter = 0u32;
        while !remaining.is_empty() {
            iter += 1;

            if iter > max_iterations {
                warn!("joint tour participation: max iterations exceeded ({max_iterations})");
                self.report_unsatisfied(iter, &probs, &remaining, choosers);

                if !self.settings.force_participation {
                    self.iterations = iter;
                    return Err(ParticipationError::Unsatisfied { tours: tours_remaining, iterations: iter });
                }
                if iter > max_iterations + 1 {
                    self.iterations = iter;
                    return Err(ParticipationError::UnsatisfiedAfterForcing(tours_remaining));
                }
                warn!("joint tour participation: forcing participation for {tours_remaining} tours");
                force_participation(&mut probs, choice_col);
            }

            let keys: Vec<u64> = remaining.iter().map(|&i| choosers[i].entity_key()).collect();
            let rands = draws.draw(crate::PARTICIPATION_CHANNEL, &keys)?;
            let picks = make_choices(&probs, &rands)?;
            let participate: Vec<bool> = picks.iter().map(|&p| p == Some(choice_col)).collect();

            let satisfaction = tour_satisfaction(remaining.iter().map(|&i| &choosers[i]), &participate);
            let satisfied_now = satisfaction.values().filter(|&&s| s).count();

            if iter > max_iterations && satisfied_now != tours_remaining {
                error!(
                    "joint tour participation: still {} tours unsatisfied after forcing",
                    tours_remaining - satisfied_now
                );
            }

            if satisfied_now > 0 {
                tours_remaining -= satisfied_now;
                let mut keep_rows = Vec::with_capacity(remaining.len());
                let mut keep = Vec::with_capacity(remaining.len());
                for (row, &i) in remaining.iter().enumerate() {
                    if satisfaction.get(&choosers[i].tour).copied().unwrap_or(false) {
                        choices.choice[i] = picks[row];
                        choices.rands[i]  = rands[row];
                    } else {
                        keep_rows.push(row);
                        keep.push(i);
                    }
                }
                probs = probs.select_rows(&keep_rows);
                remaining = keep;
            }

            self.observer.on_iteration(iter, satisfied_now, tours_remaining);
            debug!(
                "joint tour participation: iteration {iter}: {satisfied_now} joint tours satisfied, \
                 {tours_remaining} remaining"
            );
        }

        info!("joint tour participation: {iter} iterations to satisfy all joint tours");
        self.iterations = iter;
        Ok(choices)
    }
}
