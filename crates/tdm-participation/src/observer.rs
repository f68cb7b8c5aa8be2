//! Observer hooks for the participation model.

use tdm_core::{HouseholdId, ParticipantId, TourId};
use tdm_population::{Composition, Participant};

/// Diagnostic row for a candidate still unresolved when the iteration cap is
/// exceeded.
#[derive(Clone, Debug, PartialEq)]
pub struct UnsatisfiedCandidate {
    pub participant: ParticipantId,
    pub tour:        TourId,
    pub household:   HouseholdId,
    pub composition: Composition,
    pub is_adult:    bool,
    /// Probabilities in model alternative order.
    pub probs:       Vec<f64>,
}

/// Callbacks invoked by
/// [`joint_tour_participation`][crate::joint_tour_participation].
///
/// All methods have no-op defaults.
pub trait ParticipationObserver {
    /// After each choose/check round.
    fn on_iteration(&mut self, _iteration: u32, _satisfied: usize, _remaining: usize) {}

    /// Every round past the iteration cap, before it is drawn.  `columns`
    /// names the entries of each row's `probs`.
    fn on_unsatisfied(
        &mut self,
        _iteration: u32,
        _columns:   &[String],
        _rows:      &[UnsatisfiedCandidate],
    ) {}

    /// Once with the final participants table (empty when there were no
    /// joint tours).
    fn on_participants(&mut self, _participants: &[Participant]) {}
}

/// A [`ParticipationObserver`] that does nothing.
pub struct NoopObserver;

impl ParticipationObserver for NoopObserver {}
