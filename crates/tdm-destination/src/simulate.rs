//! Final destination choice among each trip's sampled alternatives.

use log::debug;

use tdm_choice::{evaluate_column, logit, ModelSpec, PaddedMatrix, UtilityEvaluator};
use tdm_core::{PurposeId, RandomDrawService, TripId, ZoneId, NO_DESTINATION};

use crate::{DestinationError, DestinationResult, DestinationSampleRow, SizeTermMatrix, TripChooser, TRIP_CHANNEL};

/// One sampled alternative scored by the simulate evaluator.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledDestination {
    pub trip:                TripId,
    pub purpose:             PurposeId,
    pub primary_purpose:     PurposeId,
    pub origin:              ZoneId,
    pub primary_destination: ZoneId,
    pub zone:                ZoneId,
    pub size_term:           f64,
    pub prob:                f64,
    pub pick_count:          u32,
    pub od_logsum:           f64,
    pub dp_logsum:           f64,
}

/// A trip's chosen destination.
#[derive(Clone, Debug, PartialEq)]
pub struct DestinationChoice {
    pub trip:        TripId,
    pub destination: ZoneId,
    /// Logsum over the trip's sampled alternatives, when requested.
    pub logsum:      Option<f64>,
}

/// Choose one destination per trip from `sample`.
///
/// `sample` must hold at least one row for every chooser, grouped by trip
/// in chooser order (as produced by the samplers).  Trips whose alternatives
/// all have zero probability get no choice.
pub fn trip_destination_simulate(
    choosers:     &[TripChooser],
    sample:       &[DestinationSampleRow],
    size_terms:   &SizeTermMatrix,
    evaluator:    &dyn UtilityEvaluator<SampledDestination>,
    spec:         &ModelSpec,
    want_logsums: bool,
    draws:        &mut dyn RandomDrawService,
) -> DestinationResult<Vec<DestinationChoice>> {
    if choosers.is_empty() {
        return Ok(Vec::new());
    }

    let mut alternatives = Vec::with_capacity(sample.len());
    let mut lengths = Vec::with_capacity(choosers.len());
    let mut rows = sample.iter().peekable();
    for c in choosers {
        let before = alternatives.len();
        while let Some(row) = rows.next_if(|r| r.trip == c.trip) {
            alternatives.push(SampledDestination {
                trip:                c.trip,
                purpose:             c.purpose,
                primary_purpose:     c.primary_purpose,
                origin:              c.origin,
                primary_destination: c.primary_destination,
                zone:                row.zone,
                size_term:           size_terms.get(row.zone, c.purpose),
                prob:                row.prob,
                pick_count:          row.pick_count,
                od_logsum:           row.od_logsum,
                dp_logsum:           row.dp_logsum,
            });
        }
        lengths.push(alternatives.len() - before);
    }
    if alternatives.len() != sample.len() {
        return Err(DestinationError::ShapeMismatch {
            what:     "sample rows matched to choosers",
            expected: sample.len(),
            got:      alternatives.len(),
        });
    }

    let utils = evaluate_column(evaluator, spec, &alternatives)?;
    let logsums = if want_logsums { Some(logit::group_logsums(&utils, &lengths)?) } else { None };

    let mut probs = PaddedMatrix::from_ragged(&utils, &lengths)?;
    probs.utilities_to_probs()?;

    let keys: Vec<u64> = choosers.iter().map(|c| c.trip.0).collect();
    let rands = draws.draw(TRIP_CHANNEL, &keys)?;
    let positions = probs.choose_positions(&rands)?;

    let mut offset = 0;
    let mut choices = Vec::with_capacity(choosers.len());
    for (r, c) in choosers.iter().enumerate() {
        let destination = match positions[r] {
            Some(pos) => alternatives[offset + pos].zone,
            None      => NO_DESTINATION,
        };
        offset += lengths[r];
        if destination == NO_DESTINATION {
            continue;
        }
        choices.push(DestinationChoice {
            trip: c.trip,
            destination,
            logsum: logsums.as_ref().map(|ls| ls[r]),
        });
    }
    if choices.len() < choosers.len() {
        debug!("{}: {} trips with no viable destination", spec.name, choosers.len() - choices.len());
    }
    Ok(choices)
}
