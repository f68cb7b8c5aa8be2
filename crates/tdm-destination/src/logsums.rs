//! Out-of-direction mode choice logsums for sampled destinations.
//!
//! Every sample row gets two logsums: trip origin → candidate zone, and
//! candidate zone → half-tour destination.  Both come from the same logsum
//! evaluator, whose spec alternatives are the modes.

use tdm_choice::{evaluate, logit, ModelSpec, UtilityEvaluator};
use tdm_core::{IdMap, PersonId, PurposeId, TourId, TripId, ZoneId};

use crate::{DestinationError, DestinationResult, DestinationSampleRow, TripChooser};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LegDirection {
    /// Trip origin → candidate zone.
    OriginToAlternative,
    /// Candidate zone → half-tour destination.
    AlternativeToPrimary,
}

/// One leg whose mode choice logsum is needed.
#[derive(Clone, Debug, PartialEq)]
pub struct LogsumLeg {
    pub trip:            TripId,
    pub tour:            TourId,
    pub person:          PersonId,
    pub primary_purpose: PurposeId,
    pub origin:          ZoneId,
    pub destination:     ZoneId,
    pub direction:       LegDirection,
}

fn legs(
    sample:    &[DestinationSampleRow],
    choosers:  &IdMap<TripId, &TripChooser>,
    direction: LegDirection,
) -> DestinationResult<Vec<LogsumLeg>> {
    sample
        .iter()
        .map(|row| {
            let c = choosers
                .get(&row.trip)
                .ok_or_else(|| DestinationError::Parse(format!("sampled trip {} has no chooser", row.trip)))?;
            let (origin, destination) = match direction {
                LegDirection::OriginToAlternative  => (c.origin, row.zone),
                LegDirection::AlternativeToPrimary => (row.zone, c.primary_destination),
            };
            Ok(LogsumLeg {
                trip: row.trip,
                tour: c.tour,
                person: c.person,
                primary_purpose: c.primary_purpose,
                origin,
                destination,
                direction,
            })
        })
        .collect()
}

/// Fill `od_logsum` and `dp_logsum` of every row in `sample`.
pub fn compute_logsums(
    sample:    &mut [DestinationSampleRow],
    choosers:  &[TripChooser],
    evaluator: &dyn UtilityEvaluator<LogsumLeg>,
    spec:      &ModelSpec,
) -> DestinationResult<()> {
    if sample.is_empty() {
        return Ok(());
    }
    let by_trip: IdMap<TripId, &TripChooser> = choosers.iter().map(|c| (c.trip, c)).collect();

    let od = legs(sample, &by_trip, LegDirection::OriginToAlternative)?;
    let od_logsums = logit::logsums(&evaluate(evaluator, spec, &od)?)?;

    let dp = legs(sample, &by_trip, LegDirection::AlternativeToPrimary)?;
    let dp_logsums = logit::logsums(&evaluate(evaluator, spec, &dp)?)?;

    for ((row, od), dp) in sample.iter_mut().zip(od_logsums).zip(dp_logsums) {
        row.od_logsum = od;
        row.dp_logsum = dp;
    }
    Ok(())
}
