//! Single-level destination sampling.
//!
//! Per trip, every zone of the layer with a positive size term for the
//! trip's purpose is an alternative.  The sample evaluator scores each
//! (trip, zone) pair, MNL turns the scores into probabilities, and
//! `sample_size` draws with replacement pick the sample.  Repeated picks of
//! a zone collapse into one row whose `pick_count` is the number of picks.
//!
//! Trips without any alternative get no rows at all.

use tdm_choice::{evaluate_column, sample_alternatives, ModelSpec, PaddedMatrix, UtilityEvaluator};
use tdm_core::{PersonId, PurposeId, RandomDrawService, TripId, ZoneId};

use crate::{DestinationResult, SizeTermMatrix, TripChooser, TRIP_CHANNEL};

/// Layer a sample is drawn over.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZoneLayer {
    Fine,
    Coarse,
}

/// One (trip, candidate zone) pair scored by the sample evaluator.
#[derive(Clone, Debug, PartialEq)]
pub struct DestinationAlternative {
    pub trip:                TripId,
    pub person:              PersonId,
    pub purpose:             PurposeId,
    pub primary_purpose:     PurposeId,
    pub origin:              ZoneId,
    pub primary_destination: ZoneId,
    pub zone:                ZoneId,
    pub size_term:           f64,
    /// Layer of `zone`, `origin`, and `primary_destination`.
    pub layer:               ZoneLayer,
}

/// One distinct sampled destination of a trip.
#[derive(Clone, Debug, PartialEq)]
pub struct DestinationSampleRow {
    pub trip:       TripId,
    pub zone:       ZoneId,
    /// Sampling probability (coarse × fine when presampled).
    pub prob:       f64,
    /// Times the zone was drawn; sums to the sample size per trip.
    pub pick_count: u32,
    /// Logsum origin → `zone`, once computed.
    pub od_logsum:  f64,
    /// Logsum `zone` → half-tour destination, once computed.
    pub dp_logsum:  f64,
}

impl DestinationSampleRow {
    pub fn new(trip: TripId, zone: ZoneId, prob: f64, pick_count: u32) -> Self {
        Self { trip, zone, prob, pick_count, od_logsum: 0.0, dp_logsum: 0.0 }
    }
}

/// Sample destinations for `choosers` over the zones of `size_terms`.
///
/// `sample_size == 0` returns every available zone once.  Output rows are
/// grouped by trip in chooser order, zones ascending within a trip.
pub fn destination_sample(
    choosers:    &[TripChooser],
    size_terms:  &SizeTermMatrix,
    layer:       ZoneLayer,
    evaluator:   &dyn UtilityEvaluator<DestinationAlternative>,
    spec:        &ModelSpec,
    sample_size: usize,
    draws:       &mut dyn RandomDrawService,
) -> DestinationResult<Vec<DestinationSampleRow>> {
    if choosers.is_empty() {
        return Ok(Vec::new());
    }

    let mut alternatives = Vec::new();
    let mut lengths = Vec::with_capacity(choosers.len());
    for c in choosers {
        let before = alternatives.len();
        alternatives.extend(size_terms.available(c.purpose).map(|zone| DestinationAlternative {
            trip:                c.trip,
            person:              c.person,
            purpose:             c.purpose,
            primary_purpose:     c.primary_purpose,
            origin:              c.origin,
            primary_destination: c.primary_destination,
            zone,
            size_term:           size_terms.get(zone, c.purpose),
            layer,
        }));
        lengths.push(alternatives.len() - before);
    }

    let utils = if alternatives.is_empty() {
        Vec::new()
    } else {
        evaluate_column(evaluator, spec, &alternatives)?
    };
    let mut probs = PaddedMatrix::from_ragged(&utils, &lengths)?;
    probs.utilities_to_probs()?;

    let rands = if sample_size == 0 {
        Vec::new()
    } else {
        let keys: Vec<u64> = choosers.iter().map(|c| c.trip.0).collect();
        draws.draw_matrix(TRIP_CHANNEL, &keys, sample_size)?
    };

    let mut offsets = Vec::with_capacity(lengths.len());
    let mut start = 0;
    for &len in &lengths {
        offsets.push(start);
        start += len;
    }

    Ok(sample_alternatives(&probs, sample_size, &rands)?
        .into_iter()
        .map(|s| {
            let alt = &alternatives[offsets[s.row] + s.alt];
            DestinationSampleRow::new(alt.trip, alt.zone, s.prob, s.pick_count)
        })
        .collect())
}
