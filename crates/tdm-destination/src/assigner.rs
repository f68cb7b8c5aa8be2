//! Sequential destination assignment over trip-number batches.
//!
//! # Batch order
//!
//! ```text
//! for trip_num in min..=max (intermediate trips only):
//!     for each primary purpose segment (ascending):
//!         sample ─► drop trips without alternatives ─► logsums ─► choose
//!     chosen      → trip.destination = zone,  next trip origin = zone
//!     not chosen  → trip.failed, destination = NO_DESTINATION,
//!                   next trip origin = this trip's origin
//! ```
//!
//! Trip `n + 1` of a half-tour is only processed after trip `n`, so its
//! origin is always final when it is sampled.  A failed trip passes its own
//! origin on, which keeps the chain continuous.

use std::collections::BTreeMap;

use log::{info, warn};

use tdm_choice::{ModelSpec, UtilityEvaluator};
use tdm_core::{IdSet, PurposeId, RandomDrawService, TripDestinationSettings, TripId, ZoneId, NO_DESTINATION};
use tdm_population::{TourTable, Trip, TripTable};

use crate::{
    compute_logsums, flag_failed_tour_mates, trip_destination_sample, trip_destination_simulate,
    DestinationAlternative, DestinationChoice, DestinationContext, DestinationError,
    DestinationResult, DestinationSampleRow, DropFailedTrips, FailedTripCleanup, LogsumLeg,
    SampledDestination, TripChooser, TripDestinationObserver,
};

/// Random channel the destination draws are taken from, keyed by trip id.
pub const TRIP_CHANNEL: &str = "trips";

/// Utility evaluators and specs of the three destination sub-models.
///
/// Specs are segmented per primary purpose at run time (the purpose name is
/// set as the model segment).
pub struct TripDestinationModels<'a> {
    pub sample:        &'a dyn UtilityEvaluator<DestinationAlternative>,
    pub sample_spec:   ModelSpec,
    pub logsum:        &'a dyn UtilityEvaluator<LogsumLeg>,
    /// Alternatives are the modes whose logsum is taken.
    pub logsum_spec:   ModelSpec,
    pub simulate:      &'a dyn UtilityEvaluator<SampledDestination>,
    pub simulate_spec: ModelSpec,
}

/// Result of a trip destination run.
#[derive(Clone, Debug, Default)]
pub struct TripDestinationOutcome {
    /// Trips that could not be given a destination, ascending.
    pub failed:  Vec<TripId>,
    /// Trips removed by the cleanup collaborator.
    pub dropped: Vec<TripId>,
    /// Kept destination sample, when a sample table is configured.
    pub sample:  Option<Vec<DestinationSampleRow>>,
}

/// Choose a destination for one primary-purpose segment of a batch.
///
/// Returns the successful choices and the segment's sample rows (for trips
/// that reached the final choice).
pub fn choose_trip_destination(
    segment:  &[TripChooser],
    purpose:  PurposeId,
    ctx:      &DestinationContext,
    models:   &TripDestinationModels<'_>,
    settings: &TripDestinationSettings,
    draws:    &mut dyn RandomDrawService,
) -> DestinationResult<(Vec<DestinationChoice>, Vec<DestinationSampleRow>)> {
    let segment_name = ctx.purposes.name(purpose).to_owned();
    info!("choose_trip_destination {segment_name} with {} trips", segment.len());

    let sample_spec = models.sample_spec.clone().with_segment(segment_name.clone());
    let mut sample = trip_destination_sample(segment, ctx, models.sample, &sample_spec, settings, draws)?;

    let sampled: IdSet<TripId> = sample.iter().map(|r| r.trip).collect();
    let choosers: Vec<TripChooser> = segment.iter().filter(|c| sampled.contains(&c.trip)).cloned().collect();
    if choosers.len() < segment.len() {
        warn!(
            "{segment_name}: trip_destination_sample dropped {} trips without viable destination alternatives",
            segment.len() - choosers.len()
        );
    }
    if choosers.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let logsum_spec = models.logsum_spec.clone().with_segment(segment_name.clone());
    compute_logsums(&mut sample, &choosers, models.logsum, &logsum_spec)?;

    let simulate_spec = models.simulate_spec.clone().with_segment(segment_name.clone());
    let choices = trip_destination_simulate(
        &choosers,
        &sample,
        &ctx.size_terms,
        models.simulate,
        &simulate_spec,
        settings.want_logsums(),
        draws,
    )?;
    if choices.len() < choosers.len() {
        warn!(
            "{segment_name}: trip_destination_simulate dropped {} trips without viable destination alternatives",
            choosers.len() - choices.len()
        );
    }
    Ok((choices, sample))
}

/// Assign destinations to every intermediate trip of `trips`, dropping
/// failed trips (and their tour mates) when cleanup is enabled.
pub fn run_trip_destination(
    trips:    &mut TripTable,
    tours:    &TourTable,
    ctx:      &DestinationContext,
    models:   &TripDestinationModels<'_>,
    settings: &TripDestinationSettings,
    draws:    &mut dyn RandomDrawService,
    observer: &mut dyn TripDestinationObserver,
) -> DestinationResult<TripDestinationOutcome> {
    run_trip_destination_with_cleanup(trips, tours, ctx, models, settings, draws, observer, &mut DropFailedTrips)
}

/// [`run_trip_destination`] with a caller-supplied cleanup collaborator.
#[allow(clippy::too_many_arguments)]
pub fn run_trip_destination_with_cleanup(
    trips:    &mut TripTable,
    tours:    &TourTable,
    ctx:      &DestinationContext,
    models:   &TripDestinationModels<'_>,
    settings: &TripDestinationSettings,
    draws:    &mut dyn RandomDrawService,
    observer: &mut dyn TripDestinationObserver,
    cleanup:  &mut dyn FailedTripCleanup,
) -> DestinationResult<TripDestinationOutcome> {
    settings.validate()?;

    let keys: Vec<u64> = trips.ids().map(|id| id.0).collect();
    draws.add_channel(TRIP_CHANNEL, &keys)?;
    let result = assign_batches(trips, tours, ctx, models, settings, draws, observer);
    draws.drop_channel(TRIP_CHANNEL);
    let mut sample = result?;

    let failed: Vec<&Trip> = trips.iter().filter(|t| t.failed).collect();
    let mut outcome = TripDestinationOutcome {
        failed: failed.iter().map(|t| t.id).collect(),
        ..Default::default()
    };
    if !failed.is_empty() {
        warn!("trip_destination: {} failed trips", failed.len());
        let failed: Vec<Trip> = failed.into_iter().cloned().collect();
        observer.on_failed_trips(&failed);
    }

    if settings.cleanup && !outcome.failed.is_empty() {
        let flagged = flag_failed_tour_mates(trips);
        info!("trip_destination: flagged {flagged} tour mates of failed trips");
        if let Some(rows) = sample.as_mut() {
            let flagged_ids: IdSet<TripId> = trips.iter().filter(|t| t.failed).map(|t| t.id).collect();
            rows.retain(|r| !flagged_ids.contains(&r.trip));
        }
        outcome.dropped = cleanup.cleanup(trips)?;
    }

    if let (Some(rows), Some(name)) = (sample.as_ref(), settings.sample_table_name.as_deref()) {
        info!("adding {} samples to {name}", rows.len());
        observer.on_sample(name, rows);
    }
    outcome.sample = sample;

    let final_trips: Vec<Trip> = trips.iter().cloned().collect();
    observer.on_trips(settings.logsum_column_name.as_deref(), &final_trips);
    Ok(outcome)
}

/// Batch loop.  Returns the kept sample rows when a sample table is
/// configured.
fn assign_batches(
    trips:    &mut TripTable,
    tours:    &TourTable,
    ctx:      &DestinationContext,
    models:   &TripDestinationModels<'_>,
    settings: &TripDestinationSettings,
    draws:    &mut dyn RandomDrawService,
    observer: &mut dyn TripDestinationObserver,
) -> DestinationResult<Option<Vec<DestinationSampleRow>>> {
    let mut kept = settings.want_sample_table().then(Vec::new);

    let nums: Vec<u32> = trips.iter().filter(|t| t.is_intermediate()).map(|t| t.trip_num).collect();
    let (Some(&first), Some(&last)) = (nums.iter().min(), nums.iter().max()) else {
        info!("trip_destination: no intermediate trips");
        return Ok(kept);
    };

    for trip_num in first..=last {
        let nth: Vec<TripId> = trips
            .iter()
            .filter(|t| t.is_intermediate() && t.trip_num == trip_num)
            .map(|t| t.id)
            .collect();
        info!("trip_destination trip_num_{trip_num}: running with {} trips", nth.len());

        let mut segments: BTreeMap<PurposeId, Vec<TripChooser>> = BTreeMap::new();
        for &id in &nth {
            let Some(trip) = trips.get(id) else { continue };
            let tour = tours
                .get(trip.tour)
                .ok_or(DestinationError::UnknownTour { trip: trip.id, tour: trip.tour })?;
            segments.entry(trip.primary_purpose).or_default().push(TripChooser::new(trip, tour));
        }

        let mut choices: Vec<DestinationChoice> = Vec::new();
        for (purpose, segment) in &segments {
            let (segment_choices, segment_sample) =
                choose_trip_destination(segment, *purpose, ctx, models, settings, draws)?;
            choices.extend(segment_choices);
            if let Some(kept) = kept.as_mut() {
                kept.extend(segment_sample);
            }
        }

        if settings.fail_some_trips_for_testing && !choices.is_empty() {
            choices.remove(0);
        }

        let chosen: IdSet<TripId> = choices.iter().map(|c| c.trip).collect();
        let failed: Vec<TripId> = nth.iter().copied().filter(|id| !chosen.contains(id)).collect();
        if !failed.is_empty() {
            warn!(
                "trip_destination trip_num_{trip_num}: sidelining {} trips without viable destination alternatives",
                failed.len()
            );
        }
        for &id in &failed {
            let Some(trip) = trips.get_mut(id) else { continue };
            trip.failed = true;
            trip.destination = NO_DESTINATION;
            let origin = trip.origin;
            set_next_origin(trips, id, origin);
        }
        if choices.is_empty() {
            warn!("trip_destination: all {} trip_num {trip_num} trips failed", nth.len());
        }

        for choice in &choices {
            let Some(trip) = trips.get_mut(choice.trip) else { continue };
            trip.destination = choice.destination;
            if settings.want_logsums() {
                trip.logsum = choice.logsum;
            }
            set_next_origin(trips, choice.trip, choice.destination);
        }

        observer.on_batch(trip_num, nth.len(), failed.len());
    }

    Ok(kept)
}

fn set_next_origin(trips: &mut TripTable, id: TripId, origin: ZoneId) {
    if let Some(next) = trips.next_trip_id(id) {
        if let Some(t) = trips.get_mut(next) {
            t.origin = origin;
        }
    }
}
