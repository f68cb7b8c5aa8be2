//! Handling of trips that could not be given a destination.

use log::info;

use tdm_core::{IdSet, TripId};
use tdm_population::TripTable;

use crate::DestinationResult;

/// Flag every trip that shares a tour with a failed trip.  Returns the
/// number of trips newly flagged.
pub fn flag_failed_tour_mates(trips: &mut TripTable) -> usize {
    let failed_tours: IdSet<_> = trips.iter().filter(|t| t.failed).map(|t| t.tour).collect();
    let mut flagged = 0;
    for trip in trips.iter_mut() {
        if !trip.failed && failed_tours.contains(&trip.tour) {
            trip.failed = true;
            flagged += 1;
        }
    }
    flagged
}

/// Collaborator that receives the trips table once failed trips and their
/// tour mates are flagged.
///
/// Returns the ids of the trips it removed.
pub trait FailedTripCleanup {
    fn cleanup(&mut self, trips: &mut TripTable) -> DestinationResult<Vec<TripId>>;
}

/// Default cleanup: drop every flagged trip.
pub struct DropFailedTrips;

impl FailedTripCleanup for DropFailedTrips {
    fn cleanup(&mut self, trips: &mut TripTable) -> DestinationResult<Vec<TripId>> {
        let dropped: Vec<TripId> = trips.iter().filter(|t| t.failed).map(|t| t.id).collect();
        trips.retain(|t| !t.failed);
        info!("dropped {} failed trips", dropped.len());
        Ok(dropped)
    }
}
