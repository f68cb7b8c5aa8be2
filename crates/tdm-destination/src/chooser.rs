use tdm_core::{EntityKey, PersonId, PurposeId, TourId, TripId, ZoneId};
use tdm_population::{Tour, Trip};

/// An intermediate trip as seen by the destination models: the trip's
/// current origin plus the destination of its half-tour.
#[derive(Clone, Debug, PartialEq)]
pub struct TripChooser {
    pub trip:                TripId,
    pub tour:                TourId,
    pub person:              PersonId,
    pub trip_num:            u32,
    pub outbound:            bool,
    pub purpose:             PurposeId,
    pub primary_purpose:     PurposeId,
    pub origin:              ZoneId,
    /// Half-tour destination: tour destination outbound, tour origin inbound.
    pub primary_destination: ZoneId,
}

impl TripChooser {
    pub fn new(trip: &Trip, tour: &Tour) -> Self {
        Self {
            trip:                trip.id,
            tour:                trip.tour,
            person:              trip.person,
            trip_num:            trip.trip_num,
            outbound:            trip.outbound,
            purpose:             trip.purpose,
            primary_purpose:     trip.primary_purpose,
            origin:              trip.origin,
            primary_destination: tour.leg_destination(trip.outbound),
        }
    }
}

impl EntityKey for TripChooser {
    #[inline]
    fn entity_key(&self) -> u64 {
        self.trip.0
    }
}
