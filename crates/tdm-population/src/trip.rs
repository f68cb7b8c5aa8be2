//! Trips and the half-tour origin/destination chain.
//!
//! # Chain model
//!
//! Trips of one half-tour (same tour, same `outbound`) are numbered
//! `1..=trip_count` and carry consecutive trip ids in that order:
//!
//! ```text
//! leg origin ─► trip 1 ─► trip 2 ─► … ─► trip n ─► leg destination
//!               dest₁ = orig₂   dest₂ = orig₃
//! ```
//!
//! Trip `n` (`trip_num == trip_count`) is terminal: its destination is the
//! half-tour endpoint and is never chosen.  Every other trip is
//! *intermediate* and its destination is chosen, then copied to the origin of
//! the next trip.

use tdm_core::{HouseholdId, IdMap, PersonId, PurposeId, TourId, TripId, ZoneId};

use crate::{PopulationError, PopulationResult, TourTable};

// ── Trip ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trip {
    pub id:              TripId,
    pub tour:            TourId,
    pub household:       HouseholdId,
    pub person:          PersonId,
    /// 1-based position within the half-tour.
    pub trip_num:        u32,
    /// Number of trips in the half-tour.
    pub trip_count:      u32,
    pub outbound:        bool,
    /// Activity purpose at the trip destination (selects the size term).
    pub purpose:         PurposeId,
    /// Purpose of the parent tour (segments the destination model).
    pub primary_purpose: PurposeId,
    pub origin:          ZoneId,
    pub destination:     ZoneId,
    /// Set when no destination could be chosen.
    pub failed:          bool,
    /// Logsum of the chosen destination, when logsums are requested.
    pub logsum:          Option<f64>,
}

impl Trip {
    /// `true` for trips whose destination is chosen (not the last of its
    /// half-tour).
    #[inline]
    pub fn is_intermediate(&self) -> bool {
        self.trip_num < self.trip_count
    }
}

// ── TripTable ─────────────────────────────────────────────────────────────────

/// Trips in ascending id order with O(1) lookup by id.
#[derive(Clone, Debug, Default)]
pub struct TripTable {
    trips: Vec<Trip>,
    index: IdMap<TripId, usize>,
}

impl TripTable {
    pub fn new(mut trips: Vec<Trip>) -> PopulationResult<Self> {
        trips.sort_by_key(|t| t.id);
        let index = build_index(&trips)?;
        Ok(Self { trips, index })
    }

    pub fn get(&self, id: TripId) -> Option<&Trip> {
        self.index.get(&id).map(|&i| &self.trips[i])
    }

    pub fn get_mut(&mut self, id: TripId) -> Option<&mut Trip> {
        self.index.get(&id).map(|&i| &mut self.trips[i])
    }

    /// The trip that follows `id` in its half-tour, or `None` for terminal
    /// trips.  This is the next row in id order.
    pub fn next_trip_id(&self, id: TripId) -> Option<TripId> {
        let &i = self.index.get(&id)?;
        if !self.trips[i].is_intermediate() {
            return None;
        }
        self.trips.get(i + 1).map(|t| t.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trip> {
        self.trips.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Trip> {
        self.trips.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = TripId> + '_ {
        self.trips.iter().map(|t| t.id)
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Keep only trips matching `keep`, preserving id order.
    pub fn retain(&mut self, keep: impl FnMut(&Trip) -> bool) {
        self.trips.retain(keep);
        self.index = self.trips.iter().enumerate().map(|(i, t)| (t.id, i)).collect();
    }

    /// Reset every trip to its half-tour endpoints and clear `failed`.
    ///
    /// Used before re-running destination choice on trips whose previous
    /// destinations were discarded.  Trips whose tour is missing from
    /// `tours` are left untouched.
    pub fn initialize_endpoints(&mut self, tours: &TourTable) {
        for trip in &mut self.trips {
            if let Some(tour) = tours.get(trip.tour) {
                trip.origin      = tour.leg_origin(trip.outbound);
                trip.destination = tour.leg_destination(trip.outbound);
                trip.failed      = false;
            }
        }
    }
}

fn build_index(trips: &[Trip]) -> PopulationResult<IdMap<TripId, usize>> {
    let mut index = IdMap::default();
    for (i, t) in trips.iter().enumerate() {
        if index.insert(t.id, i).is_some() {
            return Err(PopulationError::DuplicateId { what: "trip", id: t.id.0 });
        }
    }
    Ok(index)
}
