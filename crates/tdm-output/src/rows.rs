//! Plain data row types written by output backends.
//!
//! Ids are flattened to integers.  Zone ids are signed so the
//! `NO_DESTINATION` sentinel is written as `-1`.

use tdm_destination::DestinationSampleRow;
use tdm_participation::UnsatisfiedCandidate;
use tdm_population::{Participant, Trip};

/// One participant of a joint tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantRow {
    pub participant_id:  u64,
    pub tour_id:         u64,
    pub household_id:    u64,
    pub person_id:       u64,
    pub participant_num: u32,
}

impl From<&Participant> for ParticipantRow {
    fn from(p: &Participant) -> Self {
        Self {
            participant_id:  p.id.0,
            tour_id:         p.tour.0,
            household_id:    p.household.0,
            person_id:       p.person.0,
            participant_num: p.participant_num,
        }
    }
}

/// One (candidate, alternative) probability of a candidate still unresolved
/// past the iteration cap.  Long format: one row per alternative.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsatisfiedRow {
    pub iteration:      u32,
    pub participant_id: u64,
    pub tour_id:        u64,
    pub household_id:   u64,
    pub composition:    String,
    pub is_adult:       bool,
    pub alternative:    String,
    pub prob:           f64,
}

impl UnsatisfiedRow {
    /// Expand `candidate` into one row per entry of `columns`.
    pub fn expand(iteration: u32, columns: &[String], candidate: &UnsatisfiedCandidate) -> Vec<Self> {
        columns
            .iter()
            .zip(&candidate.probs)
            .map(|(alternative, &prob)| Self {
                iteration,
                participant_id: candidate.participant.0,
                tour_id:        candidate.tour.0,
                household_id:   candidate.household.0,
                composition:    candidate.composition.to_string(),
                is_adult:       candidate.is_adult,
                alternative:    alternative.clone(),
                prob,
            })
            .collect()
    }
}

/// A trip left without a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedTripRow {
    pub trip_id:     u64,
    pub tour_id:     u64,
    pub person_id:   u64,
    pub trip_num:    u32,
    pub outbound:    bool,
    pub purpose_id:  u16,
    pub origin:      i64,
    /// `-1` for `NO_DESTINATION`.
    pub destination: i64,
}

impl From<&Trip> for FailedTripRow {
    fn from(t: &Trip) -> Self {
        Self {
            trip_id:     t.id.0,
            tour_id:     t.tour.0,
            person_id:   t.person.0,
            trip_num:    t.trip_num,
            outbound:    t.outbound,
            purpose_id:  t.purpose.0,
            origin:      t.origin.as_signed(),
            destination: t.destination.as_signed(),
        }
    }
}

/// One trip of the final trip table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRow {
    pub trip_id:     u64,
    pub tour_id:     u64,
    pub person_id:   u64,
    pub trip_num:    u32,
    pub outbound:    bool,
    pub purpose_id:  u16,
    pub origin:      i64,
    pub destination: i64,
    pub failed:      bool,
    pub logsum:      Option<f64>,
}

impl From<&Trip> for TripRow {
    fn from(t: &Trip) -> Self {
        Self {
            trip_id:     t.id.0,
            tour_id:     t.tour.0,
            person_id:   t.person.0,
            trip_num:    t.trip_num,
            outbound:    t.outbound,
            purpose_id:  t.purpose.0,
            origin:      t.origin.as_signed(),
            destination: t.destination.as_signed(),
            failed:      t.failed,
            logsum:      t.logsum,
        }
    }
}

/// One distinct sampled destination of a trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRow {
    pub trip_id:    u64,
    pub zone_id:    i64,
    pub prob:       f64,
    pub pick_count: u32,
    pub od_logsum:  f64,
    pub dp_logsum:  f64,
}

impl From<&DestinationSampleRow> for SampleRow {
    fn from(r: &DestinationSampleRow) -> Self {
        Self {
            trip_id:    r.trip.0,
            zone_id:    r.zone.as_signed(),
            prob:       r.prob,
            pick_count: r.pick_count,
            od_logsum:  r.od_logsum,
            dp_logsum:  r.dp_logsum,
        }
    }
}
