//! CSV table loaders.
//!
//! # CSV formats
//!
//! Persons (`PNUM` may be empty):
//!
//! ```csv
//! person_id,household_id,PNUM,adult,is_preschool
//! 1,10,1,true,false
//! 2,10,2,false,true
//! ```
//!
//! Tours (`person_id` and `composition` may be empty):
//!
//! ```csv
//! tour_id,household_id,person_id,tour_category,composition,origin,destination,primary_purpose
//! 100,10,,joint,mixed,5,9,shopping
//! ```
//!
//! Trips:
//!
//! ```csv
//! trip_id,tour_id,household_id,person_id,trip_num,trip_count,outbound,purpose,primary_purpose,origin,destination
//! 801,100,10,1,1,2,true,eatout,shopping,5,9
//! ```
//!
//! Purpose columns hold names registered in the [`Purposes`] passed in.

use std::io::Read;

use serde::Deserialize;

use tdm_core::{HouseholdId, PersonId, PurposeId, TourId, TripId, ZoneId};

use crate::{
    Person, Population, PopulationError, PopulationResult, Purposes, Tour, TourCategory,
    TourTable, Trip, TripTable,
};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PersonRecord {
    person_id:    u64,
    household_id: u64,
    #[serde(rename = "PNUM")]
    pnum:         Option<u32>,
    adult:        bool,
    #[serde(default)]
    is_preschool: bool,
}

#[derive(Deserialize)]
struct TourRecord {
    tour_id:         u64,
    household_id:    u64,
    person_id:       Option<u64>,
    tour_category:   String,
    composition:     Option<String>,
    origin:          u32,
    destination:     u32,
    primary_purpose: String,
}

#[derive(Deserialize)]
struct TripRecord {
    trip_id:         u64,
    tour_id:         u64,
    household_id:    u64,
    person_id:       u64,
    trip_num:        u32,
    trip_count:      u32,
    outbound:        bool,
    purpose:         String,
    primary_purpose: String,
    origin:          u32,
    destination:     u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

pub fn load_persons_reader<R: Read>(reader: R) -> PopulationResult<Population> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let persons = csv_reader
        .deserialize::<PersonRecord>()
        .map(|row| {
            let r = row?;
            Ok(Person {
                id:           PersonId(r.person_id),
                household:    HouseholdId(r.household_id),
                rank:         r.pnum,
                is_adult:     r.adult,
                is_preschool: r.is_preschool,
            })
        })
        .collect::<PopulationResult<Vec<_>>>()?;
    Population::new(persons)
}

pub fn load_tours_reader<R: Read>(reader: R, purposes: &Purposes) -> PopulationResult<TourTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let tours = csv_reader
        .deserialize::<TourRecord>()
        .map(|row| {
            let r = row?;
            let category: TourCategory = r.tour_category.parse()?;
            let composition = match r.composition.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(s) => Some(s.parse()?),
            };
            if category == TourCategory::Joint && composition.is_none() {
                return Err(PopulationError::Parse(format!(
                    "joint tour {} has no composition",
                    r.tour_id
                )));
            }
            Ok(Tour {
                id:                     TourId(r.tour_id),
                household:              HouseholdId(r.household_id),
                person:                 r.person_id.map(PersonId),
                category,
                composition,
                origin:                 ZoneId(r.origin),
                destination:            ZoneId(r.destination),
                primary_purpose:        purpose_id(purposes, &r.primary_purpose)?,
                number_of_participants: 1,
            })
        })
        .collect::<PopulationResult<Vec<_>>>()?;
    TourTable::new(tours)
}

pub fn load_trips_reader<R: Read>(reader: R, purposes: &Purposes) -> PopulationResult<TripTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let trips = csv_reader
        .deserialize::<TripRecord>()
        .map(|row| {
            let r = row?;
            if r.trip_num == 0 || r.trip_num > r.trip_count {
                return Err(PopulationError::Parse(format!(
                    "trip {} has trip_num {} outside 1..={}",
                    r.trip_id, r.trip_num, r.trip_count
                )));
            }
            Ok(Trip {
                id:              TripId(r.trip_id),
                tour:            TourId(r.tour_id),
                household:       HouseholdId(r.household_id),
                person:          PersonId(r.person_id),
                trip_num:        r.trip_num,
                trip_count:      r.trip_count,
                outbound:        r.outbound,
                purpose:         purpose_id(purposes, &r.purpose)?,
                primary_purpose: purpose_id(purposes, &r.primary_purpose)?,
                origin:          ZoneId(r.origin),
                destination:     ZoneId(r.destination),
                failed:          false,
                logsum:          None,
            })
        })
        .collect::<PopulationResult<Vec<_>>>()?;
    TripTable::new(trips)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn purpose_id(purposes: &Purposes, name: &str) -> PopulationResult<PurposeId> {
    purposes
        .id(name.trim())
        .ok_or_else(|| PopulationError::UnknownPurpose(name.to_owned()))
}
