//! Unit tests for tdm-population.

use tdm_core::{HouseholdId, PersonId, PurposeId, TourId, TripId, ZoneId};

use crate::{Person, Tour, TourCategory, TourTable, Trip, TripTable};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn person(id: u64, hh: u64, adult: bool) -> Person {
    Person {
        id:           PersonId(id),
        household:    HouseholdId(hh),
        rank:         None,
        is_adult:     adult,
        is_preschool: false,
    }
}

fn tour(id: u64, origin: u32, destination: u32) -> Tour {
    Tour {
        id:                     TourId(id),
        household:              HouseholdId(1),
        person:                 Some(PersonId(1)),
        category:               TourCategory::NonMandatory,
        composition:            None,
        origin:                 ZoneId(origin),
        destination:            ZoneId(destination),
        primary_purpose:        PurposeId(0),
        number_of_participants: 1,
    }
}

fn trip(id: u64, tour: u64, num: u32, count: u32, outbound: bool) -> Trip {
    Trip {
        id:              TripId(id),
        tour:            TourId(tour),
        household:       HouseholdId(1),
        person:          PersonId(1),
        trip_num:        num,
        trip_count:      count,
        outbound,
        purpose:         PurposeId(0),
        primary_purpose: PurposeId(0),
        origin:          ZoneId(0),
        destination:     ZoneId(0),
        failed:          false,
        logsum:          None,
    }
}

// ── Population ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod population {
    use super::*;
    use crate::{Population, PopulationError};

    #[test]
    fn members_are_grouped_and_sorted() {
        let pop = Population::new(vec![
            person(3, 2, true),
            person(2, 1, false),
            person(1, 1, true),
        ])
        .unwrap();
        let ids: Vec<_> = pop.members(HouseholdId(1)).iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(pop.members(HouseholdId(2)).len(), 1);
        assert!(pop.members(HouseholdId(99)).is_empty());
        assert_eq!(pop.household_count(), 2);
    }

    #[test]
    fn rank_falls_back_to_roster_position() {
        let mut p5 = person(5, 1, true);
        p5.rank = Some(4);
        let pop = Population::new(vec![person(1, 1, true), person(2, 1, false), p5]).unwrap();
        let roster = pop.members(HouseholdId(1));
        assert_eq!(pop.rank_of(&roster[0]), 1);
        assert_eq!(pop.rank_of(&roster[1]), 2);
        assert_eq!(pop.rank_of(&roster[2]), 4);
    }

    #[test]
    fn duplicate_person_rejected() {
        let err = Population::new(vec![person(1, 1, true), person(1, 2, true)]).unwrap_err();
        assert!(matches!(err, PopulationError::DuplicateId { what: "person", id: 1 }));
    }
}

// ── Tours ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tours {
    use super::*;
    use crate::Composition;

    #[test]
    fn composition_admits() {
        assert!(Composition::Adults.admits(true));
        assert!(!Composition::Adults.admits(false));
        assert!(Composition::Children.admits(false));
        assert!(!Composition::Children.admits(true));
        assert!(Composition::Mixed.admits(true) && Composition::Mixed.admits(false));
    }

    #[test]
    fn composition_parse_and_display() {
        for c in [Composition::Adults, Composition::Children, Composition::Mixed] {
            assert_eq!(c.to_string().parse::<Composition>().unwrap(), c);
        }
        assert!("couples".parse::<Composition>().is_err());
    }

    #[test]
    fn leg_endpoints() {
        let t = tour(1, 5, 9);
        assert_eq!(t.leg_origin(true), ZoneId(5));
        assert_eq!(t.leg_destination(true), ZoneId(9));
        assert_eq!(t.leg_origin(false), ZoneId(9));
        assert_eq!(t.leg_destination(false), ZoneId(5));
    }

    #[test]
    fn table_lookup_and_joint_filter() {
        let mut joint = tour(2, 1, 2);
        joint.category = TourCategory::Joint;
        let table = TourTable::new(vec![joint, tour(1, 1, 2)]).unwrap();
        assert_eq!(table.get(TourId(2)).unwrap().id, TourId(2));
        assert_eq!(table.joint().count(), 1);
        assert!(TourTable::new(vec![tour(1, 0, 0), tour(1, 0, 0)]).is_err());
    }
}

// ── Trips ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trips {
    use super::*;

    #[test]
    fn next_trip_id_stops_at_terminal_trip() {
        let table = TripTable::new(vec![
            trip(12, 1, 3, 3, true),
            trip(10, 1, 1, 3, true),
            trip(11, 1, 2, 3, true),
            trip(13, 1, 1, 1, false),
        ])
        .unwrap();
        assert_eq!(table.next_trip_id(TripId(10)), Some(TripId(11)));
        assert_eq!(table.next_trip_id(TripId(11)), Some(TripId(12)));
        assert_eq!(table.next_trip_id(TripId(12)), None);
        assert_eq!(table.next_trip_id(TripId(13)), None);
    }

    #[test]
    fn initialize_endpoints_uses_half_tour_direction() {
        let tours = TourTable::new(vec![tour(1, 5, 9)]).unwrap();
        let mut out = trip(1, 1, 1, 2, true);
        out.failed = true;
        let mut table = TripTable::new(vec![out, trip(2, 1, 1, 1, false)]).unwrap();
        table.initialize_endpoints(&tours);

        let t1 = table.get(TripId(1)).unwrap();
        assert_eq!((t1.origin, t1.destination, t1.failed), (ZoneId(5), ZoneId(9), false));
        let t2 = table.get(TripId(2)).unwrap();
        assert_eq!((t2.origin, t2.destination), (ZoneId(9), ZoneId(5)));
    }

    #[test]
    fn retain_rebuilds_index() {
        let mut table = TripTable::new(vec![trip(1, 1, 1, 2, true), trip(2, 1, 2, 2, true)]).unwrap();
        table.retain(|t| t.id != TripId(1));
        assert!(table.get(TripId(1)).is_none());
        assert_eq!(table.get(TripId(2)).unwrap().trip_num, 2);
        assert_eq!(table.len(), 1);
    }
}

// ── CSV loaders ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::{load_persons_reader, load_tours_reader, load_trips_reader, Composition, Purposes};

    fn purposes() -> Purposes {
        Purposes::new(["work", "shopping", "eatout"])
    }

    #[test]
    fn load_persons() {
        let csv = "person_id,household_id,PNUM,adult,is_preschool\n\
                   1,10,1,true,false\n\
                   2,10,,false,true\n";
        let pop = load_persons_reader(Cursor::new(csv)).unwrap();
        let roster = pop.members(HouseholdId(10));
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].rank, Some(1));
        assert_eq!(roster[1].rank, None);
        assert!(roster[1].is_preschool);
    }

    #[test]
    fn load_tours() {
        let csv = "tour_id,household_id,person_id,tour_category,composition,origin,destination,primary_purpose\n\
                   100,10,,joint,mixed,5,9,shopping\n\
                   101,10,1,mandatory,,5,7,work\n";
        let tours = load_tours_reader(Cursor::new(csv), &purposes()).unwrap();
        let joint = tours.get(TourId(100)).unwrap();
        assert_eq!(joint.composition, Some(Composition::Mixed));
        assert_eq!(joint.person, None);
        assert_eq!(joint.primary_purpose, PurposeId(1));
        assert_eq!(joint.number_of_participants, 1);
        assert_eq!(tours.get(TourId(101)).unwrap().person, Some(PersonId(1)));
    }

    #[test]
    fn joint_tour_without_composition_rejected() {
        let csv = "tour_id,household_id,person_id,tour_category,composition,origin,destination,primary_purpose\n\
                   100,10,,joint,,5,9,shopping\n";
        assert!(load_tours_reader(Cursor::new(csv), &purposes()).is_err());
    }

    #[test]
    fn load_trips_and_reject_unknown_purpose() {
        let header = "trip_id,tour_id,household_id,person_id,trip_num,trip_count,outbound,purpose,primary_purpose,origin,destination\n";
        let good = format!("{header}801,100,10,1,1,2,true,eatout,shopping,5,9\n");
        let trips = load_trips_reader(Cursor::new(good), &purposes()).unwrap();
        let t = trips.get(TripId(801)).unwrap();
        assert!(t.is_intermediate());
        assert_eq!(t.purpose, PurposeId(2));

        let bad = format!("{header}801,100,10,1,1,2,true,gym,shopping,5,9\n");
        assert!(load_trips_reader(Cursor::new(bad), &purposes()).is_err());
    }
}
