//! small: end-to-end run of joint tour participation and trip destination
//! choice on a two-household, six-zone synthetic region.
//!
//! Every input table is an embedded CSV read through the crate loaders.
//! Utilities come from plain functions standing in for an expression engine.
//! Diagnostics are written as CSV to `output/small`.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use log::info;

use tdm_choice::{ChoiceResult, ChoiceTable, ModelSpec};
use tdm_core::{ParticipationSettings, RandomStreams, TripDestinationSettings, ZoneId, ZoneSystem};
use tdm_destination::{
    run_trip_destination, DestinationAlternative, DestinationContext, LogsumLeg, SampledDestination,
    SizeTermMatrix, TripDestinationModels, ZoneHierarchy, ZoneLayer,
};
use tdm_output::{CsvWriter, DiagnosticsObserver};
use tdm_participation::{joint_tour_participation, Candidate};
use tdm_population::{load_persons_reader, load_tours_reader, load_trips_reader, Purposes};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:        u64   = 42;
const SAMPLE_SIZE: usize = 8;
const OUTPUT_DIR:  &str  = "output/small";

// ── Input tables ──────────────────────────────────────────────────────────────

const PERSONS_CSV: &str = "\
person_id,household_id,PNUM,adult,is_preschool\n\
1,10,1,true,false\n\
2,10,2,true,false\n\
3,10,3,false,true\n\
4,20,1,true,false\n\
5,20,2,true,false\n\
6,20,3,false,false\n\
";

const TOURS_CSV: &str = "\
tour_id,household_id,person_id,tour_category,composition,origin,destination,primary_purpose\n\
100,10,,joint,mixed,0,4,shopping\n\
200,20,,joint,adults,1,5,eatout\n\
300,10,1,mandatory,,0,2,work\n\
";

// Intermediate trips start with their half-tour endpoints; the model
// overwrites them.
const TRIPS_CSV: &str = "\
trip_id,tour_id,household_id,person_id,trip_num,trip_count,outbound,purpose,primary_purpose,origin,destination\n\
1001,100,10,1,1,2,true,eatout,shopping,0,4\n\
1002,100,10,1,2,2,true,shopping,shopping,0,4\n\
1003,100,10,1,1,1,false,home,shopping,4,0\n\
2001,200,20,4,1,1,true,eatout,eatout,1,5\n\
2002,200,20,4,1,2,false,shopping,eatout,5,1\n\
2003,200,20,4,2,2,false,home,eatout,5,1\n\
3001,300,10,1,1,3,true,eatout,work,0,2\n\
3002,300,10,1,2,3,true,shopping,work,0,2\n\
3003,300,10,1,3,3,true,work,work,0,2\n\
3004,300,10,1,1,1,false,home,work,2,0\n\
";

const SIZE_TERMS_CSV: &str = "\
zone_id,work,shopping,eatout\n\
0,2.0,0.5,0.2\n\
1,4.0,1.5,0.0\n\
2,30.0,6.0,3.0\n\
3,1.0,12.0,4.0\n\
4,8.0,9.0,2.5\n\
5,0.5,0.0,6.0\n\
";

const HIERARCHY_CSV: &str = "\
zone_id,coarse_zone_id\n\
0,0\n\
1,0\n\
2,0\n\
3,1\n\
4,1\n\
5,1\n\
";

// ── Utility functions ─────────────────────────────────────────────────────────

fn distance(a: ZoneId, b: ZoneId) -> f64 {
    (a.0 as f64 - b.0 as f64).abs()
}

fn participation_utilities(spec: &ModelSpec, rows: &[Candidate]) -> ChoiceResult<ChoiceTable> {
    let values: Vec<Vec<f64>> = rows
        .iter()
        .map(|c| {
            let participate = if c.is_preschool {
                -0.6
            } else if c.is_adult {
                0.9
            } else {
                0.3
            };
            spec.alternatives
                .iter()
                .map(|alt| if alt == "participate" { participate } else { 0.0 })
                .collect()
        })
        .collect();
    ChoiceTable::from_rows(spec.alternatives.clone(), &values)
}

fn sample_utilities(spec: &ModelSpec, rows: &[DestinationAlternative]) -> ChoiceResult<ChoiceTable> {
    let values: Vec<Vec<f64>> = rows
        .iter()
        .map(|a| {
            let detour = match a.layer {
                ZoneLayer::Fine   => distance(a.origin, a.zone) + distance(a.zone, a.primary_destination),
                ZoneLayer::Coarse => 0.0,
            };
            vec![a.size_term.ln() - 0.3 * detour]
        })
        .collect();
    ChoiceTable::from_rows(spec.alternatives.clone(), &values)
}

fn mode_utilities(spec: &ModelSpec, rows: &[LogsumLeg]) -> ChoiceResult<ChoiceTable> {
    let values: Vec<Vec<f64>> = rows
        .iter()
        .map(|leg| {
            let d = distance(leg.origin, leg.destination);
            spec.alternatives
                .iter()
                .map(|mode| match mode.as_str() {
                    "walk" => -0.8 * d,
                    _      => -0.5 - 0.1 * d,
                })
                .collect()
        })
        .collect();
    ChoiceTable::from_rows(spec.alternatives.clone(), &values)
}

fn destination_utilities(spec: &ModelSpec, rows: &[SampledDestination]) -> ChoiceResult<ChoiceTable> {
    let values: Vec<Vec<f64>> = rows
        .iter()
        .map(|a| {
            // Sampling correction plus the two out-of-direction logsums.
            let correction = (a.pick_count as f64 / a.prob).ln();
            vec![a.size_term.ln() + correction + 0.5 * (a.od_logsum + a.dp_logsum)]
        })
        .collect();
    ChoiceTable::from_rows(spec.alternatives.clone(), &values)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== small: joint tour participation + trip destination ===");
    println!("Seed: {SEED}  |  Sample size: {SAMPLE_SIZE}");
    println!();

    // 1. Load inputs.
    let purposes = Purposes::new(["work", "shopping", "eatout", "home"]);
    let population = load_persons_reader(Cursor::new(PERSONS_CSV))?;
    let mut tours = load_tours_reader(Cursor::new(TOURS_CSV), &purposes)?;
    let mut trips = load_trips_reader(Cursor::new(TRIPS_CSV), &purposes)?;
    trips.initialize_endpoints(&tours);

    let size_terms = SizeTermMatrix::from_csv_reader(Cursor::new(SIZE_TERMS_CSV), &purposes)?;
    let hierarchy = ZoneHierarchy::from_csv_reader(Cursor::new(HIERARCHY_CSV))?;
    let ctx = DestinationContext::with_hierarchy(purposes, size_terms, hierarchy)?;
    info!("loaded {} tours and {} trips", tours.len(), trips.len());

    // 2. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut obs = DiagnosticsObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?);
    let mut rng = RandomStreams::new(SEED);

    // 3. Joint tour participation.
    let t0 = Instant::now();
    let participation_spec = ModelSpec::new("joint_tour_participation", ["participate", "not_participate"]);
    let outcome = joint_tour_participation(
        &mut tours,
        &population,
        &participation_utilities,
        &participation_spec,
        &ParticipationSettings::default(),
        &mut rng,
        &mut obs,
    )?;
    println!(
        "Participation: {} participants after {} iterations",
        outcome.participants.len(),
        outcome.iterations
    );
    for tour in tours.joint() {
        println!(
            "  tour {:<5} point person {:<4} participants {}",
            tour.id.0,
            tour.person.map(|p| p.0.to_string()).unwrap_or_default(),
            tour.number_of_participants
        );
    }
    println!();

    // 4. Trip destinations.
    let models = TripDestinationModels {
        sample:        &sample_utilities,
        sample_spec:   ModelSpec::new("trip_destination_sample", ["util"]),
        logsum:        &mode_utilities,
        logsum_spec:   ModelSpec::new("trip_mode_choice", ["drive", "walk"]),
        simulate:      &destination_utilities,
        simulate_spec: ModelSpec::new("trip_destination", ["util"]),
    };
    let settings = TripDestinationSettings {
        sample_size:        SAMPLE_SIZE,
        zone_system:        ZoneSystem::TwoZone,
        logsum_column_name: Some("destination_logsum".to_owned()),
        sample_table_name:  Some("trip_destination_sample".to_owned()),
        ..Default::default()
    };
    let trip_outcome = run_trip_destination(&mut trips, &tours, &ctx, &models, &settings, &mut rng, &mut obs)?;
    obs.finish()?;
    let elapsed = t0.elapsed();

    println!(
        "Trip destination: {} failed, {} dropped, {} sample rows",
        trip_outcome.failed.len(),
        trip_outcome.dropped.len(),
        trip_outcome.sample.as_ref().map_or(0, Vec::len)
    );
    println!("Complete in {:.3} s", elapsed.as_secs_f64());
    println!();

    // 5. Final trip table.
    println!("{:<6} {:<6} {:<4} {:<8} {:<7} {:<12}", "Trip", "Tour", "Num", "Origin", "Dest", "Logsum");
    println!("{}", "-".repeat(46));
    for trip in trips.iter() {
        println!(
            "{:<6} {:<6} {:<4} {:<8} {:<7} {:<12}",
            trip.id.0,
            trip.tour.0,
            trip.trip_num,
            trip.origin.as_signed(),
            trip.destination.as_signed(),
            trip.logsum.map(|l| format!("{l:.4}")).unwrap_or_default(),
        );
    }

    Ok(())
}
