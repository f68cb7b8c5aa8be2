//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `participants.csv`
//! - `unsatisfied_candidates.csv`
//! - `failed_trips.csv`
//!
//! The final trip table goes to `trips.csv` and the destination sample to
//! `<table_name>.csv`.  Both are created on their first write.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::debug;

use tdm_population::PARTICIPANT_COLUMNS;

use crate::writer::{check_table_name, DiagnosticsWriter};
use crate::{FailedTripRow, OutputResult, ParticipantRow, SampleRow, TripRow, UnsatisfiedRow};

pub const UNSATISFIED_COLUMNS: [&str; 8] = [
    "iteration",
    "participant_id",
    "tour_id",
    "household_id",
    "composition",
    "adult",
    "alternative",
    "prob",
];

pub const FAILED_TRIP_COLUMNS: [&str; 8] =
    ["trip_id", "tour_id", "person_id", "trip_num", "outbound", "purpose_id", "origin", "destination"];

/// Trip table columns; the logsum column follows when configured.
pub const TRIP_COLUMNS: [&str; 9] =
    ["trip_id", "tour_id", "person_id", "trip_num", "outbound", "purpose_id", "origin", "destination", "failed"];

pub const SAMPLE_COLUMNS: [&str; 6] = ["trip_id", "zone_id", "prob", "pick_count", "od_logsum", "dp_logsum"];

/// Writes diagnostic tables to CSV files.
pub struct CsvWriter {
    dir:          PathBuf,
    participants: Writer<File>,
    unsatisfied:  Writer<File>,
    failed_trips: Writer<File>,
    trips:        Option<(bool, Writer<File>)>,
    samples:      Vec<(String, Writer<File>)>,
    finished:     bool,
}

impl CsvWriter {
    /// Open (or create) the fixed CSV files in `dir` and write their header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut participants = Writer::from_path(dir.join("participants.csv"))?;
        participants.write_record(PARTICIPANT_COLUMNS)?;

        let mut unsatisfied = Writer::from_path(dir.join("unsatisfied_candidates.csv"))?;
        unsatisfied.write_record(UNSATISFIED_COLUMNS)?;

        let mut failed_trips = Writer::from_path(dir.join("failed_trips.csv"))?;
        failed_trips.write_record(FAILED_TRIP_COLUMNS)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            participants,
            unsatisfied,
            failed_trips,
            trips: None,
            samples: Vec::new(),
            finished: false,
        })
    }

    /// Create `trips.csv` with a header matching `logsum_column`, once.
    fn open_trips(&mut self, logsum_column: Option<&str>) -> OutputResult<()> {
        if self.trips.is_some() {
            return Ok(());
        }
        let mut header: Vec<&str> = TRIP_COLUMNS.to_vec();
        if let Some(name) = logsum_column {
            check_table_name(name)?;
            header.push(name);
        }
        let path = self.dir.join("trips.csv");
        debug!("creating trip table {}", path.display());
        let mut w = Writer::from_path(path)?;
        w.write_record(&header)?;
        self.trips = Some((logsum_column.is_some(), w));
        Ok(())
    }

    fn sample_writer(&mut self, table_name: &str) -> OutputResult<&mut Writer<File>> {
        let i = match self.samples.iter().position(|(name, _)| name == table_name) {
            Some(i) => i,
            None => {
                check_table_name(table_name)?;
                let path = self.dir.join(format!("{table_name}.csv"));
                debug!("creating sample table {}", path.display());
                let mut w = Writer::from_path(path)?;
                w.write_record(SAMPLE_COLUMNS)?;
                self.samples.push((table_name.to_owned(), w));
                self.samples.len() - 1
            }
        };
        Ok(&mut self.samples[i].1)
    }
}

impl DiagnosticsWriter for CsvWriter {
    fn write_participants(&mut self, rows: &[ParticipantRow]) -> OutputResult<()> {
        for row in rows {
            self.participants.write_record(&[
                row.participant_id.to_string(),
                row.tour_id.to_string(),
                row.household_id.to_string(),
                row.person_id.to_string(),
                row.participant_num.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_unsatisfied(&mut self, rows: &[UnsatisfiedRow]) -> OutputResult<()> {
        for row in rows {
            self.unsatisfied.write_record(&[
                row.iteration.to_string(),
                row.participant_id.to_string(),
                row.tour_id.to_string(),
                row.household_id.to_string(),
                row.composition.clone(),
                (row.is_adult as u8).to_string(),
                row.alternative.clone(),
                row.prob.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_failed_trips(&mut self, rows: &[FailedTripRow]) -> OutputResult<()> {
        for row in rows {
            self.failed_trips.write_record(&[
                row.trip_id.to_string(),
                row.tour_id.to_string(),
                row.person_id.to_string(),
                row.trip_num.to_string(),
                (row.outbound as u8).to_string(),
                row.purpose_id.to_string(),
                row.origin.to_string(),
                row.destination.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_sample(&mut self, table_name: &str, rows: &[SampleRow]) -> OutputResult<()> {
        let w = self.sample_writer(table_name)?;
        for row in rows {
            w.write_record(&[
                row.trip_id.to_string(),
                row.zone_id.to_string(),
                row.prob.to_string(),
                row.pick_count.to_string(),
                row.od_logsum.to_string(),
                row.dp_logsum.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_trips(&mut self, logsum_column: Option<&str>, rows: &[TripRow]) -> OutputResult<()> {
        self.open_trips(logsum_column)?;
        let Some((with_logsum, w)) = self.trips.as_mut() else { return Ok(()) };
        for row in rows {
            let mut record = vec![
                row.trip_id.to_string(),
                row.tour_id.to_string(),
                row.person_id.to_string(),
                row.trip_num.to_string(),
                (row.outbound as u8).to_string(),
                row.purpose_id.to_string(),
                row.origin.to_string(),
                row.destination.to_string(),
                (row.failed as u8).to_string(),
            ];
            if *with_logsum {
                record.push(row.logsum.map(|l| l.to_string()).unwrap_or_default());
            }
            w.write_record(&record)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.participants.flush()?;
        self.unsatisfied.flush()?;
        self.failed_trips.flush()?;
        if let Some((_, w)) = &mut self.trips {
            w.flush()?;
        }
        for (_, w) in &mut self.samples {
            w.flush()?;
        }
        Ok(())
    }
}
