//! `DiagnosticsObserver<W>`: bridges the model observer traits to a
//! `DiagnosticsWriter`.

use log::{debug, info};

use tdm_destination::{DestinationSampleRow, TripDestinationObserver};
use tdm_participation::{ParticipationObserver, UnsatisfiedCandidate};
use tdm_population::{Participant, Trip};

use crate::rows::{FailedTripRow, ParticipantRow, SampleRow, TripRow, UnsatisfiedRow};
use crate::writer::DiagnosticsWriter;
use crate::{OutputError, OutputResult};

/// A [`ParticipationObserver`] and [`TripDestinationObserver`] that writes
/// every diagnostic table to any [`DiagnosticsWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After the model returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct DiagnosticsObserver<W: DiagnosticsWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: DiagnosticsWriter> DiagnosticsObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  Also reports a stored write error first, if any.
    pub fn finish(&mut self) -> OutputResult<()> {
        if let Some(e) = self.last_error.take() {
            return Err(e);
        }
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after a run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: DiagnosticsWriter> ParticipationObserver for DiagnosticsObserver<W> {
    fn on_iteration(&mut self, iteration: u32, satisfied: usize, remaining: usize) {
        debug!("participation iteration {iteration}: {satisfied} satisfied, {remaining} remaining");
    }

    fn on_unsatisfied(&mut self, iteration: u32, columns: &[String], rows: &[UnsatisfiedCandidate]) {
        let rows: Vec<UnsatisfiedRow> =
            rows.iter().flat_map(|c| UnsatisfiedRow::expand(iteration, columns, c)).collect();
        let result = self.writer.write_unsatisfied(&rows);
        self.store_err(result);
    }

    fn on_participants(&mut self, participants: &[Participant]) {
        let rows: Vec<ParticipantRow> = participants.iter().map(ParticipantRow::from).collect();
        let result = self.writer.write_participants(&rows);
        self.store_err(result);
    }
}

impl<W: DiagnosticsWriter> TripDestinationObserver for DiagnosticsObserver<W> {
    fn on_batch(&mut self, trip_num: u32, trips: usize, failed: usize) {
        debug!("trip destination batch {trip_num}: {trips} trips, {failed} failed");
    }

    fn on_failed_trips(&mut self, trips: &[Trip]) {
        let rows: Vec<FailedTripRow> = trips.iter().map(FailedTripRow::from).collect();
        let result = self.writer.write_failed_trips(&rows);
        self.store_err(result);
    }

    fn on_sample(&mut self, table_name: &str, rows: &[DestinationSampleRow]) {
        info!("writing {} rows to {table_name}", rows.len());
        let rows: Vec<SampleRow> = rows.iter().map(SampleRow::from).collect();
        let result = self.writer.write_sample(table_name, &rows);
        self.store_err(result);
    }

    fn on_trips(&mut self, logsum_column: Option<&str>, trips: &[Trip]) {
        let rows: Vec<TripRow> = trips.iter().map(TripRow::from).collect();
        let result = self.writer.write_trips(logsum_column, &rows);
        self.store_err(result);
    }
}
