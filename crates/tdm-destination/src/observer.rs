//! Observer hooks for the trip destination model.

use tdm_population::Trip;

use crate::DestinationSampleRow;

/// Callbacks invoked by
/// [`run_trip_destination`][crate::run_trip_destination].
///
/// All methods have no-op defaults.
pub trait TripDestinationObserver {
    /// After each trip-number batch.
    fn on_batch(&mut self, _trip_num: u32, _trips: usize, _failed: usize) {}

    /// Once after the last batch, with every failed trip (before cleanup).
    fn on_failed_trips(&mut self, _trips: &[Trip]) {}

    /// Once with the kept destination sample when a sample table is
    /// configured.
    fn on_sample(&mut self, _table_name: &str, _rows: &[DestinationSampleRow]) {}

    /// Once at the end of a run with the final trip table (after cleanup).
    /// `logsum_column` names the destination logsum when logsums were kept.
    fn on_trips(&mut self, _logsum_column: Option<&str>, _trips: &[Trip]) {}
}

/// A [`TripDestinationObserver`] that does nothing.
pub struct NoopObserver;

impl TripDestinationObserver for NoopObserver {}
