//! The `DiagnosticsWriter` trait implemented by all backend writers.

use crate::{FailedTripRow, OutputResult, ParticipantRow, SampleRow, TripRow, UnsatisfiedRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors surface through [`DiagnosticsObserver::take_error`][crate::DiagnosticsObserver::take_error]
/// when the writer is driven by the observer.
pub trait DiagnosticsWriter {
    /// Write the final participants table.  An empty slice still leaves an
    /// (empty) table behind.
    fn write_participants(&mut self, rows: &[ParticipantRow]) -> OutputResult<()>;

    /// Append unresolved candidates of one round past the iteration cap.
    fn write_unsatisfied(&mut self, rows: &[UnsatisfiedRow]) -> OutputResult<()>;

    /// Write the trips that could not be given a destination.
    fn write_failed_trips(&mut self, rows: &[FailedTripRow]) -> OutputResult<()>;

    /// Write the kept destination sample under `table_name`.
    fn write_sample(&mut self, table_name: &str, rows: &[SampleRow]) -> OutputResult<()>;

    /// Write the final trip table.  With `logsum_column` set, each trip's
    /// destination logsum goes to a column of that name.
    fn write_trips(&mut self, logsum_column: Option<&str>, rows: &[TripRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Table and column names become file names and SQL identifiers: ASCII letters, digits,
/// and underscores only.
pub(crate) fn check_table_name(name: &str) -> OutputResult<()> {
    let ok = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok { Ok(()) } else { Err(crate::OutputError::TableName(name.to_owned())) }
}
