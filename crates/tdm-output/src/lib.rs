//! `tdm-output`: diagnostic table writers for the participation and trip
//! destination models.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                                        |
//! |-----------|---------|----------------------------------------------------------------------|
//! | *(none)*  | CSV     | `participants.csv`, `unsatisfied_candidates.csv`, `failed_trips.csv`, `trips.csv`, `<sample table>.csv` |
//! | `sqlite`  | SQLite  | `diagnostics.db`                                                     |
//!
//! Both backends implement [`DiagnosticsWriter`] and are driven by
//! [`DiagnosticsObserver`], which implements both
//! `tdm_participation::ParticipationObserver` and
//! `tdm_destination::TripDestinationObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tdm_output::{CsvWriter, DiagnosticsObserver};
//!
//! let mut obs = DiagnosticsObserver::new(CsvWriter::new(Path::new("./output"))?);
//! joint_tour_participation(&mut tours, &population, &eval, &spec, &settings, &mut rng, &mut obs)?;
//! run_trip_destination(&mut trips, &tours, &ctx, &models, &trip_settings, &mut rng, &mut obs)?;
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod rows;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::DiagnosticsObserver;
pub use rows::{FailedTripRow, ParticipantRow, SampleRow, TripRow, UnsatisfiedRow};
pub use writer::DiagnosticsWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
