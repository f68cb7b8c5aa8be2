//! `tdm-population`: the long-lived tables the choice models read and mutate.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`person`]       | `Person`, `Population` (household rosters)                |
//! | [`tour`]         | `Tour`, `TourCategory`, `Composition`, `TourTable`        |
//! | [`trip`]         | `Trip`, `TripTable`                                       |
//! | [`participant`]  | `Participant`, `PARTICIPANT_COLUMNS`                      |
//! | [`purpose`]      | `Purposes` name ↔ `PurposeId` registry                    |
//! | [`loader`]       | `load_persons_reader`, `load_tours_reader`, `load_trips_reader` |
//! | [`error`]        | `PopulationError`, `PopulationResult<T>`                  |
//!
//! # Ownership
//!
//! The tables are owned by the caller.  The participation model overwrites
//! `Tour::person` and `Tour::number_of_participants` of joint tours; the trip
//! destination model overwrites `Trip::{origin, destination, failed, logsum}`
//! of intermediate trips.  Nothing else is written.

pub mod error;
pub mod loader;
pub mod participant;
pub mod person;
pub mod purpose;
pub mod tour;
pub mod trip;

#[cfg(test)]
mod tests;

pub use error::{PopulationError, PopulationResult};
pub use loader::{load_persons_reader, load_tours_reader, load_trips_reader};
pub use participant::{Participant, PARTICIPANT_COLUMNS};
pub use person::{Person, Population};
pub use purpose::Purposes;
pub use tour::{Composition, Tour, TourCategory, TourTable};
pub use trip::{Trip, TripTable};
