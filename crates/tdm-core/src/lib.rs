//! `tdm-core`: foundational types for the `tdm` travel-demand choice crates.
//!
//! This crate is a dependency of every other `tdm-*` crate.  It has no `tdm-*`
//! dependencies and few external ones (`rand`, `thiserror`, `xxhash-rust`,
//! plus optional `serde` and `rustc-hash`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`ids`]      | `HouseholdId`, `PersonId`, `TourId`, `TripId`, `ZoneId`, `PurposeId`, `ParticipantId` |
//! | [`rng`]      | `EntityRng`, `RandomDrawService`, `RandomStreams`             |
//! | [`settings`] | `ParticipationSettings`, `TripDestinationSettings`, `ZoneSystem` |
//! | [`map`]      | `IdMap` / `IdSet` aliases                                     |
//! | [`error`]    | `TdmError`, `TdmResult`                                       |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `serde`   | Adds `Serialize`/`Deserialize` to ids and settings.        |
//! | `fx-hash` | `IdMap`/`IdSet` use `rustc-hash` instead of SipHash.       |

pub mod error;
pub mod ids;
pub mod map;
pub mod rng;
pub mod settings;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{TdmError, TdmResult};
pub use ids::{
    EntityKey, HouseholdId, ParticipantId, PersonId, PurposeId, TourId, TripId, ZoneId,
    MAX_PARTICIPANT_RANK, NO_DESTINATION,
};
pub use map::{IdMap, IdSet};
pub use rng::{EntityRng, RandomDrawService, RandomStreams};
pub use settings::{ParticipationSettings, TripDestinationSettings, ZoneSystem};
