//! `tdm-participation`: who takes part in each joint tour.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | [`candidates`]    | `Candidate`, `build_candidates`                           |
//! | [`satisfaction`]  | composition rules, `tour_satisfaction`                    |
//! | [`resolver`]      | `ParticipantsChooser` (choose → check → rechoose)         |
//! | [`participants`]  | `rank_participants`, `apply_to_tours`                     |
//! | [`model`]         | `joint_tour_participation` entry point                    |
//! | [`observer`]      | `ParticipationObserver`, `NoopObserver`                   |
//! | [`error`]         | `ParticipationError`, `ParticipationResult<T>`            |
//!
//! # Run sequence
//!
//! ```text
//! joint tours ─► build_candidates ─► simple_simulate(ParticipantsChooser)
//!             ─► rank_participants ─► apply_to_tours (point person, count)
//! ```

pub mod candidates;
pub mod error;
pub mod model;
pub mod observer;
pub mod participants;
pub mod resolver;
pub mod satisfaction;

#[cfg(test)]
mod tests;

pub use candidates::{build_candidates, Candidate};
pub use error::{ParticipationError, ParticipationResult};
pub use model::{joint_tour_participation, ParticipationOutcome};
pub use observer::{NoopObserver, ParticipationObserver, UnsatisfiedCandidate};
pub use participants::{apply_to_tours, rank_participants};
pub use resolver::{ParticipantsChooser, PARTICIPATION_CHANNEL};
pub use satisfaction::{is_satisfied, tour_satisfaction};
