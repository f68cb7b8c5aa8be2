//! `tdm-destination`: destinations of intermediate trips, chosen one
//! trip-number batch at a time.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`zones`]     | `ZoneHierarchy`, `SizeTermMatrix`, `DestinationContext`       |
//! | [`chooser`]   | `TripChooser` (trip + half-tour destination)                  |
//! | [`sample`]    | single-level `destination_sample`                             |
//! | [`presample`] | coarse → fine presampling, `trip_destination_sample`          |
//! | [`logsums`]   | origin → alternative and alternative → primary logsums        |
//! | [`simulate`]  | final choice among sampled alternatives                       |
//! | [`assigner`]  | batch loop, `run_trip_destination`, origin chaining           |
//! | [`cleanup`]   | tour-mate flagging, `FailedTripCleanup`, `DropFailedTrips`    |
//! | [`observer`]  | `TripDestinationObserver`, `NoopObserver`                     |
//! | [`error`]     | `DestinationError`, `DestinationResult<T>`                    |
//!
//! # Per-segment pipeline
//!
//! ```text
//! TripChooser ─► sample (or presample) ─► logsums ─► simulate ─► DestinationChoice
//! ```
//!
//! All draws come from the `"trips"` channel, keyed by trip id.  The channel
//! is registered for the duration of one run.

pub mod assigner;
pub mod chooser;
pub mod cleanup;
pub mod error;
pub mod logsums;
pub mod observer;
pub mod presample;
pub mod sample;
pub mod simulate;
pub mod zones;


pub use assigner::{
    choose_trip_destination, run_trip_destination, run_trip_destination_with_cleanup,
    TripDestinationModels, TripDestinationOutcome, TRIP_CHANNEL,
};
pub use chooser::TripChooser;
pub use cleanup::{flag_failed_tour_mates, DropFailedTrips, FailedTripCleanup};
pub use error::{DestinationError, DestinationResult};
pub use logsums::{compute_logsums, LegDirection, LogsumLeg};
pub use observer::{NoopObserver, TripDestinationObserver};
pub use presample::{choose_fine_for_coarse, destination_presample, trip_destination_sample};
pub use sample::{destination_sample, DestinationAlternative, DestinationSampleRow, ZoneLayer};
pub use simulate::{trip_destination_simulate, DestinationChoice, SampledDestination};
pub use zones::{DestinationContext, SizeTermMatrix, ZoneHierarchy};
