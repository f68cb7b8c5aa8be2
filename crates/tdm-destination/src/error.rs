use thiserror::Error;

use tdm_choice::ChoiceError;
use tdm_core::{PurposeId, TdmError, TourId, TripId, ZoneId};
use tdm_population::PopulationError;

#[derive(Debug, Error)]
pub enum DestinationError {
    #[error("trip {trip} references unknown tour {tour}")]
    UnknownTour { trip: TripId, tour: TourId },

    #[error("zone {zone} is outside the {layer} layer ({len} zones)")]
    ZoneOutOfRange { zone: ZoneId, layer: &'static str, len: usize },

    #[error("invalid size term {value} for zone {zone}, purpose {purpose}")]
    InvalidSizeTerm { zone: ZoneId, purpose: PurposeId, value: f64 },

    #[error("{what}: expected {expected}, got {got}")]
    ShapeMismatch { what: &'static str, expected: usize, got: usize },

    #[error("presampling requires a zone hierarchy")]
    MissingHierarchy,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Choice(#[from] ChoiceError),

    #[error(transparent)]
    Population(#[from] PopulationError),

    #[error(transparent)]
    Core(#[from] TdmError),
}

pub type DestinationResult<T> = Result<T, DestinationError>;
