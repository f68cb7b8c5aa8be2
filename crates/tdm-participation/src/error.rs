use thiserror::Error;

use tdm_choice::ChoiceError;
use tdm_core::{ParticipantId, TdmError, TourId};

#[derive(Debug, Error)]
pub enum ParticipationError {
    #[error("joint tour {0} has no eligible candidates")]
    NoCandidates(TourId),

    #[error("joint tour {0} has no composition")]
    MissingComposition(TourId),

    #[error("duplicate candidate id {0}")]
    DuplicateCandidate(ParticipantId),

    #[error("participation choice column {0:?} not found in model alternatives")]
    MissingChoiceColumn(String),

    #[error("{tours} joint tours could not be satisfied after {iterations} iterations")]
    Unsatisfied { tours: usize, iterations: u32 },

    #[error("{0} joint tours could not be satisfied even with forced participation")]
    UnsatisfiedAfterForcing(usize),

    #[error(transparent)]
    Choice(#[from] ChoiceError),

    #[error(transparent)]
    Core(#[from] TdmError),
}

pub type ParticipationResult<T> = Result<T, ParticipationError>;
