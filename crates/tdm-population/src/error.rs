use thiserror::Error;

#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("table parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("duplicate {what} id {id}")]
    DuplicateId { what: &'static str, id: u64 },

    #[error("unknown trip purpose {0:?}")]
    UnknownPurpose(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PopulationResult<T> = Result<T, PopulationError>;
