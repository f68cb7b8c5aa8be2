use thiserror::Error;

use tdm_core::TdmError;

#[derive(Debug, Error)]
pub enum ChoiceError {
    #[error(transparent)]
    Core(#[from] TdmError),

    #[error("{what}: expected {expected} values, got {got}")]
    ShapeMismatch { what: &'static str, expected: usize, got: usize },

    #[error("unknown alternative column {0:?}")]
    UnknownColumn(String),

    #[error("non-finite utility {value} at row {row}, column {col}")]
    InvalidUtility { row: usize, col: usize, value: f64 },

    #[error("row {row} selected padding position {position} (only {valid} valid alternatives)")]
    PaddingSelected { row: usize, position: usize, valid: usize },

    #[error("utility evaluator failed: {0}")]
    Evaluator(String),
}

pub type ChoiceResult<T> = Result<T, ChoiceError>;
