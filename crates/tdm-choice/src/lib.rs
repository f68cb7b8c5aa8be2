//! `tdm-choice`: discrete choice primitives shared by the participation and
//! destination models.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`table`]     | `ModelSpec`, `ChoiceTable` (chooser × alternative values)  |
//! | [`evaluator`] | `UtilityEvaluator` trait, shape-checked `evaluate`         |
//! | [`logit`]     | MNL probabilities and logsums                              |
//! | [`padded`]    | `PaddedMatrix` for ragged choice sets, threshold search    |
//! | [`choose`]    | `Chooser` trait, `LogitChooser`, `simple_simulate`         |
//! | [`sample`]    | sampling with replacement and pick-count collapse          |
//! | [`error`]     | `ChoiceError`, `ChoiceResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Threshold search over padded rows runs on Rayon.         |

pub mod choose;
pub mod error;
pub mod evaluator;
pub mod logit;
pub mod padded;
pub mod sample;
pub mod table;


pub use choose::{make_choices, simple_simulate, Chooser, Choices, LogitChooser};
pub use error::{ChoiceError, ChoiceResult};
pub use evaluator::{evaluate, evaluate_column, UtilityEvaluator};
pub use padded::{threshold_position, PaddedMatrix};
pub use sample::{sample_alternatives, SampledAlt};
pub use table::{ChoiceTable, ModelSpec};
