//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `TdmError` as one
//! `#[from]` variant, so draw-service and id-packing failures propagate with
//! `?` from any call site.

use thiserror::Error;

use crate::TourId;

/// The error type for `tdm-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum TdmError {
    #[error("random channel {0:?} is not registered")]
    ChannelNotRegistered(String),

    #[error("random channel {0:?} is already registered")]
    ChannelExists(String),

    #[error("entity {entity} is not registered in random channel {channel:?}")]
    UnknownEntity { channel: String, entity: u64 },

    #[error("person rank {rank} must be below MAX_PARTICIPANT_RANK ({max})")]
    RankOverflow { rank: u32, max: u64 },

    #[error("participant id for {0} overflows u64")]
    IdOverflow(TourId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `tdm-core`.
pub type TdmResult<T> = Result<T, TdmError>;
