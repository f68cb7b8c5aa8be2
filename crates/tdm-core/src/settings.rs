//! Model settings consumed by the participation and destination crates.
//!
//! Typically deserialized from the application's YAML/JSON configs (enable
//! the `serde` feature) and passed by reference to the model entry points.
//! Every field has a default so partial config files work.

use crate::{TdmError, TdmResult};

// ── ParticipationSettings ─────────────────────────────────────────────────────

/// Settings for joint tour participation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParticipationSettings {
    /// Name of the alternative column meaning "participates".
    pub participation_choice: String,

    /// Choose → check → rechoose rounds before giving up (or forcing).
    pub max_iterations: u32,

    /// After `max_iterations`, force every candidate with a non-zero
    /// participation probability to participate for one last round.
    pub force_participation: bool,
}

impl Default for ParticipationSettings {
    fn default() -> Self {
        Self {
            participation_choice: "participate".to_owned(),
            max_iterations:       5000,
            force_participation:  false,
        }
    }
}

impl ParticipationSettings {
    pub fn validate(&self) -> TdmResult<()> {
        if self.participation_choice.is_empty() {
            return Err(TdmError::Config("participation_choice must not be empty".into()));
        }
        if self.max_iterations == 0 {
            return Err(TdmError::Config("max_iterations must be at least 1".into()));
        }
        Ok(())
    }
}

// ── ZoneSystem ────────────────────────────────────────────────────────────────

/// Spatial resolution of the land-use data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneSystem {
    /// Single zone layer; destinations are sampled directly.
    #[default]
    OneZone,
    /// Fine zones nested in coarse zones.
    TwoZone,
    /// Two-zone plus transit access points (sampled like `TwoZone`).
    ThreeZone,
}

// ── TripDestinationSettings ───────────────────────────────────────────────────

/// Settings for intermediate trip destination choice.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TripDestinationSettings {
    /// Draws per trip when sampling destination alternatives.
    pub sample_size: usize,

    /// Sample coarse zones first, then a fine zone within each.  Ignored for
    /// `ZoneSystem::OneZone`.
    pub want_presampling: bool,

    pub zone_system: ZoneSystem,

    /// Skip sampling and offer every available zone (sample size 0).
    pub disable_sampling: bool,

    /// Flag the tour mates of failed trips and hand them to the cleanup
    /// collaborator after the run.
    pub cleanup: bool,

    /// Record the chosen alternative's logsum on each trip.  Diagnostics
    /// writers use this name for the logsum column of the trips table.
    pub logsum_column_name: Option<String>,

    /// Keep the destination sample rows under this table name.
    pub sample_table_name: Option<String>,

    /// Drop the first choice of every trip-number batch.  Test-only.
    pub fail_some_trips_for_testing: bool,
}

impl Default for TripDestinationSettings {
    fn default() -> Self {
        Self {
            sample_size:                 30,
            want_presampling:            true,
            zone_system:                 ZoneSystem::OneZone,
            disable_sampling:            false,
            cleanup:                     true,
            logsum_column_name:          None,
            sample_table_name:           None,
            fail_some_trips_for_testing: false,
        }
    }
}

impl TripDestinationSettings {
    /// Whether the two-level coarse/fine sampler runs.
    pub fn presample_enabled(&self) -> bool {
        self.zone_system != ZoneSystem::OneZone && self.want_presampling
    }

    /// Sample size after applying `disable_sampling` (0 means unsampled).
    pub fn effective_sample_size(&self) -> usize {
        if self.disable_sampling { 0 } else { self.sample_size }
    }

    pub fn want_logsums(&self) -> bool {
        self.logsum_column_name.is_some()
    }

    pub fn want_sample_table(&self) -> bool {
        self.sample_table_name.is_some()
    }

    pub fn validate(&self) -> TdmResult<()> {
        if self.sample_size == 0 && !self.disable_sampling {
            return Err(TdmError::Config(
                "sample_size must be positive unless disable_sampling is set".into(),
            ));
        }
        Ok(())
    }
}
