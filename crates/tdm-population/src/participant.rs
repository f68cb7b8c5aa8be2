use tdm_core::{HouseholdId, ParticipantId, PersonId, TourId};

/// Column set of the participants table, also emitted when a run has no
/// joint tours at all.
pub const PARTICIPANT_COLUMNS: [&str; 5] =
    ["participant_id", "tour_id", "household_id", "person_id", "participant_num"];

/// A person resolved to take part in a joint tour.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub id:              ParticipantId,
    pub tour:            TourId,
    pub household:       HouseholdId,
    pub person:          PersonId,
    /// 1-based, by ascending person id within the tour.  Participant 1 is
    /// the tour's point person.
    pub participant_num: u32,
}
