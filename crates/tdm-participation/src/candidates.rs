//! Candidate participants for joint tours.
//!
//! Every member of a household with a joint tour is a candidate for each of
//! that household's joint tours, except that adults are kept out of
//! children-only tours and children out of adults-only tours.

use tdm_core::{EntityKey, HouseholdId, IdSet, ParticipantId, PersonId, TourId};
use tdm_population::{Composition, Population, Tour};

use crate::{ParticipationError, ParticipationResult};

/// One (joint tour, household member) pair eligible to join the tour.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// `tour * MAX_PARTICIPANT_RANK + rank`; also the random stream key.
    pub id:           ParticipantId,
    pub tour:         TourId,
    pub household:    HouseholdId,
    pub person:       PersonId,
    pub composition:  Composition,
    pub is_adult:     bool,
    pub is_preschool: bool,
    /// Stable household rank of the person.
    pub rank:         u32,
}

impl EntityKey for Candidate {
    #[inline]
    fn entity_key(&self) -> u64 {
        self.id.0
    }
}

/// Build the candidate set for `joint_tours`, ordered by (tour, person).
///
/// # Errors
///
/// - [`ParticipationError::NoCandidates`] when a tour has no eligible member.
/// - `TdmError::RankOverflow` (as `Core`) when a rank does not fit the
///   participant id encoding.
/// - [`ParticipationError::DuplicateCandidate`] when two candidates pack to
///   the same id.
pub fn build_candidates<'a>(
    joint_tours: impl IntoIterator<Item = &'a Tour>,
    population:  &Population,
) -> ParticipationResult<Vec<Candidate>> {
    let mut candidates = Vec::new();
    let mut seen = IdSet::default();

    for tour in joint_tours {
        let composition = tour.composition.ok_or(ParticipationError::MissingComposition(tour.id))?;
        let before = candidates.len();

        for person in population.members(tour.household) {
            if !composition.admits(person.is_adult) {
                continue;
            }
            let rank = population.rank_of(person);
            let id = ParticipantId::pack(tour.id, rank)?;
            if !seen.insert(id) {
                return Err(ParticipationError::DuplicateCandidate(id));
            }
            candidates.push(Candidate {
                id,
                tour: tour.id,
                household: tour.household,
                person: person.id,
                composition,
                is_adult: person.is_adult,
                is_preschool: person.is_preschool,
                rank,
            });
        }

        if candidates.len() == before {
            return Err(ParticipationError::NoCandidates(tour.id));
        }
    }

    candidates.sort_by_key(|c| (c.tour, c.person));
    Ok(candidates)
}
