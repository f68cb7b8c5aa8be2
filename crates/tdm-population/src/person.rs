//! Persons and household rosters.

use std::ops::Range;

use tdm_core::{HouseholdId, IdMap, PersonId};

use crate::{PopulationError, PopulationResult};

/// One household member, with the attributes the participation model reads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    pub id:           PersonId,
    pub household:    HouseholdId,
    /// Stable 1-based rank within the household (PNUM).  `None` when the
    /// synthetic population carries no ranks; one is assigned on demand.
    pub rank:         Option<u32>,
    pub is_adult:     bool,
    pub is_preschool: bool,
}

/// All persons, grouped by household.
///
/// Rows are stored sorted by `(household, person id)` so each household's
/// roster is one contiguous slice.
#[derive(Clone, Debug, Default)]
pub struct Population {
    persons:    Vec<Person>,
    households: IdMap<HouseholdId, Range<usize>>,
}

impl Population {
    /// Build from an unsorted person list.  Person ids must be unique.
    pub fn new(mut persons: Vec<Person>) -> PopulationResult<Self> {
        persons.sort_by_key(|p| (p.household, p.id));

        let mut seen = IdMap::default();
        for p in &persons {
            if seen.insert(p.id, ()).is_some() {
                return Err(PopulationError::DuplicateId { what: "person", id: p.id.0 });
            }
        }

        let mut households: IdMap<HouseholdId, Range<usize>> = IdMap::default();
        let mut start = 0;
        for i in 1..=persons.len() {
            if i == persons.len() || persons[i].household != persons[start].household {
                households.insert(persons[start].household, start..i);
                start = i;
            }
        }

        Ok(Self { persons, households })
    }

    /// The roster of `household`, in ascending person id order.  Empty if
    /// the household has no persons.
    pub fn members(&self, household: HouseholdId) -> &[Person] {
        match self.households.get(&household) {
            Some(range) => &self.persons[range.clone()],
            None => &[],
        }
    }

    /// 1-based rank of `person` within its household: the stored rank if
    /// present, else its position in the roster.
    pub fn rank_of(&self, person: &Person) -> u32 {
        person.rank.unwrap_or_else(|| {
            self.members(person.household)
                .iter()
                .position(|m| m.id == person.id)
                .map_or(0, |i| i as u32 + 1)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter()
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn household_count(&self) -> usize {
        self.households.len()
    }
}
