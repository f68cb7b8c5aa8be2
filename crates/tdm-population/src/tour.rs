//! Tours and joint-tour composition.

use std::fmt;
use std::str::FromStr;

use tdm_core::{HouseholdId, IdMap, PersonId, PurposeId, TourId, ZoneId};

use crate::{PopulationError, PopulationResult};

// ── Enums ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TourCategory {
    Mandatory,
    NonMandatory,
    AtWork,
    Joint,
}

/// Required adult/child mix of a joint tour's participants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Composition {
    Adults,
    Children,
    Mixed,
}

impl Composition {
    /// Whether a person may be a candidate for a tour of this composition.
    /// Adults can't join children-only tours and vice versa.
    #[inline]
    pub fn admits(self, is_adult: bool) -> bool {
        match self {
            Composition::Adults   => is_adult,
            Composition::Children => !is_adult,
            Composition::Mixed    => true,
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Composition::Adults   => "adults",
            Composition::Children => "children",
            Composition::Mixed    => "mixed",
        };
        f.write_str(s)
    }
}

impl FromStr for Composition {
    type Err = PopulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "adults"   => Ok(Composition::Adults),
            "children" => Ok(Composition::Children),
            "mixed"    => Ok(Composition::Mixed),
            other => Err(PopulationError::Parse(format!(
                "invalid composition {other:?}: expected \"adults\", \"children\", or \"mixed\""
            ))),
        }
    }
}

impl FromStr for TourCategory {
    type Err = PopulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mandatory"     => Ok(TourCategory::Mandatory),
            "non_mandatory" => Ok(TourCategory::NonMandatory),
            "atwork"        => Ok(TourCategory::AtWork),
            "joint"         => Ok(TourCategory::Joint),
            other => Err(PopulationError::Parse(format!("invalid tour category {other:?}"))),
        }
    }
}

// ── Tour ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    pub id:                     TourId,
    pub household:              HouseholdId,
    /// Tour owner; for joint tours the point person, unset until
    /// participation is resolved.
    pub person:                 Option<PersonId>,
    pub category:               TourCategory,
    /// Set for joint tours only.
    pub composition:            Option<Composition>,
    pub origin:                 ZoneId,
    /// Primary destination.
    pub destination:            ZoneId,
    pub primary_purpose:        PurposeId,
    /// Initialised to 1; overwritten by joint tour participation.
    pub number_of_participants: u32,
}

impl Tour {
    #[inline]
    pub fn is_joint(&self) -> bool {
        self.category == TourCategory::Joint
    }

    /// Destination of a half-tour: the primary destination going out, home
    /// (the tour origin) coming back.
    #[inline]
    pub fn leg_destination(&self, outbound: bool) -> ZoneId {
        if outbound { self.destination } else { self.origin }
    }

    /// Origin of a half-tour.
    #[inline]
    pub fn leg_origin(&self, outbound: bool) -> ZoneId {
        if outbound { self.origin } else { self.destination }
    }
}

// ── TourTable ─────────────────────────────────────────────────────────────────

/// Tours in ascending id order with O(1) lookup by id.
#[derive(Clone, Debug, Default)]
pub struct TourTable {
    tours: Vec<Tour>,
    index: IdMap<TourId, usize>,
}

impl TourTable {
    pub fn new(mut tours: Vec<Tour>) -> PopulationResult<Self> {
        tours.sort_by_key(|t| t.id);
        let mut index = IdMap::default();
        for (i, t) in tours.iter().enumerate() {
            if index.insert(t.id, i).is_some() {
                return Err(PopulationError::DuplicateId { what: "tour", id: t.id.0 });
            }
        }
        Ok(Self { tours, index })
    }

    pub fn get(&self, id: TourId) -> Option<&Tour> {
        self.index.get(&id).map(|&i| &self.tours[i])
    }

    pub fn get_mut(&mut self, id: TourId) -> Option<&mut Tour> {
        self.index.get(&id).map(|&i| &mut self.tours[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tour> {
        self.tours.iter()
    }

    /// Joint tours, ascending id.
    pub fn joint(&self) -> impl Iterator<Item = &Tour> {
        self.tours.iter().filter(|t| t.is_joint())
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }
}
