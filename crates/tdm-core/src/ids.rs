//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Entity ids (households, persons,
//! tours, trips) are the caller's persistent table keys; they are not dense
//! indices.  Zone and purpose ids are dense and index size-term columns and
//! hierarchy arrays via `.index()`.

use std::fmt;

use crate::{TdmError, TdmResult};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID": the inner type's `MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl EntityKey for $name {
            #[inline(always)]
            fn entity_key(&self) -> u64 {
                self.0 as u64
            }
        }
    };
}

/// Anything that owns a random stream: the key its draws are addressed by.
///
/// Implemented by every id type and by chooser rows (candidates keyed by
/// participant id, sampled trips keyed by trip id).
pub trait EntityKey {
    fn entity_key(&self) -> u64;
}

typed_id! {
    /// Household table key.
    pub struct HouseholdId(u64);
}

typed_id! {
    /// Person table key.
    pub struct PersonId(u64);
}

typed_id! {
    /// Tour table key.
    pub struct TourId(u64);
}

typed_id! {
    /// Trip table key.  Trips of one half-tour have consecutive ids in
    /// `trip_num` order.
    pub struct TripId(u64);
}

typed_id! {
    /// Zone id, fine (MAZ) or coarse (TAZ) depending on the layer.
    pub struct ZoneId(u32);
}

typed_id! {
    /// Index of a trip purpose column in the size-term matrix.
    pub struct PurposeId(u16);
}

typed_id! {
    /// Packed `(tour, rank)` key of a joint-tour participation candidate.
    ///
    /// `id = tour_id * MAX_PARTICIPANT_RANK + rank`.  Build with
    /// [`ParticipantId::pack`], which enforces `rank < MAX_PARTICIPANT_RANK`
    /// so ids stay unique across a household.
    pub struct ParticipantId(u64);
}

/// Destination assigned to trips whose choice failed.  Distinct from every
/// real zone id.
pub const NO_DESTINATION: ZoneId = ZoneId::INVALID;

/// Upper bound (exclusive) of a person's rank within a household.
pub const MAX_PARTICIPANT_RANK: u64 = 100;

impl ParticipantId {
    /// Pack a tour id and a person's household rank.
    ///
    /// Fails if `rank >= MAX_PARTICIPANT_RANK` (ids would collide with the
    /// next tour's) or if the packed value overflows `u64`.
    pub fn pack(tour: TourId, rank: u32) -> TdmResult<ParticipantId> {
        if rank as u64 >= MAX_PARTICIPANT_RANK {
            return Err(TdmError::RankOverflow { rank, max: MAX_PARTICIPANT_RANK });
        }
        tour.0
            .checked_mul(MAX_PARTICIPANT_RANK)
            .and_then(|base| base.checked_add(rank as u64))
            .map(ParticipantId)
            .ok_or(TdmError::IdOverflow(tour))
    }

    #[inline]
    pub fn tour(self) -> TourId {
        TourId(self.0 / MAX_PARTICIPANT_RANK)
    }

    #[inline]
    pub fn rank(self) -> u32 {
        (self.0 % MAX_PARTICIPANT_RANK) as u32
    }
}

impl ZoneId {
    /// Zone id as written to output tables: the sentinel becomes `-1`.
    #[inline]
    pub fn as_signed(self) -> i64 {
        if self.is_valid() { self.0 as i64 } else { -1 }
    }
}
