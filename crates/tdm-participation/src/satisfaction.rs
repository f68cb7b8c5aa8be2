//! Composition rules for a joint tour's participant set.

use std::collections::BTreeMap;

use tdm_core::TourId;
use tdm_population::Composition;

use crate::Candidate;

/// Whether `participants` (of which `adults` are adults) satisfy `composition`.
///
/// - adults / children: at least two participants.
/// - mixed: at least one adult and at least one child.
#[inline]
pub fn is_satisfied(composition: Composition, participants: u32, adults: u32) -> bool {
    match composition {
        Composition::Adults | Composition::Children => participants > 1,
        Composition::Mixed => adults > 0 && participants > adults,
    }
}

/// Satisfaction of every tour present in `candidates`, given one
/// participate flag per candidate.  Tours nobody joined are unsatisfied.
pub fn tour_satisfaction<'a>(
    candidates:  impl IntoIterator<Item = &'a Candidate>,
    participate: &[bool],
) -> BTreeMap<TourId, bool> {
    let mut tally: BTreeMap<TourId, (Composition, u32, u32)> = BTreeMap::new();
    for (c, &joins) in candidates.into_iter().zip(participate) {
        let entry = tally.entry(c.tour).or_insert((c.composition, 0, 0));
        if joins {
            entry.1 += 1;
            entry.2 += u32::from(c.is_adult);
        }
    }
    tally
        .into_iter()
        .map(|(tour, (composition, participants, adults))| {
            (tour, is_satisfied(composition, participants, adults))
        })
        .collect()
}
