//! Participants table and the tour fields derived from it.

use tdm_choice::Choices;
use tdm_population::{Participant, TourTable};

use crate::Candidate;

/// Candidates that chose `choice_col`, numbered 1.. per tour by ascending
/// person id.
pub fn rank_participants(candidates: &[Candidate], choices: &Choices, choice_col: usize) -> Vec<Participant> {
    let mut joined: Vec<&Candidate> = candidates
        .iter()
        .zip(&choices.choice)
        .filter(|(_, choice)| **choice == Some(choice_col))
        .map(|(c, _)| c)
        .collect();
    joined.sort_by_key(|c| (c.tour, c.person));

    let mut participants = Vec::with_capacity(joined.len());
    let mut num = 0;
    for (i, c) in joined.iter().enumerate() {
        num = if i > 0 && joined[i - 1].tour == c.tour { num + 1 } else { 1 };
        participants.push(Participant {
            id:              c.id,
            tour:            c.tour,
            household:       c.household,
            person:          c.person,
            participant_num: num,
        });
    }
    participants
}

/// Set each joint tour's point person (participant 1) and participant count.
///
/// `participants` must be ordered by (tour, participant_num), as returned by
/// [`rank_participants`].
pub fn apply_to_tours(tours: &mut TourTable, participants: &[Participant]) {
    for group in participants.chunk_by(|a, b| a.tour == b.tour) {
        let Some(tour) = tours.get_mut(group[0].tour) else { continue };
        tour.person                 = Some(group[0].person);
        tour.number_of_participants = group.len() as u32;
    }
}
