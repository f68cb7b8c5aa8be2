//! Entry point for joint tour participation.

use log::info;

use tdm_choice::{simple_simulate, ModelSpec, UtilityEvaluator};
use tdm_core::{ParticipationSettings, RandomDrawService};
use tdm_population::{Participant, Population, TourTable};

use crate::{
    apply_to_tours, build_candidates, rank_participants, tour_satisfaction, Candidate,
    ParticipantsChooser, ParticipationError, ParticipationObserver, ParticipationResult,
    PARTICIPATION_CHANNEL,
};

/// Result of a participation run.
#[derive(Clone, Debug, Default)]
pub struct ParticipationOutcome {
    /// Ordered by (tour, participant_num).
    pub participants: Vec<Participant>,
    /// Choose/check rounds used; 0 when there were no joint tours.
    pub iterations:   u32,
}

/// Resolve who takes part in every joint tour of `tours`.
///
/// On success each joint tour's `person` is its point person (lowest person
/// id among participants) and `number_of_participants` its participant
/// count.  Without joint tours nothing is drawn and the participants table is
/// empty.
///
/// `spec.alternatives` must contain `settings.participation_choice`.
pub fn joint_tour_participation(
    tours:      &mut TourTable,
    population: &Population,
    evaluator:  &dyn UtilityEvaluator<Candidate>,
    spec:       &ModelSpec,
    settings:   &ParticipationSettings,
    draws:      &mut dyn RandomDrawService,
    observer:   &mut dyn ParticipationObserver,
) -> ParticipationResult<ParticipationOutcome> {
    settings.validate()?;

    if tours.joint().next().is_none() {
        info!("skipping joint tour participation: no joint tours");
        observer.on_participants(&[]);
        return Ok(ParticipationOutcome::default());
    }

    let choice_col = spec
        .alternative_index(&settings.participation_choice)
        .ok_or_else(|| ParticipationError::MissingChoiceColumn(settings.participation_choice.clone()))?;

    let candidates = build_candidates(tours.joint(), population)?;
    info!("joint tour participation: {} candidates", candidates.len());

    let keys: Vec<u64> = candidates.iter().map(|c| c.id.0).collect();
    draws.add_channel(PARTICIPATION_CHANNEL, &keys)?;

    let mut chooser = ParticipantsChooser::new(settings, observer);
    let result = simple_simulate(evaluator, spec, &candidates, &mut chooser, draws);
    let iterations = chooser.iterations();
    draws.drop_channel(PARTICIPATION_CHANNEL);
    let choices = result?;

    let participate: Vec<bool> = choices.choice.iter().map(|&c| c == Some(choice_col)).collect();
    let unsatisfied = tour_satisfaction(&candidates, &participate)
        .values()
        .filter(|&&s| !s)
        .count();
    if unsatisfied > 0 {
        return Err(ParticipationError::Unsatisfied { tours: unsatisfied, iterations });
    }

    let participants = rank_participants(&candidates, &choices, choice_col);
    apply_to_tours(tours, &participants);
    observer.on_participants(&participants);

    Ok(ParticipationOutcome { participants, iterations })
}
