//! Unit tests for tdm-participation.

use tdm_choice::{ChoiceResult, ChoiceTable, ModelSpec, UtilityEvaluator};
use tdm_core::{
    HouseholdId, ParticipationSettings, PersonId, PurposeId, RandomDrawService, TdmResult, TourId,
    ZoneId,
};
use tdm_population::{Composition, Participant, Person, Population, Tour, TourCategory, TourTable};

use crate::{Candidate, ParticipationObserver, UnsatisfiedCandidate};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn person(id: u64, hh: u64, adult: bool) -> Person {
    Person {
        id:           PersonId(id),
        household:    HouseholdId(hh),
        rank:         None,
        is_adult:     adult,
        is_preschool: false,
    }
}

fn joint_tour(id: u64, hh: u64, composition: Composition) -> Tour {
    Tour {
        id:                     TourId(id),
        household:              HouseholdId(hh),
        person:                 None,
        category:               TourCategory::Joint,
        composition:            Some(composition),
        origin:                 ZoneId(1),
        destination:            ZoneId(2),
        primary_purpose:        PurposeId(0),
        number_of_participants: 1,
    }
}

/// Cycles through scripted uniforms regardless of keys; tracks channels.
struct Scripted {
    values:   Vec<f64>,
    taken:    usize,
    channels: Vec<String>,
}

impl Scripted {
    fn new(values: &[f64]) -> Self {
        Self { values: values.to_vec(), taken: 0, channels: Vec::new() }
    }
}

impl RandomDrawService for Scripted {
    fn add_channel(&mut self, channel: &str, _: &[u64]) -> TdmResult<()> {
        self.channels.push(channel.to_owned());
        Ok(())
    }
    fn drop_channel(&mut self, channel: &str) {
        self.channels.retain(|c| c != channel);
    }
    fn has_channel(&self, channel: &str) -> bool {
        self.channels.iter().any(|c| c == channel)
    }
    fn draw_matrix(&mut self, _: &str, keys: &[u64], n: usize) -> TdmResult<Vec<f64>> {
        let out = (0..keys.len() * n)
            .map(|i| self.values[(self.taken + i) % self.values.len()])
            .collect();
        self.taken += keys.len() * n;
        Ok(out)
    }
}

/// Participate / not-participate utilities computed per candidate.
struct PerCandidate(fn(&Candidate) -> [f64; 2]);

impl UtilityEvaluator<Candidate> for PerCandidate {
    fn utilities(&self, spec: &ModelSpec, choosers: &[Candidate]) -> ChoiceResult<ChoiceTable> {
        let rows: Vec<Vec<f64>> = choosers.iter().map(|c| (self.0)(c).to_vec()).collect();
        ChoiceTable::from_rows(spec.alternatives.clone(), &rows)
    }
}

fn even(_: &Candidate) -> [f64; 2] {
    [0.0, 0.0]
}

fn spec() -> ModelSpec {
    ModelSpec::new("joint_tour_participation", ["participate", "not_participate"])
}

#[derive(Default)]
struct Recorder {
    iterations:   Vec<(u32, usize, usize)>,
    unsatisfied:  Vec<(u32, Vec<UnsatisfiedCandidate>)>,
    participants: Option<Vec<Participant>>,
}

impl ParticipationObserver for Recorder {
    fn on_iteration(&mut self, iteration: u32, satisfied: usize, remaining: usize) {
        self.iterations.push((iteration, satisfied, remaining));
    }
    fn on_unsatisfied(&mut self, iteration: u32, _columns: &[String], rows: &[UnsatisfiedCandidate]) {
        self.unsatisfied.push((iteration, rows.to_vec()));
    }
    fn on_participants(&mut self, participants: &[Participant]) {
        self.participants = Some(participants.to_vec());
    }
}

// ── Satisfaction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod satisfaction {
    use super::*;
    use crate::is_satisfied;

    #[test]
    fn composition_rules() {
        assert!(!is_satisfied(Composition::Adults, 1, 1));
        assert!(is_satisfied(Composition::Adults, 2, 2));
        assert!(!is_satisfied(Composition::Children, 1, 0));
        assert!(is_satisfied(Composition::Children, 3, 0));
        assert!(!is_satisfied(Composition::Mixed, 2, 0));
        assert!(!is_satisfied(Composition::Mixed, 2, 2));
        assert!(is_satisfied(Composition::Mixed, 2, 1));
        assert!(!is_satisfied(Composition::Mixed, 0, 0));
    }
}

// ── Candidates ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod candidates {
    use super::*;
    use crate::{build_candidates, ParticipationError};

    #[test]
    fn composition_filters_members() {
        let pop = Population::new(vec![person(1, 1, true), person(2, 1, false), person(3, 1, false)]).unwrap();
        let tours = [joint_tour(7, 1, Composition::Children), joint_tour(5, 1, Composition::Adults)];
        let cands = build_candidates(&tours, &pop).unwrap();

        let pairs: Vec<_> = cands.iter().map(|c| (c.tour.0, c.person.0)).collect();
        assert_eq!(pairs, vec![(5, 1), (7, 2), (7, 3)]);
        assert_eq!(cands[1].id.0, 702);
        assert_eq!(cands[1].id.rank(), 2);
    }

    #[test]
    fn stored_rank_is_used() {
        let mut p = person(9, 1, true);
        p.rank = Some(4);
        let pop = Population::new(vec![person(1, 1, true), p]).unwrap();
        let cands = build_candidates(&[joint_tour(3, 1, Composition::Adults)], &pop).unwrap();
        assert_eq!(cands[1].id.0, 304);
    }

    #[test]
    fn tour_without_candidates_is_fatal() {
        let pop = Population::new(vec![person(1, 1, false), person(2, 1, false)]).unwrap();
        let err = build_candidates(&[joint_tour(3, 1, Composition::Adults)], &pop).unwrap_err();
        assert!(matches!(err, ParticipationError::NoCandidates(TourId(3))));
    }

    #[test]
    fn rank_overflow_is_fatal() {
        let mut p = person(1, 1, true);
        p.rank = Some(100);
        let pop = Population::new(vec![p, person(2, 1, true)]).unwrap();
        let err = build_candidates(&[joint_tour(3, 1, Composition::Adults)], &pop).unwrap_err();
        assert!(matches!(err, ParticipationError::Core(_)));
    }

    #[test]
    fn duplicate_ids_are_fatal() {
        let mut a = person(1, 1, true);
        let mut b = person(2, 1, true);
        a.rank = Some(1);
        b.rank = Some(1);
        let pop = Population::new(vec![a, b]).unwrap();
        let err = build_candidates(&[joint_tour(3, 1, Composition::Adults)], &pop).unwrap_err();
        assert!(matches!(err, ParticipationError::DuplicateCandidate(_)));
    }
}

// ── Model runs ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod model {
    use tdm_core::RandomStreams;

    use super::*;
    use crate::{joint_tour_participation, ParticipationError, PARTICIPATION_CHANNEL};

    fn two_households() -> (TourTable, Population) {
        let tours = TourTable::new(vec![
            joint_tour(10, 1, Composition::Mixed),
            joint_tour(20, 2, Composition::Adults),
        ])
        .unwrap();
        let pop = Population::new(vec![
            person(1, 1, true),
            person(2, 1, false),
            person(3, 1, false),
            person(4, 2, true),
            person(5, 2, true),
        ])
        .unwrap();
        (tours, pop)
    }

    fn one_mixed_pair() -> (TourTable, Population) {
        let tours = TourTable::new(vec![joint_tour(10, 1, Composition::Mixed)]).unwrap();
        let pop = Population::new(vec![person(1, 1, true), person(2, 1, false)]).unwrap();
        (tours, pop)
    }

    #[test]
    fn mixed_tour_is_redrawn_until_satisfied() {
        let (mut tours, pop) = two_households();
        // Round 1: tour 10 gets two children only, tour 20 both adults.
        // Round 2: tour 10 gets everyone.
        let mut draws = Scripted::new(&[0.9, 0.1, 0.2, 0.1, 0.3, 0.1, 0.1, 0.1]);
        let mut rec = Recorder::default();
        let out = joint_tour_participation(
            &mut tours,
            &pop,
            &PerCandidate(even),
            &spec(),
            &ParticipationSettings::default(),
            &mut draws,
            &mut rec,
        )
        .unwrap();

        assert_eq!(out.iterations, 2);
        assert_eq!(draws.taken, 8);
        assert_eq!(rec.iterations, vec![(1, 1, 1), (2, 1, 0)]);
        assert!(rec.unsatisfied.is_empty());

        let rows: Vec<_> = out
            .participants
            .iter()
            .map(|p| (p.tour.0, p.person.0, p.participant_num))
            .collect();
        assert_eq!(rows, vec![(10, 1, 1), (10, 2, 2), (10, 3, 3), (20, 4, 1), (20, 5, 2)]);
        assert_eq!(out.participants[0].id.0, 1001);

        let t10 = tours.get(TourId(10)).unwrap();
        assert_eq!((t10.person, t10.number_of_participants), (Some(PersonId(1)), 3));
        let t20 = tours.get(TourId(20)).unwrap();
        assert_eq!((t20.person, t20.number_of_participants), (Some(PersonId(4)), 2));

        assert_eq!(rec.participants.as_deref(), Some(out.participants.as_slice()));
        assert!(!draws.has_channel(PARTICIPATION_CHANNEL));
    }

    #[test]
    fn no_joint_tours_short_circuits() {
        let mut solo = joint_tour(1, 1, Composition::Adults);
        solo.category = TourCategory::NonMandatory;
        let mut tours = TourTable::new(vec![solo.clone()]).unwrap();
        let pop = Population::new(vec![person(1, 1, true)]).unwrap();
        let mut streams = RandomStreams::new(3);
        let mut rec = Recorder::default();

        let out = joint_tour_participation(
            &mut tours,
            &pop,
            &PerCandidate(even),
            &spec(),
            &ParticipationSettings::default(),
            &mut streams,
            &mut rec,
        )
        .unwrap();

        assert!(out.participants.is_empty());
        assert_eq!(out.iterations, 0);
        assert_eq!(streams.channel_len(PARTICIPATION_CHANNEL), 0);
        assert_eq!(rec.participants, Some(vec![]));
        assert_eq!(tours.get(TourId(1)), Some(&solo));
    }

    #[test]
    fn one_forced_round_after_cap() {
        let (mut tours, pop) = one_mixed_pair();
        let settings = ParticipationSettings { max_iterations: 1, force_participation: true, ..Default::default() };
        let mut draws = Scripted::new(&[0.9, 0.9, 0.5, 0.5]);
        let mut rec = Recorder::default();

        let out = joint_tour_participation(
            &mut tours, &pop, &PerCandidate(even), &spec(), &settings, &mut draws, &mut rec,
        )
        .unwrap();

        assert_eq!(out.iterations, 2);
        assert_eq!(out.participants.len(), 2);
        assert_eq!(rec.unsatisfied.len(), 1);
        let (iter, rows) = &rec.unsatisfied[0];
        assert_eq!(*iter, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].probs, vec![0.5, 0.5]);
    }

    #[test]
    fn cap_without_forcing_is_fatal() {
        let (mut tours, pop) = one_mixed_pair();
        let settings = ParticipationSettings { max_iterations: 1, ..Default::default() };
        let mut draws = Scripted::new(&[0.9]);

        let err = joint_tour_participation(
            &mut tours, &pop, &PerCandidate(even), &spec(), &settings, &mut draws, &mut Recorder::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ParticipationError::Unsatisfied { tours: 1, iterations: 2 }));
        assert!(!draws.has_channel(PARTICIPATION_CHANNEL));
        assert_eq!(tours.get(TourId(10)).unwrap().person, None);
    }

    #[test]
    fn forcing_allows_exactly_one_extra_round() {
        fn child_never_joins(c: &Candidate) -> [f64; 2] {
            if c.is_adult { [0.0, 0.0] } else { [f64::NEG_INFINITY, 0.0] }
        }
        let (mut tours, pop) = one_mixed_pair();
        let settings = ParticipationSettings { max_iterations: 1, force_participation: true, ..Default::default() };
        let mut draws = Scripted::new(&[0.1]);
        let mut rec = Recorder::default();

        let err = joint_tour_participation(
            &mut tours, &pop, &PerCandidate(child_never_joins), &spec(), &settings, &mut draws, &mut rec,
        )
        .unwrap_err();

        assert!(matches!(err, ParticipationError::UnsatisfiedAfterForcing(1)));
        // Rounds 1 and 2 drew; round 3 failed before drawing.
        assert_eq!(draws.taken, 4);
        assert_eq!(rec.unsatisfied.len(), 2);
    }

    #[test]
    fn missing_choice_column() {
        let (mut tours, pop) = one_mixed_pair();
        let spec = ModelSpec::new("joint_tour_participation", ["yes", "no"]);
        let err = joint_tour_participation(
            &mut tours,
            &pop,
            &PerCandidate(even),
            &spec,
            &ParticipationSettings::default(),
            &mut Scripted::new(&[0.1]),
            &mut Recorder::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ParticipationError::MissingChoiceColumn(ref c) if c == "participate"));
    }

    #[test]
    fn same_seed_same_participants() {
        let run = || {
            let (mut tours, pop) = two_households();
            let mut streams = RandomStreams::new(42);
            joint_tour_participation(
                &mut tours,
                &pop,
                &PerCandidate(even),
                &spec(),
                &ParticipationSettings::default(),
                &mut streams,
                &mut Recorder::default(),
            )
            .unwrap()
            .participants
        };
        let first = run();
        assert_eq!(first, run());
        for group in first.chunk_by(|a, b| a.tour == b.tour) {
            let nums: Vec<u32> = group.iter().map(|p| p.participant_num).collect();
            assert_eq!(nums, (1..=group.len() as u32).collect::<Vec<_>>());
        }
    }
}
