//! Unit tests for tdm-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ParticipantId, PersonId, TdmError, TourId, ZoneId, MAX_PARTICIPANT_RANK, NO_DESTINATION};

    #[test]
    fn index_and_ordering() {
        assert_eq!(ZoneId(42).index(), 42);
        assert!(PersonId(0) < PersonId(1));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(ZoneId::INVALID.0, u32::MAX);
        assert_eq!(TourId::INVALID.0, u64::MAX);
        assert!(!NO_DESTINATION.is_valid());
        assert_eq!(NO_DESTINATION.as_signed(), -1);
        assert_eq!(ZoneId(7).as_signed(), 7);
    }

    #[test]
    fn display() {
        assert_eq!(TourId(7).to_string(), "TourId(7)");
    }

    #[test]
    fn participant_id_packs_tour_and_rank() {
        let id = ParticipantId::pack(TourId(1234), 3).unwrap();
        assert_eq!(id.0, 1234 * MAX_PARTICIPANT_RANK + 3);
        assert_eq!(id.tour(), TourId(1234));
        assert_eq!(id.rank(), 3);
    }

    #[test]
    fn participant_id_rejects_rank_overflow() {
        let err = ParticipantId::pack(TourId(1), MAX_PARTICIPANT_RANK as u32).unwrap_err();
        assert!(matches!(err, TdmError::RankOverflow { rank: 100, .. }));
        assert!(ParticipantId::pack(TourId(1), 99).is_ok());
    }

    #[test]
    fn participant_id_rejects_u64_overflow() {
        let err = ParticipantId::pack(TourId(u64::MAX / 10), 1).unwrap_err();
        assert!(matches!(err, TdmError::IdOverflow(_)));
    }
}

#[cfg(test)]
mod rng {
    use crate::{RandomDrawService, RandomStreams, TdmError};

    #[test]
    fn deterministic_same_seed() {
        let mut a = RandomStreams::new(12345);
        let mut b = RandomStreams::new(12345);
        a.add_channel("trips", &[1, 2, 3]).unwrap();
        b.add_channel("trips", &[1, 2, 3]).unwrap();
        for _ in 0..10 {
            assert_eq!(a.draw("trips", &[1, 2, 3]).unwrap(), b.draw("trips", &[1, 2, 3]).unwrap());
        }
    }

    #[test]
    fn draws_independent_of_batch_composition() {
        let mut a = RandomStreams::new(7);
        let mut b = RandomStreams::new(7);
        a.add_channel("c", &[10, 20]).unwrap();
        b.add_channel("c", &[10, 20]).unwrap();
        let together = a.draw("c", &[10, 20]).unwrap();
        let alone_20 = b.draw("c", &[20]).unwrap();
        let alone_10 = b.draw("c", &[10]).unwrap();
        assert_eq!(together, vec![alone_10[0], alone_20[0]]);
    }

    #[test]
    fn redraw_advances_stream() {
        let mut s = RandomStreams::new(1);
        s.add_channel("c", &[5]).unwrap();
        let first = s.draw("c", &[5]).unwrap();
        let second = s.draw("c", &[5]).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn channels_are_independent() {
        let mut s = RandomStreams::new(1);
        s.add_channel("a", &[5]).unwrap();
        s.add_channel("b", &[5]).unwrap();
        assert_ne!(s.draw("a", &[5]).unwrap(), s.draw("b", &[5]).unwrap());
    }

    #[test]
    fn draw_matrix_is_row_major() {
        let mut a = RandomStreams::new(3);
        let mut b = RandomStreams::new(3);
        a.add_channel("c", &[1, 2]).unwrap();
        b.add_channel("c", &[1, 2]).unwrap();
        let m = a.draw_matrix("c", &[1, 2], 3).unwrap();
        assert_eq!(m.len(), 6);
        let row1 = b.draw_matrix("c", &[1], 3).unwrap();
        assert_eq!(&m[..3], row1.as_slice());
        assert!(m.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn unregistered_channel_errors() {
        let mut s = RandomStreams::new(0);
        assert!(matches!(s.draw("nope", &[1]), Err(TdmError::ChannelNotRegistered(_))));
    }

    #[test]
    fn unknown_entity_errors() {
        let mut s = RandomStreams::new(0);
        s.add_channel("c", &[1]).unwrap();
        assert!(matches!(s.draw("c", &[2]), Err(TdmError::UnknownEntity { entity: 2, .. })));
    }

    #[test]
    fn duplicate_channel_errors_and_drop_releases() {
        let mut s = RandomStreams::new(0);
        s.add_channel("c", &[1, 2]).unwrap();
        assert_eq!(s.channel_len("c"), 2);
        assert!(matches!(s.add_channel("c", &[1]), Err(TdmError::ChannelExists(_))));
        s.drop_channel("c");
        assert!(!s.has_channel("c"));
        assert_eq!(s.channel_len("c"), 0);
        s.add_channel("c", &[1]).unwrap();
    }
}

#[cfg(test)]
mod settings {
    use crate::{ParticipationSettings, TripDestinationSettings, ZoneSystem};

    #[test]
    fn participation_defaults() {
        let s = ParticipationSettings::default();
        assert_eq!(s.participation_choice, "participate");
        assert_eq!(s.max_iterations, 5000);
        assert!(!s.force_participation);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn participation_rejects_zero_iterations() {
        let s = ParticipationSettings { max_iterations: 0, ..Default::default() };
        assert!(s.validate().is_err());
    }

    #[test]
    fn presampling_requires_multizone() {
        let mut s = TripDestinationSettings::default();
        assert!(!s.presample_enabled());
        s.zone_system = ZoneSystem::TwoZone;
        assert!(s.presample_enabled());
        s.want_presampling = false;
        assert!(!s.presample_enabled());
    }

    #[test]
    fn disable_sampling_zeroes_sample_size() {
        let s = TripDestinationSettings { disable_sampling: true, ..Default::default() };
        assert_eq!(s.effective_sample_size(), 0);
        assert!(s.validate().is_ok());
        let bad = TripDestinationSettings { sample_size: 0, ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
