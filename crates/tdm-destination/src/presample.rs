//! Two-level destination sampling: coarse zones first, then one fine zone
//! inside each coarse pick.
//!
//! # Fine zone draw
//!
//! Each coarse pick is expanded `pick_count` times.  Every expanded pick
//! gets the fine zones of its coarse zone as a ragged candidate list,
//! weighted by the fine size term for the trip's purpose:
//!
//! ```text
//! trip 7, coarse 0 (prob .6) ×2 ─► [f0 f1 f2]   sizes [2 0 6] → [.25 0 .75]
//! trip 7, coarse 1 (prob .4) ×1 ─► [f3 f4]      sizes [1 1]   → [.5 .5 │ 0]
//! ```
//!
//! Rows are padded to a common width with zero fillers.  One uniform per
//! expanded pick (drawn per trip with `draw_matrix`) selects a fine zone by
//! threshold crossing.  The combined probability is coarse × fine, and
//! repeated (trip, fine zone) picks collapse with `prob = max` and
//! `pick_count = count`.

use std::collections::BTreeMap;

use log::{debug, info};

use tdm_choice::{ModelSpec, PaddedMatrix, UtilityEvaluator};
use tdm_core::{IdMap, RandomDrawService, TripDestinationSettings, TripId, ZoneId, ZoneSystem};

use crate::{
    destination_sample, DestinationAlternative, DestinationContext, DestinationError,
    DestinationResult, DestinationSampleRow, SizeTermMatrix, TripChooser, ZoneHierarchy, ZoneLayer,
    TRIP_CHANNEL,
};

/// Sample coarse zones with the sample evaluator, then choose a fine zone
/// for each coarse pick.
pub fn destination_presample(
    choosers:    &[TripChooser],
    ctx:         &DestinationContext,
    evaluator:   &dyn UtilityEvaluator<DestinationAlternative>,
    spec:        &ModelSpec,
    sample_size: usize,
    draws:       &mut dyn RandomDrawService,
) -> DestinationResult<Vec<DestinationSampleRow>> {
    let hierarchy = ctx.hierarchy().ok_or(DestinationError::MissingHierarchy)?;
    let coarse_sizes = ctx.coarse_size_terms().ok_or(DestinationError::MissingHierarchy)?;

    let coarse_choosers = choosers
        .iter()
        .map(|c| {
            Ok(TripChooser {
                origin:              hierarchy.coarse(c.origin)?,
                primary_destination: hierarchy.coarse(c.primary_destination)?,
                ..c.clone()
            })
        })
        .collect::<DestinationResult<Vec<_>>>()?;

    let coarse_sample = destination_sample(
        &coarse_choosers,
        coarse_sizes,
        ZoneLayer::Coarse,
        evaluator,
        spec,
        sample_size,
        draws,
    )?;

    choose_fine_for_coarse(&coarse_sample, choosers, hierarchy, &ctx.size_terms, draws)
}

/// Replace each coarse pick of `coarse_sample` by a fine zone chosen in
/// proportion to fine size terms.
///
/// An empty coarse sample is returned as is.
pub fn choose_fine_for_coarse(
    coarse_sample: &[DestinationSampleRow],
    choosers:      &[TripChooser],
    hierarchy:     &ZoneHierarchy,
    fine_sizes:    &SizeTermMatrix,
    draws:         &mut dyn RandomDrawService,
) -> DestinationResult<Vec<DestinationSampleRow>> {
    if coarse_sample.is_empty() {
        return Ok(Vec::new());
    }
    let purpose_of: IdMap<TripId, _> = choosers.iter().map(|c| (c.trip, c.purpose)).collect();

    // Expanded picks, grouped by trip in sample order.
    let mut trips: Vec<TripId> = Vec::new();
    let mut picks_per_trip: Vec<usize> = Vec::new();
    let mut picks: Vec<(usize, ZoneId, f64)> = Vec::new();
    for row in coarse_sample {
        if trips.last() != Some(&row.trip) {
            trips.push(row.trip);
            picks_per_trip.push(0);
        }
        let t = trips.len() - 1;
        for _ in 0..row.pick_count {
            picks.push((t, row.zone, row.prob));
        }
        picks_per_trip[t] += row.pick_count as usize;
    }

    // Ragged fine candidate lists, padded.
    let mut candidates: Vec<ZoneId> = Vec::new();
    let mut sizes: Vec<f64> = Vec::new();
    let mut lengths: Vec<usize> = Vec::with_capacity(picks.len());
    let mut offsets: Vec<usize> = Vec::with_capacity(picks.len());
    for &(t, coarse, _) in &picks {
        let purpose = purpose_of
            .get(&trips[t])
            .copied()
            .ok_or_else(|| DestinationError::Parse(format!("sampled trip {} has no chooser", trips[t])))?;
        let fine = hierarchy.fine_in(coarse)?;
        offsets.push(candidates.len());
        lengths.push(fine.len());
        candidates.extend_from_slice(fine);
        sizes.extend(fine.iter().map(|&z| fine_sizes.get(z, purpose)));
    }
    let mut probs = PaddedMatrix::from_ragged(&sizes, &lengths)?;
    probs.normalize_rows();

    // One uniform per expanded pick.  Every trip draws the segment's largest
    // pick count and uses the first `picks` of its own row.
    let n = picks_per_trip.iter().copied().max().unwrap_or(0);
    let keys: Vec<u64> = trips.iter().map(|t| t.0).collect();
    let matrix = draws.draw_matrix(TRIP_CHANNEL, &keys, n)?;
    let rands: Vec<f64> = picks_per_trip
        .iter()
        .enumerate()
        .flat_map(|(t, &count)| matrix[t * n..t * n + count].iter().copied())
        .collect();

    let positions = probs.choose_positions(&rands)?;

    // Collapse (trip, fine zone) duplicates.
    let mut collapsed: Vec<BTreeMap<ZoneId, (f64, u32)>> = vec![BTreeMap::new(); trips.len()];
    for (i, position) in positions.into_iter().enumerate() {
        let (t, coarse, coarse_prob) = picks[i];
        let Some(pos) = position else {
            debug!("trip {}: coarse zone {coarse} has no fine zone with a positive size term", trips[t]);
            continue;
        };
        let zone = candidates[offsets[i] + pos];
        let prob = coarse_prob * probs.get(i, pos);
        let entry = collapsed[t].entry(zone).or_insert((prob, 0));
        entry.0 = entry.0.max(prob);
        entry.1 += 1;
    }

    Ok(trips
        .iter()
        .zip(collapsed)
        .flat_map(|(&trip, zones)| {
            zones
                .into_iter()
                .map(move |(zone, (prob, count))| DestinationSampleRow::new(trip, zone, prob, count))
        })
        .collect())
}

/// Sample destinations for one segment, presampling when the zone system
/// and settings call for it.
pub fn trip_destination_sample(
    choosers:  &[TripChooser],
    ctx:       &DestinationContext,
    evaluator: &dyn UtilityEvaluator<DestinationAlternative>,
    spec:      &ModelSpec,
    settings:  &TripDestinationSettings,
    draws:     &mut dyn RandomDrawService,
) -> DestinationResult<Vec<DestinationSampleRow>> {
    let sample_size = settings.effective_sample_size();

    if settings.zone_system != ZoneSystem::OneZone && !settings.want_presampling {
        info!("{}: destination presampling disabled by configuration", spec.name);
    }

    if settings.presample_enabled() {
        info!("{}: presampling destinations for {} trips", spec.name, choosers.len());
        destination_presample(choosers, ctx, evaluator, spec, sample_size, draws)
    } else {
        destination_sample(choosers, &ctx.size_terms, ZoneLayer::Fine, evaluator, spec, sample_size, draws)
    }
}
