//! Deterministic per-entity random draw channels.
//!
//! # Determinism strategy
//!
//! Every (channel, entity) pair gets its own independent `SmallRng` seeded by:
//!
//!   seed = base_seed XOR xxh3(channel) XOR (entity_key * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive entity keys uniformly across the seed space.
//! This means:
//!
//! - A draw for one entity never depends on which other entities were drawn
//!   in the same batch, or in what order.
//! - Re-drawing for an entity (a retry round) advances only that entity's
//!   stream, so the retry sees fresh values and a rerun sees the same ones.
//! - Channels are independent: the participation model and the trip
//!   destination model never share streams.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::map::IdMap;
use crate::{TdmError, TdmResult};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── EntityRng ─────────────────────────────────────────────────────────────────

/// Per-entity deterministic RNG.
pub struct EntityRng(SmallRng);

impl EntityRng {
    /// Seed deterministically from a channel seed and an entity key.
    pub fn new(channel_seed: u64, entity: u64) -> Self {
        let seed = channel_seed ^ entity.wrapping_mul(MIXING_CONSTANT);
        EntityRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen()
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

// ── RandomDrawService ─────────────────────────────────────────────────────────

/// Source of uniform draws addressed by entity key and named channel.
///
/// # Contract
///
/// - A channel must be registered (with the keys it will serve) before any
///   draw, and dropped when the model step is done with it.
/// - `draw` returns one value per key, in key order.
/// - `draw_matrix` returns `keys.len() * n` values, row-major: the `n`
///   draws of `keys[0]` first.
/// - Repeating a key within one call is allowed; each occurrence advances
///   that entity's stream.
pub trait RandomDrawService {
    fn add_channel(&mut self, channel: &str, keys: &[u64]) -> TdmResult<()>;

    /// Release per-entity state.  Dropping an unknown channel is a no-op.
    fn drop_channel(&mut self, channel: &str);

    fn has_channel(&self, channel: &str) -> bool;

    fn draw(&mut self, channel: &str, keys: &[u64]) -> TdmResult<Vec<f64>> {
        self.draw_matrix(channel, keys, 1)
    }

    fn draw_matrix(&mut self, channel: &str, keys: &[u64], n: usize) -> TdmResult<Vec<f64>>;
}

// ── RandomStreams ─────────────────────────────────────────────────────────────

/// Default [`RandomDrawService`]: one [`EntityRng`] per (channel, entity).
pub struct RandomStreams {
    base_seed: u64,
    channels:  IdMap<String, IdMap<u64, EntityRng>>,
}

impl RandomStreams {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed, channels: IdMap::default() }
    }

    fn channel_seed(&self, channel: &str) -> u64 {
        self.base_seed ^ xxhash_rust::xxh3::xxh3_64(channel.as_bytes())
    }

    /// Number of entities registered in `channel` (0 if not registered).
    pub fn channel_len(&self, channel: &str) -> usize {
        self.channels.get(channel).map_or(0, |c| c.len())
    }
}

impl RandomDrawService for RandomStreams {
    fn add_channel(&mut self, channel: &str, keys: &[u64]) -> TdmResult<()> {
        if self.channels.contains_key(channel) {
            return Err(TdmError::ChannelExists(channel.to_owned()));
        }
        let seed = self.channel_seed(channel);
        let streams = keys.iter().map(|&k| (k, EntityRng::new(seed, k))).collect();
        self.channels.insert(channel.to_owned(), streams);
        Ok(())
    }

    fn drop_channel(&mut self, channel: &str) {
        self.channels.remove(channel);
    }

    fn has_channel(&self, channel: &str) -> bool {
        self.channels.contains_key(channel)
    }

    fn draw_matrix(&mut self, channel: &str, keys: &[u64], n: usize) -> TdmResult<Vec<f64>> {
        let streams = self
            .channels
            .get_mut(channel)
            .ok_or_else(|| TdmError::ChannelNotRegistered(channel.to_owned()))?;

        let mut out = Vec::with_capacity(keys.len() * n);
        for &key in keys {
            let rng = streams.get_mut(&key).ok_or_else(|| TdmError::UnknownEntity {
                channel: channel.to_owned(),
                entity:  key,
            })?;
            out.extend((0..n).map(|_| rng.uniform()));
        }
        Ok(out)
    }
}
