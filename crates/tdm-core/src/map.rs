//! Hash map aliases for id-keyed grouping.
//!
//! Group-bys over tour, trip, and zone ids are the hot loops of both choice
//! models.  With the `fx-hash` feature the aliases switch to `rustc-hash`,
//! which is noticeably faster on integer keys; iteration order is never
//! relied upon either way (callers sort or use `BTreeMap` where order matters).

#[cfg(feature = "fx-hash")]
pub type IdMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(feature = "fx-hash")]
pub type IdSet<K> = rustc_hash::FxHashSet<K>;

#[cfg(not(feature = "fx-hash"))]
pub type IdMap<K, V> = std::collections::HashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub type IdSet<K> = std::collections::HashSet<K>;
