//! Edge-keyed traffic volume table.

use std::collections::BTreeMap;

use rc_core::EdgeKey;

/// Mapping from [`EdgeKey`] to a non-negative volume.
///
/// A missing entry means zero volume.  Entries are kept in key order so
/// iteration (and therefore every export) is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrafficMap {
    volumes: BTreeMap<EdgeKey, u32>,
}

impl TrafficMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Volume on `key`, or 0 if the edge has no entry.
    #[inline]
    pub fn get(&self, key: EdgeKey) -> u32 {
        self.volumes.get(&key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: EdgeKey) -> bool {
        self.volumes.contains_key(&key)
    }

    /// Set the volume on `key`, replacing any previous entry.
    pub fn insert(&mut self, key: EdgeKey, volume: u32) {
        self.volumes.insert(key, volume);
    }

    /// Delete the entry for `key`, returning its volume if it had one.
    pub fn remove(&mut self, key: EdgeKey) -> Option<u32> {
        self.volumes.remove(&key)
    }

    /// Add `volume` to `key`, creating the entry at 0 first if needed.
    /// Saturates rather than wrapping.
    pub fn add(&mut self, key: EdgeKey, volume: u32) {
        let entry = self.volumes.entry(key).or_insert(0);
        *entry = entry.saturating_add(volume);
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Sum of all volumes.
    pub fn total(&self) -> u64 {
        self.volumes.values().map(|&v| v as u64).sum()
    }

    /// Largest single volume, or 0 for an empty map.
    pub fn max(&self) -> u32 {
        self.volumes.values().copied().max().unwrap_or(0)
    }

    /// `(key, volume)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeKey, u32)> + '_ {
        self.volumes.iter().map(|(&k, &v)| (k, v))
    }
}

impl FromIterator<(EdgeKey, u32)> for TrafficMap {
    fn from_iter<I: IntoIterator<Item = (EdgeKey, u32)>>(iter: I) -> Self {
        Self { volumes: iter.into_iter().collect() }
    }
}
