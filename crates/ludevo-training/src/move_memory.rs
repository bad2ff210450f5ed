//! Per-position cache of the best move found so far.
//!
//! Keys are canonical board snapshots ([`ludevo_engine::Game::position_key`]),
//! which deliberately ignore whose turn it is; if both players can reach the
//! same board contents the cached move is attributed to whichever search ran
//! first. The cache lives for the owning player's lifetime and is never
//! evicted within a run.

use std::{collections::HashMap, hash::Hash};

use crate::genetic::Scored;

/// What a cache hit means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Recompute anyway and keep whichever candidate scores strictly
    /// higher. The stored entry wins ties.
    #[default]
    KeepBest,
    /// Return the stored entry without recomputing. Explicit opt-in: the
    /// cache goes stale silently if the fitness landscape shifts.
    TrustCache,
}

/// Map from canonical position to the best scored move seen there.
#[derive(Debug, Clone, Default)]
pub struct MoveMemory<K, M> {
    entries: HashMap<K, Scored<M>>,
}

impl<K: Eq + Hash, M: Copy> MoveMemory<K, M> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<Scored<M>> {
        self.entries.get(key).copied()
    }

    /// Consults the cache, falling back to `compute` per the policy.
    ///
    /// On a miss the computed entry is stored. On a hit under
    /// [`CachePolicy::KeepBest`] the entry is recomputed and overwritten
    /// only when the fresh candidate scores strictly higher; the returned
    /// entry is whichever survived.
    pub fn lookup_or_compute<E>(
        &mut self,
        key: K,
        policy: CachePolicy,
        compute: impl FnOnce() -> Result<Scored<M>, E>,
    ) -> Result<Scored<M>, E> {
        if policy == CachePolicy::TrustCache {
            if let Some(hit) = self.entries.get(&key) {
                return Ok(*hit);
            }
        }
        let fresh = compute()?;
        let entry = self
            .entries
            .entry(key)
            .and_modify(|stored| {
                if fresh.fitness > stored.fitness {
                    *stored = fresh;
                }
            })
            .or_insert(fresh);
        Ok(*entry)
    }
}
