//! Leaderboard Store — the one piece of shared mutable state.
//!
//! Owned by `AppState` as an `Arc<Leaderboard>` and injected wherever it is
//! needed. Entries live behind a `RwLock`, so a reader sees every write either
//! fully or not at all. Nothing is persisted.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::evaluation::models::{LeaderboardEntry, ScoreResult};

#[derive(Debug, Default)]
pub struct Leaderboard {
    entries: RwLock<Vec<ScoreResult>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-pushed entry behind,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Vec<ScoreResult>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<ScoreResult>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, result: ScoreResult) {
        self.write().push(result);
    }

    /// Point-in-time copy of all results in insertion order.
    pub fn snapshot(&self) -> Vec<ScoreResult> {
        self.read().clone()
    }

    /// Empties the store and returns the ranked view taken under the same
    /// write guard, so no concurrent append can show up in it.
    pub fn clear(&self) -> Vec<LeaderboardEntry> {
        let mut entries = self.write();
        entries.clear();
        rank(entries.clone())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn ranked(&self) -> Vec<LeaderboardEntry> {
        rank(self.snapshot())
    }
}

/// Sorts by score descending and numbers entries 1..=N. `sort_by` is stable,
/// so equal scores keep their insertion order.
pub fn rank(mut results: Vec<ScoreResult>) -> Vec<LeaderboardEntry> {
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
        .into_iter()
        .enumerate()
        .map(|(i, result)| LeaderboardEntry { rank: i + 1, result })
        .collect()
}
