//! Index statistics.
//!
//! Counters for the long-name protocol. Probe chains are expected to stay at
//! length 0 or 1; a growing `collisions` count or any `orphans_healed` is
//! worth a look.

use std::sync::atomic::{AtomicU64, Ordering};

/// Index statistics.
///
/// All counters are atomic and can be read while operations are in progress.
#[derive(Debug, Default)]
pub struct IndexStats {
    /// Calls to `resolve`.
    resolves: AtomicU64,
    /// Long-name slots inspected.
    probes: AtomicU64,
    /// Slots skipped because they hold a different identity.
    collisions: AtomicU64,
    /// Slots reclaimed because they had no identity record.
    orphans_healed: AtomicU64,
    /// Identity records written.
    commits: AtomicU64,
    /// Objects removed.
    removals: AtomicU64,
    /// Removals that moved the last slot of a chain into the hole.
    compactions: AtomicU64,
}

impl IndexStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_resolve(&self) {
        self.resolves.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_probe(&self) {
        self.probes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_collision(&self) {
        self.collisions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_orphan_healed(&self) {
        self.orphans_healed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_commit(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_removal(&self, compacted: bool) {
        self.removals.fetch_add(1, Ordering::Relaxed);
        if compacted {
            self.compactions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            resolves: self.resolves.load(Ordering::Relaxed),
            probes: self.probes.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
            orphans_healed: self.orphans_healed.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            compactions: self.compactions.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of index statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Calls to `resolve`.
    pub resolves: u64,
    /// Long-name slots inspected.
    pub probes: u64,
    /// Slots skipped because they hold a different identity.
    pub collisions: u64,
    /// Slots reclaimed because they had no identity record.
    pub orphans_healed: u64,
    /// Identity records written.
    pub commits: u64,
    /// Objects removed.
    pub removals: u64,
    /// Removals that compacted a chain.
    pub compactions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let stats = IndexStats::new();
        stats.record_resolve();
        stats.record_probe();
        stats.record_probe();
        stats.record_removal(false);
        stats.record_removal(true);

        let snap = stats.snapshot();
        assert_eq!(snap.resolves, 1);
        assert_eq!(snap.probes, 2);
        assert_eq!(snap.removals, 2);
        assert_eq!(snap.compactions, 1);
        assert_eq!(snap.collisions, 0);
    }
}
