//! Concurrent workloads for the index.
//!
//! The index is shared across threads, but each thread owns its directory:
//! writers to one directory must be serialized by the caller.

use crate::fixtures::long_identity;
use lfn_core::NameIndex;
use lfn_storage::DirBackend;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress run.
#[derive(Debug, Clone)]
pub struct StressResult {
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
}

impl StressResult {
    /// Total operations performed.
    pub fn total_ops(&self) -> usize {
        self.successful_ops + self.failed_ops
    }
}

/// Configuration for stress runs.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of threads, each with its own directory.
    pub threads: usize,
    /// Objects created per thread.
    pub objects_per_thread: usize,
    /// Name length before the per-object tag.
    pub name_len: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            objects_per_thread: 32,
            name_len: 300,
        }
    }
}

/// Creates, resolves and removes objects from several threads at once.
///
/// Every thread creates `objects_per_thread` identities in its own
/// directory under `root`, checks each resolves as present, then removes
/// them all in creation order, which compacts the chain on every step.
pub fn create_remove_cycle<B: DirBackend>(
    index: &NameIndex<B>,
    root: &Path,
    config: &StressConfig,
) -> StressResult {
    let start = Instant::now();
    let counts: Vec<(usize, usize)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..config.threads)
            .map(|t| {
                let dir: PathBuf = root.join(format!("t{t}"));
                scope.spawn(move || run_thread(index, &dir, config))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("Stress thread panicked"))
            .collect()
    });

    let (successful_ops, failed_ops) = counts
        .into_iter()
        .fold((0, 0), |(ok, err), (o, e)| (ok + o, err + e));
    StressResult {
        successful_ops,
        failed_ops,
        duration: start.elapsed(),
    }
}

fn run_thread<B: DirBackend>(index: &NameIndex<B>, dir: &Path, config: &StressConfig) -> (usize, usize) {
    let ids: Vec<_> = (0..config.objects_per_thread)
        .map(|i| long_identity(config.name_len, i as u32))
        .collect();
    let mut ok = 0;
    let mut err = 0;
    let mut tally = |success: bool| {
        if success {
            ok += 1;
        } else {
            err += 1;
        }
    };

    for id in &ids {
        tally(index.create(dir, id).is_ok());
    }
    for id in &ids {
        tally(index.resolve(dir, id).is_ok_and(|r| r.exists));
    }
    for id in &ids {
        tally(index.remove(dir, id).is_ok());
    }
    (ok, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{colliding_config, memory_dir, memory_index};

    #[test]
    fn test_stress_memory() {
        let index = memory_index(colliding_config());
        let config = StressConfig {
            threads: 4,
            objects_per_thread: 8,
            name_len: 80,
        };
        let result = create_remove_cycle(&index, &memory_dir(), &config);
        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.total_ops(), 4 * 8 * 3);
        assert!(index.backend().files().is_empty());
        assert_eq!(index.stats().snapshot().compactions, 4 * 4);
    }
}
