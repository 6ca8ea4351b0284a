//! Shared utilities: parallelism configuration.

/// Execution mode for the data-parallel pipeline stages.
///
/// Stages that take this flag run their per-item work through `rayon` in
/// `Parallel` mode and iterate serially in `Sequential` mode. Every such
/// stage in this crate maps over independent items (trees, query points,
/// grid cells), so the mode never changes what is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Interpret a thread-count setting: `0` defers to the rayon pool
    /// (sequential only when the pool has a single thread), `1` forces
    /// sequential execution, anything larger runs parallel.
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        match n_threads {
            1 => Parallelism::Sequential,
            0 if rayon::current_num_threads() == 1 => Parallelism::Sequential,
            _ => Parallelism::Parallel,
        }
    }

    /// Whether parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Parallelism::Sequential
    }
}
