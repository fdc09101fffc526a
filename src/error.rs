//! Error types for `lexbucket`.

/// Errors raised while building or populating a [`BucketIndex`](crate::BucketIndex).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A block of key slots could not be allocated.
    ///
    /// Raised for the arena itself, for escaped bucket blocks and for the
    /// scratch tables of the bulk insertion phases. The index is left in a
    /// consistent state, but the failed operation is not retried.
    #[error("failed to allocate {slots} key slots")]
    Allocation {
        /// Number of slots requested.
        slots: usize,
    },

    /// A dedicated worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
