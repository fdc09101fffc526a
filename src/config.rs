//! Construction parameters for [`BucketIndex`](crate::BucketIndex).

/// Smallest capacity a bucket takes on its first growth.
pub const MIN_BUCKET_CAPACITY: usize = 4;

/// How many key slots the arena reserves up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArenaSizing {
    /// Enough slots that single-key insertion of `estimated_keys` keys never
    /// escapes to the heap.
    ///
    /// A bucket holding `n` keys has grown through capacities
    /// `MIN, 2*MIN, ..., cap`, abandoning each region in the arena, where
    /// either `cap == MIN` or `cap < 2n`. Their sum `2*cap - MIN` never
    /// exceeds `4n`, so four slots per estimated key bound the worst case.
    #[default]
    WorstCase,
    /// One slot per estimated key. Exactly what a suffix bulk insertion into a
    /// fresh index consumes, since that path carves regions from measured
    /// frequencies.
    Exact,
    /// A fixed number of slots, independent of the estimate.
    Slots(usize),
}

impl ArenaSizing {
    /// Arena slot count for `estimated_keys`.
    pub fn slots(self, estimated_keys: usize) -> usize {
        match self {
            ArenaSizing::WorstCase => estimated_keys.saturating_mul(4),
            ArenaSizing::Exact => estimated_keys,
            ArenaSizing::Slots(n) => n,
        }
    }
}

/// Configuration for a bucket index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexConfig {
    /// Expected number of keys, used to size the arena.
    pub estimated_keys: usize,
    /// Number of workers per parallel phase. `0` uses rayon's global pool and
    /// its thread count; any other value builds a dedicated pool.
    pub workers: usize,
    /// Arena sizing policy.
    pub arena_sizing: ArenaSizing,
}

impl IndexConfig {
    /// Default configuration for `estimated_keys` keys.
    pub fn new(estimated_keys: usize) -> Self {
        Self {
            estimated_keys,
            ..Self::default()
        }
    }

    /// Sets the number of workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the arena sizing policy.
    pub fn with_arena_sizing(mut self, arena_sizing: ArenaSizing) -> Self {
        self.arena_sizing = arena_sizing;
        self
    }

    /// Arena slot count implied by this configuration.
    pub fn arena_slots(&self) -> usize {
        self.arena_sizing.slots(self.estimated_keys)
    }
}
