//! The bucket table: one growable list of key references per radix value.
//!
//! Buckets take their storage from the index's [`Arena`] and fall back to an
//! owned heap block when the arena tail is exhausted. Storage provenance is
//! recorded per bucket in [`Storage`], so releasing the index frees the arena
//! once and every escaped block exactly once, through ordinary ownership.

use crate::arena::{Arena, Storage, alloc_slots};
use crate::config::{IndexConfig, MIN_BUCKET_CAPACITY};
use crate::core::{BUCKET_COUNT, Key};
use crate::error::{Error, Result};
use crate::pool::WorkerPool;
use crate::radix::radix;
use log::{debug, trace};
use std::fmt;

/// A growable list of key references sharing one radix value.
#[derive(Debug, Default)]
pub(crate) struct Bucket<'a> {
    pub(crate) len: usize,
    pub(crate) capacity: usize,
    pub(crate) storage: Storage<'a>,
}

/// Snapshot of an index's occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexStats {
    /// Keys stored.
    pub keys: usize,
    /// Buckets holding at least one key.
    pub nonempty_buckets: usize,
    /// Total arena slots.
    pub arena_capacity: usize,
    /// Arena slots handed out to buckets, including abandoned regions.
    pub arena_used: usize,
    /// Buckets whose storage lives in an owned heap block.
    pub escaped_buckets: usize,
}

/// Bucket-sorted collection of key references into caller-owned text.
///
/// Keys are routed by their [`radix`] into [`BUCKET_COUNT`] buckets, each
/// bucket is sorted independently by [`sort`](Self::sort), and walking the
/// buckets in index order yields all keys in lexicographic order.
///
/// # Examples
///
/// ```
/// use lexbucket::BucketIndex;
///
/// let words = ["banana", "apple", "cherry"];
/// let mut index = BucketIndex::new(words.len()).unwrap();
/// for w in &words {
///     index.add(w.as_bytes()).unwrap();
/// }
/// index.sort();
///
/// let sorted: Vec<&[u8]> = index.iter().collect();
/// assert_eq!(sorted, vec![&b"apple"[..], &b"banana"[..], &b"cherry"[..]]);
/// ```
pub struct BucketIndex<'a> {
    pub(crate) buckets: Vec<Bucket<'a>>,
    pub(crate) arena: Arena<'a>,
    pub(crate) pool: WorkerPool,
    pub(crate) len: usize,
    pub(crate) sorted: bool,
}

impl<'a> BucketIndex<'a> {
    /// Creates an index sized for about `estimated_keys` keys.
    pub fn new(estimated_keys: usize) -> Result<Self> {
        Self::with_config(IndexConfig::new(estimated_keys))
    }

    /// Creates an index from an explicit configuration.
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        let arena = Arena::with_capacity(config.arena_slots())?;
        let pool = WorkerPool::new(config.workers)?;

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(BUCKET_COUNT)
            .map_err(|_| Error::Allocation {
                slots: BUCKET_COUNT,
            })?;
        buckets.resize_with(BUCKET_COUNT, Bucket::default);

        debug!(
            "index created: {} arena slots, {} workers",
            arena.capacity(),
            pool.workers()
        );
        Ok(Self {
            buckets,
            arena,
            pool,
            len: 0,
            sorted: true,
        })
    }

    /// Adds one key.
    ///
    /// The key lands at the end of its bucket; order is restored by the next
    /// [`sort`](Self::sort). Insertion takes `&mut self`, so concurrent
    /// callers must go through the bulk paths instead.
    pub fn add(&mut self, key: Key<'a>) -> Result<()> {
        self.insert(radix(key), key)
    }

    pub(crate) fn insert(&mut self, radix: u32, key: Key<'a>) -> Result<()> {
        let r = radix as usize;
        debug_assert!(r < BUCKET_COUNT, "radix {r} outside bucket domain");

        let bucket = &self.buckets[r];
        if bucket.len == bucket.capacity {
            self.grow(r)?;
        }

        let bucket = &mut self.buckets[r];
        let slot = bucket.len;
        slots_mut(bucket, &mut self.arena)[slot] = key;
        bucket.len += 1;
        self.len += 1;
        self.sorted = false;
        Ok(())
    }

    /// Doubles the capacity of bucket `r`.
    fn grow(&mut self, r: usize) -> Result<()> {
        let capacity = self.buckets[r].capacity;
        let new_capacity = capacity
            .checked_mul(2)
            .ok_or(Error::Allocation { slots: usize::MAX })?
            .max(MIN_BUCKET_CAPACITY);
        self.resize(r, new_capacity)
    }

    /// Makes room for `additional` more keys in bucket `r`, growing it to
    /// exactly the required capacity if needed.
    pub(crate) fn reserve_exact(&mut self, r: usize, additional: usize) -> Result<()> {
        let bucket = &self.buckets[r];
        let needed = bucket
            .len
            .checked_add(additional)
            .ok_or(Error::Allocation { slots: usize::MAX })?;
        if needed > bucket.capacity {
            self.resize(r, needed)?;
        }
        Ok(())
    }

    /// Moves bucket `r` into storage of `new_capacity` slots.
    ///
    /// Arena-backed (or unallocated) buckets carve a fresh region from the
    /// arena tail and abandon the old one. If the tail is too short they
    /// escape into an owned block. Escaped buckets reallocate their own block
    /// and never return to the arena.
    fn resize(&mut self, r: usize, new_capacity: usize) -> Result<()> {
        let bucket = &mut self.buckets[r];
        let len = bucket.len;
        debug_assert!(new_capacity >= len);

        match &mut bucket.storage {
            Storage::Heap(block) => {
                let mut grown = alloc_slots(new_capacity)?;
                grown[..len].copy_from_slice(&block[..len]);
                *block = grown;
            }
            storage => match self.arena.carve(new_capacity) {
                Some(to) => {
                    if let Storage::Arena { offset } = *storage {
                        self.arena.relocate(offset, to, len);
                    }
                    *storage = Storage::Arena { offset: to };
                }
                None => {
                    let mut block = alloc_slots(new_capacity)?;
                    if let Storage::Arena { offset } = *storage {
                        block[..len].copy_from_slice(self.arena.region(offset, len));
                    }
                    *storage = Storage::Heap(block);
                    trace!(
                        "bucket {r} escaped to heap: {new_capacity} slots, arena {}/{}",
                        self.arena.used(),
                        self.arena.capacity()
                    );
                }
            },
        }
        bucket.capacity = new_capacity;
        Ok(())
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` when iteration yields keys in lexicographic order,
    /// i.e. nothing was added since the last [`sort`](Self::sort).
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Number of workers used by the parallel phases.
    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Keys of the bucket with radix value `radix`, in their current order.
    ///
    /// # Panics
    ///
    /// Panics if `radix >= BUCKET_COUNT`.
    pub fn bucket(&self, radix: usize) -> &[Key<'a>] {
        let bucket = &self.buckets[radix];
        match &bucket.storage {
            Storage::Unallocated => &[],
            Storage::Arena { offset } => self.arena.region(*offset, bucket.len),
            Storage::Heap(block) => &block[..bucket.len],
        }
    }

    /// Removes every key.
    ///
    /// Escaped blocks are released and the arena cursor rewinds, so the
    /// arena is reused by later insertions.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = Bucket::default());
        self.arena.rewind();
        self.len = 0;
        self.sorted = true;
    }

    /// Occupancy statistics.
    pub fn stats(&self) -> IndexStats {
        let (nonempty_buckets, escaped_buckets) =
            self.buckets.iter().fold((0, 0), |(nonempty, escaped), b| {
                (
                    nonempty + usize::from(b.len > 0),
                    escaped + usize::from(b.storage.is_escaped()),
                )
            });
        IndexStats {
            keys: self.len,
            nonempty_buckets,
            arena_capacity: self.arena.capacity(),
            arena_used: self.arena.used(),
            escaped_buckets,
        }
    }
}

impl fmt::Debug for BucketIndex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketIndex")
            .field("stats", &self.stats())
            .field("workers", &self.pool.workers())
            .field("sorted", &self.sorted)
            .finish()
    }
}

/// All slots of `bucket`, up to its capacity.
fn slots_mut<'s, 'a>(bucket: &'s mut Bucket<'a>, arena: &'s mut Arena<'a>) -> &'s mut [Key<'a>] {
    match &mut bucket.storage {
        Storage::Unallocated => &mut [],
        Storage::Arena { offset } => arena.region_mut(*offset, bucket.capacity),
        Storage::Heap(block) => &mut block[..],
    }
}
