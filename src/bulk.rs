//! Lock-free bulk insertion through frequency counting.
//!
//! Bulk insertion runs three fork-join phases:
//!
//! 1. **Count** (parallel). Each worker hashes a contiguous range of keys,
//!    stores the radix in its private part of a per-key table and bumps a
//!    shared per-bucket atomic counter.
//! 2. **Carve** (sequential). Buckets are visited in index order and grown to
//!    exactly `len + frequency` slots, so no bucket grows during phase 3.
//! 3. **Place** (parallel). Each worker re-walks its range and claims a slot
//!    in the target bucket with one atomic `fetch_add` on that bucket's
//!    write cursor, then writes the key reference into it.

use crate::arena::{SharedSlots, Storage};
use crate::core::{BUCKET_COUNT, Key, KeyAccessor};
use crate::error::{Error, Result};
use crate::radix::radix;
use crate::table::BucketIndex;
use cuneiform::cuneiform;
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Per-bucket counter, padded to a cache line so that workers hitting
/// neighbouring buckets do not contend on the same line.
#[cuneiform]
struct BucketCounter {
    value: AtomicUsize,
}

/// Keys consumed by the bulk pipeline.
trait KeySource<'a>: Sync {
    fn count(&self) -> usize;

    fn key(&self, index: usize) -> Key<'a>;
}

/// Every suffix of one text, identified by its starting offset.
struct Suffixes<'a>(&'a [u8]);

impl<'a> KeySource<'a> for Suffixes<'a> {
    fn count(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    fn key(&self, index: usize) -> Key<'a> {
        &self.0[index..]
    }
}

/// Discrete keys from a [`KeyAccessor`].
struct Accessed<'a, T: ?Sized>(&'a T);

impl<'a, T: KeyAccessor + Sync + ?Sized> KeySource<'a> for Accessed<'a, T> {
    fn count(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    fn key(&self, index: usize) -> Key<'a> {
        self.0.get_key(index)
    }
}

/// Where phase 3 writes the keys of one bucket.
enum Target<'s, 'a> {
    /// Region of the arena; `capacity` bounds the claimed slot index.
    Arena { offset: usize, capacity: usize },
    /// An escaped bucket's own block.
    Heap(SharedSlots<'s, 'a>),
}

impl<'a> BucketIndex<'a> {
    /// Adds every suffix of `text` (`text[i..]` for each `i`) as a key.
    ///
    /// Bulk insertion counts frequencies first, so each bucket is sized
    /// exactly once and keys are placed concurrently without locks. On an
    /// index created with [`ArenaSizing::Exact`](crate::ArenaSizing::Exact)
    /// and `estimated_keys >= text.len()`, no bucket escapes the arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexbucket::BucketIndex;
    ///
    /// let text = b"banana";
    /// let mut index = BucketIndex::new(text.len()).unwrap();
    /// index.add_suffixes(text).unwrap();
    /// index.sort();
    ///
    /// let offsets: Vec<usize> = index.iter().map(|s| text.len() - s.len()).collect();
    /// assert_eq!(offsets, vec![5, 3, 1, 0, 4, 2]);
    /// ```
    pub fn add_suffixes(&mut self, text: &'a [u8]) -> Result<()> {
        self.insert_counted(&Suffixes(text))
    }

    /// Adds every key of `keys` through the bulk pipeline.
    pub fn extend_from<T: KeyAccessor + Sync + ?Sized>(&mut self, keys: &'a T) -> Result<()> {
        self.insert_counted(&Accessed(keys))
    }

    fn insert_counted<S: KeySource<'a>>(&mut self, source: &S) -> Result<()> {
        let n = source.count();
        if n == 0 {
            return Ok(());
        }
        let started = Instant::now();

        // Phase 1: count.
        let mut radixes: Vec<u32> = Vec::new();
        radixes
            .try_reserve_exact(n)
            .map_err(|_| Error::Allocation { slots: n })?;
        radixes.resize(n, 0);
        let mut counters = counter_table()?;

        self.pool.run_mut(&mut radixes, |start, chunk| {
            for (j, slot) in chunk.iter_mut().enumerate() {
                let r = radix(source.key(start + j));
                debug_assert!((r as usize) < BUCKET_COUNT);
                *slot = r;
                counters[r as usize].value.fetch_add(1, Ordering::Relaxed);
            }
        });
        debug!(
            "bulk count: {n} keys across {} workers in {:?}",
            self.pool.workers(),
            started.elapsed()
        );

        // Phase 2: carve. Each counter turns into its bucket's write cursor.
        let mut touched = 0usize;
        for (r, counter) in counters.iter_mut().enumerate() {
            let frequency = *counter.value.get_mut();
            if frequency > 0 {
                self.reserve_exact(r, frequency)?;
                touched += 1;
            }
            *counter.value.get_mut() = self.buckets[r].len;
        }
        debug!(
            "bulk carve: {touched} buckets, arena {}/{} slots used",
            self.arena.used(),
            self.arena.capacity()
        );

        // Phase 3: place.
        {
            let arena = self.arena.shared();
            let mut targets: Vec<Target<'_, 'a>> = Vec::new();
            targets
                .try_reserve_exact(BUCKET_COUNT)
                .map_err(|_| Error::Allocation {
                    slots: BUCKET_COUNT,
                })?;
            targets.extend(self.buckets.iter_mut().map(|bucket| {
                match &mut bucket.storage {
                    Storage::Unallocated => Target::Arena {
                        offset: 0,
                        capacity: 0,
                    },
                    Storage::Arena { offset } => Target::Arena {
                        offset: *offset,
                        capacity: bucket.capacity,
                    },
                    Storage::Heap(block) => Target::Heap(SharedSlots::new(block)),
                }
            }));

            let radixes = &radixes;
            let counters = &counters;
            let targets = &targets;
            let arena = &arena;
            self.pool.run(n, |range| {
                for i in range {
                    let r = radixes[i] as usize;
                    let slot = counters[r].value.fetch_add(1, Ordering::Relaxed);
                    let key = source.key(i);
                    match &targets[r] {
                        Target::Arena { offset, capacity } => {
                            assert!(slot < *capacity, "bucket {r} overflowed its carve");
                            // SAFETY: `slot` was claimed by exactly one worker
                            // through the cursor, and bucket regions never overlap.
                            unsafe { arena.write(offset + slot, key) }
                        }
                        // SAFETY: as above; `write` checks the block bound.
                        Target::Heap(block) => unsafe { block.write(slot, key) },
                    }
                }
            });
        }

        for (bucket, counter) in self.buckets.iter_mut().zip(counters.iter_mut()) {
            bucket.len = *counter.value.get_mut();
            debug_assert!(bucket.len <= bucket.capacity);
        }
        self.len += n;
        self.sorted = false;
        debug!("bulk place: {n} keys placed in {:?}", started.elapsed());
        Ok(())
    }
}

fn counter_table() -> Result<Vec<BucketCounter>> {
    let mut counters = Vec::new();
    counters
        .try_reserve_exact(BUCKET_COUNT)
        .map_err(|_| Error::Allocation {
            slots: BUCKET_COUNT,
        })?;
    counters.resize_with(BUCKET_COUNT, || BucketCounter {
        value: AtomicUsize::new(0),
    });
    Ok(counters)
}
