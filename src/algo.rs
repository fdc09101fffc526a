//! Per-bucket parallel sorting and one-shot sort entry points.
//!
//! Bucket order already encodes the first [`CHARS_IN_HASH`](crate::core::CHARS_IN_HASH)
//! characters of every key, so [`BucketIndex::sort`] only has to order keys
//! within each bucket. Buckets are independent, so the bucket range is split
//! into one contiguous chunk per worker and sorted without synchronization.
//!
//! The main one-shot entry points are [`bucket_sort`] and [`suffix_sort`].

use crate::arena::Storage;
use crate::config::{ArenaSizing, IndexConfig};
use crate::core::{Key, KeyAccessor};
use crate::error::Result;
use crate::radix::shared_prefix_len;
use crate::table::BucketIndex;
use log::debug;
use std::cmp::Ordering;
use std::time::Instant;

impl<'a> BucketIndex<'a> {
    /// Sorts every bucket in place, in parallel.
    ///
    /// Afterwards iteration yields all stored keys in ascending
    /// lexicographic (byte-wise) order. Keys comparing equal keep no
    /// particular relative order.
    pub fn sort(&mut self) {
        let started = Instant::now();
        let slots = self.arena.shared();
        let slots = &slots;

        self.pool.run_mut(&mut self.buckets, |start, chunk| {
            let mut previous_last: Option<Key<'a>> = None;
            for (j, bucket) in chunk.iter_mut().enumerate() {
                let keys: &mut [Key<'a>] = match &mut bucket.storage {
                    Storage::Unallocated => continue,
                    // SAFETY: arena regions of distinct buckets never overlap
                    // and every bucket belongs to exactly one chunk.
                    Storage::Arena { offset } => unsafe { slots.region_mut(*offset, bucket.len) },
                    Storage::Heap(block) => &mut block[..bucket.len],
                };
                sort_bucket((start + j) as u32, keys);

                if cfg!(debug_assertions) {
                    if let (Some(prev), Some(&first)) = (previous_last, keys.first()) {
                        debug_assert!(prev <= first, "bucket {} out of order", start + j);
                    }
                    if let Some(&last) = keys.last() {
                        previous_last = Some(last);
                    }
                }
            }
        });

        self.sorted = true;
        debug!(
            "sorted {} keys across {} workers in {:?}",
            self.len,
            self.pool.workers(),
            started.elapsed()
        );
    }
}

/// Sorts the keys of one bucket.
///
/// All keys of bucket `radix` share the bytes its letter digits encode, so
/// comparison starts right after them.
fn sort_bucket(radix: u32, keys: &mut [Key<'_>]) {
    if keys.len() < 2 {
        return;
    }
    let skip = shared_prefix_len(radix);
    keys.sort_unstable_by(|a, b| compare_keys(a, b, skip));
}

/// Compares two keys known to be equal on their first `skip` bytes.
#[inline(always)]
fn compare_keys(a: &[u8], b: &[u8], skip: usize) -> Ordering {
    debug_assert!(a.len() >= skip && b.len() >= skip);
    debug_assert_eq!(a[..skip], b[..skip]);
    a[skip..].cmp(&b[skip..])
}

/// Sorts a collection of keys, returning references in ascending order.
///
/// # Examples
///
/// ```
/// use lexbucket::bucket_sort;
///
/// let data = vec!["banana", "apple", "cherry"];
/// let sorted = bucket_sort(&data).unwrap();
///
/// assert_eq!(sorted, vec![&b"apple"[..], &b"banana"[..], &b"cherry"[..]]);
/// ```
pub fn bucket_sort<T: KeyAccessor + Sync + ?Sized>(keys: &T) -> Result<Vec<&[u8]>> {
    let config = IndexConfig::new(keys.len()).with_arena_sizing(ArenaSizing::Exact);
    let mut index = BucketIndex::with_config(config)?;
    index.extend_from(keys)?;
    index.sort();
    Ok(index.iter().collect())
}

/// Sorts all suffixes of `text`, returning their starting offsets in
/// ascending order of the suffixes.
///
/// # Examples
///
/// ```
/// use lexbucket::suffix_sort;
///
/// assert_eq!(suffix_sort(b"banana").unwrap(), vec![5, 3, 1, 0, 4, 2]);
/// ```
pub fn suffix_sort(text: &[u8]) -> Result<Vec<usize>> {
    let config = IndexConfig::new(text.len()).with_arena_sizing(ArenaSizing::Exact);
    let mut index = BucketIndex::with_config(config)?;
    index.add_suffixes(text)?;
    index.sort();
    Ok(index.iter().map(|suffix| text.len() - suffix.len()).collect())
}
