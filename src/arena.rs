//! Bump-allocated key slot storage.
//!
//! The arena is one contiguous block of key slots. Buckets carve regions from
//! its unused tail and never hand them back: a bucket that grows copies its
//! entries into a fresh region and abandons the old one in place. When the
//! tail runs dry the bucket escapes into its own heap block, see
//! [`Storage::Heap`].
//!
//! ```text
//! slots: [b7 b7 b7 b7][b2 b2 b2 b2][b7 b7 b7 b7 b7 b7 b7 b7][ free ........ ]
//!         ^ abandoned   ^ bucket 2   ^ bucket 7 after growth  ^ used
//! ```

use crate::core::{EMPTY_KEY, Key};
use crate::error::{Error, Result};
use std::marker::PhantomData;

/// Where a bucket keeps its entries.
#[derive(Debug, Default)]
pub(crate) enum Storage<'a> {
    /// No storage yet (capacity 0).
    #[default]
    Unallocated,
    /// A region of the arena starting at `offset`.
    Arena { offset: usize },
    /// An independently owned block, used once the arena tail was too short.
    Heap(Box<[Key<'a>]>),
}

impl Storage<'_> {
    #[inline]
    pub(crate) fn is_escaped(&self) -> bool {
        matches!(self, Storage::Heap(_))
    }
}

/// Single pre-sized block of key slots with a bump cursor.
#[derive(Debug)]
pub(crate) struct Arena<'a> {
    slots: Box<[Key<'a>]>,
    used: usize,
}

impl<'a> Arena<'a> {
    /// Allocates an arena of `capacity` slots.
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            slots: alloc_slots(capacity)?,
            used: 0,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.slots.len() - self.used
    }

    /// Carves `len` slots from the tail, returning the region offset, or
    /// `None` when the tail is too short.
    pub(crate) fn carve(&mut self, len: usize) -> Option<usize> {
        if len > self.remaining() {
            return None;
        }
        let offset = self.used;
        self.used += len;
        debug_assert!(self.used <= self.slots.len());
        Some(offset)
    }

    /// Forgets every region handed out so far.
    ///
    /// Only valid once no bucket refers to the arena any more.
    pub(crate) fn rewind(&mut self) {
        self.used = 0;
    }

    #[inline]
    pub(crate) fn region(&self, offset: usize, len: usize) -> &[Key<'a>] {
        &self.slots[offset..offset + len]
    }

    #[inline]
    pub(crate) fn region_mut(&mut self, offset: usize, len: usize) -> &mut [Key<'a>] {
        &mut self.slots[offset..offset + len]
    }

    /// Copies `len` entries from the region at `from` into the region at `to`.
    pub(crate) fn relocate(&mut self, from: usize, to: usize, len: usize) {
        self.slots.copy_within(from..from + len, to);
    }

    /// Shared handle for disjoint concurrent access to carved regions.
    pub(crate) fn shared(&mut self) -> SharedSlots<'_, 'a> {
        SharedSlots::new(&mut self.slots)
    }
}

/// Allocates a block of `len` empty slots, reporting failure instead of
/// aborting.
pub(crate) fn alloc_slots<'a>(len: usize) -> Result<Box<[Key<'a>]>> {
    let mut block: Vec<Key<'a>> = Vec::new();
    block
        .try_reserve_exact(len)
        .map_err(|_| Error::Allocation { slots: len })?;
    block.resize(len, EMPTY_KEY);
    Ok(block.into_boxed_slice())
}

/// Raw view over a block of slots that several workers write into at once.
///
/// The view itself performs no synchronization. Each caller must make sure
/// that no two workers touch the same slot, which holds for the engine
/// because every slot index is either inside a region owned by exactly one
/// bucket (sorting) or claimed through an atomic cursor (bulk placement).
pub(crate) struct SharedSlots<'s, 'a> {
    base: *mut Key<'a>,
    len: usize,
    _block: PhantomData<&'s mut [Key<'a>]>,
}

// SAFETY: `SharedSlots` only hands out access through the unsafe methods
// below, whose callers guarantee disjointness. Keys are shared references to
// `[u8]`, which are `Send + Sync`.
unsafe impl Send for SharedSlots<'_, '_> {}
unsafe impl Sync for SharedSlots<'_, '_> {}

impl<'s, 'a> SharedSlots<'s, 'a> {
    pub(crate) fn new(block: &'s mut [Key<'a>]) -> Self {
        Self {
            base: block.as_mut_ptr(),
            len: block.len(),
            _block: PhantomData,
        }
    }

    /// Writes `key` at `index`.
    ///
    /// # Safety
    ///
    /// No other thread may read or write slot `index` concurrently.
    #[inline(always)]
    pub(crate) unsafe fn write(&self, index: usize, key: Key<'a>) {
        assert!(index < self.len, "slot {index} outside block of {}", self.len);
        // SAFETY: in bounds per the assert; exclusivity per the caller.
        unsafe { self.base.add(index).write(key) }
    }

    /// Mutable view of `len` slots starting at `offset`.
    ///
    /// # Safety
    ///
    /// The range must not overlap any other range accessed concurrently.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn region_mut(&self, offset: usize, len: usize) -> &'s mut [Key<'a>] {
        assert!(offset + len <= self.len, "region outside block");
        // SAFETY: in bounds per the assert; exclusivity per the caller.
        unsafe { std::slice::from_raw_parts_mut(self.base.add(offset), len) }
    }
}
