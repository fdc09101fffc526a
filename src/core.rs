//! Core traits and types for lexbucket.
//!
//! This module defines:
//! - [`Key`]: the non-owning key reference stored in buckets.
//! - [`KeyAccessor`]: the trait used to feed whole collections into an index.
//! - The radix geometry shared by every component.

use std::collections::VecDeque;

/// Number of leading characters folded into the radix value.
pub const CHARS_IN_HASH: usize = 3;

/// Bits per radix digit.
pub const DIGIT_BITS: u32 = 6;

/// Number of buckets, one per possible radix value (`64^3`).
pub const BUCKET_COUNT: usize = 1 << (DIGIT_BITS as usize * CHARS_IN_HASH);

/// A key reference: a view into caller-owned text.
///
/// The index never copies key bytes. The lifetime ties every stored key to
/// the text it borrows from, so the text outlives the index by construction.
pub type Key<'a> = &'a [u8];

/// Placeholder written into slots that hold no key yet.
pub(crate) const EMPTY_KEY: Key<'static> = &[];

/// A trait for accessing key data from a collection without copying.
///
/// This trait allows [`BucketIndex::extend_from`](crate::BucketIndex::extend_from)
/// and [`bucket_sort`](crate::bucket_sort) to consume any collection whose
/// elements can be viewed as byte slices (e.g., `Vec<String>`, `Vec<Vec<u8>>`,
/// or custom columnar layouts).
///
/// # Examples
///
/// ```
/// use lexbucket::core::KeyAccessor;
///
/// struct Words {
///     data: Vec<String>,
/// }
///
/// impl KeyAccessor for Words {
///     fn get_key(&self, index: usize) -> &[u8] {
///         self.data[index].as_bytes()
///     }
///
///     fn len(&self) -> usize {
///         self.data.len()
///     }
/// }
/// ```
pub trait KeyAccessor {
    /// Returns a byte slice representing the key at the given index.
    fn get_key(&self, index: usize) -> &[u8];

    /// Returns the number of items in the collection.
    fn len(&self) -> usize;

    /// Returns `true` if the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Blanket implementation for indexable slices of byte-ref types.
impl<T: AsRef<[u8]>> KeyAccessor for [T] {
    fn get_key(&self, index: usize) -> &[u8] {
        self[index].as_ref()
    }

    fn len(&self) -> usize {
        self.len()
    }
}

// Explicit Vec impl to improve ergonomics (avoiding .as_slice()).
impl<T: AsRef<[u8]>> KeyAccessor for Vec<T> {
    fn get_key(&self, index: usize) -> &[u8] {
        self[index].as_ref()
    }

    fn len(&self) -> usize {
        self.len()
    }
}

impl<T: AsRef<[u8]>> KeyAccessor for VecDeque<T> {
    fn get_key(&self, index: usize) -> &[u8] {
        self[index].as_ref()
    }

    fn len(&self) -> usize {
        self.len()
    }
}
