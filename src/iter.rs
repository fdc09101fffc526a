//! Cross-bucket traversal.
//!
//! Traversal walks buckets in ascending index order and each bucket front to
//! back. After [`BucketIndex::sort`] this is the global lexicographic order;
//! before it, keys come out grouped by bucket in insertion order.

use crate::core::{BUCKET_COUNT, Key};
use crate::table::BucketIndex;
use std::iter::FusedIterator;

/// Resume token for traversal: a bucket index and a slot within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    bucket: usize,
    index: usize,
}

impl Position {
    /// Bucket (radix value) of the key at this position.
    pub fn bucket(&self) -> usize {
        self.bucket
    }

    /// Slot of the key within its bucket.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<'a> BucketIndex<'a> {
    /// Returns the first key in traversal order and its position, or `None`
    /// if the index is empty.
    pub fn first(&self) -> Option<(Key<'a>, Position)> {
        self.scan(0, 0)
    }

    /// Returns the key following `position` and its position, or `None`
    /// once every key was visited.
    ///
    /// Positions stay valid until the index is modified.
    pub fn next_after(&self, position: Position) -> Option<(Key<'a>, Position)> {
        self.scan(position.bucket, position.index + 1)
    }

    fn scan(&self, from_bucket: usize, mut index: usize) -> Option<(Key<'a>, Position)> {
        for bucket in from_bucket..BUCKET_COUNT {
            if let Some(&key) = self.bucket(bucket).get(index) {
                return Some((key, Position { bucket, index }));
            }
            index = 0;
        }
        None
    }

    /// Iterator over all keys in traversal order.
    pub fn iter(&self) -> Iter<'_, 'a> {
        Iter {
            index: self,
            state: State::Start,
            remaining: Some(self.len),
        }
    }

    /// Iterator over the keys following `position`.
    pub fn iter_from(&self, position: Position) -> Iter<'_, 'a> {
        Iter {
            index: self,
            state: State::After(position),
            remaining: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Start,
    After(Position),
    Done,
}

/// Iterator over the keys of a [`BucketIndex`], built on
/// [`first`](BucketIndex::first) and [`next_after`](BucketIndex::next_after).
#[derive(Debug, Clone)]
pub struct Iter<'i, 'a> {
    index: &'i BucketIndex<'a>,
    state: State,
    // Known only when iterating from the start.
    remaining: Option<usize>,
}

impl Iter<'_, '_> {
    /// Position of the most recently returned key.
    pub fn position(&self) -> Option<Position> {
        match self.state {
            State::After(position) => Some(position),
            State::Start | State::Done => None,
        }
    }
}

impl<'a> Iterator for Iter<'_, 'a> {
    type Item = Key<'a>;

    fn next(&mut self) -> Option<Key<'a>> {
        let found = match self.state {
            State::Start => self.index.first(),
            State::After(position) => self.index.next_after(position),
            State::Done => None,
        };
        match found {
            Some((key, position)) => {
                self.state = State::After(position);
                if let Some(remaining) = &mut self.remaining {
                    *remaining -= 1;
                }
                Some(key)
            }
            None => {
                self.state = State::Done;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match (self.state, self.remaining) {
            (State::Done, _) => (0, Some(0)),
            (_, Some(remaining)) => (remaining, Some(remaining)),
            (_, None) => (0, Some(self.index.len())),
        }
    }
}

impl FusedIterator for Iter<'_, '_> {}

impl<'i, 'a> IntoIterator for &'i BucketIndex<'a> {
    type Item = Key<'a>;
    type IntoIter = Iter<'i, 'a>;

    fn into_iter(self) -> Iter<'i, 'a> {
        self.iter()
    }
}
