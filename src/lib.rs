//! # lexbucket
//!
//! `lexbucket` is a concurrent bucket sort for large collections of short text keys: either
//! discrete strings, or every suffix of one large text.
//!
//! Instead of comparing keys pairwise across the whole input, it routes each key into one of
//! [`BUCKET_COUNT`] buckets using a radix built from its first three characters, then sorts
//! only within buckets. Bucket order already encodes most of the lexicographic order, so the
//! remaining work is many small, independent sorts that spread well across cores.
//!
//! ## Key Features
//!
//! - **Zero-Copy keys**: Buckets hold `&[u8]` views into caller-owned text. The borrow checker
//!   guarantees the text outlives the index.
//! - **Arena storage**: Bucket storage is bump-allocated from a single pre-sized block; buckets
//!   that outgrow it escape into their own heap block.
//! - **Lock-free bulk insertion**: [`BucketIndex::add_suffixes`] counts bucket frequencies in
//!   parallel, carves exact regions, then places keys concurrently with one atomic increment
//!   per key.
//! - **Parallel sort**: [`BucketIndex::sort`] splits the bucket range into one contiguous chunk
//!   per worker.
//!
//! ## Usage
//!
//! ### Discrete keys
//!
//! ```rust
//! use lexbucket::BucketIndex;
//!
//! let mut index = BucketIndex::new(3).unwrap();
//! index.add(b"banana").unwrap();
//! index.add(b"apple").unwrap();
//! index.add(b"cherry").unwrap();
//! index.sort();
//!
//! let (first, position) = index.first().unwrap();
//! assert_eq!(first, b"apple");
//! let (second, _) = index.next_after(position).unwrap();
//! assert_eq!(second, b"banana");
//! ```
//!
//! ### Suffixes of a text
//!
//! ```rust
//! use lexbucket::suffix_sort;
//!
//! // Suffix start offsets of "banana" in sorted order:
//! // a, ana, anana, banana, na, nana
//! assert_eq!(suffix_sort(b"banana").unwrap(), vec![5, 3, 1, 0, 4, 2]);
//! ```
//!
//! ### Configuration
//!
//! ```rust
//! use lexbucket::{ArenaSizing, BucketIndex, IndexConfig};
//!
//! let config = IndexConfig::new(1_000)
//!     .with_workers(2)
//!     .with_arena_sizing(ArenaSizing::Exact);
//! let index = BucketIndex::with_config(config).unwrap();
//! assert_eq!(index.workers(), 2);
//! ```
//!
//! ## Key Domain
//!
//! The radix is designed for ASCII letters. Other bytes are accepted and ordered correctly, but
//! share coarser buckets: see [`radix`](radix::radix) for the exact digit table.
//!
//! ## Logging
//!
//! Phase timings and carve statistics are emitted at `debug` level through the [`log`] facade;
//! bucket escapes at `trace` level.

pub mod algo;
mod arena;
mod bulk;
pub mod config;
pub mod core;
pub mod error;
pub mod iter;
mod pool;
pub mod radix;
mod table;

pub use algo::{bucket_sort, suffix_sort};
pub use config::{ArenaSizing, IndexConfig};
pub use crate::core::{BUCKET_COUNT, Key, KeyAccessor};
pub use error::{Error, Result};
pub use iter::{Iter, Position};
pub use table::{BucketIndex, IndexStats};

pub mod prelude {
    pub use crate::algo::{bucket_sort, suffix_sort};
    pub use crate::config::{ArenaSizing, IndexConfig};
    pub use crate::core::KeyAccessor;
    pub use crate::table::BucketIndex;
}
