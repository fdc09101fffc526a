//! Fork-join execution over contiguous chunks.
//!
//! Every parallel phase of the index splits a fixed range `[0, len)` into
//! `W` contiguous chunks with integer-division boundaries (chunk `i` covers
//! `len * i / W .. len * (i + 1) / W`) and runs one rayon task per chunk.
//! A phase returns only after all of its tasks finished.

use crate::error::Result;
use rayon::prelude::*;
use std::ops::Range;

/// Splits work into `W` contiguous chunks and runs them to completion.
#[derive(Debug)]
pub(crate) struct WorkerPool {
    workers: usize,
    // `None` runs on rayon's global pool.
    pool: Option<rayon::ThreadPool>,
}

impl WorkerPool {
    /// Builds a pool of `workers` workers, or one matching the global rayon
    /// pool when `workers == 0`.
    pub(crate) fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Ok(Self {
                workers: rayon::current_num_threads().max(1),
                pool: None,
            });
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("lexbucket-{i}"))
            .build()?;
        Ok(Self {
            workers,
            pool: Some(pool),
        })
    }

    #[inline]
    pub(crate) fn workers(&self) -> usize {
        self.workers
    }

    /// Range of chunk `i` when `[0, len)` is split across all workers.
    #[inline]
    pub(crate) fn chunk(&self, len: usize, i: usize) -> Range<usize> {
        chunk_bounds(len, self.workers, i)
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Runs `task` once per chunk of `[0, len)`, in parallel.
    pub(crate) fn run<F>(&self, len: usize, task: F)
    where
        F: Fn(Range<usize>) + Sync + Send,
    {
        self.install(|| {
            (0..self.workers)
                .into_par_iter()
                .for_each(|i| task(self.chunk(len, i)));
        });
    }

    /// Runs `task` once per chunk of `data`, in parallel, handing each task
    /// the chunk's start index and an exclusive view of it.
    pub(crate) fn run_mut<T, F>(&self, data: &mut [T], task: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        let len = data.len();
        let mut chunks = Vec::with_capacity(self.workers);
        let mut rest = data;
        for i in 0..self.workers {
            let range = self.chunk(len, i);
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            chunks.push((range.start, head));
            rest = tail;
        }
        debug_assert!(rest.is_empty());

        self.install(|| {
            chunks
                .into_par_iter()
                .for_each(|(start, chunk)| task(start, chunk));
        });
    }
}

/// Chunk `i` of `[0, len)` split into `workers` contiguous parts.
#[inline]
pub(crate) fn chunk_bounds(len: usize, workers: usize, i: usize) -> Range<usize> {
    debug_assert!(workers > 0 && i < workers);
    // Widen to avoid overflow of `len * i` on 64-bit sizes.
    let bound = |k: usize| ((len as u128 * k as u128) / workers as u128) as usize;
    bound(i)..bound(i + 1)
}
