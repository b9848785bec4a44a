//! Parallelism hint and row-parallel accumulation.
//!
//! Per-sample work is independent and output updates are pure additions, so
//! the sample range is partitioned across threads:
//!
//! ```text
//! chunk 0: [scratch_0]  ──┐
//! chunk 1: [scratch_1]  ──┼──► reduce_into() ──► [caller outputs]
//! ...                     │
//! chunk N: [scratch_N]  ──┘
//! ```
//!
//! Each chunk accumulates into its own zeroed scratch histogram with no
//! synchronization, then a single reduction adds every scratch buffer into
//! the caller's outputs. The caller's buffers are untouched until the
//! reduction, so they never observe a partial update.

use rayon::prelude::*;

use crate::accumulate::{accumulate_kernel, AccumulateSummary};
use crate::element::{SampleElement, WeightElement};
use crate::geometry::BinGeometry;
use crate::options::HistogramOptions;

/// Minimum samples each thread must receive before splitting is worthwhile.
pub const MIN_SAMPLES_PER_THREAD: usize = 4096;

/// Row-parallel is only used when `n_samples > ROW_PARALLEL_THRESHOLD * total_bins`,
/// otherwise the reduction over large scratch buffers dominates.
pub const ROW_PARALLEL_THRESHOLD: f32 = 4.0;

// =============================================================================
// Parallelism
// =============================================================================

/// Threading hint for accumulation.
///
/// A parallel hint is an upper bound on the number of chunks a batch is split
/// into. [`Parallelism::for_batch`] falls back to sequential execution when the
/// batch cannot pay for per-chunk scratch buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    #[default]
    Sequential,
    /// Split the batch into at most `n` chunks on the rayon pool.
    Parallel(usize),
}

impl Parallelism {
    /// Hint from a thread count: `0` uses every thread of the current rayon
    /// pool, `1` is sequential.
    pub fn from_threads(n_threads: usize) -> Self {
        let n = if n_threads == 0 {
            rayon::current_num_threads()
        } else {
            n_threads
        };
        if n > 1 {
            Self::Parallel(n)
        } else {
            Self::Sequential
        }
    }

    /// Cap the chunk count so every chunk receives at least `min_per_chunk`
    /// items.
    pub fn correct_for_workload(self, n_items: usize, min_per_chunk: usize) -> Self {
        match self {
            Self::Parallel(n) => {
                let chunks = n.min(n_items / min_per_chunk.max(1));
                if chunks > 1 {
                    Self::Parallel(chunks)
                } else {
                    Self::Sequential
                }
            }
            Self::Sequential => Self::Sequential,
        }
    }

    /// Strategy for a batch of `n_samples` over `total_bins` bins.
    pub fn for_batch(self, n_samples: usize, total_bins: usize) -> Self {
        if n_samples as f32 <= ROW_PARALLEL_THRESHOLD * total_bins as f32 {
            return Self::Sequential;
        }
        self.correct_for_workload(n_samples, MIN_SAMPLES_PER_THREAD)
    }
}

// =============================================================================
// Scratch Histogram
// =============================================================================

/// Private per-chunk output buffers.
#[derive(Debug, Clone)]
pub struct ScratchHistogram {
    pub counts: Box<[u32]>,
    pub cumul: Box<[f64]>,
}

impl ScratchHistogram {
    /// Zeroed buffers of `total_bins` length.
    pub fn new(total_bins: usize) -> Self {
        Self {
            counts: vec![0u32; total_bins].into_boxed_slice(),
            cumul: vec![0.0f64; total_bins].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    /// Add this buffer into the target outputs.
    ///
    /// Counts saturate at `u32::MAX`; returns the number of increments lost
    /// to saturation.
    pub fn reduce_into(&self, histo: &mut [u32], cumul: &mut [f64]) -> u64 {
        debug_assert_eq!(histo.len(), self.num_bins());
        debug_assert_eq!(cumul.len(), self.num_bins());

        let mut lost = 0u64;
        for (dst, &src) in histo.iter_mut().zip(self.counts.iter()) {
            let (sum, overflow) = dst.overflowing_add(src);
            if overflow {
                lost += *dst as u64 + src as u64 - u32::MAX as u64;
                *dst = u32::MAX;
            } else {
                *dst = sum;
            }
        }
        for (dst, &src) in cumul.iter_mut().zip(self.cumul.iter()) {
            *dst += src;
        }
        lost
    }
}

// =============================================================================
// Row-Parallel Accumulation
// =============================================================================

/// Accumulate with samples partitioned across `n_threads` chunks.
///
/// Inputs must already be validated.
pub(crate) fn accumulate_row_parallel<S: SampleElement, W: WeightElement>(
    samples: &[S],
    weights: Option<&[W]>,
    geometry: &BinGeometry,
    options: &HistogramOptions<W>,
    histo: &mut [u32],
    cumul: &mut [f64],
    n_threads: usize,
) -> AccumulateSummary {
    let n_dim = geometry.n_dims();
    let n_elem = samples.len() / n_dim;
    let total_bins = geometry.total_bins();
    let chunk_elems = n_elem.div_ceil(n_threads.max(1)).max(1);

    let partials: Vec<(ScratchHistogram, AccumulateSummary)> = samples
        .par_chunks(chunk_elems * n_dim)
        .enumerate()
        .map(|(chunk, points)| {
            let start = chunk * chunk_elems;
            let end = start + points.len() / n_dim;
            let chunk_weights = weights.map(|w| &w[start..end]);

            let mut scratch = ScratchHistogram::new(total_bins);
            let summary = accumulate_kernel(
                points,
                chunk_weights,
                geometry,
                options,
                &mut scratch.counts,
                &mut scratch.cumul,
            );
            (scratch, summary)
        })
        .collect();

    // Reduce in chunk order so results are reproducible for a given thread count.
    let mut total = AccumulateSummary::default();
    for (scratch, summary) in &partials {
        total.merge(summary);
        total.n_saturated += scratch.reduce_into(histo, cumul);
    }
    total
}
