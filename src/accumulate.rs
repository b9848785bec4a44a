//! The accumulation engine.
//!
//! For each sample point, in input order:
//!
//! 1. Resolve every coordinate to a bin on its axis; if any axis rejects the
//!    coordinate the whole sample is skipped.
//! 2. Increment the count of the resolved bin.
//! 3. If a weight buffer is present and the sample's weight passes the
//!    active bounds, add the weight (widened to `f64`) to the bin's
//!    cumulated weight.
//!
//! Counts and cumulation are gated independently: weight filters never
//! affect counts, and without a weight buffer nothing is cumulated.
//!
//! # Numeric Semantics
//!
//! Weights are widened to `f64` before summation regardless of their storage
//! type. Counts are `u32` and saturate at `u32::MAX`; saturated increments are
//! reported in [`AccumulateSummary::n_saturated`] and logged as a warning.
//!
//! # Output Contract
//!
//! Outputs are only ever incremented, never reset. All validation happens
//! before the first write, so a rejected call leaves the outputs untouched.

use crate::element::{SampleElement, WeightElement};
use crate::error::{HistogramError, Result};
use crate::geometry::BinGeometry;
use crate::options::HistogramOptions;
use crate::parallel::{accumulate_row_parallel, Parallelism};

// =============================================================================
// Summary
// =============================================================================

/// Per-call tallies of what happened to each sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulateSummary {
    /// Samples that landed in a bin (and were counted).
    pub n_in_range: u64,
    /// Samples rejected by at least one axis.
    pub n_out_of_range: u64,
    /// Counted samples whose weight was cumulated.
    pub n_cumulated: u64,
    /// Counted samples whose weight was rejected by a weight bound.
    pub n_weight_filtered: u64,
    /// Count increments lost to `u32` saturation.
    pub n_saturated: u64,
}

impl AccumulateSummary {
    /// Total samples seen.
    #[inline]
    pub fn n_samples(&self) -> u64 {
        self.n_in_range + self.n_out_of_range
    }

    /// Fold another summary into this one.
    #[inline]
    pub fn merge(&mut self, other: &Self) {
        self.n_in_range += other.n_in_range;
        self.n_out_of_range += other.n_out_of_range;
        self.n_cumulated += other.n_cumulated;
        self.n_weight_filtered += other.n_weight_filtered;
        self.n_saturated += other.n_saturated;
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Accumulate a batch of samples into caller-owned outputs.
///
/// # Arguments
/// * `samples` - Row-major `n_elem × n_dim` coordinates
/// * `weights` - Optional per-sample weights (length `n_elem`)
/// * `geometry` - Bin ranges and counts for every axis
/// * `options` - Weight bounds, edge policy and threading hint
/// * `histo` - Count output (length `geometry.total_bins()`)
/// * `cumul` - Cumulated-weight output (length `geometry.total_bins()`)
///
/// # Example
///
/// ```
/// use ndhist::{accumulate, BinGeometry, HistogramOptions};
///
/// let geometry = BinGeometry::new(&[(0.0, 10.0)], &[2]).unwrap();
/// let samples = [0.0f64, 2.5, 5.0, 7.5, 10.0];
/// let weights = [1.0f32; 5];
/// let mut histo = vec![0u32; 2];
/// let mut cumul = vec![0.0f64; 2];
///
/// let opts = HistogramOptions::default().with_last_bin_closed(true);
/// accumulate(&samples, Some(&weights[..]), &geometry, &opts, &mut histo, &mut cumul).unwrap();
/// assert_eq!(histo, vec![2, 3]);
/// ```
pub fn accumulate<S: SampleElement, W: WeightElement>(
    samples: &[S],
    weights: Option<&[W]>,
    geometry: &BinGeometry,
    options: &HistogramOptions<W>,
    histo: &mut [u32],
    cumul: &mut [f64],
) -> Result<AccumulateSummary> {
    let n_elem = validate(samples, weights, geometry, histo, cumul)?;

    let strategy = options.parallelism.for_batch(n_elem, geometry.total_bins());
    log::debug!(
        "accumulating {} samples ({}, {}) into {} bins over {} dims, strategy {:?}",
        n_elem,
        S::NAME,
        W::NAME,
        geometry.total_bins(),
        geometry.n_dims(),
        strategy
    );

    let summary = match strategy {
        Parallelism::Sequential => {
            accumulate_kernel(samples, weights, geometry, options, histo, cumul)
        }
        Parallelism::Parallel(n_threads) => {
            accumulate_row_parallel(samples, weights, geometry, options, histo, cumul, n_threads)
        }
    };

    if summary.n_saturated > 0 {
        log::warn!(
            "{} count increments saturated at u32::MAX; affected bins are lower bounds",
            summary.n_saturated
        );
    }
    Ok(summary)
}

/// Same as [`accumulate`], ignoring the parallelism hint.
pub fn accumulate_sequential<S: SampleElement, W: WeightElement>(
    samples: &[S],
    weights: Option<&[W]>,
    geometry: &BinGeometry,
    options: &HistogramOptions<W>,
    histo: &mut [u32],
    cumul: &mut [f64],
) -> Result<AccumulateSummary> {
    let options = options.with_parallelism(Parallelism::Sequential);
    accumulate(samples, weights, geometry, &options, histo, cumul)
}

/// Check buffer shapes against the geometry. Returns the sample count.
fn validate<S, W>(
    samples: &[S],
    weights: Option<&[W]>,
    geometry: &BinGeometry,
    histo: &[u32],
    cumul: &[f64],
) -> Result<usize> {
    let n_dim = geometry.n_dims();
    if samples.len() % n_dim != 0 {
        return Err(HistogramError::RaggedSamples {
            len: samples.len(),
            n_dim,
        });
    }
    let n_elem = samples.len() / n_dim;

    if let Some(weights) = weights {
        if weights.len() != n_elem {
            return Err(HistogramError::LengthMismatch {
                buffer: "weights",
                expected: n_elem,
                got: weights.len(),
            });
        }
    }

    let total_bins = geometry.total_bins();
    if histo.len() != total_bins {
        return Err(HistogramError::LengthMismatch {
            buffer: "histo",
            expected: total_bins,
            got: histo.len(),
        });
    }
    if cumul.len() != total_bins {
        return Err(HistogramError::LengthMismatch {
            buffer: "cumul",
            expected: total_bins,
            got: cumul.len(),
        });
    }

    Ok(n_elem)
}

// =============================================================================
// Kernel
// =============================================================================

/// Sequential hot loop over pre-validated buffers.
#[inline]
pub(crate) fn accumulate_kernel<S: SampleElement, W: WeightElement>(
    samples: &[S],
    weights: Option<&[W]>,
    geometry: &BinGeometry,
    options: &HistogramOptions<W>,
    histo: &mut [u32],
    cumul: &mut [f64],
) -> AccumulateSummary {
    let n_dim = geometry.n_dims();
    debug_assert_eq!(samples.len() % n_dim, 0);
    debug_assert!(weights.map_or(true, |w| w.len() == samples.len() / n_dim));

    let mut summary = AccumulateSummary::default();
    for (i, point) in samples.chunks_exact(n_dim).enumerate() {
        let Some(bin) = geometry.locate(point, options.last_bin_closed) else {
            summary.n_out_of_range += 1;
            continue;
        };
        debug_assert!(bin < histo.len());
        summary.n_in_range += 1;

        match histo[bin].checked_add(1) {
            Some(count) => histo[bin] = count,
            None => summary.n_saturated += 1,
        }

        if let Some(weights) = weights {
            let weight = weights[i];
            if options.admits_weight(weight) {
                cumul[bin] += weight.to_f64();
                summary.n_cumulated += 1;
            } else {
                summary.n_weight_filtered += 1;
            }
        }
    }
    summary
}
