//! Owned N-dimensional histogram.
//!
//! [`HistogramNd`] pairs a [`BinGeometry`] with its two output arrays and
//! accumulates batches into them in place. Successive calls add up; call
//! [`HistogramNd::reset`] to start over.

use crate::accumulate::{accumulate, AccumulateSummary};
use crate::element::{SampleElement, WeightElement};
use crate::error::Result;
use crate::geometry::BinGeometry;
use crate::options::HistogramOptions;

/// Counts and cumulated weights over a fixed bin geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramNd {
    geometry: BinGeometry,
    counts: Vec<u32>,
    cumul: Vec<f64>,
}

impl HistogramNd {
    /// Create an empty histogram.
    pub fn new(geometry: BinGeometry) -> Self {
        let total_bins = geometry.total_bins();
        Self {
            geometry,
            counts: vec![0; total_bins],
            cumul: vec![0.0; total_bins],
        }
    }

    /// Accumulate a batch of row-major samples.
    pub fn accumulate<S: SampleElement, W: WeightElement>(
        &mut self,
        samples: &[S],
        weights: Option<&[W]>,
        options: &HistogramOptions<W>,
    ) -> Result<AccumulateSummary> {
        accumulate(
            samples,
            weights,
            &self.geometry,
            options,
            &mut self.counts,
            &mut self.cumul,
        )
    }

    /// Zero both outputs.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.cumul.fill(0.0);
    }

    #[inline]
    pub fn geometry(&self) -> &BinGeometry {
        &self.geometry
    }

    /// Per-bin counts in row-major order.
    #[inline]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Per-bin cumulated weights in row-major order.
    #[inline]
    pub fn cumul(&self) -> &[f64] {
        &self.cumul
    }

    /// Bin edges of every axis.
    pub fn edges(&self) -> Vec<Vec<f64>> {
        self.geometry.edges()
    }

    /// Sum of all counts.
    pub fn total_count(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Sum of all cumulated weights.
    pub fn total_cumul(&self) -> f64 {
        self.cumul.iter().sum()
    }

    /// Count of the bin at a per-axis coordinate.
    ///
    /// Returns `None` unless `index` has one in-range component per axis.
    pub fn count_at(&self, index: &[usize]) -> Option<u32> {
        let offset = self.geometry.layout().checked_offset(index)?;
        Some(self.counts[offset])
    }

    /// Cumulated weight of the bin at a per-axis coordinate.
    ///
    /// Returns `None` unless `index` has one in-range component per axis.
    pub fn cumul_at(&self, index: &[usize]) -> Option<f64> {
        let offset = self.geometry.layout().checked_offset(index)?;
        Some(self.cumul[offset])
    }

    /// Consume the histogram, returning `(counts, cumul)`.
    pub fn into_parts(self) -> (Vec<u32>, Vec<f64>) {
        (self.counts, self.cumul)
    }
}
