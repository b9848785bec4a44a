//! Uniform bin geometry.
//!
//! Each axis is split into `n_bins` equal-width bins over `[min, max]`. Every
//! bin is half-open `[lo, hi)`; the only exception is the uppermost bin of an
//! axis when the last-bin-closed policy is active, which then also admits
//! `x == max`.
//!
//! # Zero-Width Axes
//!
//! An axis with `min == max` is accepted. The half-open window `[min, min)` is
//! empty, so every sample is out of range on that axis under default flags.
//! With last-bin-closed, the single value `x == max` falls into the last bin
//! (`n_bins - 1`). This follows directly from the general edge rule.

use crate::element::SampleElement;
use crate::error::{HistogramError, Result};
use crate::layout::FlatLayout;

// =============================================================================
// AxisBins
// =============================================================================

/// Bin definition for a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBins {
    min: f64,
    max: f64,
    n_bins: usize,
    width: f64,
}

impl AxisBins {
    /// Create bins for one axis.
    ///
    /// `axis` is only used to label errors.
    pub fn new(axis: usize, min: f64, max: f64, n_bins: usize) -> Result<Self> {
        if n_bins == 0 {
            return Err(HistogramError::InvalidBinCount { axis, n_bins: 0 });
        }
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(HistogramError::InvalidRange { axis, min, max });
        }

        Ok(Self {
            min,
            max,
            n_bins,
            width: (max - min) / n_bins as f64,
        })
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Width of each bin. Zero for a zero-width axis.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Resolve a coordinate to its bin on this axis.
    ///
    /// Returns `None` when the coordinate is out of range, including NaN.
    /// A computed index that lands on `n_bins` through rounding is rejected,
    /// never clamped.
    #[inline]
    pub fn bin_index(&self, x: f64, last_bin_closed: bool) -> Option<usize> {
        // Negated comparison also rejects NaN.
        if !(x >= self.min) || x > self.max {
            return None;
        }
        if x == self.max {
            return last_bin_closed.then_some(self.n_bins - 1);
        }

        let bin = ((x - self.min) / self.width).floor();
        if bin < self.n_bins as f64 {
            Some(bin as usize)
        } else {
            None
        }
    }

    /// The `n_bins + 1` bin edges, from `min` to `max`.
    pub fn edges(&self) -> Vec<f64> {
        let mut edges: Vec<f64> = (0..self.n_bins)
            .map(|i| self.min + i as f64 * self.width)
            .collect();
        edges.push(self.max);
        edges
    }
}

// =============================================================================
// BinGeometry
// =============================================================================

/// Bin definitions for every axis plus the row-major output layout.
#[derive(Debug, Clone, PartialEq)]
pub struct BinGeometry {
    axes: Box<[AxisBins]>,
    layout: FlatLayout,
}

impl BinGeometry {
    /// Build geometry from per-axis `(min, max)` ranges and bin counts.
    pub fn new(ranges: &[(f64, f64)], n_bins: &[usize]) -> Result<Self> {
        if ranges.is_empty() {
            return Err(HistogramError::InvalidDimensions {
                n_dim: 0,
                n_elem: 0,
            });
        }
        if n_bins.len() != ranges.len() {
            return Err(HistogramError::LengthMismatch {
                buffer: "n_bins",
                expected: ranges.len(),
                got: n_bins.len(),
            });
        }

        let axes = ranges
            .iter()
            .zip(n_bins)
            .enumerate()
            .map(|(axis, (&(min, max), &n))| AxisBins::new(axis, min, max, n))
            .collect::<Result<Box<[_]>>>()?;
        let layout = FlatLayout::new(n_bins)?;

        Ok(Self { axes, layout })
    }

    /// Build geometry from the flat `[min0, max0, min1, max1, ...]` encoding.
    pub fn from_flat(ranges: &[f64], n_bins: &[usize]) -> Result<Self> {
        if ranges.len() != 2 * n_bins.len() {
            return Err(HistogramError::LengthMismatch {
                buffer: "bin_ranges",
                expected: 2 * n_bins.len(),
                got: ranges.len(),
            });
        }
        let pairs: Vec<(f64, f64)> = ranges.chunks_exact(2).map(|r| (r[0], r[1])).collect();
        Self::new(&pairs, n_bins)
    }

    /// Same range and bin count on every axis.
    pub fn uniform(n_dims: usize, range: (f64, f64), n_bins: usize) -> Result<Self> {
        Self::new(&vec![range; n_dims], &vec![n_bins; n_dims])
    }

    #[inline]
    pub fn n_dims(&self) -> usize {
        self.axes.len()
    }

    #[inline]
    pub fn axes(&self) -> &[AxisBins] {
        &self.axes
    }

    #[inline]
    pub fn axis(&self, axis: usize) -> &AxisBins {
        &self.axes[axis]
    }

    #[inline]
    pub fn layout(&self) -> &FlatLayout {
        &self.layout
    }

    /// Length of each output array.
    #[inline]
    pub fn total_bins(&self) -> usize {
        self.layout.total_bins()
    }

    /// Bin edges of every axis.
    pub fn edges(&self) -> Vec<Vec<f64>> {
        self.axes.iter().map(AxisBins::edges).collect()
    }

    /// Flat offset of the bin containing `point`.
    ///
    /// Exclusion is whole-sample: `None` if any coordinate is out of range
    /// on its axis.
    #[inline]
    pub fn locate<S: SampleElement>(
        &self,
        point: &[S],
        last_bin_closed: bool,
    ) -> Option<usize> {
        debug_assert_eq!(point.len(), self.axes.len());
        let strides = self.layout.strides();
        let mut offset = 0usize;
        for ((axis, &x), &stride) in self.axes.iter().zip(point).zip(strides) {
            offset += axis.bin_index(x.to_f64(), last_bin_closed)? * stride;
        }
        Some(offset)
    }
}
