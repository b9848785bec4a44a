//! Row-major layout of the flat output arrays.
//!
//! Maps a per-axis bin coordinate `(i_0, ..., i_{d-1})` to a single offset
//! `Σ i_k * stride_k`, where the last axis varies fastest:
//!
//! ```text
//! stride[d-1] = 1
//! stride[k]   = stride[k+1] * n_bins[k+1]
//! ```

use crate::error::{HistogramError, Result};

/// Row-major strides over a bin-count shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatLayout {
    /// Number of bins along each axis.
    shape: Box<[usize]>,
    /// Offset step for a unit move along each axis.
    strides: Box<[usize]>,
    /// Product of `shape`.
    total_bins: usize,
}

impl FlatLayout {
    /// Create a layout for the given shape.
    ///
    /// Fails with [`HistogramError::TooManyBins`] if the product of the shape
    /// does not fit in `usize`. Zero-sized axes are rejected by
    /// [`BinGeometry`](crate::BinGeometry) before a layout is built.
    pub fn new(shape: &[usize]) -> Result<Self> {
        let mut strides = vec![0usize; shape.len()];
        let mut stride = 1usize;
        for (k, &n) in shape.iter().enumerate().rev() {
            strides[k] = stride;
            stride = stride.checked_mul(n).ok_or(HistogramError::TooManyBins)?;
        }

        Ok(Self {
            shape: shape.into(),
            strides: strides.into_boxed_slice(),
            total_bins: stride,
        })
    }

    /// Number of axes.
    #[inline]
    pub fn n_dims(&self) -> usize {
        self.shape.len()
    }

    /// Bins per axis.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Per-axis strides.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Total number of bins (length of each output array).
    #[inline]
    pub fn total_bins(&self) -> usize {
        self.total_bins
    }

    /// Flat offset of a bin coordinate, or `None` if the coordinate has the
    /// wrong number of axes or any component is outside its axis.
    #[inline]
    pub fn checked_offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.n_dims() {
            return None;
        }
        let mut offset = 0;
        for (k, &i) in index.iter().enumerate() {
            if i >= self.shape[k] {
                return None;
            }
            offset += i * self.strides[k];
        }
        Some(offset)
    }

    /// Flat offset of a bin coordinate.
    ///
    /// # Panics
    ///
    /// Panics if `index.len() != self.n_dims()` or if any component is not
    /// below the bin count of its axis.
    #[inline]
    pub fn offset(&self, index: &[usize]) -> usize {
        match self.checked_offset(index) {
            Some(offset) => offset,
            None => panic!(
                "bin index {index:?} out of bounds for shape {:?}",
                self.shape
            ),
        }
    }

    /// Per-axis bin coordinate of a flat offset.
    pub fn unravel(&self, mut flat: usize) -> Vec<usize> {
        debug_assert!(flat < self.total_bins);
        self.strides
            .iter()
            .map(|&s| {
                let i = flat / s;
                flat %= s;
                i
            })
            .collect()
    }
}
