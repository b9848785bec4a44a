//! ndhist: N-dimensional histograms over uniform bins.
//!
//! This crate bins batches of multi-dimensional sample points into a flat,
//! row-major grid of equal-width bins, accumulating two parallel outputs:
//! an event count per bin and a cumulated weight per bin.
//!
//! # Key Types
//!
//! - [`BinGeometry`] / [`AxisBins`]: validated per-axis ranges and bin counts
//! - [`FlatLayout`]: row-major stride mapping from bin coordinates to offsets
//! - [`HistogramOptions`] / [`OptionFlags`]: weight filters and edge policy
//! - [`accumulate`]: the accumulation engine over caller-owned outputs
//! - [`HistogramNd`]: an owned accumulator holding both outputs
//! - [`dispatch`]: status-code entry points for each sample × weight type
//!
//! # Example
//!
//! ```
//! use ndhist::{BinGeometry, HistogramNd, HistogramOptions};
//!
//! let geometry = BinGeometry::new(&[(0.0, 10.0)], &[2]).unwrap();
//! let mut hist = HistogramNd::new(geometry);
//!
//! let samples = [0.0f64, 2.5, 5.0, 7.5, 9.99];
//! let weights = [1.0f64; 5];
//! hist.accumulate(&samples, Some(&weights[..]), &HistogramOptions::default()).unwrap();
//!
//! assert_eq!(hist.counts(), &[2, 2]);
//! assert_eq!(hist.cumul(), &[2.0, 2.0]);
//! ```
//!
//! # Output Contract
//!
//! Outputs are only ever incremented. Callers supplying their own buffers must
//! zero them before a fresh accumulation; leaving them untouched accumulates
//! across batches.

pub mod accumulate;
pub mod dispatch;
pub mod element;
pub mod error;
pub mod geometry;
pub mod histogram;
pub mod layout;
pub mod options;
pub mod parallel;

pub use accumulate::{accumulate, accumulate_sequential, AccumulateSummary};
pub use dispatch::{histogramnd_dyn, SampleData, WeightData};
pub use element::{SampleElement, WeightElement};
pub use error::{HistogramError, Result, Status};
pub use geometry::{AxisBins, BinGeometry};
pub use histogram::HistogramNd;
pub use layout::FlatLayout;
pub use options::{HistogramOptions, OptionFlags};
pub use parallel::Parallelism;
