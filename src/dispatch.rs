//! Type-dispatch facade.
//!
//! Two ways in for callers that only know element types at the boundary:
//!
//! - Nine monomorphic entry points, `histogramnd_<sample>_<weight>`, one per
//!   (`f64` | `f32` | `i32`) × (`f64` | `f32` | `i32`) pair. They take
//!   pointer-like optional slices and raw integer shapes and return an
//!   integer status code (`0` on success, see [`Status`]).
//! - [`histogramnd_dyn`], which switches on runtime type tags
//!   ([`SampleData`], [`WeightData`]) and returns a typed `Result`.
//!
//! Neither carries any binning logic; both forward to [`accumulate`].

use crate::accumulate::{accumulate, AccumulateSummary};
use crate::element::{SampleElement, WeightElement};
use crate::error::{HistogramError, Result, Status};
use crate::geometry::BinGeometry;
use crate::options::HistogramOptions;

// =============================================================================
// Status-Code Entry Points
// =============================================================================

/// Shared body of the status-code entry points.
///
/// Slices may be longer than the declared shape; only the leading
/// `n_elem * n_dim` samples, `n_elem` weights, `2 * n_dim` range values,
/// `n_dim` bin counts and `total_bins` output cells are used.
#[allow(clippy::too_many_arguments)]
pub fn histogramnd<S: SampleElement, W: WeightElement>(
    sample: Option<&[S]>,
    weights: Option<&[W]>,
    n_dim: i32,
    n_elem: i32,
    bin_ranges: Option<&[f64]>,
    n_bins: Option<&[i32]>,
    histo: Option<&mut [u32]>,
    cumul: Option<&mut [f64]>,
    opt_flags: i32,
    weight_min: W,
    weight_max: W,
) -> Result<AccumulateSummary> {
    let invalid = HistogramError::InvalidDimensions {
        n_dim: n_dim as i64,
        n_elem: n_elem as i64,
    };
    if n_dim <= 0 || n_elem < 0 {
        return Err(invalid);
    }
    let n_dim = n_dim as usize;
    let n_elem = n_elem as usize;
    let n_values = n_elem.checked_mul(n_dim).ok_or(invalid)?;

    let sample = sample.ok_or(HistogramError::NullBuffer("sample"))?;
    let bin_ranges = bin_ranges.ok_or(HistogramError::NullBuffer("bin_ranges"))?;
    let n_bins = n_bins.ok_or(HistogramError::NullBuffer("n_bins"))?;
    let histo = histo.ok_or(HistogramError::NullBuffer("histo"))?;
    let cumul = cumul.ok_or(HistogramError::NullBuffer("cumul"))?;

    let n_bins = leading("n_bins", n_bins, n_dim)?
        .iter()
        .enumerate()
        .map(|(axis, &n)| {
            usize::try_from(n)
                .ok()
                .filter(|&n| n > 0)
                .ok_or(HistogramError::InvalidBinCount {
                    axis,
                    n_bins: n as i64,
                })
        })
        .collect::<Result<Vec<usize>>>()?;
    let bin_ranges = leading("bin_ranges", bin_ranges, 2 * n_dim)?;
    let geometry = BinGeometry::from_flat(bin_ranges, &n_bins)?;

    let sample = leading("sample", sample, n_values)?;
    let weights = weights.map(|w| leading("weights", w, n_elem)).transpose()?;

    let total_bins = geometry.total_bins();
    let histo = leading_mut("histo", histo, total_bins)?;
    let cumul = leading_mut("cumul", cumul, total_bins)?;

    let options = HistogramOptions::from_raw(opt_flags, weight_min, weight_max);
    accumulate(sample, weights, &geometry, &options, histo, cumul)
}

fn leading<'a, T>(buffer: &'static str, data: &'a [T], len: usize) -> Result<&'a [T]> {
    data.get(..len).ok_or(HistogramError::LengthMismatch {
        buffer,
        expected: len,
        got: data.len(),
    })
}

fn leading_mut<'a, T>(buffer: &'static str, data: &'a mut [T], len: usize) -> Result<&'a mut [T]> {
    let got = data.len();
    data.get_mut(..len).ok_or(HistogramError::LengthMismatch {
        buffer,
        expected: len,
        got,
    })
}

/// Collapse a result into a status code.
pub fn status_of<T>(result: Result<T>) -> i32 {
    match result {
        Ok(_) => Status::Success.code(),
        Err(err) => {
            log::debug!("histogramnd rejected: {err}");
            err.status_code()
        }
    }
}

macro_rules! histogramnd_entry {
    ($name:ident, $s:ty, $w:ty) => {
        #[doc = concat!(
            "Status-code histogram of `", stringify!($s), "` samples with `",
            stringify!($w), "` weights. See [`histogramnd`]."
        )]
        #[allow(clippy::too_many_arguments)]
        pub fn $name(
            sample: Option<&[$s]>,
            weights: Option<&[$w]>,
            n_dim: i32,
            n_elem: i32,
            bin_ranges: Option<&[f64]>,
            n_bins: Option<&[i32]>,
            histo: Option<&mut [u32]>,
            cumul: Option<&mut [f64]>,
            opt_flags: i32,
            weight_min: $w,
            weight_max: $w,
        ) -> i32 {
            status_of(histogramnd::<$s, $w>(
                sample,
                weights,
                n_dim,
                n_elem,
                bin_ranges,
                n_bins,
                histo,
                cumul,
                opt_flags,
                weight_min,
                weight_max,
            ))
        }
    };
}

histogramnd_entry!(histogramnd_f64_f64, f64, f64);
histogramnd_entry!(histogramnd_f64_f32, f64, f32);
histogramnd_entry!(histogramnd_f64_i32, f64, i32);
histogramnd_entry!(histogramnd_f32_f64, f32, f64);
histogramnd_entry!(histogramnd_f32_f32, f32, f32);
histogramnd_entry!(histogramnd_f32_i32, f32, i32);
histogramnd_entry!(histogramnd_i32_f64, i32, f64);
histogramnd_entry!(histogramnd_i32_f32, i32, f32);
histogramnd_entry!(histogramnd_i32_i32, i32, i32);

// =============================================================================
// Runtime Type Tags
// =============================================================================

/// Sample buffer tagged with its element type.
#[derive(Debug, Clone, Copy)]
pub enum SampleData<'a> {
    F64(&'a [f64]),
    F32(&'a [f32]),
    I32(&'a [i32]),
}

/// Weight buffer tagged with its element type.
#[derive(Debug, Clone, Copy)]
pub enum WeightData<'a> {
    F64(&'a [f64]),
    F32(&'a [f32]),
    I32(&'a [i32]),
}

macro_rules! impl_tagged {
    ($tagged:ident) => {
        impl<'a> $tagged<'a> {
            /// Number of stored values.
            pub fn len(&self) -> usize {
                match self {
                    Self::F64(v) => v.len(),
                    Self::F32(v) => v.len(),
                    Self::I32(v) => v.len(),
                }
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Element type name.
            pub fn type_name(&self) -> &'static str {
                match self {
                    Self::F64(_) => "f64",
                    Self::F32(_) => "f32",
                    Self::I32(_) => "i32",
                }
            }
        }

        impl<'a> From<&'a [f64]> for $tagged<'a> {
            fn from(v: &'a [f64]) -> Self {
                Self::F64(v)
            }
        }

        impl<'a> From<&'a [f32]> for $tagged<'a> {
            fn from(v: &'a [f32]) -> Self {
                Self::F32(v)
            }
        }

        impl<'a> From<&'a [i32]> for $tagged<'a> {
            fn from(v: &'a [i32]) -> Self {
                Self::I32(v)
            }
        }
    };
}

impl_tagged!(SampleData);
impl_tagged!(WeightData);

/// Accumulate with element types chosen at runtime.
///
/// Weight bounds in `options` are given as `f64` and narrowed to the weight
/// buffer's element type before comparison.
pub fn histogramnd_dyn(
    samples: SampleData<'_>,
    weights: Option<WeightData<'_>>,
    geometry: &BinGeometry,
    options: &HistogramOptions<f64>,
    histo: &mut [u32],
    cumul: &mut [f64],
) -> Result<AccumulateSummary> {
    match weights {
        None => dispatch_samples::<f64>(samples, None, geometry, options, histo, cumul),
        Some(WeightData::F64(w)) => {
            dispatch_samples(samples, Some(w), geometry, options, histo, cumul)
        }
        Some(WeightData::F32(w)) => {
            dispatch_samples(samples, Some(w), geometry, options, histo, cumul)
        }
        Some(WeightData::I32(w)) => {
            dispatch_samples(samples, Some(w), geometry, options, histo, cumul)
        }
    }
}

fn dispatch_samples<W: WeightElement>(
    samples: SampleData<'_>,
    weights: Option<&[W]>,
    geometry: &BinGeometry,
    options: &HistogramOptions<f64>,
    histo: &mut [u32],
    cumul: &mut [f64],
) -> Result<AccumulateSummary> {
    let options = narrow_options::<W>(options);
    match samples {
        SampleData::F64(s) => accumulate(s, weights, geometry, &options, histo, cumul),
        SampleData::F32(s) => accumulate(s, weights, geometry, &options, histo, cumul),
        SampleData::I32(s) => accumulate(s, weights, geometry, &options, histo, cumul),
    }
}

fn narrow_options<W: WeightElement>(options: &HistogramOptions<f64>) -> HistogramOptions<W> {
    HistogramOptions {
        weight_min: options.weight_min.map(W::lower_bound_from_f64),
        weight_max: options.weight_max.map(W::upper_bound_from_f64),
        last_bin_closed: options.last_bin_closed,
        parallelism: options.parallelism,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionFlags;

    const SUCCESS: i32 = Status::Success as i32;
    const NULL_BUFFER: i32 = Status::NullBuffer as i32;

    #[test]
    fn status_success_1d() {
        let sample = [0.0f64, 2.5, 5.0, 7.5, 9.99];
        let weights = [1.0f64; 5];
        let mut histo = [0u32; 2];
        let mut cumul = [0.0f64; 2];

        let status = histogramnd_f64_f64(
            Some(&sample),
            Some(&weights),
            1,
            5,
            Some(&[0.0, 10.0]),
            Some(&[2]),
            Some(&mut histo),
            Some(&mut cumul),
            0,
            0.0,
            0.0,
        );
        assert_eq!(status, SUCCESS);
        assert_eq!(histo, [2, 2]);
        assert_eq!(cumul, [2.0, 2.0]);
    }

    fn shape_status(n_dim: i32, n_elem: i32, ranges: Option<&[f64]>, bins: Option<&[i32]>) -> i32 {
        let sample = [0.5f32; 4];
        let mut histo = [0u32; 4];
        let mut cumul = [0.0f64; 4];
        histogramnd_f32_i32(
            Some(&sample),
            None,
            n_dim,
            n_elem,
            ranges,
            bins,
            Some(&mut histo),
            Some(&mut cumul),
            0,
            0,
            0,
        )
    }

    #[test]
    fn status_codes_for_invalid_shapes() {
        let unit_2d = [0.0, 1.0, 0.0, 1.0];

        let got = shape_status(0, 2, Some(&[0.0, 1.0]), Some(&[2]));
        assert_eq!(got, Status::InvalidDimensions.code());
        let got = shape_status(2, -1, Some(&unit_2d), Some(&[2, 2]));
        assert_eq!(got, Status::InvalidDimensions.code());
        let got = shape_status(2, 2, Some(&unit_2d), Some(&[2, 0]));
        assert_eq!(got, Status::InvalidBinCount.code());
        let got = shape_status(2, 2, Some(&[0.0, 1.0, 1.0, 0.0]), Some(&[2, 2]));
        assert_eq!(got, Status::InvalidRange.code());
        let got = shape_status(2, 2, None, Some(&[2, 2]));
        assert_eq!(got, NULL_BUFFER);
        let got = shape_status(2, 2, Some(&unit_2d), None);
        assert_eq!(got, NULL_BUFFER);
        let got = shape_status(2, 3, Some(&unit_2d), Some(&[2, 2]));
        assert_eq!(got, Status::LengthMismatch.code());
        let got = shape_status(2, 2, Some(&unit_2d), Some(&[2, 2]));
        assert_eq!(got, SUCCESS);
    }

    #[test]
    #[cfg(target_pointer_width = "32")]
    fn sample_count_overflow_is_a_dimension_error() {
        let got = shape_status(4, i32::MAX, Some(&[0.0, 1.0]), Some(&[1]));
        assert_eq!(got, Status::InvalidDimensions.code());
    }

    #[test]
    fn oversized_sample_count_is_a_length_mismatch() {
        let got = shape_status(1, i32::MAX, Some(&[0.0, 1.0]), Some(&[1]));
        assert_eq!(got, Status::LengthMismatch.code());
    }

    #[test]
    fn missing_sample_leaves_outputs_untouched() {
        let mut histo = [3u32; 2];
        let mut cumul = [1.5f64; 2];
        let status = histogramnd_f64_f64(
            None,
            Some(&[1.0, 1.0]),
            1,
            2,
            Some(&[0.0, 1.0]),
            Some(&[2]),
            Some(&mut histo),
            Some(&mut cumul),
            0,
            0.0,
            0.0,
        );
        assert_eq!(status, NULL_BUFFER);
        assert_eq!(histo, [3, 3]);
        assert_eq!(cumul, [1.5, 1.5]);
    }

    #[test]
    fn missing_histo_leaves_cumul_untouched() {
        let sample = [0.25f64, 0.75];
        let mut cumul = [1.5f64; 2];
        let status = histogramnd_f64_f64(
            Some(&sample),
            Some(&[1.0, 1.0]),
            1,
            2,
            Some(&[0.0, 1.0]),
            Some(&[2]),
            None,
            Some(&mut cumul),
            0,
            0.0,
            0.0,
        );
        assert_eq!(status, NULL_BUFFER);
        assert_eq!(cumul, [1.5, 1.5]);
    }

    #[test]
    fn missing_cumul_leaves_histo_untouched() {
        let sample = [0.5f32; 4];
        let mut histo = [0u32; 4];
        let status = histogramnd_f32_i32(
            Some(&sample),
            None,
            2,
            2,
            Some(&[0.0, 1.0, 0.0, 1.0]),
            Some(&[2, 2]),
            Some(&mut histo),
            None,
            0,
            0,
            0,
        );
        assert_eq!(status, NULL_BUFFER);
        assert_eq!(histo, [0; 4]);
    }

    #[test]
    fn weight_bounds_are_typed_and_flagged() {
        let sample = [1i32, 2, 3, 4];
        let weights = [1.5f32, 2.5, 3.5, 4.5];
        let mut histo = [0u32; 1];
        let mut cumul = [0.0f64; 1];
        let flags = (OptionFlags::WEIGHT_MIN | OptionFlags::WEIGHT_MAX).bits();

        let status = histogramnd_i32_f32(
            Some(&sample),
            Some(&weights),
            1,
            4,
            Some(&[0.0, 10.0]),
            Some(&[1]),
            Some(&mut histo),
            Some(&mut cumul),
            flags,
            2.0,
            4.0,
        );
        assert_eq!(status, SUCCESS);
        assert_eq!(histo, [4]);
        assert_eq!(cumul, [6.0]);
    }

    #[test]
    fn longer_buffers_use_declared_prefix() {
        let sample = [0.1f64, 0.9, 100.0];
        let mut histo = [0u32; 3];
        let mut cumul = [0.0f64; 3];
        let status = histogramnd_f64_i32(
            Some(&sample),
            Some(&[1, 2, 3]),
            1,
            2,
            Some(&[0.0, 1.0, 99.0]),
            Some(&[2, 7]),
            Some(&mut histo),
            Some(&mut cumul),
            0,
            0,
            0,
        );
        assert_eq!(status, SUCCESS);
        assert_eq!(histo, [1, 1, 0]);
        assert_eq!(cumul, [1.0, 2.0, 0.0]);
    }

    #[test]
    fn all_type_pairs_agree() {
        let mut results = Vec::new();
        let ranges = [0.0, 4.0];
        let bins = [4];
        macro_rules! check {
            ($f:ident, $s:ty, $w:ty) => {{
                let sample: Vec<$s> = [0, 1, 1, 3, 3, 3].iter().map(|&v| v as $s).collect();
                let weights: Vec<$w> = [1, 2, 3, 4, 5, 6].iter().map(|&v| v as $w).collect();
                let mut histo = [0u32; 4];
                let mut cumul = [0.0f64; 4];
                let status = $f(
                    Some(&sample[..]),
                    Some(&weights[..]),
                    1,
                    6,
                    Some(&ranges),
                    Some(&bins),
                    Some(&mut histo),
                    Some(&mut cumul),
                    0,
                    0 as $w,
                    0 as $w,
                );
                assert_eq!(status, SUCCESS);
                results.push((histo, cumul));
            }};
        }
        check!(histogramnd_f64_f64, f64, f64);
        check!(histogramnd_f64_f32, f64, f32);
        check!(histogramnd_f64_i32, f64, i32);
        check!(histogramnd_f32_f64, f32, f64);
        check!(histogramnd_f32_f32, f32, f32);
        check!(histogramnd_f32_i32, f32, i32);
        check!(histogramnd_i32_f64, i32, f64);
        check!(histogramnd_i32_f32, i32, f32);
        check!(histogramnd_i32_i32, i32, i32);

        for r in &results {
            assert_eq!(r.0, [1, 2, 0, 3]);
            assert_eq!(r.1, [1.0, 5.0, 0.0, 15.0]);
        }
    }

    #[test]
    fn dyn_dispatch() {
        let geometry = BinGeometry::new(&[(0.0, 2.0)], &[2]).unwrap();
        let samples = [0.5f32, 1.5, 2.0];
        let weights = [3i32, 7, 1];
        let mut histo = vec![0u32; 2];
        let mut cumul = vec![0.0f64; 2];
        let opts = HistogramOptions::default()
            .with_weight_max(5.9)
            .with_last_bin_closed(true);

        let summary = histogramnd_dyn(
            SampleData::from(&samples[..]),
            Some(WeightData::from(&weights[..])),
            &geometry,
            &opts,
            &mut histo,
            &mut cumul,
        )
        .unwrap();

        // 5.9 narrows to 5 for i32 weights: weight 7 is filtered.
        assert_eq!(histo, vec![1, 2]);
        assert_eq!(cumul, vec![3.0, 1.0]);
        assert_eq!(summary.n_weight_filtered, 1);
    }

    fn dyn_cumul_i32(weights: &[i32], opts: &HistogramOptions<f64>) -> Vec<f64> {
        let geometry = BinGeometry::new(&[(0.0, 1.0)], &[1]).unwrap();
        let samples = vec![0.5f64; weights.len()];
        let mut histo = vec![0u32; 1];
        let mut cumul = vec![0.0f64; 1];
        let result = histogramnd_dyn(
            SampleData::F64(&samples),
            Some(WeightData::I32(weights)),
            &geometry,
            opts,
            &mut histo,
            &mut cumul,
        );
        assert!(result.is_ok());
        assert_eq!(histo, vec![weights.len() as u32]);
        cumul
    }

    #[test]
    fn dyn_fractional_bounds_round_inward_for_i32() {
        // A minimum of 2.1 must reject weight 2.
        let opts = HistogramOptions::default().with_weight_min(2.1);
        assert_eq!(dyn_cumul_i32(&[2], &opts), vec![0.0]);
        assert_eq!(dyn_cumul_i32(&[2, 3], &opts), vec![3.0]);

        // A maximum of -2.5 must reject weight -2 and admit -3.
        let opts = HistogramOptions::default().with_weight_max(-2.5);
        assert_eq!(dyn_cumul_i32(&[-2], &opts), vec![0.0]);
        assert_eq!(dyn_cumul_i32(&[-2, -3], &opts), vec![-3.0]);

        // A minimum of -2.5 admits -2 but not -3.
        let opts = HistogramOptions::default().with_weight_min(-2.5);
        assert_eq!(dyn_cumul_i32(&[-2, -3], &opts), vec![-2.0]);
    }

    #[test]
    fn dyn_dispatch_without_weights() {
        let geometry = BinGeometry::new(&[(0.0, 2.0)], &[2]).unwrap();
        let samples = SampleData::I32(&[0, 1, 1]);
        assert_eq!(samples.type_name(), "i32");
        assert_eq!(samples.len(), 3);

        let mut histo = vec![0u32; 2];
        let mut cumul = vec![0.0f64; 2];
        let opts = HistogramOptions::default();
        let result = histogramnd_dyn(samples, None, &geometry, &opts, &mut histo, &mut cumul);
        assert!(result.is_ok());
        assert_eq!(histo, vec![1, 2]);
        assert_eq!(cumul, vec![0.0, 0.0]);
    }
}
