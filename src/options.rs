//! Accumulation options: weight filters and upper-edge policy.
//!
//! Options are exposed as a structured [`HistogramOptions`] value. The raw
//! bitset encoding used by the integer entry points is kept bit-compatible
//! through [`OptionFlags`]:
//!
//! | Flag | Bit | Effect |
//! |---|---|---|
//! | `WEIGHT_MIN` | `1` | cumulation requires `weight >= weight_min` |
//! | `WEIGHT_MAX` | `2` | cumulation requires `weight <= weight_max` |
//! | `LAST_BIN_CLOSED` | `4` | the last bin of each axis includes its upper edge |
//!
//! Weight filters gate cumulation only. A sample that lands in a bin is
//! always counted, whatever its weight.

use bitflags::bitflags;
use bon::Builder;

use crate::element::WeightElement;
use crate::parallel::Parallelism;

bitflags! {
    /// Raw option bitset.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OptionFlags: i32 {
        /// Filter cumulation by a minimum weight.
        const WEIGHT_MIN = 1;
        /// Filter cumulation by a maximum weight.
        const WEIGHT_MAX = 1 << 1;
        /// Close the upper edge of each axis' last bin.
        const LAST_BIN_CLOSED = 1 << 2;
    }
}

impl OptionFlags {
    /// Decode a raw bitset, ignoring unknown bits.
    #[inline]
    pub fn from_raw(bits: i32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

// =============================================================================
// HistogramOptions
// =============================================================================

/// Options for one accumulation call.
///
/// # Example
///
/// ```
/// use ndhist::{HistogramOptions, OptionFlags};
///
/// let opts = HistogramOptions::<f32>::builder()
///     .weight_max(5.0)
///     .last_bin_closed(true)
///     .build();
/// assert_eq!(opts.flags(), OptionFlags::WEIGHT_MAX | OptionFlags::LAST_BIN_CLOSED);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct HistogramOptions<W: WeightElement> {
    /// Lower weight bound for cumulation (inclusive).
    pub weight_min: Option<W>,
    /// Upper weight bound for cumulation (inclusive).
    pub weight_max: Option<W>,
    /// Whether `x == max` falls into the last bin of an axis.
    #[builder(default)]
    pub last_bin_closed: bool,
    /// Threading hint for the accumulation engine.
    #[builder(default)]
    pub parallelism: Parallelism,
}

impl<W: WeightElement> Default for HistogramOptions<W> {
    fn default() -> Self {
        Self {
            weight_min: None,
            weight_max: None,
            last_bin_closed: false,
            parallelism: Parallelism::default(),
        }
    }
}

impl<W: WeightElement> HistogramOptions<W> {
    /// Build options from the raw bitset and typed thresholds.
    ///
    /// A threshold is only kept when its flag is set.
    pub fn from_raw(bits: i32, weight_min: W, weight_max: W) -> Self {
        let flags = OptionFlags::from_raw(bits);
        let has_min = flags.contains(OptionFlags::WEIGHT_MIN);
        let has_max = flags.contains(OptionFlags::WEIGHT_MAX);
        Self {
            weight_min: has_min.then_some(weight_min),
            weight_max: has_max.then_some(weight_max),
            last_bin_closed: flags.contains(OptionFlags::LAST_BIN_CLOSED),
            parallelism: Parallelism::default(),
        }
    }

    /// Raw bitset equivalent of these options.
    pub fn flags(&self) -> OptionFlags {
        let mut flags = OptionFlags::empty();
        flags.set(OptionFlags::WEIGHT_MIN, self.weight_min.is_some());
        flags.set(OptionFlags::WEIGHT_MAX, self.weight_max.is_some());
        flags.set(OptionFlags::LAST_BIN_CLOSED, self.last_bin_closed);
        flags
    }

    pub fn with_weight_min(mut self, weight_min: W) -> Self {
        self.weight_min = Some(weight_min);
        self
    }

    pub fn with_weight_max(mut self, weight_max: W) -> Self {
        self.weight_max = Some(weight_max);
        self
    }

    pub fn with_last_bin_closed(mut self, last_bin_closed: bool) -> Self {
        self.last_bin_closed = last_bin_closed;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Whether any weight filter is active.
    #[inline]
    pub fn filters_weights(&self) -> bool {
        self.weight_min.is_some() || self.weight_max.is_some()
    }

    /// Whether a weight passes the active bounds.
    ///
    /// A weight is rejected only when it compares strictly below the minimum
    /// or strictly above the maximum, so unordered values (NaN) pass.
    #[inline]
    pub fn admits_weight(&self, weight: W) -> bool {
        if let Some(min) = self.weight_min {
            if weight < min {
                return false;
            }
        }
        if let Some(max) = self.weight_max {
            if weight > max {
                return false;
            }
        }
        true
    }
}
