//! Element types accepted for samples and weights.
//!
//! Samples and weights may each be stored as `f64`, `f32` or `i32`. Sample
//! coordinates are widened to `f64` before binning; weights are compared
//! against their bounds in their own type and widened to `f64` only when
//! cumulated.
//!
//! # Narrowing Bounds
//!
//! A weight bound given as `f64` is narrowed so that the comparison in the
//! weight's own type admits exactly the weights the `f64` comparison would:
//! a lower bound rounds up to the nearest representable value, an upper bound
//! rounds down. Integer bounds saturate at the type's limits. A NaN bound
//! admits everything, as it does in `f64`.

/// A numeric type usable as a sample coordinate.
pub trait SampleElement: Copy + std::fmt::Debug + Send + Sync + 'static {
    /// Short type name used in diagnostics.
    const NAME: &'static str;

    /// Widen to `f64` for bin resolution.
    fn to_f64(self) -> f64;
}

/// A numeric type usable as a per-sample weight.
pub trait WeightElement: Copy + PartialOrd + std::fmt::Debug + Send + Sync + 'static {
    /// Short type name used in diagnostics.
    const NAME: &'static str;

    /// Widen to `f64` for cumulation.
    fn to_f64(self) -> f64;

    /// Smallest value `b` such that `w >= b` iff `w as f64 >= v`.
    fn lower_bound_from_f64(v: f64) -> Self;

    /// Largest value `b` such that `w <= b` iff `w as f64 <= v`.
    fn upper_bound_from_f64(v: f64) -> Self;
}

impl SampleElement for f64 {
    const NAME: &'static str = "f64";

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

impl WeightElement for f64 {
    const NAME: &'static str = "f64";

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn lower_bound_from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn upper_bound_from_f64(v: f64) -> Self {
        v
    }
}

impl SampleElement for f32 {
    const NAME: &'static str = "f32";

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl WeightElement for f32 {
    const NAME: &'static str = "f32";

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn lower_bound_from_f64(v: f64) -> Self {
        let b = v as f32;
        if (b as f64) < v {
            f32_next_up(b)
        } else {
            b
        }
    }

    fn upper_bound_from_f64(v: f64) -> Self {
        let b = v as f32;
        if (b as f64) > v {
            -f32_next_up(-b)
        } else {
            b
        }
    }
}

/// Next representable `f32` towards `+inf`. NaN and `+inf` map to themselves.
fn f32_next_up(x: f32) -> f32 {
    let bits = x.to_bits();
    if x.is_nan() || bits == f32::INFINITY.to_bits() {
        return x;
    }
    let magnitude = bits & !(1 << 31);
    let next = if magnitude == 0 {
        1
    } else if bits == magnitude {
        bits + 1
    } else {
        bits - 1
    };
    f32::from_bits(next)
}

impl SampleElement for i32 {
    const NAME: &'static str = "i32";

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl WeightElement for i32 {
    const NAME: &'static str = "i32";

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    /// Float-to-int `as` casts saturate.
    #[inline]
    fn lower_bound_from_f64(v: f64) -> Self {
        if v.is_nan() {
            i32::MIN
        } else {
            v.ceil() as i32
        }
    }

    #[inline]
    fn upper_bound_from_f64(v: f64) -> Self {
        if v.is_nan() {
            i32::MAX
        } else {
            v.floor() as i32
        }
    }
}
