//! Error taxonomy and status codes.
//!
//! Every failure is detected during validation, before any output buffer is
//! touched. Out-of-range samples and weight-filtered samples are not errors.

/// Integer status codes returned by the [`dispatch`](crate::dispatch) entry points.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success = 0,
    InvalidDimensions = 1,
    InvalidBinCount = 2,
    InvalidRange = 3,
    NullBuffer = 4,
    LengthMismatch = 5,
    TooManyBins = 6,
}

impl Status {
    /// Raw integer value.
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Decode a raw integer value.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::InvalidDimensions),
            2 => Some(Self::InvalidBinCount),
            3 => Some(Self::InvalidRange),
            4 => Some(Self::NullBuffer),
            5 => Some(Self::LengthMismatch),
            6 => Some(Self::TooManyBins),
            _ => None,
        }
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

/// Histogram validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistogramError {
    #[error("invalid dimensions: n_dim = {n_dim}, n_elem = {n_elem}")]
    InvalidDimensions { n_dim: i64, n_elem: i64 },

    #[error("bin count must be > 0 on axis {axis}, got {n_bins}")]
    InvalidBinCount { axis: usize, n_bins: i64 },

    #[error("invalid range on axis {axis}: min = {min}, max = {max}")]
    InvalidRange { axis: usize, min: f64, max: f64 },

    #[error("required buffer `{0}` is missing")]
    NullBuffer(&'static str),

    #[error("buffer `{buffer}` has length {got}, expected {expected}")]
    LengthMismatch {
        buffer: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("sample length {len} is not a multiple of n_dim = {n_dim}")]
    RaggedSamples { len: usize, n_dim: usize },

    #[error("total number of bins overflows usize")]
    TooManyBins,
}

impl HistogramError {
    /// Status reported through the integer-returning entry points.
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidDimensions { .. } => Status::InvalidDimensions,
            Self::InvalidBinCount { .. } => Status::InvalidBinCount,
            Self::InvalidRange { .. } => Status::InvalidRange,
            Self::NullBuffer(_) => Status::NullBuffer,
            Self::LengthMismatch { .. } | Self::RaggedSamples { .. } => Status::LengthMismatch,
            Self::TooManyBins => Status::TooManyBins,
        }
    }

    #[inline]
    pub fn status_code(&self) -> i32 {
        self.status().code()
    }
}

/// Result type for histogram operations.
pub type Result<T> = std::result::Result<T, HistogramError>;
