//! Validated user counts.
//!
//! Batch sizes arrive from untrusted places (command-line arguments, config
//! files, other tools), so every entry point converts its input into a
//! [`UserCount`] first. A count is valid only if it is a finite positive
//! integer: zero, negatives, fractions, infinities and `NaN` are all rejected
//! with [`SimulationError::InvalidArgument`] before any simulation state is
//! touched.

use core::num::NonZeroUsize;
use core::str::FromStr;

use crate::error::SimulationError;

/// Largest `f64` below which every integer is exactly representable (2^53).
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// A finite, strictly positive number of users to register in one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserCount(NonZeroUsize);

impl UserCount {
    /// Create a count, returning `None` for zero.
    pub const fn new(count: usize) -> Option<Self> {
        match NonZeroUsize::new(count) {
            Some(inner) => Some(Self(inner)),
            None => None,
        }
    }

    /// The number of users as a plain `usize`.
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl core::fmt::Display for UserCount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Implements `TryFrom<$int>` by way of `usize`.
macro_rules! count_from_int {
    ($($int:ty),* $(,)?) => {
        $(
            impl TryFrom<$int> for UserCount {
                type Error = SimulationError;

                fn try_from(value: $int) -> Result<Self, Self::Error> {
                    usize::try_from(value)
                        .ok()
                        .and_then(Self::new)
                        .ok_or_else(|| SimulationError::invalid_argument(value))
                }
            }
        )*
    };
}

count_from_int!(usize, u8, u16, u32, u64, isize, i8, i16, i32, i64);

impl TryFrom<f64> for UserCount {
    type Error = SimulationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let is_whole = value.is_finite() && value.fract().abs() <= 0.0;
        if !is_whole || value < 1.0 || value > MAX_EXACT_FLOAT {
            return Err(SimulationError::invalid_argument(value));
        }

        // Range and integrality were checked above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = value as u64;
        Self::try_from(whole)
    }
}

impl FromStr for UserCount {
    type Err = SimulationError;

    /// Parse an integer literal, falling back to floating-point syntax so that
    /// inputs such as `NaN`, `inf` or `2.5` are rejected with the same error.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Ok(int) = trimmed.parse::<i64>() {
            return Self::try_from(int);
        }
        match trimmed.parse::<f64>() {
            Ok(float) => Self::try_from(float),
            Err(_) => Err(SimulationError::invalid_argument(format!("{raw:?}"))),
        }
    }
}
