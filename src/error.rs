use core::fmt;

#[cfg(any(feature = "std", feature = "error_in_core"))]
use crate::shims::Error;

#[derive(Debug, Copy, Clone, PartialEq)]
/// A configuration error rejected before any decomposition work starts.
///
/// Numerical edge cases (zero, infinities, NaN) are never errors; they map to
/// sentinel results instead.
pub enum DecomposeError {
    /// The base is non-finite, at most one, or raised to its multiplier lands at or
    /// below `e^(1/e)`, where towers converge and cannot be inverted.
    InvalidBase(f64),
    /// A multiplier is non-finite or not positive, or a pentation multiplier is zero.
    InvalidMultiplier(f64),
    /// A hypersplit ceiling is non-finite, not positive, or an original maximum
    /// sits below its maximum. Holds the offending level (0 = mantissa).
    MalformedLimits { level: usize },
    /// An engineering step is non-finite or not positive.
    InvalidEngineeringStep(f64),
    /// An engineering set was built from no steps.
    EmptyEngineering,
    /// A raw lattice query received a negative or NaN value.
    NegativeLatticeInput(f64),
}

impl fmt::Display for DecomposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBase(base) =>
                write!(f, "base {base} must be finite and its towers must diverge"),
            Self::InvalidMultiplier(multiplier) =>
                write!(f, "multiplier {multiplier} must be finite and positive"),
            Self::MalformedLimits { level } =>
                write!(f, "malformed ceiling for level {level}"),
            Self::InvalidEngineeringStep(step) =>
                write!(f, "engineering step {step} must be finite and positive"),
            Self::EmptyEngineering =>
                write!(f, "engineering set must contain at least one step"),
            Self::NegativeLatticeInput(value) =>
                write!(f, "cannot place {value} on a non-negative lattice"),
        }
    }
}

#[cfg(any(feature = "std", feature = "error_in_core"))]
impl Error for DecomposeError {}
