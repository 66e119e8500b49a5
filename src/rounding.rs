use core::fmt;

use num_traits::ConstZero;

use crate::{shims::Arc, Magnitude};

/// How finely a mantissa is rounded.
///
/// A zero quantum disables rounding. Dynamic specifications are evaluated at
/// the value being rounded, so the quantum can follow the value's size.
#[derive(Clone)]
pub enum Rounding {
    Fixed(Magnitude),
    Dynamic(Arc<dyn Fn(Magnitude) -> Magnitude + Send + Sync>),
}

impl Rounding {
    #[inline]
    pub const fn none() -> Self {
        Self::Fixed(Magnitude::ZERO)
    }

    #[inline]
    pub fn fixed(quantum: impl Into<Magnitude>) -> Self {
        Self::Fixed(quantum.into())
    }

    pub fn dynamic<F>(quantum: F) -> Self
    where
        F: Fn(Magnitude) -> Magnitude + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(quantum))
    }

    /// The quantum that applies at `value`.
    pub fn quantum(&self, value: Magnitude) -> Magnitude {
        match self {
            Self::Fixed(quantum) => *quantum,
            Self::Dynamic(quantum) => quantum(value),
        }
    }
}

impl Default for Rounding {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(quantum) => f.debug_tuple("Fixed").field(quantum).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<f64> for Rounding {
    fn from(quantum: f64) -> Self {
        Self::fixed(quantum)
    }
}

impl From<Magnitude> for Rounding {
    fn from(quantum: Magnitude) -> Self {
        Self::Fixed(quantum)
    }
}

/// Rounds `value` to the nearest multiple of the quantum, ties away from zero.
///
/// Values stay unchanged when they are not finite or the quantum is zero or
/// not finite.
pub fn round(value: Magnitude, rounding: &Rounding) -> Magnitude {
    if !value.is_finite() { return value; }
    let quantum = rounding.quantum(value).abs();
    if quantum.is_zero() || !quantum.is_finite() { return value; }
    (value / quantum).round() * quantum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_quanta() {
        let rounding = Rounding::fixed(0.5);
        assert_eq!(round(Magnitude::from(1.2), &rounding), Magnitude::from(1.0));
        assert_eq!(round(Magnitude::from(1.3), &rounding), Magnitude::from(1.5));
        assert_eq!(round(Magnitude::from(-1.3), &Rounding::fixed(-0.5)), Magnitude::from(-1.5));
    }

    #[test]
    fn ties_round_away_from_zero() {
        let rounding = Rounding::fixed(1.0);
        assert_eq!(round(Magnitude::from(2.5), &rounding), Magnitude::from(3.0));
        assert_eq!(round(Magnitude::from(-2.5), &rounding), Magnitude::from(-3.0));
    }

    #[test]
    fn degenerate_quanta_leave_the_value() {
        let value = Magnitude::from(1.2345);
        assert_eq!(round(value, &Rounding::none()), value);
        assert_eq!(round(value, &Rounding::fixed(f64::INFINITY)), value);
        assert!(round(Magnitude::NAN, &Rounding::fixed(1.0)).is_nan());
        assert_eq!(round(Magnitude::INFINITY, &Rounding::fixed(1.0)), Magnitude::INFINITY);
    }

    #[test]
    fn dynamic_quanta_follow_the_value() {
        let rounding = Rounding::dynamic(|value| value / 100.0);
        let rounded = round(Magnitude::from(1234.5), &rounding);
        assert!(rounded.eq_tolerance(&Magnitude::from(1234.5), 1e-12));
        let per_order = Rounding::dynamic(|value: Magnitude| value.log10().floor().pow10() / 10.0);
        assert_eq!(round(Magnitude::from(123.0), &per_order), Magnitude::from(120.0));
    }
}
