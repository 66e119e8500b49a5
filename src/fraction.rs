//! Rational approximation by continued fractions.
use num_traits::{ConstOne, ConstZero};

use crate::{constants::FRACTION_ITERATION_CAP, Magnitude};

/// A ceiling on the numerator or the denominator of an approximation.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ceiling {
    /// Back off to the last convergent within the ceiling.
    Strict(Magnitude),
    /// Accept the first convergent that crosses the ceiling.
    Lenient(Magnitude),
}

impl Ceiling {
    fn limit(&self) -> Magnitude {
        match self {
            Self::Strict(limit) | Self::Lenient(limit) => *limit,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FractionForm {
    /// `numerator / denominator`.
    #[default]
    Improper,
    /// `whole numerator / denominator` with a proper fractional part.
    Mixed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FractionOptions {
    /// Absolute tolerance if positive, relative to the value if negative,
    /// and exact to the last bit if zero.
    pub precision: Magnitude,
    pub max_iterations: usize,
    pub max_numerator: Option<Ceiling>,
    pub max_denominator: Option<Ceiling>,
    pub form: FractionForm,
}

impl Default for FractionOptions {
    fn default() -> Self {
        Self {
            precision: Magnitude::ZERO,
            max_iterations: FRACTION_ITERATION_CAP,
            max_numerator: None,
            max_denominator: None,
            form: FractionForm::Improper,
        }
    }
}

impl FractionOptions {
    pub fn new(precision: impl Into<Magnitude>) -> Self {
        Self { precision: precision.into(), ..Self::default() }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_numerator(mut self, ceiling: Ceiling) -> Self {
        self.max_numerator = Some(ceiling);
        self
    }

    pub fn with_max_denominator(mut self, ceiling: Ceiling) -> Self {
        self.max_denominator = Some(ceiling);
        self
    }

    pub fn with_form(mut self, form: FractionForm) -> Self {
        self.form = form;
        self
    }

    fn tolerance(&self, value: Magnitude) -> Magnitude {
        if self.precision.is_positive() {
            self.precision
        } else if self.precision.is_negative() {
            -self.precision * value
        } else {
            value * (2.0 * f64::EPSILON)
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fraction {
    Improper { numerator: Magnitude, denominator: Magnitude },
    Mixed { whole: Magnitude, numerator: Magnitude, denominator: Magnitude },
}

impl Fraction {
    pub fn to_magnitude(&self) -> Magnitude {
        match *self {
            Self::Improper { numerator, denominator } => numerator / denominator,
            Self::Mixed { whole, numerator, denominator } => {
                if whole.is_zero() { return numerator / denominator; }
                let part = numerator.abs() / denominator;
                if whole.is_negative() { whole - part } else { whole + part }
            }
        }
    }

    fn new(numerator: Magnitude, denominator: Magnitude, negative: bool, form: FractionForm) -> Self {
        let flip = |value: Magnitude| if negative { -value } else { value };
        match form {
            FractionForm::Improper => Self::Improper { numerator: flip(numerator), denominator },
            FractionForm::Mixed => {
                let whole = (numerator / denominator).floor();
                let numerator = numerator - whole * denominator;
                if whole.is_zero() {
                    Self::Mixed { whole, numerator: flip(numerator), denominator }
                } else {
                    Self::Mixed { whole: flip(whole), numerator, denominator }
                }
            }
        }
    }
}

/// Approximates `value` by the first continued-fraction convergent within
/// the requested precision.
///
/// The expansion also stops at the iteration cap, when a ceiling is crossed,
/// or when the expansion terminates exactly. A strict ceiling crossed by the
/// very first convergent leaves only the `0/1` seed. Under a relative precision the
/// `0/1` convergent is never accepted, so tiny values keep a numerator.
/// Non-finite values come back as `value / 1`.
pub fn fraction_approximation(value: Magnitude, options: &FractionOptions) -> Fraction {
    if !value.is_finite() {
        return Fraction::Improper { numerator: value, denominator: Magnitude::ONE };
    }
    let negative = value.is_negative();
    let target = value.abs();
    let tolerance = options.tolerance(target);
    let relative = options.precision.is_negative();

    let (mut numerator, mut previous_numerator) = (Magnitude::ONE, Magnitude::ZERO);
    let (mut denominator, mut previous_denominator) = (Magnitude::ZERO, Magnitude::ONE);
    let mut last: Option<(Magnitude, Magnitude)> = None;
    let mut remainder = target;

    for _ in 0..options.max_iterations.max(1) {
        let term = remainder.floor();
        let next_numerator = term * numerator + previous_numerator;
        let next_denominator = term * denominator + previous_denominator;
        (previous_numerator, numerator) = (numerator, next_numerator);
        (previous_denominator, denominator) = (denominator, next_denominator);

        let breach = [(options.max_numerator, numerator), (options.max_denominator, denominator)]
            .into_iter()
            .find_map(|(ceiling, part)| ceiling.filter(|ceiling| part > ceiling.limit()));
        match breach {
            Some(Ceiling::Strict(_)) => {
                let (numerator, denominator) = last.unwrap_or((Magnitude::ZERO, Magnitude::ONE));
                return Fraction::new(numerator, denominator, negative, options.form);
            }
            Some(Ceiling::Lenient(_)) => break,
            None => {}
        }

        let close = (numerator / denominator - target).abs() <= tolerance;
        if close && !(relative && numerator.is_zero()) { break; }

        let fractional = remainder - term;
        if fractional.is_zero() { break; }
        last = Some((numerator, denominator));
        remainder = fractional.recip();
    }

    Fraction::new(numerator, denominator, negative, options.form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(value: f64) -> Magnitude {
        Magnitude::from(value)
    }

    fn improper(numerator: f64, denominator: f64) -> Fraction {
        Fraction::Improper { numerator: m(numerator), denominator: m(denominator) }
    }

    #[test]
    fn precision_picks_the_convergent() {
        let pi = m(core::f64::consts::PI);
        assert_eq!(fraction_approximation(pi, &FractionOptions::new(2e-3)), improper(22.0, 7.0));
        assert_eq!(fraction_approximation(pi, &FractionOptions::new(1e-3)), improper(333.0, 106.0));
        assert_eq!(fraction_approximation(m(0.75), &FractionOptions::default()), improper(3.0, 4.0));
    }

    #[test]
    fn denominator_ceilings() {
        let pi = m(core::f64::consts::PI);
        let strict = FractionOptions::default().with_max_denominator(Ceiling::Strict(m(100.0)));
        assert_eq!(fraction_approximation(pi, &strict), improper(22.0, 7.0));
        let lenient = FractionOptions::default().with_max_denominator(Ceiling::Lenient(m(100.0)));
        assert_eq!(fraction_approximation(pi, &lenient), improper(333.0, 106.0));
    }

    #[test]
    fn strict_ceiling_on_the_first_convergent_falls_back_to_zero() {
        let strict = FractionOptions::default().with_max_numerator(Ceiling::Strict(m(10.0)));
        assert_eq!(fraction_approximation(m(1000.5), &strict), improper(0.0, 1.0));
        assert!(fraction_approximation(m(-1000.5), &strict).to_magnitude().is_zero());
        let lenient = FractionOptions::default().with_max_numerator(Ceiling::Lenient(m(10.0)));
        assert_eq!(fraction_approximation(m(1000.5), &lenient), improper(1000.0, 1.0));
    }

    #[test]
    fn iteration_cap_returns_the_last_convergent() {
        let pi = m(core::f64::consts::PI);
        let options = FractionOptions::default().with_max_iterations(2);
        assert_eq!(fraction_approximation(pi, &options), improper(22.0, 7.0));
    }

    #[test]
    fn mixed_form_carries_the_sign_on_the_leading_part() {
        let mixed = FractionOptions::new(1e-9).with_form(FractionForm::Mixed);
        assert_eq!(
            fraction_approximation(m(-2.75), &mixed),
            Fraction::Mixed { whole: m(-2.0), numerator: m(3.0), denominator: m(4.0) }
        );
        let fraction = fraction_approximation(m(-0.75), &mixed);
        assert_eq!(fraction, Fraction::Mixed { whole: Magnitude::ZERO, numerator: m(-3.0), denominator: m(4.0) });
        assert_eq!(fraction.to_magnitude(), m(-0.75));
        assert_eq!(fraction_approximation(m(-2.75), &mixed).to_magnitude(), m(-2.75));
    }

    #[test]
    fn relative_precision_keeps_tiny_values() {
        let options = FractionOptions::new(-0.01);
        let Fraction::Improper { numerator, denominator } = fraction_approximation(m(1e-20), &options) else {
            panic!("expected an improper fraction");
        };
        assert_eq!(numerator, Magnitude::ONE);
        assert!(denominator.eq_tolerance(&m(1e20), 1e-12));
        // An absolute precision is happy with zero
        assert_eq!(fraction_approximation(m(1e-20), &FractionOptions::new(1e-9)), improper(0.0, 1.0));
    }

    #[test]
    fn non_finite_and_zero() {
        let options = FractionOptions::default();
        assert_eq!(
            fraction_approximation(Magnitude::INFINITY, &options),
            Fraction::Improper { numerator: Magnitude::INFINITY, denominator: Magnitude::ONE }
        );
        assert!(matches!(
            fraction_approximation(Magnitude::NAN, &options),
            Fraction::Improper { numerator, .. } if numerator.is_nan()
        ));
        assert_eq!(fraction_approximation(Magnitude::ZERO, &options), improper(0.0, 1.0));
    }
}
