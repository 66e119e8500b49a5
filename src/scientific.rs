use num_traits::{ConstOne, ConstZero};

use crate::{
    constants::{MAX_SAFE_EXPONENT, TETRATION_CONVERGENCE_LIMIT},
    convergence::{converge, Ladder},
    engineering::EngineeringSet,
    error::DecomposeError,
    rounding::Rounding,
    Magnitude,
};

/// Configuration of [`scientifify`]: `value = mantissa · base^(exponent · exp_multiplier)`.
#[derive(Debug, Clone)]
pub struct Scientific {
    pub base: Magnitude,
    pub rounding: Rounding,
    /// Mantissas start at `base^mantissa_power`.
    pub mantissa_power: Magnitude,
    pub engineering: EngineeringSet,
    pub exp_multiplier: Magnitude,
}

impl Default for Scientific {
    fn default() -> Self {
        Self {
            base: Magnitude::TEN,
            rounding: Rounding::none(),
            mantissa_power: Magnitude::ZERO,
            engineering: EngineeringSet::unit(),
            exp_multiplier: Magnitude::ONE,
        }
    }
}

impl Scientific {
    pub fn new(base: impl Into<Magnitude>) -> Self {
        Self { base: base.into(), ..Self::default() }
    }

    pub fn with_rounding(mut self, rounding: impl Into<Rounding>) -> Self {
        self.rounding = rounding.into();
        self
    }

    pub fn with_mantissa_power(mut self, mantissa_power: impl Into<Magnitude>) -> Self {
        self.mantissa_power = mantissa_power.into();
        self
    }

    pub fn with_engineering(mut self, engineering: EngineeringSet) -> Self {
        self.engineering = engineering;
        self
    }

    pub fn with_exp_multiplier(mut self, exp_multiplier: impl Into<Magnitude>) -> Self {
        self.exp_multiplier = exp_multiplier.into();
        self
    }

    /// Evaluates `mantissa · base^(exponent · exp_multiplier)`.
    pub fn reconstruct(&self, mantissa: Magnitude, exponent: Magnitude) -> Magnitude {
        mantissa * self.base.pow(exponent * self.exp_multiplier)
    }

    pub fn validate(&self) -> Result<(), DecomposeError> {
        check_base(self.base, self.exp_multiplier)
    }
}

/// Rejects multipliers that are not finite and positive, then bases whose
/// towers under `x ↦ base^(x · multiplier)` converge.
pub(crate) fn check_base(base: Magnitude, multiplier: Magnitude) -> Result<(), DecomposeError> {
    check_multiplier(multiplier)?;
    if !base.is_finite() || base <= Magnitude::ONE {
        return Err(DecomposeError::InvalidBase(base.to_f64()));
    }
    if base.pow(multiplier) <= Magnitude::from(TETRATION_CONVERGENCE_LIMIT) {
        return Err(DecomposeError::InvalidBase(base.to_f64()));
    }
    Ok(())
}

pub(crate) fn check_multiplier(multiplier: Magnitude) -> Result<(), DecomposeError> {
    if !multiplier.is_finite() || !multiplier.is_positive() {
        return Err(DecomposeError::InvalidMultiplier(multiplier.to_f64()));
    }
    Ok(())
}

struct Power<'a> {
    value: Magnitude,
    config: &'a Scientific,
}

impl Ladder for Power<'_> {
    fn mantissa_at(&self, exponent: Magnitude) -> Magnitude {
        self.value / self.config.base.pow(exponent * self.config.exp_multiplier)
    }

    fn bounds(&self, exponent: Magnitude) -> (Magnitude, Magnitude) {
        let Scientific { base, mantissa_power, engineering, exp_multiplier, .. } = self.config;
        let gap = engineering.next_value(exponent) - exponent;
        (
            base.pow(*mantissa_power),
            base.pow(*mantissa_power + gap * *exp_multiplier),
        )
    }

    fn beyond_precision(&self, exponent: Magnitude) -> bool {
        (exponent * self.config.exp_multiplier).abs() > Magnitude::from(MAX_SAFE_EXPONENT)
    }
}

/// Splits `value` into `(mantissa, exponent)` with
/// `mantissa · base^(exponent · exp_multiplier) = value`.
///
/// The exponent lies on the engineering lattice and the mantissa, after
/// rounding, in `[base^p, base^(p + gap · exp_multiplier))` where `p` is the
/// mantissa power and `gap` the distance to the next lattice exponent.
///
/// Zero gives `(0, -∞)`, infinities `(±∞, ∞)` and NaN `(NaN, NaN)`. Negative
/// values split their absolute value and carry the sign on the mantissa.
///
/// # Errors
/// Fails only on configuration: see [`DecomposeError::InvalidBase`] and
/// [`DecomposeError::InvalidMultiplier`].
pub fn scientifify(value: Magnitude, config: &Scientific) -> Result<(Magnitude, Magnitude), DecomposeError> {
    config.validate()?;
    Ok(split(value, config))
}

/// [`scientifify`] without validating the configuration.
pub(crate) fn split(value: Magnitude, config: &Scientific) -> (Magnitude, Magnitude) {
    if value.is_nan() { return (Magnitude::NAN, Magnitude::NAN); }
    if value.is_zero() { return (Magnitude::ZERO, Magnitude::NEG_INFINITY); }
    if value.is_infinite() { return (value, Magnitude::INFINITY); }
    if value.is_negative() {
        let (mantissa, exponent) = split(-value, config);
        return (-mantissa, exponent);
    }

    let raw = (value.log(config.base) - config.mantissa_power) / config.exp_multiplier;
    let mut exponent = config.engineering.current_value(raw);
    if exponent > raw && !exponent.eq_tolerance(&raw, 1e-9) {
        exponent = config.engineering.previous_value(exponent);
    }
    converge(&Power { value, config }, &config.engineering, &config.rounding, exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors() {
        let value = Magnitude::from(5);
        assert_eq!(scientifify(value, &Scientific::new(1.0)), Err(DecomposeError::InvalidBase(1.0)));
        assert_eq!(scientifify(value, &Scientific::new(1.2)), Err(DecomposeError::InvalidBase(1.2)));
        assert!(matches!(
            scientifify(value, &Scientific::new(f64::INFINITY)),
            Err(DecomposeError::InvalidBase(_))
        ));
        assert_eq!(
            scientifify(value, &Scientific::default().with_exp_multiplier(0.0)),
            Err(DecomposeError::InvalidMultiplier(0.0))
        );
        // 2^0.5 ≈ 1.414 towers converge
        assert_eq!(
            scientifify(value, &Scientific::new(2.0).with_exp_multiplier(0.5)),
            Err(DecomposeError::InvalidBase(2.0))
        );
    }

    #[test]
    fn beyond_precision_clamps() {
        let value = Magnitude::from_components(1, 2, 20.0);
        let (mantissa, exponent) = scientifify(value, &Scientific::default()).unwrap();
        assert_eq!(mantissa, Magnitude::ONE);
        assert!(exponent.eq_tolerance(&Magnitude::from(1e20), 1e-12));
    }
}
