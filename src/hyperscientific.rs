use num_traits::{ConstOne, ConstZero};

use crate::{
    constants::MAX_SAFE_HEIGHT,
    convergence::{converge, Ladder},
    engineering::EngineeringSet,
    error::DecomposeError,
    rounding::Rounding,
    scientific::{check_base, check_multiplier},
    Magnitude,
};

/// Configuration of [`hyperscientifify`]: `value = base↑↑(hyperexponent · hyperexp_multiplier)`
/// stacked on the mantissa.
#[derive(Debug, Clone)]
pub struct Hyperscientific {
    pub base: Magnitude,
    pub rounding: Rounding,
    /// Mantissas start at `base↑↑mantissa_power`.
    pub mantissa_power: Magnitude,
    pub engineering: EngineeringSet,
    pub hyperexp_multiplier: Magnitude,
}

impl Default for Hyperscientific {
    fn default() -> Self {
        Self {
            base: Magnitude::TEN,
            rounding: Rounding::none(),
            mantissa_power: Magnitude::ZERO,
            engineering: EngineeringSet::unit(),
            hyperexp_multiplier: Magnitude::ONE,
        }
    }
}

impl Hyperscientific {
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

    pub fn with_hyperexp_multiplier(mut self, hyperexp_multiplier: impl Into<Magnitude>) -> Self {
        self.hyperexp_multiplier = hyperexp_multiplier.into();
        self
    }

    /// Stacks `base↑↑(hyperexponent · hyperexp_multiplier)` on `mantissa`.
    pub fn reconstruct(&self, mantissa: Magnitude, hyperexponent: Magnitude) -> Magnitude {
        self.base.tetrate(self.height(hyperexponent), mantissa)
    }

    pub fn validate(&self) -> Result<(), DecomposeError> {
        check_multiplier(self.hyperexp_multiplier)?;
        check_base(self.base, Magnitude::ONE)
    }

    fn height(&self, hyperexponent: Magnitude) -> f64 {
        (hyperexponent * self.hyperexp_multiplier).to_f64()
    }
}

struct Tower<'a> {
    value: Magnitude,
    config: &'a Hyperscientific,
}

impl Ladder for Tower<'_> {
    fn mantissa_at(&self, hyperexponent: Magnitude) -> Magnitude {
        self.value.iterated_log(self.config.base, self.config.height(hyperexponent))
    }

    fn bounds(&self, hyperexponent: Magnitude) -> (Magnitude, Magnitude) {
        let Hyperscientific { base, mantissa_power, engineering, hyperexp_multiplier, .. } = self.config;
        let gap = engineering.next_value(hyperexponent) - hyperexponent;
        (
            base.tetrate(mantissa_power.to_f64(), Magnitude::ONE),
            base.tetrate((*mantissa_power + gap * *hyperexp_multiplier).to_f64(), Magnitude::ONE),
        )
    }

    fn beyond_precision(&self, hyperexponent: Magnitude) -> bool {
        (hyperexponent * self.config.hyperexp_multiplier).abs() > Magnitude::from(MAX_SAFE_HEIGHT)
    }
}

/// Splits `value` into `(mantissa, hyperexponent)` with
/// `base.tetrate(hyperexponent · hyperexp_multiplier, mantissa) = value`.
///
/// The super-logarithm takes the place of the logarithm in [`scientifify`](crate::scientifify):
/// the hyperexponent lies on the engineering lattice and the rounded
/// mantissa in `[base↑↑p, base↑↑(p + gap · hyperexp_multiplier))`.
/// Sentinels and sign handling match [`scientifify`](crate::scientifify).
///
/// # Errors
/// [`DecomposeError::InvalidBase`] and [`DecomposeError::InvalidMultiplier`].
pub fn hyperscientifify(
    value: Magnitude,
    config: &Hyperscientific,
) -> Result<(Magnitude, Magnitude), DecomposeError> {
    config.validate()?;
    Ok(split(value, config))
}

fn split(value: Magnitude, config: &Hyperscientific) -> (Magnitude, Magnitude) {
    if value.is_nan() { return (Magnitude::NAN, Magnitude::NAN); }
    if value.is_zero() { return (Magnitude::ZERO, Magnitude::NEG_INFINITY); }
    if value.is_infinite() { return (value, Magnitude::INFINITY); }
    if value.is_negative() {
        let (mantissa, hyperexponent) = split(-value, config);
        return (-mantissa, hyperexponent);
    }

    let ladder = Tower { value, config };
    // Below the first interval's ceiling the slog estimate is unreliable; step from zero
    let (_, ceiling) = ladder.bounds(Magnitude::ZERO);
    let start = if value < ceiling {
        Magnitude::ZERO
    } else {
        let raw = (Magnitude::from(value.slog(config.base)) - config.mantissa_power)
            / config.hyperexp_multiplier;
        let snapped = config.engineering.current_value(raw);
        if snapped > raw && !snapped.eq_tolerance(&raw, 1e-9) {
            config.engineering.previous_value(snapped)
        } else {
            snapped
        }
    };
    converge(&ladder, &config.engineering, &config.rounding, start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_step_from_zero() {
        let config = Hyperscientific::default();
        let (mantissa, hyperexponent) = hyperscientifify(Magnitude::from(5), &config).unwrap();
        assert_eq!((mantissa, hyperexponent), (Magnitude::from(5), Magnitude::ZERO));

        let (mantissa, hyperexponent) = hyperscientifify(Magnitude::from(0.5), &config).unwrap();
        assert_eq!(hyperexponent, Magnitude::NEG_ONE);
        assert!(mantissa.eq_tolerance(&Magnitude::from(10f64.powf(0.5)), 1e-12));
        assert!(config.reconstruct(mantissa, hyperexponent).eq_tolerance(&Magnitude::from(0.5), 1e-9));
    }

    #[test]
    fn base_validation_ignores_the_height_multiplier() {
        let config = Hyperscientific::new(2.0).with_hyperexp_multiplier(0.5);
        assert!(hyperscientifify(Magnitude::from(100), &config).is_ok());
        assert_eq!(
            hyperscientifify(Magnitude::from(100), &Hyperscientific::new(1.4)),
            Err(DecomposeError::InvalidBase(1.4))
        );
    }
}
