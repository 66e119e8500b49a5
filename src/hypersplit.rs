//! The four-level split `(mantissa, exponent, tetration, pentation)`.
//!
//! With `G(x) = base^(x · exp_multiplier)` and `P(x) = G^(x · tetration_multiplier)(1)`,
//! a split reconstructs as
//! `P^(p · pentation_multiplier)(G^(t · tetration_multiplier)(m · base^(e · exp_multiplier)))`.
//! Levels are resolved outside-in; a rounding overflow at the bottom restarts
//! the split with the level above it forced one higher.
use num_traits::{ConstOne, ConstZero};
#[cfg(not(feature = "std"))]
use num_traits::Float;
use tracing::debug;

use crate::{
    constants::{MAX_CONVERGENCE_STEPS, MAX_SAFE_EXPONENT, MAX_SPLIT_RESTARTS, SLOG_ITERATION_CAP},
    engineering::EngineeringSet,
    error::DecomposeError,
    iterated::{iterated_exp_mult, iterated_mult_log, mult_slog},
    rounding::{round, Rounding},
    scientific::{self, check_base, check_multiplier, Scientific},
    Magnitude,
};

/// Configuration of [`hypersplit`].
#[derive(Debug, Clone)]
pub struct Hypersplit {
    pub base: Magnitude,
    pub rounding: Rounding,
    /// Exclusive ceilings of the mantissa, the exponent and the tetration.
    pub maximums: [Magnitude; 3],
    /// Wider ceilings, each applying only while the level above it is zero.
    pub original_maximums: [Magnitude; 3],
    pub engineering: EngineeringSet,
    pub exp_multiplier: Magnitude,
    pub tetration_multiplier: Magnitude,
    pub pentation_multiplier: u32,
}

impl Default for Hypersplit {
    fn default() -> Self {
        Self::new([10.0; 3])
    }
}

impl Hypersplit {
    /// Base ten with the given ceilings. Until a tetration appears the exponent
    /// may grow up to [`MAX_SAFE_EXPONENT`].
    pub fn new<T: Into<Magnitude>>(maximums: [T; 3]) -> Self {
        let maximums = maximums.map(Into::into);
        let [mantissa, exponent, tetration] = maximums;
        Self {
            base: Magnitude::TEN,
            rounding: Rounding::none(),
            maximums,
            original_maximums: [mantissa, exponent.max(Magnitude::from(MAX_SAFE_EXPONENT)), tetration],
            engineering: EngineeringSet::unit(),
            exp_multiplier: Magnitude::ONE,
            tetration_multiplier: Magnitude::ONE,
            pentation_multiplier: 1,
        }
    }

    pub fn with_base(mut self, base: impl Into<Magnitude>) -> Self {
        self.base = base.into();
        self
    }

    pub fn with_rounding(mut self, rounding: impl Into<Rounding>) -> Self {
        self.rounding = rounding.into();
        self
    }

    pub fn with_original_maximums<T: Into<Magnitude>>(mut self, original_maximums: [T; 3]) -> Self {
        self.original_maximums = original_maximums.map(Into::into);
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

    pub fn with_tetration_multiplier(mut self, tetration_multiplier: impl Into<Magnitude>) -> Self {
        self.tetration_multiplier = tetration_multiplier.into();
        self
    }

    pub fn with_pentation_multiplier(mut self, pentation_multiplier: u32) -> Self {
        self.pentation_multiplier = pentation_multiplier;
        self
    }

    pub fn validate(&self) -> Result<(), DecomposeError> {
        check_base(self.base, self.exp_multiplier)?;
        check_multiplier(self.tetration_multiplier)?;
        if self.pentation_multiplier == 0 {
            return Err(DecomposeError::InvalidMultiplier(0.0));
        }
        let levels = self.maximums.iter().zip(&self.original_maximums).enumerate();
        for (level, (maximum, original)) in levels {
            let usable = |limit: &Magnitude| limit.is_finite() && limit.is_positive();
            if !usable(maximum) || !usable(original) || original < maximum {
                return Err(DecomposeError::MalformedLimits { level });
            }
        }
        Ok(())
    }

    /// Evaluates a split back into the value it came from.
    pub fn reconstruct(
        &self,
        mantissa: Magnitude,
        exponent: Magnitude,
        tetration: Magnitude,
        pentation: Magnitude,
    ) -> Magnitude {
        let scaled = mantissa * self.base.pow(exponent * self.exp_multiplier);
        let mut value = self.stack(scaled, tetration);
        let mut remaining = (pentation * f64::from(self.pentation_multiplier)).to_f64();
        while remaining >= 1.0 && value.is_finite() {
            value = self.stack(Magnitude::ONE, value);
            remaining -= 1.0;
        }
        value
    }

    /// `G^(height · tetration_multiplier)(payload)`.
    fn stack(&self, payload: Magnitude, height: Magnitude) -> Magnitude {
        let height = (height * self.tetration_multiplier).to_f64();
        iterated_exp_mult(self.base, height, payload, self.exp_multiplier)
    }

    fn unstack(&self, value: Magnitude, height: f64) -> Magnitude {
        let height = (Magnitude::from(height) * self.tetration_multiplier).to_f64();
        iterated_mult_log(value, self.base, height, self.exp_multiplier)
    }

    /// One pentation level down: `P⁻¹` applied `pentation_multiplier` times.
    fn unstack_pentation(&self, mut value: Magnitude) -> Magnitude {
        for _ in 0..self.pentation_multiplier {
            value = Magnitude::from(mult_slog(value, self.base, self.exp_multiplier)) / self.tetration_multiplier;
        }
        value
    }
}

type Split = (Magnitude, Magnitude, Magnitude, Magnitude);

struct Splitter<'a> {
    config: &'a Hypersplit,
    scientific: Scientific,
    lower_mantissa: Magnitude,
    exponent_enabled: bool,
    tetration_enabled: bool,
}

impl<'a> Splitter<'a> {
    fn new(config: &'a Hypersplit) -> Self {
        let [max_mantissa, max_exponent, max_tetration] = config.maximums;
        let lower_mantissa = max_mantissa / config.base.pow(config.exp_multiplier);
        let scientific = Scientific::new(config.base)
            .with_rounding(config.rounding.clone())
            .with_mantissa_power(max_mantissa.log(config.base) - config.exp_multiplier)
            .with_engineering(config.engineering.clone())
            .with_exp_multiplier(config.exp_multiplier);
        Self {
            config,
            scientific,
            lower_mantissa,
            exponent_enabled: max_exponent > config.exp_multiplier,
            tetration_enabled: max_tetration > config.tetration_multiplier,
        }
    }

    /// Values below this fit the mantissa and exponent levels.
    fn threshold(&self, upper_zero: bool) -> Magnitude {
        let [max_mantissa, max_exponent, _] = self.config.maximums;
        let [original_mantissa, original_exponent, _] = self.config.original_maximums;
        if !self.exponent_enabled {
            return if upper_zero { original_mantissa } else { max_mantissa };
        }
        let ceiling = if upper_zero { original_exponent } else { max_exponent };
        let top = self.config.engineering.upper_current_value(ceiling);
        (self.lower_mantissa * self.config.base.pow(top * self.config.exp_multiplier)).max(original_mantissa)
    }

    fn tetration_ceiling(&self, pentation: f64) -> Magnitude {
        if pentation == 0.0 { self.config.original_maximums[2] } else { self.config.maximums[2] }
    }

    /// Smallest tetration, at least `floor`, whose remainder fits below the threshold.
    fn tetration(&self, value: Magnitude, floor: f64) -> (f64, Magnitude) {
        if !self.tetration_enabled { return (0.0, value); }
        if floor == 0.0 && value < self.threshold(true) { return (0.0, value); }

        let Hypersplit { base, exp_multiplier, tetration_multiplier, .. } = *self.config;
        let threshold = self.threshold(false);
        let gap = mult_slog(value, base, exp_multiplier) - mult_slog(threshold, base, exp_multiplier);
        let estimate = (gap / tetration_multiplier.to_f64()).floor() + 1.0;
        let mut tetration = estimate.max(1.0).max(floor);
        let mut remainder = self.config.unstack(value, tetration);

        let mut steps = 0;
        while remainder >= threshold && steps < MAX_CONVERGENCE_STEPS {
            tetration += 1.0;
            remainder = self.config.unstack(value, tetration);
            steps += 1;
        }
        while tetration > floor.max(1.0) && steps < MAX_CONVERGENCE_STEPS {
            let below = self.config.unstack(value, tetration - 1.0);
            if below >= threshold { break; }
            tetration -= 1.0;
            remainder = below;
            steps += 1;
        }
        (tetration, remainder)
    }

    fn fits(&self, value: Magnitude, tetration: f64, pentation: f64) -> bool {
        if self.tetration_enabled {
            Magnitude::from(tetration) < self.tetration_ceiling(pentation)
        } else {
            value < self.threshold(pentation == 0.0)
        }
    }

    /// Mantissa and exponent of `value`, and whether the top level overflowed.
    fn scientific(&self, value: Magnitude, upper_zero: bool) -> ((Magnitude, Magnitude), bool) {
        let [max_mantissa, max_exponent, _] = self.config.maximums;
        let [original_mantissa, original_exponent, _] = self.config.original_maximums;
        let rounded = round(value, &self.config.rounding);
        if !self.exponent_enabled {
            let ceiling = if upper_zero { original_mantissa } else { max_mantissa };
            return ((rounded, Magnitude::ZERO), rounded >= ceiling);
        }
        if value >= self.lower_mantissa && value < original_mantissa && rounded < original_mantissa {
            return ((rounded, Magnitude::ZERO), false);
        }
        let (mantissa, exponent) = scientific::split(value, &self.scientific);
        let ceiling = if upper_zero { original_exponent } else { max_exponent };
        ((mantissa, exponent), exponent >= ceiling)
    }

    fn split(&self, value: Magnitude, floor_tetration: f64, floor_pentation: f64, restarts: usize) -> Split {
        let mut pentation = 0.0;
        let mut remainder = value;
        let (tetration, rest) = loop {
            if pentation >= floor_pentation {
                let floor = if pentation == floor_pentation { floor_tetration } else { 0.0 };
                let (tetration, rest) = self.tetration(remainder, floor);
                if self.fits(remainder, tetration, pentation) {
                    break (tetration, rest);
                }
            }
            if pentation >= floor_pentation + SLOG_ITERATION_CAP as f64 || !remainder.is_finite() {
                debug!(%value, pentation, "pentation search exhausted");
                break self.tetration(remainder, 0.0);
            }
            remainder = self.config.unstack_pentation(remainder);
            pentation += 1.0;
        };

        let upper_zero = if self.tetration_enabled { tetration == 0.0 } else { pentation == 0.0 };
        let ((mantissa, exponent), overflow) = self.scientific(rest, upper_zero);
        let split = (mantissa, exponent, Magnitude::from(tetration), Magnitude::from(pentation));
        if !overflow { return split; }

        if restarts >= MAX_SPLIT_RESTARTS {
            debug!(%value, restarts, "split restart limit reached, keeping overflowed split");
            return split;
        }
        debug!(%value, %exponent, tetration, pentation, "rounding overflowed its level, restarting");
        if self.tetration_enabled {
            self.split(value, tetration + 1.0, pentation, restarts + 1)
        } else {
            self.split(value, 0.0, pentation + 1.0, restarts + 1)
        }
    }
}

/// Splits `value` into `(mantissa, exponent, tetration, pentation)`.
///
/// Each level stays below its ceiling in `maximums`, or in `original_maximums`
/// while the level above it is zero. A ceiling at or below its level's
/// multiplier disables that level. Zero gives `(0, 0, 0, 0)`, infinities
/// `(±∞, ∞, ∞, ∞)` and NaN all NaN; negative values carry the sign on the
/// mantissa.
///
/// # Errors
/// [`DecomposeError::InvalidBase`], [`DecomposeError::InvalidMultiplier`] and
/// [`DecomposeError::MalformedLimits`].
pub fn hypersplit(
    value: Magnitude,
    config: &Hypersplit,
) -> Result<(Magnitude, Magnitude, Magnitude, Magnitude), DecomposeError> {
    config.validate()?;
    if value.is_nan() {
        return Ok((Magnitude::NAN, Magnitude::NAN, Magnitude::NAN, Magnitude::NAN));
    }
    if value.is_zero() {
        return Ok((Magnitude::ZERO, Magnitude::ZERO, Magnitude::ZERO, Magnitude::ZERO));
    }
    if value.is_infinite() {
        return Ok((value, Magnitude::INFINITY, Magnitude::INFINITY, Magnitude::INFINITY));
    }
    let (mantissa, exponent, tetration, pentation) = Splitter::new(config).split(value.abs(), 0.0, 0.0, 0);
    let mantissa = if value.is_negative() { -mantissa } else { mantissa };
    Ok((mantissa, exponent, tetration, pentation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(value: f64) -> Magnitude {
        Magnitude::from(value)
    }

    #[test]
    fn limit_validation() {
        let config = Hypersplit::new([10.0, 10.0, 10.0]).with_original_maximums([10.0, 5.0, 10.0]);
        assert_eq!(hypersplit(m(5.0), &config), Err(DecomposeError::MalformedLimits { level: 1 }));
        let config = Hypersplit::new([10.0, f64::INFINITY, 10.0]);
        assert_eq!(hypersplit(m(5.0), &config), Err(DecomposeError::MalformedLimits { level: 1 }));
        let config = Hypersplit::new([-1.0, 10.0, 10.0]);
        assert_eq!(hypersplit(m(5.0), &config), Err(DecomposeError::MalformedLimits { level: 0 }));
        let config = Hypersplit::default().with_pentation_multiplier(0);
        assert_eq!(hypersplit(m(5.0), &config), Err(DecomposeError::InvalidMultiplier(0.0)));
    }

    #[test]
    fn rounding_overflow_rolls_into_tetration() {
        let config = Hypersplit::new([10.0, 10.0, 10.0])
            .with_original_maximums([10.0, 10.0, 10.0])
            .with_rounding(0.01);
        let (mantissa, exponent, tetration, pentation) = hypersplit(m(9.9999e9), &config).unwrap();
        assert!(mantissa.eq_tolerance(&Magnitude::ONE, 1e-12));
        assert_eq!((exponent, tetration, pentation), (Magnitude::ONE, Magnitude::ONE, Magnitude::ZERO));
    }

    #[test]
    fn disabled_exponent_rolls_the_mantissa_into_tetration() {
        let config = Hypersplit::new([1e6, 1.0, 10.0]);
        let (mantissa, exponent, tetration, pentation) = hypersplit(m(1e10), &config).unwrap();
        assert!(mantissa.eq_tolerance(&m(10.0), 1e-9));
        assert_eq!((exponent, tetration, pentation), (Magnitude::ZERO, Magnitude::ONE, Magnitude::ZERO));
        assert!(config.reconstruct(mantissa, exponent, tetration, pentation).eq_tolerance(&m(1e10), 1e-9));
    }
}
