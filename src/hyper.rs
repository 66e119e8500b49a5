//! Tetration, its inverses and pentation on [`Magnitude`].
//!
//! Fractional heights use the linear approximation of the super-logarithm:
//! on the fundamental interval `(0, 1]`, `slog(x) = x - 1`.
use num_traits::ConstOne;
#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::{constants::*, Magnitude};

impl Magnitude {
    /// Returns `self↑↑height` stacked on `payload`:
    /// `self^self^…^payload` with `height` copies of `self`.
    ///
    /// Negative heights take iterated logarithms of `payload` instead.
    pub fn tetrate(self, height: f64, payload: Self) -> Self {
        if height.is_nan() || self.is_nan() || payload.is_nan() { return Self::NAN; }
        if height == f64::INFINITY {
            return if self.to_f64() > TETRATION_CONVERGENCE_LIMIT { Self::INFINITY } else { Self::NAN };
        }
        if height < 0.0 { return payload.iterated_log(self, -height); }

        let mut whole = height.trunc();
        let fraction = height - whole;
        let mut payload = payload;
        if fraction != 0.0 {
            if payload == Self::ONE {
                whole += 1.0;
                payload = Self::from(fraction);
            } else {
                payload = payload.layer_add(fraction, self);
            }
        }
        self.exponentiate(whole, payload)
    }

    /// Applies `x ↦ self^x` a whole number of times.
    fn exponentiate(self, times: f64, mut payload: Self) -> Self {
        let mut remaining = times;
        let mut iterations = 0;
        while remaining >= 1.0 && iterations < TETRATION_ITERATION_CAP {
            payload = self.pow(payload);
            remaining -= 1.0;
            iterations += 1;
            if !payload.is_finite() { return payload; }
            // Far enough up, each step adds exactly one layer
            if payload.mag > 0.0 && payload.layer - self.layer > 3 {
                return Self::from_components_unchecked(
                    payload.sign,
                    payload.layer.saturating_add(remaining as i64),
                    payload.mag,
                );
            }
        }
        payload
    }

    /// Takes the logarithm in `base` of this value `times` times.
    ///
    /// Negative `times` tetrate instead.
    pub fn iterated_log(self, base: Self, times: f64) -> Self {
        if times.is_nan() || self.is_nan() || base.is_nan() { return Self::NAN; }
        if times < 0.0 { return base.tetrate(-times, self); }

        let mut whole = times.trunc();
        let fraction = times - whole;
        let mut result = self;
        if result.mag > 0.0 && result.layer - base.layer > 3 {
            let loss = whole.min((result.layer - base.layer - 3) as f64);
            whole -= loss;
            result.layer -= loss as i64;
        }
        let mut iterations = 0;
        while whole >= 1.0 && iterations < TETRATION_ITERATION_CAP {
            result = result.log(base);
            whole -= 1.0;
            iterations += 1;
            if !result.is_finite() { return result; }
        }
        if fraction > 0.0 {
            result = result.layer_add(-fraction, base);
        }
        result
    }

    /// Super-logarithm in `base`: the tower height that reaches this value from one.
    ///
    /// Values in `(0, 1]` map linearly onto `(-1, 0]`. Gives up after
    /// [`SLOG_ITERATION_CAP`] logarithms.
    pub fn slog(self, base: Self) -> f64 {
        if self.is_nan() || base.is_nan() || base <= Self::ONE { return f64::NAN; }
        if self.is_infinite() {
            return if self.is_positive() { f64::INFINITY } else { f64::NAN };
        }

        let mut result = 0.0;
        let mut copy = self;
        if copy.mag > 0.0 && copy.layer - base.layer > 3 {
            let loss = copy.layer - base.layer - 3;
            result += loss as f64;
            copy.layer -= loss;
        }
        for _ in 0..SLOG_ITERATION_CAP {
            if copy.is_negative() {
                copy = base.pow(copy);
                result -= 1.0;
            }
            if copy <= Self::ONE {
                return result + copy.to_f64() - 1.0;
            }
            result += 1.0;
            copy = copy.log(base);
        }
        result
    }

    /// Moves this value `diff` layers up (or down) the tower of `base`,
    /// interpolating linearly in super-logarithm space.
    pub fn layer_add(self, diff: f64, base: Self) -> Self {
        let destination = self.slog(base) + diff;
        if !destination.is_finite() {
            return if destination == f64::INFINITY { Self::INFINITY } else { Self::NAN };
        }
        if destination >= 0.0 {
            return base.tetrate(destination, Self::ONE);
        }
        if destination >= -1.0 {
            return base.tetrate(destination + 1.0, Self::ONE).log(base);
        }
        base.tetrate(destination + 2.0, Self::ONE).log(base).log(base)
    }

    /// Returns `self↑↑↑height` stacked on `payload`.
    ///
    /// A fractional height on a non-unit payload is approximated by moving
    /// the payload up the tower of `self`.
    pub fn pentate(self, height: f64, payload: Self) -> Self {
        if height.is_nan() || self.is_nan() || payload.is_nan() || height < 0.0 {
            return Self::NAN;
        }
        let mut whole = height.trunc();
        let fraction = height - whole;
        let mut payload = payload;
        if fraction != 0.0 {
            if payload == Self::ONE {
                whole += 1.0;
                payload = Self::from(fraction);
            } else {
                payload = payload.layer_add(fraction, self);
            }
        }
        let mut iterations = 0;
        while whole >= 1.0 && iterations < PENTATION_ITERATION_CAP {
            payload = self.tetrate(payload.to_f64(), Self::ONE);
            whole -= 1.0;
            iterations += 1;
            if !payload.is_finite() { return payload; }
        }
        payload
    }
}
