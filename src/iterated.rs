//! Iterates of the multiplied exponential `x ↦ base^(x · multiplier)` and of
//! the factorial, with their inverses and super-logarithms.
//!
//! Both families interpolate fractional heights linearly in super-logarithm
//! space: the multiplied exponential on its fundamental interval `(0, 1]`,
//! the factorial on `[3, 6)`.
use num_traits::ConstOne;
#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::{
    constants::{
        FACTORIAL_ARGMIN, FACTORIAL_MINIMUM, SLOG_ITERATION_CAP, TETRATION_ITERATION_CAP,
    },
    special::ln_gamma,
    Magnitude,
};

/// Applies `x ↦ base^(x · multiplier)` to `payload`, `height` times.
///
/// Negative heights delegate to [`iterated_mult_log`]. With a unit multiplier
/// this is [`Magnitude::tetrate`].
pub fn iterated_exp_mult(base: Magnitude, height: f64, payload: Magnitude, multiplier: Magnitude) -> Magnitude {
    if multiplier == Magnitude::ONE { return base.tetrate(height, payload); }
    if height.is_nan() || base.is_nan() || payload.is_nan() || multiplier.is_nan() {
        return Magnitude::NAN;
    }
    if height < 0.0 { return iterated_mult_log(payload, base, -height, multiplier); }

    let mut whole = height.trunc();
    let fraction = height - whole;
    let mut payload = payload;
    if fraction != 0.0 {
        if payload == Magnitude::ONE {
            whole += 1.0;
            payload = Magnitude::from(fraction);
        } else {
            payload = mult_layer_add(payload, fraction, base, multiplier);
        }
    }
    exp_mult_steps(base, whole, payload, multiplier)
}

fn exp_mult_steps(base: Magnitude, times: f64, mut payload: Magnitude, multiplier: Magnitude) -> Magnitude {
    let mut remaining = times;
    let mut iterations = 0;
    while remaining >= 1.0 && iterations < TETRATION_ITERATION_CAP {
        payload = base.pow(payload * multiplier);
        remaining -= 1.0;
        iterations += 1;
        if !payload.is_finite() { return payload; }
        let (sign, layer, mag) = payload.into_components();
        // Far enough up the multiplier vanishes and each step adds one layer
        if mag > 0.0 && layer - base.layer() > 3 {
            return Magnitude::from_components_unchecked(sign, layer.saturating_add(remaining as i64), mag);
        }
    }
    payload
}

/// Applies `x ↦ log_base(x) / multiplier` to `value`, `times` times.
pub fn iterated_mult_log(value: Magnitude, base: Magnitude, times: f64, multiplier: Magnitude) -> Magnitude {
    if multiplier == Magnitude::ONE { return value.iterated_log(base, times); }
    if times.is_nan() || value.is_nan() || base.is_nan() || multiplier.is_nan() {
        return Magnitude::NAN;
    }
    if times < 0.0 { return iterated_exp_mult(base, -times, value, multiplier); }

    let mut whole = times.trunc();
    let fraction = times - whole;
    let mut result = value;
    let (sign, layer, mag) = result.into_components();
    if mag > 0.0 && layer - base.layer() > 3 {
        let loss = whole.min((layer - base.layer() - 3) as f64);
        whole -= loss;
        result = Magnitude::from_components_unchecked(sign, layer - loss as i64, mag);
    }
    let mut iterations = 0;
    while whole >= 1.0 && iterations < TETRATION_ITERATION_CAP {
        result = result.log(base) / multiplier;
        whole -= 1.0;
        iterations += 1;
        if !result.is_finite() { return result; }
    }
    if fraction > 0.0 {
        result = mult_layer_add(result, -fraction, base, multiplier);
    }
    result
}

/// Super-logarithm of `value` under `x ↦ base^(x · multiplier)`.
///
/// Linear on the fundamental interval `(0, 1]`; gives up after
/// [`SLOG_ITERATION_CAP`] steps.
pub fn mult_slog(value: Magnitude, base: Magnitude, multiplier: Magnitude) -> f64 {
    if multiplier == Magnitude::ONE { return value.slog(base); }
    if value.is_nan() || base.is_nan() || multiplier.is_nan() { return f64::NAN; }
    if value.is_infinite() {
        return if value.is_positive() { f64::INFINITY } else { f64::NAN };
    }

    let mut result = 0.0;
    let mut copy = value;
    let (sign, layer, mag) = copy.into_components();
    if mag > 0.0 && layer - base.layer() > 3 {
        let loss = layer - base.layer() - 3;
        result += loss as f64;
        copy = Magnitude::from_components_unchecked(sign, layer - loss, mag);
    }
    for _ in 0..SLOG_ITERATION_CAP {
        if copy.is_negative() {
            copy = base.pow(copy * multiplier);
            result -= 1.0;
        }
        if copy <= Magnitude::ONE {
            return result + copy.to_f64() - 1.0;
        }
        result += 1.0;
        copy = copy.log(base) / multiplier;
    }
    result
}

/// Inverse of [`mult_slog`].
fn from_mult_slog(slog: f64, base: Magnitude, multiplier: Magnitude) -> Magnitude {
    if !slog.is_finite() {
        return if slog == f64::INFINITY { Magnitude::INFINITY } else { Magnitude::NAN };
    }
    let shifted = slog + 1.0;
    let whole = shifted.floor();
    let start = Magnitude::from(shifted - whole);
    if whole >= 0.0 {
        exp_mult_steps(base, whole, start, multiplier)
    } else {
        iterated_mult_log(start, base, -whole, multiplier)
    }
}

fn mult_layer_add(value: Magnitude, diff: f64, base: Magnitude, multiplier: Magnitude) -> Magnitude {
    from_mult_slog(mult_slog(value, base, multiplier) + diff, base, multiplier)
}

/// Applies `x ↦ x!` to `value`, `height` times.
///
/// Negative heights apply [`inverse_factorial`]; fractional heights
/// interpolate through [`factorial_slog`].
pub fn iterated_factorial(value: Magnitude, height: f64) -> Magnitude {
    if value.is_nan() || height.is_nan() { return Magnitude::NAN; }
    if height.fract() != 0.0 {
        return from_factorial_slog(factorial_slog(value) + height);
    }
    let mut result = value;
    let mut remaining = height.abs();
    let mut iterations = 0;
    while remaining >= 1.0 && iterations < TETRATION_ITERATION_CAP {
        result = if height > 0.0 { result.factorial() } else { inverse_factorial(result) };
        remaining -= 1.0;
        iterations += 1;
        if !result.is_finite() { return result; }
        let (sign, layer, mag) = result.into_components();
        // Factorials this deep act as exponentials: one layer per step
        if height > 0.0 && mag > 0.0 && layer >= 3 {
            return Magnitude::from_components_unchecked(sign, layer.saturating_add(remaining as i64), mag);
        }
    }
    result
}

/// Solves `x! = value` on the principal branch (`x ≥ 0.4616…`).
///
/// NaN below [`FACTORIAL_MINIMUM`].
pub fn inverse_factorial(value: Magnitude) -> Magnitude {
    if value.is_nan() || value < Magnitude::from(FACTORIAL_MINIMUM) { return Magnitude::NAN; }
    if value.is_infinite() { return Magnitude::INFINITY; }

    let target = value.ln();
    let (_, target_layer, _) = target.into_components();
    if target_layer == 0 || target.to_f64() < 1e300 {
        return Magnitude::from(inverse_ln_factorial(target.to_f64()));
    }
    // ln x! ≈ x (ln x - 1), refined twice from x = L / ln L
    let mut x = target / target.ln();
    for _ in 0..2 {
        x = target / (x.ln() - Magnitude::ONE);
    }
    x
}

/// Bisection for `ln Γ(x + 1) = target` on `[FACTORIAL_ARGMIN, ∞)`.
fn inverse_ln_factorial(target: f64) -> f64 {
    let mut lo = FACTORIAL_ARGMIN;
    let mut hi = 2.0;
    while ln_gamma(hi + 1.0) < target {
        lo = hi;
        hi *= 2.0;
    }
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi { break; }
        if ln_gamma(mid + 1.0) < target { lo = mid } else { hi = mid }
    }
    0.5 * (lo + hi)
}

/// Super-logarithm of the factorial: how many factorials lift a value in
/// `[3, 6)` to `value`. Below 6 it is `(value - 3) / 3`.
pub fn factorial_slog(value: Magnitude) -> f64 {
    if value.is_nan() { return f64::NAN; }
    if value.is_infinite() {
        return if value.is_positive() { f64::INFINITY } else { f64::NAN };
    }
    let six = Magnitude::from(6.0);
    let mut result = 0.0;
    let mut copy = value;
    let (sign, layer, mag) = copy.into_components();
    if mag > 0.0 && layer > 3 {
        let loss = layer - 3;
        result += loss as f64;
        copy = Magnitude::from_components_unchecked(sign, layer - loss, mag);
    }
    for _ in 0..SLOG_ITERATION_CAP {
        if copy < six {
            return result + (copy.to_f64() - 3.0) / 3.0;
        }
        result += 1.0;
        copy = inverse_factorial(copy);
    }
    result
}

/// Inverse of [`factorial_slog`].
fn from_factorial_slog(slog: f64) -> Magnitude {
    if !slog.is_finite() {
        return if slog == f64::INFINITY { Magnitude::INFINITY } else { Magnitude::NAN };
    }
    if slog < 0.0 { return Magnitude::from(3.0 + 3.0 * slog); }
    let whole = slog.floor();
    iterated_factorial(Magnitude::from(3.0 + 3.0 * (slog - whole)), whole)
}
