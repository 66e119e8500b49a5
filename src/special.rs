use core::f64::consts::{LOG10_E, PI};

use num_traits::ConstOne;
#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::Magnitude;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];
/// `0.5 * ln(2π)`
const HALF_LN_TAU: f64 = 0.918_938_533_204_672_8;

/// Lanczos series shared by [`gamma`] and [`ln_gamma`]; `x` is already shifted down by one.
fn lanczos_sum(x: f64) -> f64 {
    LANCZOS_COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEFFICIENTS[0], |acc, (i, c)| acc + c / (x + i as f64))
}

/// Γ(x) on `f64`, reflected below one half.
pub(crate) fn gamma(x: f64) -> f64 {
    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }
    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    ((x + 0.5) * t.ln() - t + HALF_LN_TAU).exp() * lanczos_sum(x)
}

/// ln |Γ(x)| on `f64`.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        return (PI / (PI * x).sin().abs()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    HALF_LN_TAU + (x + 0.5) * t.ln() - t + lanczos_sum(x).ln()
}

impl Magnitude {
    /// Returns `self!`, extended to reals through Γ(x + 1).
    ///
    /// Beyond `f64` range the result comes from Stirling's approximation.
    pub fn factorial(self) -> Self {
        if self.is_nan() { return Self::NAN; }
        if self.is_infinite() {
            return if self.is_positive() { Self::INFINITY } else { Self::NAN };
        }
        let (sign, layer, mag) = self.into_components();
        if layer == 0 {
            let x = sign as f64 * mag;
            if x < 0.0 && x.fract() == 0.0 { return Self::NAN; }
            if x >= 0.0 && x.fract() == 0.0 && x <= 170.0 {
                return Self::from((2..=x as u32).fold(1.0, |acc, n| acc * n as f64));
            }
            if x <= 170.0 { return Self::from(gamma(x + 1.0)); }
            return Self::from(ln_gamma(x + 1.0) * LOG10_E).pow10();
        }
        // |x| below 1/9e15
        if mag < 0.0 { return Self::ONE; }
        if sign < 0 { return Self::NAN; }
        if layer == 1 {
            return (self * (self.ln() - Self::ONE)).exp();
        }
        self.exp()
    }

    /// ln |Γ(self)|.
    pub fn ln_gamma(self) -> Self {
        if self.is_nan() { return Self::NAN; }
        if self.layer() == 0 { return Self::from(ln_gamma(self.to_f64())); }
        if self.mag() < 0.0 { return -self.abs().ln(); }
        if self.is_negative() { return Self::NAN; }
        self * (self.ln() - Self::ONE)
    }
}
