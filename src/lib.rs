#![no_std]
//! Decomposes numbers far beyond `f64` range into ordinary-sized components:
//! a mantissa and exponents of increasing operator strength.
//!
//! - [`scientifify`] splits `value = m · base^e`.
//! - [`hyperscientifify`] splits `value = base↑↑h` with payload `m`.
//! - [`hypersplit`] splits into mantissa, exponent, tetration and pentation
//!   under caller-supplied ceilings.
//!
//! All three snap their exponents onto an [`EngineeringSet`] lattice and round
//! mantissas through a [`Rounding`] specification. Values are carried in
//! [`Magnitude`], a sign plus a tower of powers of ten over an `f64`.
#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("either libm or the standard library must be included to use hyperscientific");

use core::{cmp::Ordering, fmt, ops::*, str::FromStr};

use num_traits::{ConstOne, ConstZero, Float, Num, One, Signed, ToPrimitive, Zero};

mod shims;
use shims::*;

mod constants;
use constants::*;
pub use constants::{
    FACTORIAL_MINIMUM, FRACTION_ITERATION_CAP, MAX_CONVERGENCE_STEPS, MAX_SAFE_EXPONENT,
    MAX_SAFE_HEIGHT, MAX_SPLIT_RESTARTS, SLOG_ITERATION_CAP, TETRATION_CONVERGENCE_LIMIT,
};

pub mod parsing;
use parsing::FromStrError;

mod hyper;
mod special;

mod convergence;
mod engineering;
mod error;
mod fraction;
mod hyperscientific;
mod hypersplit;
mod iterated;
mod rounding;
mod scientific;

pub use engineering::EngineeringSet;
pub use error::DecomposeError;
pub use fraction::{fraction_approximation, Ceiling, Fraction, FractionForm, FractionOptions};
pub use hyperscientific::{hyperscientifify, Hyperscientific};
pub use hypersplit::{hypersplit, Hypersplit};
pub use iterated::{
    factorial_slog, inverse_factorial, iterated_exp_mult, iterated_factorial, iterated_mult_log,
    mult_slog,
};
pub use rounding::{round, Rounding};
pub use scientific::{scientifify, Scientific};

/// A real number stored as `sign · 10^10^…^mag`, with `layer` tens in the tower.
///
/// Layer 0 holds ordinary floats in `[1/9e15, 9e15)`. Higher layers hold `|mag|`
/// in `[15.95…, 9e15)`; a negative `mag` on layer 1 or above encodes a value
/// smaller than `1/9e15` in absolute size.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy)]
pub struct Magnitude {
    sign: i8,
    layer: i64,
    mag: f64,
}

impl ToPrimitive for Magnitude {
    fn to_f64(&self) -> Option<f64> {
        Some(Magnitude::to_f64(self))
    }

    fn to_i64(&self) -> Option<i64> {
        Magnitude::to_f64(self).to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        if self.is_negative() { return None; }
        Magnitude::to_f64(self).to_u64()
    }
}

impl From<f64> for Magnitude {
    #[inline]
    fn from(value: f64) -> Self {
        Self { sign: sign_of(value), layer: 0, mag: value.abs() }.normalized()
    }
}

macro_rules! from_primitive_impl {
    ($($ty: ty),*) => {$(
        impl From<$ty> for Magnitude {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::from(value as f64)
            }
        }
    )*};
}

from_primitive_impl!(f32, i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl Zero for Magnitude {
    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn is_zero(&self) -> bool {
        Magnitude::is_zero(self)
    }
}

impl ConstZero for Magnitude {
    const ZERO: Self = Self::from_components_unchecked(0, 0, 0.0);
}

impl One for Magnitude {
    #[inline]
    fn one() -> Self {
        Self::ONE
    }
}

impl ConstOne for Magnitude {
    const ONE: Self = Self::from_components_unchecked(1, 0, 1.0);
}

impl Signed for Magnitude {
    fn abs(&self) -> Self {
        Magnitude::abs(*self)
    }

    fn abs_sub(&self, other: &Self) -> Self {
        if self <= other {
            return Self::ZERO;
        }
        *self - *other
    }

    fn signum(&self) -> Self {
        Magnitude::signum(*self)
    }

    fn is_positive(&self) -> bool {
        Magnitude::is_positive(self)
    }

    fn is_negative(&self) -> bool {
        Magnitude::is_negative(self)
    }
}

impl PartialEq for Magnitude {
    fn eq(&self, other: &Self) -> bool {
        if self.is_nan() || other.is_nan() { return false; }
        self.sign == other.sign
            && (self.sign == 0 || (self.layer == other.layer && self.mag == other.mag))
    }
}

impl PartialEq<f64> for Magnitude {
    fn eq(&self, other: &f64) -> bool {
        self.eq(&Self::from(*other))
    }
}

impl PartialOrd<f64> for Magnitude {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.partial_cmp(&Self::from(*other))
    }
}

impl PartialOrd for Magnitude {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() { return None; }
        if self.sign != other.sign { return Some(self.sign.cmp(&other.sign)); }
        let res = self.cmp_abs(other)?;
        // Both zero, or both positive/negative
        Some(if self.sign < 0 { res.reverse() } else { res })
    }
}

impl Neg for Magnitude {
    type Output = Magnitude;

    fn neg(self) -> Self::Output {
        Magnitude { sign: -self.sign, ..self }
    }
}

macro_rules! forward_binop_impl {
    ($($impl_assign_name: ident: $assign_name: ident, $impl_name: ident: $name: ident);*) => {$(
        impl $impl_name for Magnitude {
            type Output = Magnitude;

            fn $name(mut self, rhs: Self) -> Self {
                self.$assign_name(rhs);
                self
            }
        }

        impl $impl_name<f64> for Magnitude {
            type Output = Magnitude;

            fn $name(self, rhs: f64) -> Self {
                <Self as $impl_name>::$name(self, Self::from(rhs))
            }
        }

        impl $impl_assign_name<f64> for Magnitude {
            fn $assign_name(&mut self, rhs: f64) {
                self.$assign_name(Self::from(rhs))
            }
        }
    )*};
}

impl AddAssign for Magnitude {
    fn add_assign(&mut self, other: Self) {
        if self.is_nan() { return; }
        if other.is_nan() || (
            self.is_infinite() && other.is_infinite() && self.sign != other.sign
        ) {
            *self = Self::NAN;
            return;
        }
        if self.is_infinite() { return; }
        if other.is_infinite() { *self = other; return; }
        if other.sign == 0 { return; }
        if self.sign == 0 { *self = other; return; }
        if self.sign == -other.sign && self.layer == other.layer && self.mag == other.mag {
            *self = Self::ZERO;
            return;
        }

        let (a, b) = if self.cmp_abs(&other) == Some(Ordering::Less) {
            (other, *self)
        } else {
            (*self, other)
        };
        if a.layer == 0 && b.layer == 0 {
            *self = Self::from(a.sign as f64 * a.mag + b.sign as f64 * b.mag);
            return;
        }
        if a.layer >= 2 || b.layer >= 2 {
            *self = a;
            return;
        }

        let layer_a = a.layer * sign_of(a.mag) as i64;
        let layer_b = b.layer * sign_of(b.mag) as i64;
        if layer_a - layer_b >= 2 {
            *self = a;
            return;
        }
        // Align both operands on layer 1 and add their mantissas there
        let mag_a = if a.layer == 0 { a.mag.log10() } else { a.mag };
        let mag_b = if b.layer == 0 { b.mag.log10() } else { b.mag };
        if mag_a - mag_b > MAX_FLOAT_PRECISION {
            *self = a;
            return;
        }
        let mag_diff = 10f64.powf(mag_a - mag_b);
        let mantissa = b.sign as f64 + a.sign as f64 * mag_diff;
        *self = Self::from_components(sign_of(mantissa), 1, mag_b + mantissa.abs().log10());
    }
}

impl SubAssign for Magnitude {
    fn sub_assign(&mut self, other: Self) {
        *self += -other;
    }
}

impl MulAssign for Magnitude {
    fn mul_assign(&mut self, other: Self) {
        if self.is_nan() || other.is_nan() { *self = Self::NAN; return; }
        if self.is_infinite() || other.is_infinite() {
            if self.sign == 0 || other.sign == 0 { *self = Self::NAN; return; }
            *self = Self { sign: self.sign * other.sign, layer: 0, mag: f64::INFINITY };
            return;
        }
        if self.sign == 0 || other.sign == 0 { *self = Self::ZERO; return; }
        let sign = self.sign * other.sign;
        if self.layer == other.layer && self.mag == -other.mag {
            *self = Self::from_components(sign, 0, 1.0);
            return;
        }

        let (a, b) = if self.layer > other.layer
            || (self.layer == other.layer && self.mag.abs() > other.mag.abs())
        {
            (*self, other)
        } else {
            (other, *self)
        };
        *self = if a.layer == 0 && b.layer == 0 {
            Self::from(sign as f64 * a.mag * b.mag)
        } else if a.layer >= 3 || a.layer - b.layer >= 2 {
            Self::from_components(sign, a.layer, a.mag)
        } else if a.layer == 1 && b.layer == 0 {
            Self::from_components(sign, 1, a.mag + b.mag.log10())
        } else if a.layer == 1 && b.layer == 1 {
            Self::from_components(sign, 1, a.mag + b.mag)
        } else {
            // Layer 2 against layer 1 or 2: add the exponents one layer down
            let exponent = Self::from_components(sign_of(a.mag), a.layer - 1, a.mag.abs())
                + Self::from_components(sign_of(b.mag), b.layer - 1, b.mag.abs());
            Self::from_components(
                sign,
                exponent.layer + 1,
                exponent.sign as f64 * exponent.mag,
            )
        };
    }
}

impl DivAssign for Magnitude {
    fn div_assign(&mut self, other: Self) {
        *self *= other.recip();
    }
}

impl RemAssign for Magnitude {
    fn rem_assign(&mut self, other: Self) {
        if other.sign == 0 || other.is_nan() || self.is_infinite() {
            *self = Self::NAN;
            return;
        }
        if other.is_infinite() || self.sign == 0 { return; }
        let sign = self.sign;
        let lhs = self.abs();
        let rhs = other.abs();
        let mut remainder = lhs - (lhs / rhs).floor() * rhs;
        if remainder.is_negative() { remainder = Self::ZERO; }
        remainder.sign *= sign;
        *self = remainder;
    }
}

forward_binop_impl! {
    AddAssign: add_assign, Add: add;
    SubAssign: sub_assign, Sub: sub;
    MulAssign: mul_assign, Mul: mul;
    DivAssign: div_assign, Div: div;
    RemAssign: rem_assign, Rem: rem
}

impl Magnitude {
    pub const NAN: Self = Self::from_components_unchecked(0, 0, f64::NAN);
    pub const INFINITY: Self = Self::from_components_unchecked(1, 0, f64::INFINITY);
    pub const NEG_INFINITY: Self = Self::from_components_unchecked(-1, 0, f64::INFINITY);
    pub const NEG_ONE: Self = Self::from_components_unchecked(-1, 0, 1.0);
    pub const TWO: Self = Self::from_components_unchecked(1, 0, 2.0);
    pub const TEN: Self = Self::from_components_unchecked(1, 0, 10.0);
    pub const E: Self = Self::from_components_unchecked(1, 0, core::f64::consts::E);

    #[inline]
    /// Constructs a [`Magnitude`] from its raw parts.
    ///
    /// # Note
    /// The parts must already be normalized (see [`Magnitude::from_components`]).
    /// Failure to do so will cause incorrect (although not undefined) behavior.
    pub const fn from_components_unchecked(sign: i8, layer: i64, mag: f64) -> Self {
        Self { sign, layer, mag }
    }

    /// Constructs a [`Magnitude`] from a sign, a layer count and a magnitude,
    /// normalizing the result.
    pub fn from_components(sign: i8, layer: i64, mag: f64) -> Self {
        Self { sign, layer, mag }.normalized()
    }

    #[inline]
    pub fn into_components(self) -> (i8, i64, f64) {
        (self.sign, self.layer, self.mag)
    }

    #[inline]
    pub const fn sign(&self) -> i8 {
        self.sign
    }

    #[inline]
    pub const fn layer(&self) -> i64 {
        self.layer
    }

    #[inline]
    pub const fn mag(&self) -> f64 {
        self.mag
    }

    fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    fn normalize(&mut self) {
        if self.mag.is_nan() { *self = Self::NAN; return; }
        self.sign = self.sign.signum();
        if self.sign == 0 || (self.layer == 0 && self.mag == 0.0) {
            *self = Self::ZERO;
            return;
        }
        if self.mag.is_infinite() {
            // 10^-inf on any layer above the first is zero
            if self.layer > 0 && self.mag < 0.0 { *self = Self::ZERO; return; }
            let sign = if self.mag < 0.0 { -self.sign } else { self.sign };
            *self = Self { sign, layer: 0, mag: f64::INFINITY };
            return;
        }
        while self.layer < 0 {
            self.layer += 1;
            self.mag = self.mag.log10();
        }
        if self.layer == 0 && self.mag < 0.0 {
            self.mag = -self.mag;
            self.sign = -self.sign;
        }
        if self.layer == 0 && self.mag < FIRST_NEG_LAYER {
            self.layer = 1;
            self.mag = self.mag.log10();
            return;
        }

        let mut abs_mag = self.mag.abs();
        let mut sign_mag = self.mag.signum();
        if abs_mag >= EXPONENT_LIMIT {
            self.layer += 1;
            self.mag = sign_mag * abs_mag.log10();
            return;
        }
        while abs_mag < LAYER_REDUCTION_THRESHOLD && self.layer > 0 {
            self.layer -= 1;
            if self.layer == 0 {
                self.mag = 10f64.powf(self.mag);
            } else {
                self.mag = sign_mag * 10f64.powf(abs_mag);
                abs_mag = self.mag.abs();
                sign_mag = self.mag.signum();
            }
        }
        if self.layer == 0 && self.mag == 0.0 {
            *self = Self::ZERO;
        }
    }

    /// Compares absolute values. `None` only if either side is NaN.
    pub fn cmp_abs(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() { return None; }
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => return Some(Ordering::Equal),
            (true, false) => return Some(Ordering::Greater),
            (false, true) => return Some(Ordering::Less),
            (false, false) => {}
        }
        match (self.sign == 0, other.sign == 0) {
            (true, true) => return Some(Ordering::Equal),
            (true, false) => return Some(Ordering::Less),
            (false, true) => return Some(Ordering::Greater),
            (false, false) => {}
        }
        let layer_a = if self.mag > 0.0 { self.layer } else { -self.layer };
        let layer_b = if other.mag > 0.0 { other.layer } else { -other.layer };
        match layer_a.cmp(&layer_b) {
            Ordering::Equal => self.mag.partial_cmp(&other.mag),
            res => Some(res),
        }
    }

    pub fn to_f64(&self) -> f64 {
        if self.is_nan() { return f64::NAN; }
        let sign = self.sign as f64;
        if self.is_infinite() { return sign * f64::INFINITY; }
        match self.layer {
            0 => sign * self.mag,
            1 => sign * 10f64.powf(self.mag),
            _ if self.mag > 0.0 => sign * f64::INFINITY,
            _ => sign * 0.0,
        }
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        self.mag.is_nan()
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.mag.is_infinite()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.mag.is_finite()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.sign == 0 && !self.is_nan()
    }

    #[inline]
    /// Strictly greater than zero. NaN and zero are neither positive nor negative.
    pub fn is_positive(&self) -> bool {
        self.sign > 0
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.sign < 0
    }

    pub fn is_integer(&self) -> bool {
        if !self.is_finite() { return false; }
        if self.layer == 0 { return self.mag.fract() == 0.0; }
        self.mag > 0.0
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self { sign: self.sign.abs(), ..self }
    }

    #[inline]
    pub fn signum(self) -> Self {
        if self.is_nan() { return Self::NAN; }
        Self::from_components_unchecked(self.sign, 0, self.sign.unsigned_abs() as f64)
    }

    /// Magnitudes on layer 1 and above are integers unless they are tiny.
    fn round_with(self, rounding: impl Fn(f64) -> f64) -> Self {
        if !self.is_finite() || self.sign == 0 { return self; }
        if self.layer == 0 {
            return Self::from(rounding(self.sign as f64 * self.mag));
        }
        if self.mag > 0.0 { return self; }
        Self::from(rounding(self.sign as f64 * FIRST_NEG_LAYER / 2.0))
    }

    #[inline]
    pub fn floor(self) -> Self {
        self.round_with(Float::floor)
    }

    #[inline]
    pub fn ceil(self) -> Self {
        self.round_with(Float::ceil)
    }

    #[inline]
    /// Rounds half away from zero, like [`f64::round`].
    pub fn round(self) -> Self {
        self.round_with(Float::round)
    }

    #[inline]
    pub fn trunc(self) -> Self {
        self.round_with(Float::trunc)
    }

    #[inline]
    pub fn recip(self) -> Self {
        if self.is_nan() { return Self::NAN; }
        if self.sign == 0 { return Self::INFINITY; }
        if self.is_infinite() { return Self::ZERO; }
        if self.layer == 0 {
            return Self::from_components(self.sign, 0, 1.0 / self.mag);
        }
        Self::from_components(self.sign, self.layer, -self.mag)
    }

    #[inline]
    /// Returns the larger of this value and the given one. NaN loses.
    pub fn max(self, other: Self) -> Self {
        if self.is_nan() || other > self { other } else { self }
    }

    #[inline]
    /// Returns the smaller of this value and the given one. NaN loses.
    pub fn min(self, other: Self) -> Self {
        if self.is_nan() || other < self { other } else { self }
    }

    pub fn pow(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() { return Self::NAN; }
        if other.sign == 0 { return Self::ONE; }
        if self == Self::ONE { return Self::ONE; }
        if self.sign == 0 {
            return if other.is_positive() { Self::ZERO } else { Self::INFINITY };
        }
        if self.is_negative() {
            if !other.is_integer() { return Self::NAN; }
            let magnitude = self.abs().pow(other);
            let odd = other.layer == 0 && other.mag % 2.0 == 1.0;
            return if odd { -magnitude } else { magnitude };
        }
        if self.is_infinite() {
            return if other.is_positive() { Self::INFINITY } else { Self::ZERO };
        }
        if self.layer == 0 && other.layer == 0 && other.mag.is_finite() {
            let float_res = self.mag.powf(other.sign as f64 * other.mag);
            if float_res.is_normal() { return Self::from(float_res); }
        }
        (self.log10() * other).pow10()
    }

    /// Returns `10^self`.
    pub fn pow10(self) -> Self {
        if self.is_nan() { return Self::NAN; }
        if self.is_infinite() {
            return if self.is_positive() { Self::INFINITY } else { Self::ZERO };
        }
        if self.sign == 0 { return Self::ONE; }
        if self.layer == 0 {
            let exponent = self.sign as f64 * self.mag;
            if exponent.abs() < LAYER_REDUCTION_THRESHOLD {
                return Self::from(10f64.powf(exponent));
            }
            return Self::from_components(1, 1, exponent);
        }
        // 10^(±tiny) rounds to one
        if self.mag < 0.0 { return Self::ONE; }
        Self::from_components(1, self.layer + 1, self.sign as f64 * self.mag)
    }

    #[inline]
    pub fn exp(self) -> Self {
        if self.layer == 0 && self.mag <= 709.0 {
            return Self::from((self.sign as f64 * self.mag).exp());
        }
        (self * core::f64::consts::LOG10_E).pow10()
    }

    /// Returns the base 10 logarithm of this number.
    pub fn log10(self) -> Self {
        if self.is_nan() || self.is_negative() { return Self::NAN; }
        if self.sign == 0 { return Self::NEG_INFINITY; }
        if self.is_infinite() { return Self::INFINITY; }
        if self.layer == 0 { return Self::from(self.mag.log10()); }
        Self::from_components(sign_of(self.mag), self.layer - 1, self.mag.abs())
    }

    pub fn ln(self) -> Self {
        if self.is_finite() && self.sign > 0 {
            match self.layer {
                0 => return Self::from(self.mag.ln()),
                1 => return Self::from(self.mag * core::f64::consts::LN_10),
                _ => {}
            }
        }
        self.log10() * core::f64::consts::LN_10
    }

    /// Returns the logarithm of this number in the given base.
    pub fn log(self, base: Self) -> Self {
        if self.is_nan() || base.is_nan() || !base.is_positive() || base == Self::ONE {
            return Self::NAN;
        }
        if self.is_negative() { return Self::NAN; }
        if self.layer == 0 && base.layer == 0 && self.is_finite() && base.is_finite() && self.sign != 0 {
            return Self::from(self.mag.log10() / base.mag.log10());
        }
        self.log10() / base.log10()
    }

    /// Compares two values up to a relative tolerance, taking the tower into account.
    pub fn eq_tolerance(&self, other: &Self, tolerance: f64) -> bool {
        if self.is_nan() || other.is_nan() { return false; }
        if self == other { return true; }
        if self.sign != other.sign || !self.is_finite() || !other.is_finite() { return false; }
        if (self.layer - other.layer).abs() > 1 { return false; }
        let (mut mag_a, mut mag_b) = (self.mag, other.mag);
        if self.layer > other.layer { mag_b = layer_down_log(mag_b); }
        if other.layer > self.layer { mag_a = layer_down_log(mag_a); }
        (mag_a - mag_b).abs() <= tolerance * mag_a.abs().max(mag_b.abs())
    }
}

/// The magnitude one layer up of a value stored on `mag`'s layer.
fn layer_down_log(mag: f64) -> f64 {
    mag.signum() * mag.abs().log10()
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() { return write!(f, "NaN"); }
        if self.is_negative() {
            write!(f, "-")?;
            return write!(f, "{}", self.abs());
        }
        if self.is_infinite() { return write!(f, "Infinity"); }
        match self.layer {
            0 => write!(f, "{}", self.mag),
            1 => {
                let exponent = self.mag.floor();
                write!(f, "{}e{}", 10f64.powf(self.mag - exponent), exponent)
            }
            layer if layer <= DISP_MAX_ES => {
                for _ in 0..layer {
                    write!(f, "e")?;
                }
                write!(f, "{}", self.mag)
            }
            layer => write!(f, "(e^{layer}){}", self.mag),
        }
    }
}

impl fmt::Display for FromStrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncorrectRadix(radix) =>
                write!(f, "can only decode numbers of radix 10 (got {radix})"),
            Self::MalformedInput(index) =>
                write!(f, "malformed input at character {index}")
        }
    }
}

#[cfg(any(feature = "std", feature = "error_in_core"))]
impl Error for FromStrError {}

impl Num for Magnitude {
    type FromStrRadixErr = FromStrError;

    fn from_str_radix(string: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        use FromStrError::*;
        if radix != 10 { return Err(IncorrectRadix(radix)); }

        Self::from_str(string)
    }
}

impl FromStr for Magnitude {
    type Err = FromStrError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        parsing::parse_magnitude(&mut parsing::ParseHead::new(string)?)
    }
}
