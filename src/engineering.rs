//! Lattices of exponents generated by non-negative integer combinations of
//! a small set of step sizes.
//!
//! With steps `[3]` the lattice is the engineering-notation exponents
//! `0, 3, 6, …`; with `[5, 2]` it is `0, 2, 4, 5, 6, 7, …`. Queries return
//! either the digits (one count per step, largest step first) or the value
//! they add up to.
use core::cmp::Ordering;

use num_traits::{ConstOne, ConstZero};

use crate::{
    constants::{LATTICE_BACKTRACK_CAP, LATTICE_EPSILON},
    error::DecomposeError,
    shims::{vec, Vec},
    Magnitude,
};

/// A validated, descending, de-duplicated set of positive engineering steps.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Magnitude>", into = "Vec<Magnitude>"))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineeringSet {
    steps: Vec<Magnitude>,
}

type Candidate = (Vec<Magnitude>, Magnitude);

impl EngineeringSet {
    /// Builds a set from the given steps, which are copied and then sorted.
    pub fn new<I>(steps: I) -> Result<Self, DecomposeError>
    where
        I: IntoIterator,
        I::Item: Into<Magnitude>,
    {
        let mut steps: Vec<Magnitude> = steps.into_iter().map(Into::into).collect();
        if steps.is_empty() {
            return Err(DecomposeError::EmptyEngineering);
        }
        if let Some(step) = steps.iter().find(|step| !(step.is_finite() && step.is_positive())) {
            return Err(DecomposeError::InvalidEngineeringStep(step.to_f64()));
        }
        steps.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        steps.dedup();
        Ok(Self { steps })
    }

    /// The set `[1]`: every integer is a lattice point.
    pub fn unit() -> Self {
        Self { steps: vec![Magnitude::ONE] }
    }

    #[inline]
    pub fn steps(&self) -> &[Magnitude] {
        &self.steps
    }

    #[inline]
    pub fn smallest(&self) -> Magnitude {
        self.steps.last().copied().unwrap_or(Magnitude::ONE)
    }

    /// Adds up a digit tuple as returned by [`current`](Self::current) and friends.
    pub fn evaluate(&self, digits: &[Magnitude]) -> Magnitude {
        digits
            .iter()
            .zip(&self.steps)
            .fold(Magnitude::ZERO, |acc, (digit, step)| acc + *digit * *step)
    }

    /// Digits of the greatest lattice point at or below `value`.
    pub fn current(&self, value: Magnitude) -> Result<Vec<Magnitude>, DecomposeError> {
        self.check(value)?;
        if value.is_infinite() { return Ok(self.infinite_digits()); }
        Ok(at_most(value, &self.steps, self.tolerance(value)).0)
    }

    /// Digits of the smallest lattice point strictly above `value`.
    pub fn next(&self, value: Magnitude) -> Result<Vec<Magnitude>, DecomposeError> {
        self.check(value)?;
        if value.is_infinite() { return Ok(self.infinite_digits()); }
        Ok(self.above(value).0)
    }

    /// Digits of the greatest lattice point strictly below `value`; all zeros for zero.
    pub fn previous(&self, value: Magnitude) -> Result<Vec<Magnitude>, DecomposeError> {
        self.check(value)?;
        if value.is_infinite() { return Ok(self.infinite_digits()); }
        Ok(self.below(value).0)
    }

    /// The greatest lattice point at or below `value`, mirrored for negative values.
    pub fn current_value(&self, value: Magnitude) -> Magnitude {
        if !value.is_finite() { return value; }
        if value.is_negative() { return -self.upper_current_value(-value); }
        at_most(value, &self.steps, self.tolerance(value)).1
    }

    /// `value` itself if it lies on the lattice, otherwise the next lattice point up.
    pub fn upper_current_value(&self, value: Magnitude) -> Magnitude {
        if !value.is_finite() { return value; }
        if value.is_negative() { return -self.current_value(-value); }
        let current = self.current_value(value);
        if (value - current).abs() <= self.tolerance(value) {
            current
        } else {
            self.next_value(value)
        }
    }

    pub fn next_value(&self, value: Magnitude) -> Magnitude {
        if !value.is_finite() { return value; }
        if value.is_negative() { return -self.previous_value(-value); }
        self.above(value).1
    }

    pub fn previous_value(&self, value: Magnitude) -> Magnitude {
        if !value.is_finite() { return value; }
        if value.is_zero() { return -self.next_value(value); }
        if value.is_negative() { return -self.next_value(-value); }
        self.below(value).1
    }

    fn check(&self, value: Magnitude) -> Result<(), DecomposeError> {
        if value.is_nan() || value.is_negative() {
            return Err(DecomposeError::NegativeLatticeInput(value.to_f64()));
        }
        Ok(())
    }

    fn tolerance(&self, value: Magnitude) -> Magnitude {
        value.abs().max(self.smallest()) * LATTICE_EPSILON
    }

    fn zeros(&self) -> Candidate {
        (vec![Magnitude::ZERO; self.steps.len()], Magnitude::ZERO)
    }

    fn infinite_digits(&self) -> Vec<Magnitude> {
        let mut digits = self.zeros().0;
        digits[0] = Magnitude::INFINITY;
        digits
    }

    fn above(&self, value: Magnitude) -> Candidate {
        above(value, &self.steps, self.tolerance(value)).unwrap_or_else(|| self.zeros())
    }

    fn below(&self, value: Magnitude) -> Candidate {
        below(value, &self.steps, self.tolerance(value)).unwrap_or_else(|| self.zeros())
    }
}

impl Default for EngineeringSet {
    fn default() -> Self {
        Self::unit()
    }
}

impl TryFrom<Vec<Magnitude>> for EngineeringSet {
    type Error = DecomposeError;

    fn try_from(steps: Vec<Magnitude>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl From<EngineeringSet> for Vec<Magnitude> {
    fn from(set: EngineeringSet) -> Self {
        set.steps
    }
}

/// `floor(target / step)`, rounded up when within the lattice slack of the next integer.
fn snapped_quotient(target: Magnitude, step: Magnitude) -> Magnitude {
    let quotient = target / step;
    let digit = quotient.floor();
    if quotient - digit > Magnitude::ONE - LATTICE_EPSILON {
        digit + Magnitude::ONE
    } else {
        digit
    }
}

/// How far below the snapped quotient the leading digit may need to drop.
///
/// A lattice point has a representation whose trailing digits are each below
/// the leading step, so lowering the leading digit by more than the sum of the
/// trailing steps never finds a better point.
fn reach(rest: &[Magnitude]) -> usize {
    let span = rest.iter().fold(Magnitude::ZERO, |acc, step| acc + *step).ceil().to_f64();
    (span as usize).saturating_add(1).min(LATTICE_BACKTRACK_CAP)
}

/// Candidate digits for the leading step, highest first.
fn candidates(quotient: Magnitude, up: bool, rest: &[Magnitude]) -> impl Iterator<Item = Magnitude> {
    let top = (if up { quotient + Magnitude::ONE } else { quotient }).max(Magnitude::ZERO);
    (0..=reach(rest) + usize::from(up))
        .map(move |offset| top - Magnitude::from(offset as f64))
        .take_while(|digit| !digit.is_negative())
}

fn prepend(digit: Magnitude, head: Magnitude, (tail, tail_sum): Candidate) -> Candidate {
    let mut digits = Vec::with_capacity(tail.len() + 1);
    digits.push(digit);
    digits.extend(tail);
    (digits, head + tail_sum)
}

fn pick(best: Option<Candidate>, candidate: Candidate, ordering: Ordering) -> Option<Candidate> {
    match best {
        Some(best) if candidate.1.partial_cmp(&best.1) != Some(ordering) => Some(best),
        _ => Some(candidate),
    }
}

fn at_most(target: Magnitude, steps: &[Magnitude], tolerance: Magnitude) -> Candidate {
    let Some((&step, rest)) = steps.split_first() else {
        return (Vec::new(), Magnitude::ZERO);
    };
    let mut best = None;
    for digit in candidates(snapped_quotient(target, step), false, rest) {
        let head = digit * step;
        let candidate = prepend(digit, head, at_most(target - head, rest, tolerance));
        if candidate.1 > target + tolerance { continue; }
        best = pick(best, candidate, Ordering::Greater);
    }
    best.unwrap_or_else(|| (vec![Magnitude::ZERO; steps.len()], Magnitude::ZERO))
}

fn above(target: Magnitude, steps: &[Magnitude], tolerance: Magnitude) -> Option<Candidate> {
    let Some((&step, rest)) = steps.split_first() else {
        return (target < -tolerance).then(|| (Vec::new(), Magnitude::ZERO));
    };
    let mut best = None;
    for digit in candidates(snapped_quotient(target, step), true, rest) {
        let head = digit * step;
        let Some(tail) = above(target - head, rest, tolerance) else { continue };
        best = pick(best, prepend(digit, head, tail), Ordering::Less);
    }
    best
}

fn below(target: Magnitude, steps: &[Magnitude], tolerance: Magnitude) -> Option<Candidate> {
    let Some((&step, rest)) = steps.split_first() else {
        return (target > tolerance).then(|| (Vec::new(), Magnitude::ZERO));
    };
    let mut best = None;
    for digit in candidates(snapped_quotient(target, step), false, rest) {
        let head = digit * step;
        let Some(tail) = below(target - head, rest, tolerance) else { continue };
        best = pick(best, prepend(digit, head, tail), Ordering::Greater);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(steps: &[f64]) -> EngineeringSet {
        EngineeringSet::new(steps.iter().copied()).unwrap()
    }

    fn m(value: f64) -> Magnitude {
        Magnitude::from(value)
    }

    #[test]
    fn rejects_bad_steps() {
        assert_eq!(EngineeringSet::new(Vec::<f64>::new()), Err(DecomposeError::EmptyEngineering));
        assert_eq!(EngineeringSet::new([3.0, 0.0]), Err(DecomposeError::InvalidEngineeringStep(0.0)));
        assert!(matches!(
            EngineeringSet::new([f64::NAN]),
            Err(DecomposeError::InvalidEngineeringStep(_))
        ));
    }

    #[test]
    fn steps_are_sorted_without_touching_the_input() {
        let input = [2.0, 5.0, 2.0];
        let set = set(&input);
        assert_eq!(set.steps(), &[m(5.0), m(2.0)]);
        assert_eq!(input, [2.0, 5.0, 2.0]);
    }

    #[test]
    fn engineering_thousands() {
        let set = set(&[3.0]);
        assert_eq!(set.current_value(m(7.0)), m(6.0));
        assert_eq!(set.next_value(m(7.0)), m(9.0));
        assert_eq!(set.next_value(m(6.0)), m(9.0));
        assert_eq!(set.previous_value(m(6.0)), m(3.0));
        assert_eq!(set.previous_value(m(7.0)), m(6.0));
        assert_eq!(set.upper_current_value(m(7.0)), m(9.0));
        assert_eq!(set.upper_current_value(m(6.0)), m(6.0));
    }

    #[test]
    fn mixed_steps_fill_gaps() {
        let set = set(&[5.0, 2.0]);
        assert_eq!(set.current_value(m(3.0)), m(2.0));
        assert_eq!(set.current_value(m(8.0)), m(8.0));
        assert_eq!(set.next_value(m(7.0)), m(8.0));
        assert_eq!(set.previous_value(m(9.0)), m(8.0));
        assert_eq!(set.previous_value(m(5.0)), m(4.0));
        assert_eq!(set.current(m(8.0)).unwrap(), vec![m(0.0), m(4.0)]);

        let set = set_of_four_and_three();
        assert_eq!(set.current_value(m(6.0)), m(6.0));
        assert_eq!(set.next_value(m(4.0)), m(6.0));
    }

    fn set_of_four_and_three() -> EngineeringSet {
        set(&[4.0, 3.0])
    }

    #[test]
    fn coprime_steps_backtrack_the_leading_digit() {
        let tens_and_sevens = set(&[10.0, 7.0]);
        assert_eq!(tens_and_sevens.current_value(m(21.0)), m(21.0));
        assert_eq!(tens_and_sevens.current(m(21.0)).unwrap(), vec![m(0.0), m(3.0)]);
        assert_eq!(tens_and_sevens.next_value(m(20.0)), m(21.0));
        assert_eq!(tens_and_sevens.next_value(m(21.0)), m(24.0));
        assert_eq!(tens_and_sevens.previous_value(m(22.0)), m(21.0));
        assert_eq!(tens_and_sevens.current_value(m(23.0)), m(21.0));

        let nines_and_fours = set(&[9.0, 4.0]);
        assert_eq!(nines_and_fours.current_value(m(16.0)), m(16.0));
        assert_eq!(nines_and_fours.next_value(m(14.0)), m(16.0));
        assert_eq!(nines_and_fours.previous_value(m(17.0)), m(16.0));
    }

    #[test]
    fn negative_values_mirror() {
        let set = set(&[3.0]);
        assert_eq!(set.current_value(m(-7.0)), m(-9.0));
        assert_eq!(set.upper_current_value(m(-7.0)), m(-6.0));
        assert_eq!(set.next_value(m(-6.0)), m(-3.0));
        assert_eq!(set.previous_value(m(-6.0)), m(-9.0));
        assert_eq!(set.previous_value(Magnitude::ZERO), m(-3.0));
        assert_eq!(set.next_value(Magnitude::ZERO), m(3.0));
    }

    #[test]
    fn raw_queries() {
        let set = set(&[3.0, 1.0]);
        assert_eq!(set.current(m(7.5)).unwrap(), vec![m(2.0), m(1.0)]);
        assert_eq!(set.previous(Magnitude::ZERO).unwrap(), vec![m(0.0), m(0.0)]);
        assert_eq!(set.evaluate(&set.next(m(7.0)).unwrap()), m(8.0));
        assert_eq!(set.current(m(-1.0)), Err(DecomposeError::NegativeLatticeInput(-1.0)));
        assert!(set.next(Magnitude::NAN).is_err());
    }

    #[test]
    fn non_finite_values_pass_through() {
        let set = EngineeringSet::unit();
        assert_eq!(set.current_value(Magnitude::INFINITY), Magnitude::INFINITY);
        assert_eq!(set.next_value(Magnitude::NEG_INFINITY), Magnitude::NEG_INFINITY);
        assert!(set.previous_value(Magnitude::NAN).is_nan());
    }

    #[test]
    fn near_lattice_values_snap() {
        let set = EngineeringSet::unit();
        let almost_three = m(2.999_999_999_999_999_6);
        assert_eq!(set.current_value(almost_three), m(3.0));
        assert_eq!(set.next_value(almost_three), m(4.0));
        assert_eq!(set.previous_value(almost_three), m(2.0));
    }

    #[test]
    fn fractional_steps() {
        let set = set(&[0.5]);
        assert_eq!(set.current_value(m(1.7)), m(1.5));
        assert_eq!(set.next_value(m(1.5)), m(2.0));
    }
}
