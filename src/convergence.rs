//! The shift-until-in-range loop shared by [`scientifify`](crate::scientifify)
//! and [`hyperscientifify`](crate::hyperscientifify).
use tracing::{debug, trace};

use crate::{
    constants::MAX_CONVERGENCE_STEPS,
    engineering::EngineeringSet,
    rounding::{round, Rounding},
    Magnitude,
};

/// One rung per lattice exponent: how a value splits at a given exponent.
pub(crate) trait Ladder {
    /// Mantissa that, at `exponent`, reproduces the value being decomposed.
    fn mantissa_at(&self, exponent: Magnitude) -> Magnitude;

    /// Half-open interval `[lower, upper)` a mantissa must land in at `exponent`.
    fn bounds(&self, exponent: Magnitude) -> (Magnitude, Magnitude);

    /// Whether `exponent` is past the point where mantissas still carry digits.
    fn beyond_precision(&self, exponent: Magnitude) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shift {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopWatch {
    Searching(Option<Shift>),
    ReversedOnce,
    Done,
}

/// Walks `exponent` along the lattice until the rounded mantissa fits its interval.
///
/// A change of direction means rounding keeps pushing the mantissa across a
/// boundary; the loop then settles on the higher of the two exponents with the
/// mantissa clamped to that exponent's lower bound.
pub(crate) fn converge<L: Ladder>(
    ladder: &L,
    engineering: &EngineeringSet,
    rounding: &Rounding,
    mut exponent: Magnitude,
) -> (Magnitude, Magnitude) {
    let mut mantissa = round(ladder.mantissa_at(exponent), rounding);
    let mut watch = LoopWatch::Searching(None);
    let mut steps = 0;

    while watch != LoopWatch::Done {
        let (lower, upper) = ladder.bounds(exponent);
        let shift = if mantissa < lower {
            Shift::Down
        } else if mantissa >= upper {
            Shift::Up
        } else {
            break;
        };

        if ladder.beyond_precision(exponent) {
            debug!(%exponent, %mantissa, "exponent beyond adapter precision, clamping mantissa");
            mantissa = lower;
            break;
        }

        watch = match watch {
            LoopWatch::Searching(Some(previous)) if previous != shift => LoopWatch::ReversedOnce,
            _ if steps >= MAX_CONVERGENCE_STEPS => {
                debug!(%exponent, steps, "convergence step cap reached, clamping");
                LoopWatch::ReversedOnce
            }
            _ => LoopWatch::Searching(Some(shift)),
        };

        if watch == LoopWatch::ReversedOnce {
            if shift == Shift::Up {
                exponent = engineering.next_value(exponent);
            }
            mantissa = ladder.bounds(exponent).0;
            debug!(%exponent, %mantissa, "rounding oscillates between exponents, clamped");
            watch = LoopWatch::Done;
            continue;
        }

        let next = match shift {
            Shift::Up => engineering.next_value(exponent),
            Shift::Down => engineering.previous_value(exponent),
        };
        if next == exponent {
            debug!(%exponent, "lattice reached a fixed point");
            break;
        }
        trace!(from = %exponent, to = %next, ?shift, "shifting exponent");
        exponent = next;
        mantissa = round(ladder.mantissa_at(exponent), rounding);
        steps += 1;
    }

    (mantissa, exponent)
}
