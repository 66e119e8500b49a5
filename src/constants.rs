//! Numeric limits of the [`Magnitude`](crate::Magnitude) adapter and the
//! iteration bounds of the decomposition engine.

/// Largest magnitude kept on a layer before it moves up one (about the largest safe integer).
pub(crate) const EXPONENT_LIMIT: f64 = 9e15;
/// `EXPONENT_LIMIT.log10()`; magnitudes below this on layer 1+ move down a layer.
pub(crate) const LAYER_REDUCTION_THRESHOLD: f64 = 15.954242509439325;
/// Non-zero layer-0 values smaller than this are stored on layer 1 with a negative magnitude.
pub(crate) const FIRST_NEG_LAYER: f64 = 1.0 / 9e15;
/// Digits of precision an `f64` carries; sums further apart than this keep the larger term.
pub(crate) const MAX_FLOAT_PRECISION: f64 = 17.0;
/// Layers written as repeated `e`s before switching to `(e^n)` in `Display`.
pub(crate) const DISP_MAX_ES: i64 = 5;

/// `e^(1/e)`. Towers over a base at or below this converge instead of growing.
pub const TETRATION_CONVERGENCE_LIMIT: f64 = 1.444667861009766;

/// Largest exponent (in units of the base) whose mantissa the adapter still resolves.
///
/// Beyond it the value itself no longer carries mantissa digits, so decompositions
/// clamp the mantissa instead of iterating.
pub const MAX_SAFE_EXPONENT: f64 = EXPONENT_LIMIT;
/// Largest tower height the adapter counts exactly; the hyperexponent analogue of [`MAX_SAFE_EXPONENT`].
pub const MAX_SAFE_HEIGHT: f64 = EXPONENT_LIMIT;

/// Iteration cap of the super-logarithm, which is an approximation above a few layers.
pub const SLOG_ITERATION_CAP: usize = 100;
/// Iteration cap of explicit exponentiation/logarithm loops before the layer shortcut takes over.
pub(crate) const TETRATION_ITERATION_CAP: usize = 10_000;
/// Iteration cap of the pentation loop; a handful of steps exhausts any representable value.
pub(crate) const PENTATION_ITERATION_CAP: usize = 10;

/// Lattice shifts a convergence loop may take before it clamps.
pub const MAX_CONVERGENCE_STEPS: usize = 100;
/// Restarts a hypersplit may take after rounding overflows a level.
pub const MAX_SPLIT_RESTARTS: usize = 8;
/// Default iteration cap of the continued-fraction expansion.
pub const FRACTION_ITERATION_CAP: usize = 100;

/// Relative slack used when snapping values onto an engineering lattice.
pub(crate) const LATTICE_EPSILON: f64 = 1e-9;

/// Most digits a lattice search lowers a leading step by before giving up on it.
pub(crate) const LATTICE_BACKTRACK_CAP: usize = 4096;

/// Smallest value of `x!` on the principal branch.
pub const FACTORIAL_MINIMUM: f64 = 0.8856031944108887;
/// Argument at which `x!` attains [`FACTORIAL_MINIMUM`].
pub(crate) const FACTORIAL_ARGMIN: f64 = 0.46163214496836234;
