#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(not(feature = "std"))]
pub use alloc::{sync::Arc, vec, vec::Vec};
#[cfg(feature = "std")]
pub use std::{error::Error, sync::Arc, vec, vec::Vec};

#[cfg(all(not(feature = "std"), feature = "error_in_core"))]
pub use core::error::Error;

/// Sign of a float as the `-1 / 0 / 1` triple used by [`Magnitude`](crate::Magnitude).
///
/// Unlike [`f64::signum`], zero and NaN map to `0`.
#[inline]
pub fn sign_of(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
