//! Scalar precision and the crate-wide tolerance.

use core::str::FromStr;
use std::sync::OnceLock;

/// Scalar type for every coordinate, radius, angle and length.
#[cfg(feature = "f32")]
pub type Real = f32;
/// Scalar type for every coordinate, radius, angle and length.
#[cfg(feature = "f64")]
pub type Real = f64;

#[cfg(feature = "f32")]
pub use core::f32::consts::{FRAC_PI_2, PI, TAU};
#[cfg(feature = "f64")]
pub use core::f64::consts::{FRAC_PI_2, PI, TAU};

static TOLERANCE: OnceLock<Real> = OnceLock::new();

#[cfg(feature = "f32")]
const DEFAULT_TOLERANCE: Real = 1e-4;
#[cfg(feature = "f64")]
const DEFAULT_TOLERANCE: Real = 1e-6;

/// The "small epsilon" of the crate: stage radii at or below it are
/// degenerate, and trace segments shorter than it are not drawn.
///
/// Resolved once, in order:
///  1) [`set_tolerance`], if called before the first use
///  2) `TROCHOGRAPH_TOLERANCE` at build time (e.g. `TROCHOGRAPH_TOLERANCE=1e-9 cargo build`)
///  3) `1e-6` for `f64`, `1e-4` for `f32`
pub fn tolerance() -> Real {
    *TOLERANCE.get_or_init(|| {
        option_env!("TROCHOGRAPH_TOLERANCE")
            .and_then(|v| Real::from_str(v).ok())
            .filter(|v| v.is_finite())
            .map_or(DEFAULT_TOLERANCE, |v| v.max(Real::EPSILON))
    })
}

/// Fix the tolerance. Only the first call before [`tolerance`] is first read
/// has any effect; returns whether this call was the one that set it.
pub fn set_tolerance(value: Real) -> bool {
    TOLERANCE.set(value.max(Real::EPSILON)).is_ok()
}
