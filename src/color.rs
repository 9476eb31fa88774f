//! Hue cycling keyed to distance travelled.

use crate::float_types::{Real, tolerance};
use image::Rgba;

/// Convert hue (degrees, `[0, 360)`), saturation and value (`[0, 1]`) into an 8-bit color
/// with the given `alpha`.
///
/// Standard six-sector conversion: chroma `c = v·s`, the secondary component
/// `x = c·(1 − |(h/60 mod 2) − 1|)` and the shift `m = v − c` applied to all
/// three channels.
pub fn hsv(h: Real, s: Real, v: Real, alpha: u8) -> Rgba<u8> {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };
    Rgba([to_u8(r + m), to_u8(g + m), to_u8(b + m), alpha])
}

#[inline]
fn to_u8(u: Real) -> u8 {
    (u * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Hue in degrees for a point `length` along the path.
///
/// One full turn of the color wheel every `pixels_per_cycle`, shifted by `hue_offset`.
/// `rem_euclid` keeps the result in `[0, 360)` for negative offsets too.
/// `pixels_per_cycle` is floored at [`tolerance`].
pub fn hue_at_length(length: Real, pixels_per_cycle: Real, hue_offset: Real) -> Real {
    let cycle = pixels_per_cycle.max(tolerance());
    let hue = ((length / cycle) * 360.0 + hue_offset).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if hue >= 360.0 { 0.0 } else { hue }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(hsv(0.0, 1.0, 1.0, 255), Rgba([255, 0, 0, 255]));
        assert_eq!(hsv(120.0, 1.0, 1.0, 255), Rgba([0, 255, 0, 255]));
        assert_eq!(hsv(240.0, 1.0, 1.0, 10), Rgba([0, 0, 255, 10]));
        assert_eq!(hsv(60.0, 1.0, 1.0, 255), Rgba([255, 255, 0, 255]));
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(hsv(200.0, 0.0, 0.5, 255), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn hue_wraps_every_cycle() {
        assert!((hue_at_length(0.0, 600.0, 0.0) - 0.0).abs() < 1e-9);
        assert!((hue_at_length(150.0, 600.0, 0.0) - 90.0).abs() < 1e-9);
        assert!((hue_at_length(750.0, 600.0, 0.0) - 90.0).abs() < 1e-9);
        assert!((hue_at_length(0.0, 600.0, -30.0) - 330.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_cycle_stays_in_range() {
        for ppc in [0.0, -5.0, Real::NAN] {
            assert_eq!(hue_at_length(0.0, ppc, 45.0), 45.0);
            let h = hue_at_length(12.5, ppc, 0.0);
            assert!(h.is_finite() && (0.0..360.0).contains(&h));
        }
    }
}
