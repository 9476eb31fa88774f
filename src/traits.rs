use crate::float_types::Real;
use image::Rgba;
use nalgebra::Point2;

/// Something the trace can be painted onto.
///
/// Every primitive is alpha blended (source over) into whatever is already
/// there; nothing is ever redrawn from scratch except by [`DrawTarget::clear`].
pub trait DrawTarget {
    /// Fill the convex quad `corners`, given in triangle-fan order, with colors
    /// interpolated linearly between the per-corner `colors`.
    fn fill_quad(&mut self, corners: [Point2<Real>; 4], colors: [Rgba<u8>; 4]);

    /// Fill a disc of `radius` around `center` with a flat `color`.
    fn fill_disc(&mut self, center: Point2<Real>, radius: Real, color: Rgba<u8>);

    /// Reset every pixel to fully transparent.
    fn clear(&mut self);
}
