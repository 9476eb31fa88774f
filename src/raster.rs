//! A persistent off-screen RGBA surface with a small software rasterizer.

use crate::float_types::Real;
use crate::traits::DrawTarget;
use image::{ImageResult, Rgba, RgbaImage};
use nalgebra::Point2;
use std::path::Path;

/// Off-screen raster target the trace accumulates on.
///
/// Pixels are sampled at their centers (`x + 0.5`, `y + 0.5`), colors are
/// straight (non-premultiplied) alpha and every primitive is blended source-over.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    /// A fully transparent surface of `width` × `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        RasterSurface {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The accumulated image, for compositing under a frame.
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// `true` when every pixel has zero alpha.
    pub fn is_transparent(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }

    /// Write the surface to a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }

    /// Pixel index range covering `[min, max]` along an axis of `len` pixels,
    /// or `None` when it falls off the surface.
    fn span(min: Real, max: Real, len: u32) -> Option<(u32, u32)> {
        if len == 0 || !(min.is_finite() && max.is_finite()) {
            return None;
        }
        let lo = (min - 0.5).ceil().max(0.0);
        let hi = (max - 0.5).floor().min(len as Real - 1.0);
        if lo > hi {
            return None;
        }
        Some((lo as u32, hi as u32))
    }

    fn blend(&mut self, x: u32, y: u32, src: Rgba<u8>) {
        let dst = self.image.get_pixel_mut(x, y);
        *dst = blend_over(src, *dst);
    }
}

/// Source-over compositing of straight-alpha colors.
fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src.0[3] as Real / 255.0;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst.0[3] as Real / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |i: usize| -> u8 {
        let s = src.0[i] as Real;
        let d = dst.0[i] as Real;
        ((s * sa + d * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Twice the signed area of triangle `(a, b, p)`.
#[inline]
fn edge(a: Point2<Real>, b: Point2<Real>, p: Point2<Real>) -> Real {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Barycentric weights of `p` in triangle `(a, b, c)`, `None` if outside or degenerate.
fn barycentric(
    a: Point2<Real>,
    b: Point2<Real>,
    c: Point2<Real>,
    p: Point2<Real>,
) -> Option<[Real; 3]> {
    let area = edge(a, b, c);
    if area.abs() <= Real::EPSILON {
        return None;
    }
    let w0 = edge(b, c, p) / area;
    let w1 = edge(c, a, p) / area;
    let w2 = edge(a, b, p) / area;
    if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
        return None;
    }
    Some([w0, w1, w2])
}

fn mix3(colors: [Rgba<u8>; 3], w: [Real; 3]) -> Rgba<u8> {
    let channel = |i: usize| -> u8 {
        let v = colors[0].0[i] as Real * w[0]
            + colors[1].0[i] as Real * w[1]
            + colors[2].0[i] as Real * w[2];
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba([channel(0), channel(1), channel(2), channel(3)])
}

impl DrawTarget for RasterSurface {
    fn fill_quad(&mut self, corners: [Point2<Real>; 4], colors: [Rgba<u8>; 4]) {
        let [p0, p1, p2, p3] = corners;
        let min_x = corners.iter().map(|p| p.x).fold(Real::INFINITY, Real::min);
        let max_x = corners.iter().map(|p| p.x).fold(Real::NEG_INFINITY, Real::max);
        let min_y = corners.iter().map(|p| p.y).fold(Real::INFINITY, Real::min);
        let max_y = corners.iter().map(|p| p.y).fold(Real::NEG_INFINITY, Real::max);
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::span(min_x, max_x, self.width()),
            Self::span(min_y, max_y, self.height()),
        ) else {
            return;
        };

        // Fan (p0, p1, p2) + (p0, p2, p3). A pixel on the shared diagonal is
        // painted once, by whichever triangle claims it first.
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point2::new(x as Real + 0.5, y as Real + 0.5);
                let color = if let Some(w) = barycentric(p0, p1, p2, p) {
                    mix3([colors[0], colors[1], colors[2]], w)
                } else if let Some(w) = barycentric(p0, p2, p3, p) {
                    mix3([colors[0], colors[2], colors[3]], w)
                } else {
                    continue;
                };
                self.blend(x, y, color);
            }
        }
    }

    fn fill_disc(&mut self, center: Point2<Real>, radius: Real, color: Rgba<u8>) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::span(center.x - radius, center.x + radius, self.width()),
            Self::span(center.y - radius, center.y + radius, self.height()),
        ) else {
            return;
        };
        let r2 = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as Real + 0.5 - center.x;
                let dy = y as Real + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }
}
