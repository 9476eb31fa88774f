//! The persistent, arc-length colored pen trace.

use crate::color::{hsv, hue_at_length};
use crate::float_types::{Real, tolerance};
use crate::raster::RasterSurface;
use crate::traits::DrawTarget;
use geo::{Coord, LineString, Rect};
use nalgebra::{Point2, Vector2};

/// How the trace is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStyle {
    /// Full stroke width in pixels, used by [`TraceAccumulator::append_stroke`]
    pub stroke_width: Real,
    /// Path length over which the hue makes one full turn
    pub pixels_per_cycle: Real,
    /// Hue at path length 0, in degrees
    pub hue_offset: Real,
    /// Alpha of every painted primitive
    pub alpha: u8,
}

impl Default for TraceStyle {
    fn default() -> Self {
        TraceStyle {
            stroke_width: 2.0,
            pixels_per_cycle: 600.0,
            hue_offset: 0.0,
            alpha: 230,
        }
    }
}

/// One point of the trace and the path length travelled to reach it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSample {
    pub position: Point2<Real>,
    pub length: Real,
}

/// The append-only record of every drawn segment.
///
/// A new run (after a pause or a skipped tick) starts a new polyline, so the
/// path is stored as a list of runs rather than one flat list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TracePath {
    runs: Vec<Vec<TraceSample>>,
    /// Where the pen last was, including the end of a skipped segment
    tail: Option<Point2<Real>>,
}

impl TracePath {
    pub fn runs(&self) -> &[Vec<TraceSample>] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Every sample of every run, in drawing order.
    pub fn samples(&self) -> impl Iterator<Item = &TraceSample> {
        self.runs.iter().flatten()
    }

    /// Whether a segment starting at `a` picks up where the pen left off.
    fn continues_from(&self, a: Point2<Real>) -> bool {
        self.tail.is_some_and(|t| (a - t).norm() <= tolerance())
    }

    fn push_segment(&mut self, a: TraceSample, b: TraceSample) {
        let continues = self.continues_from(a.position);
        match self.runs.last_mut() {
            Some(run) if continues => run.push(b),
            _ => self.runs.push(vec![a, b]),
        }
        self.tail = Some(b.position);
    }

    /// A segment too short to draw still moves the pen along the current run.
    fn skip_segment(&mut self, a: Point2<Real>, b: Point2<Real>) {
        if self.continues_from(a) {
            self.tail = Some(b);
        }
    }

    /// Each run as a `geo` line string, for exporting the stroke geometry.
    pub fn to_line_strings(&self) -> Vec<LineString<Real>> {
        self.runs
            .iter()
            .map(|run| {
                LineString::from(
                    run.iter()
                        .map(|s| Coord {
                            x: s.position.x,
                            y: s.position.y,
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    /// Axis-aligned bounds of every sample, `None` while empty.
    pub fn bounding_rect(&self) -> Option<Rect<Real>> {
        let mut samples = self.samples().map(|s| s.position);
        let first = samples.next()?;
        let (min, max) = samples.fold((first, first), |(lo, hi), p| {
            (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Some(Rect::new(
            Coord { x: min.x, y: min.y },
            Coord { x: max.x, y: max.y },
        ))
    }
}

/// Paints pen segments onto a persistent [`DrawTarget`] and tracks the total
/// path length that keys their color.
///
/// The target is only ever touched by [`append_segment`](Self::append_segment)
/// and [`clear`](Self::clear), so everything painted stays painted.
#[derive(Debug, Clone)]
pub struct TraceAccumulator<T: DrawTarget = RasterSurface> {
    target: T,
    style: TraceStyle,
    path_length: Real,
    path: TracePath,
}

impl TraceAccumulator<RasterSurface> {
    /// Accumulator over a fresh transparent raster of `width` × `height`.
    pub fn with_size(width: u32, height: u32, style: TraceStyle) -> Self {
        Self::new(RasterSurface::new(width, height), style)
    }
}

impl<T: DrawTarget> TraceAccumulator<T> {
    /// Take ownership of `target`. It is cleared so the trace starts empty.
    pub fn new(mut target: T, style: TraceStyle) -> Self {
        target.clear();
        TraceAccumulator {
            target,
            style,
            path_length: 0.0,
            path: TracePath::default(),
        }
    }

    pub const fn style(&self) -> &TraceStyle {
        &self.style
    }

    /// Change the style of segments painted from now on. Already painted
    /// pixels keep their colors.
    pub fn set_style(&mut self, style: TraceStyle) {
        self.style = style;
    }

    /// Total length of every segment appended since the last clear.
    pub const fn path_length(&self) -> Real {
        self.path_length
    }

    pub const fn path(&self) -> &TracePath {
        &self.path
    }

    /// The accumulated image, for compositing under each frame.
    pub const fn surface(&self) -> &T {
        &self.target
    }

    /// Draw one stroke segment of width `w = stroke_width` from `a` to `b` and
    /// extend the path length.
    ///
    /// The endpoint hues come from the path length before (`a`) and after (`b`)
    /// this segment. The stroke body is a quad offset by the left-hand normal
    /// `n = (−u.y, u.x)·w/2` and shaded from `a`'s color to `b`'s; a disc of
    /// radius `w/2` in each endpoint's color rounds the joints.
    ///
    /// Segments shorter than [`tolerance`] have no direction and are skipped.
    /// Returns whether anything was drawn.
    pub fn append_segment(&mut self, a: Point2<Real>, b: Point2<Real>, stroke_width: Real) -> bool {
        let d = b - a;
        let len = d.norm();
        if !len.is_finite() {
            return false;
        }
        if len < tolerance() {
            self.path.skip_segment(a, b);
            return false;
        }

        let prev_length = self.path_length;
        self.path_length += len;

        let TraceStyle {
            pixels_per_cycle,
            hue_offset,
            alpha,
            ..
        } = self.style;
        let ca = hsv(hue_at_length(prev_length, pixels_per_cycle, hue_offset), 1.0, 1.0, alpha);
        let cb = hsv(hue_at_length(self.path_length, pixels_per_cycle, hue_offset), 1.0, 1.0, alpha);

        let u = d / len;
        let half = stroke_width * 0.5;
        let n = Vector2::new(-u.y, u.x) * half;
        self.target
            .fill_quad([a - n, a + n, b + n, b - n], [ca, ca, cb, cb]);
        self.target.fill_disc(a, half, ca);
        self.target.fill_disc(b, half, cb);

        self.path.push_segment(
            TraceSample {
                position: a,
                length: prev_length,
            },
            TraceSample {
                position: b,
                length: self.path_length,
            },
        );
        true
    }

    /// [`append_segment`](Self::append_segment) with the style's stroke width.
    pub fn append_stroke(&mut self, a: Point2<Real>, b: Point2<Real>) -> bool {
        self.append_segment(a, b, self.style.stroke_width)
    }

    /// Wipe the surface to transparent and reset the path length to 0.
    pub fn clear(&mut self) {
        self.target.clear();
        self.path_length = 0.0;
        self.path = TracePath::default();
    }

    /// Give the target back, e.g. to export it.
    pub fn into_surface(self) -> T {
        self.target
    }
}
