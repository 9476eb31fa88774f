//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use image::Rgba;
use nalgebra::Point2;
use trochograph::{DrawTarget, float_types::Real};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Component-wise [`approx_eq`] for points.
pub fn approx_point(p: Point2<Real>, x: Real, y: Real, eps: Real) -> bool {
    approx_eq(p.x, x, eps) && approx_eq(p.y, y, eps)
}

/// A primitive handed to a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum Drawn {
    Quad([Point2<Real>; 4], [Rgba<u8>; 4]),
    Disc(Point2<Real>, Real, Rgba<u8>),
}

/// A [`DrawTarget`] that remembers what was drawn instead of rasterizing it.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub drawn: Vec<Drawn>,
    pub clears: usize,
}

impl Recorder {
    pub fn quads(&self) -> impl Iterator<Item = (&[Point2<Real>; 4], &[Rgba<u8>; 4])> {
        self.drawn.iter().filter_map(|d| match d {
            Drawn::Quad(c, k) => Some((c, k)),
            Drawn::Disc(..) => None,
        })
    }
}

impl DrawTarget for Recorder {
    fn fill_quad(&mut self, corners: [Point2<Real>; 4], colors: [Rgba<u8>; 4]) {
        self.drawn.push(Drawn::Quad(corners, colors));
    }

    fn fill_disc(&mut self, center: Point2<Real>, radius: Real, color: Rgba<u8>) {
        self.drawn.push(Drawn::Disc(center, radius, color));
    }

    fn clear(&mut self) {
        self.drawn.clear();
        self.clears += 1;
    }
}
