//! Per-frame driver tying the solver, the sampler and the trace together.
//!
//! A host (window loop, headless renderer, test) owns one [`Spirograph`],
//! edits its chain between frames and calls [`Spirograph::tick`] once per frame.

use crate::errors::KinematicsError;
use crate::float_types::Real;
use crate::kinematics::{Mechanism, compute_pen_and_centers, pen_at};
use crate::raster::RasterSurface;
use crate::sampler::{AdaptiveSampler, SamplerConfig};
use crate::stage::{Chain, Stage};
use crate::trace::{TraceAccumulator, TraceStyle};
use crate::traits::DrawTarget;
use nalgebra::Point2;

/// Base radius never shrinks below this.
pub const MIN_BASE_RADIUS: Real = 20.0;
/// Base radius change per grow/shrink request.
pub const BASE_RADIUS_STEP: Real = 5.0;
/// Speed change per nudge.
pub const SPEED_STEP: Real = 0.1;

/// What a single [`Spirograph::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Mechanism in surface coordinates, `None` when the chain could not be
    /// solved this frame
    pub mechanism: Option<Mechanism>,
    /// Segments painted onto the trace this frame
    pub segments_drawn: usize,
}

/// A chain of rolling circles tracing onto a persistent surface.
#[derive(Debug, Clone)]
pub struct Spirograph<T: DrawTarget = RasterSurface> {
    base_radius: Real,
    chain: Chain,
    origin: Point2<Real>,
    sampler: AdaptiveSampler,
    trace: TraceAccumulator<T>,
    tracing: bool,
    selected: usize,
}

impl Spirograph<RasterSurface> {
    /// A spirograph drawing onto a new `width` × `height` raster, with the base
    /// circle centered on it.
    pub fn with_surface(base_radius: Real, chain: Chain, width: u32, height: u32) -> Self {
        let origin = Point2::new(width as Real * 0.5, height as Real * 0.5);
        Self::new(
            base_radius,
            chain,
            origin,
            SamplerConfig::default(),
            TraceAccumulator::with_size(width, height, TraceStyle::default()),
        )
    }
}

impl<T: DrawTarget> Spirograph<T> {
    /// `origin` is where the base circle's center lands on the surface.
    pub const fn new(
        base_radius: Real,
        chain: Chain,
        origin: Point2<Real>,
        sampler: SamplerConfig,
        trace: TraceAccumulator<T>,
    ) -> Self {
        Spirograph {
            base_radius,
            chain,
            origin,
            sampler: AdaptiveSampler::new(sampler),
            trace,
            tracing: true,
            selected: 0,
        }
    }

    pub const fn base_radius(&self) -> Real {
        self.base_radius
    }

    pub const fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Edit stages in place. The chain's shape is fixed; only stage fields change.
    pub fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    pub const fn origin(&self) -> Point2<Real> {
        self.origin
    }

    pub const fn sampler(&self) -> &AdaptiveSampler {
        &self.sampler
    }

    pub const fn trace(&self) -> &TraceAccumulator<T> {
        &self.trace
    }

    pub fn trace_mut(&mut self) -> &mut TraceAccumulator<T> {
        &mut self.trace
    }

    pub const fn is_tracing(&self) -> bool {
        self.tracing
    }

    /// Solve the mechanism at `time` and, while tracing, extend the trace up to it.
    ///
    /// A degenerate or non-finite chain is logged and skipped: no mechanism is
    /// returned, nothing is drawn and the next successful frame starts a new run
    /// instead of bridging the gap.
    pub fn tick(&mut self, time: Real) -> Tick {
        let offset = self.origin.coords;
        let mechanism = match compute_pen_and_centers(self.base_radius, &self.chain, time) {
            Ok(m) => m.translated(offset),
            Err(e) => {
                self.skip(time, &e);
                return Tick {
                    mechanism: None,
                    segments_drawn: 0,
                };
            },
        };

        if !self.tracing {
            return Tick {
                mechanism: Some(mechanism),
                segments_drawn: 0,
            };
        }

        let (base_radius, chain) = (self.base_radius, &self.chain);
        let segments = match self
            .sampler
            .advance(time, |t| Ok(pen_at(base_radius, chain, t)? + offset))
        {
            Ok(segments) => segments,
            Err(e) => {
                self.skip(time, &e);
                return Tick {
                    mechanism: Some(mechanism),
                    segments_drawn: 0,
                };
            },
        };

        let mut drawn = 0;
        for s in &segments {
            if self.trace.append_stroke(s.start, s.end) {
                drawn += 1;
            }
        }
        log::trace!("t={:.4}: {} segments", time, drawn);

        Tick {
            mechanism: Some(mechanism),
            segments_drawn: drawn,
        }
    }

    fn skip(&mut self, time: Real, error: &KinematicsError) {
        log::warn!("skipping frame at t={}: {}", time, error);
        self.sampler.reset();
    }

    /// Pause or resume tracing. Either way the run restarts, so resuming never
    /// draws a segment across the pause.
    pub fn set_tracing(&mut self, tracing: bool) {
        if tracing != self.tracing {
            log::info!("tracing {}", if tracing { "on" } else { "off" });
        }
        self.tracing = tracing;
        self.sampler.reset();
    }

    pub fn toggle_tracing(&mut self) {
        self.set_tracing(!self.tracing);
    }

    /// Wipe the trace, zero its length and restart the run.
    pub fn clear(&mut self) {
        log::info!("clearing trace ({:.1}px drawn)", self.trace.path_length());
        self.trace.clear();
        self.sampler.reset();
    }

    /// Move the base circle's center on the surface. The run restarts so the
    /// jump is not drawn.
    pub fn set_origin(&mut self, origin: Point2<Real>) {
        self.origin = origin;
        self.sampler.reset();
    }

    pub fn set_sampler_config(&mut self, config: SamplerConfig) {
        self.sampler.set_config(config);
    }

    /// Set the base radius, floored at [`MIN_BASE_RADIUS`].
    pub fn set_base_radius(&mut self, radius: Real) {
        self.base_radius = radius.max(MIN_BASE_RADIUS);
    }

    pub fn grow_base(&mut self) {
        self.set_base_radius(self.base_radius + BASE_RADIUS_STEP);
    }

    pub fn shrink_base(&mut self) {
        self.set_base_radius(self.base_radius - BASE_RADIUS_STEP);
    }

    /// Index of the stage the editing helpers act on.
    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_stage(&self) -> Option<&Stage> {
        self.chain.stage(self.selected)
    }

    fn wrap(&self, index: isize) -> usize {
        let n = self.chain.len() as isize;
        if n == 0 {
            return 0;
        }
        index.rem_euclid(n) as usize
    }

    pub fn select_next(&mut self) {
        self.selected = self.wrap(self.selected as isize + 1);
    }

    pub fn select_previous(&mut self) {
        self.selected = self.wrap(self.selected as isize - 1);
    }

    /// Add `delta` to the selected stage's angular velocity.
    pub fn nudge_speed(&mut self, delta: Real) {
        if let Some(stage) = self.chain.stage_mut(self.selected) {
            stage.angular_velocity += delta;
        }
    }

    pub fn speed_up(&mut self) {
        self.nudge_speed(SPEED_STEP);
    }

    pub fn slow_down(&mut self) {
        self.nudge_speed(-SPEED_STEP);
    }

    pub fn flip_direction(&mut self) {
        if let Some(stage) = self.chain.stage_mut(self.selected) {
            stage.flip_direction();
        }
    }

    /// Switch the selected stage between rolling inside and outside.
    pub fn toggle_rolls_outside(&mut self) {
        if let Some(stage) = self.chain.stage_mut(self.selected) {
            stage.rolls_outside = !stage.rolls_outside;
        }
    }
}
