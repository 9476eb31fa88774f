//! Adaptive sub-stepping between consecutive frames.
//!
//! Per-stage angular velocities can differ by orders of magnitude, so the
//! number of samples per frame is derived from how far the pen moved on
//! screen rather than from how much simulated time passed.

use crate::errors::{KinematicsError, NonFinite};
use crate::float_types::Real;
use nalgebra::Point2;

/// Smallest step the sampler will honor, whatever the configuration says.
const MIN_PIXEL_STEP: Real = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    /// Largest screen distance allowed between two consecutive samples
    pub max_pixel_step: Real,
    /// Upper bound on sub-steps per frame
    pub max_substeps: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            max_pixel_step: 1.0,
            max_substeps: 256,
        }
    }
}

impl SamplerConfig {
    /// `max_pixel_step`, floored at 0.1 px.
    fn pixel_step(&self) -> Real {
        if self.max_pixel_step.is_nan() {
            MIN_PIXEL_STEP
        } else {
            self.max_pixel_step.max(MIN_PIXEL_STEP)
        }
    }

    /// Number of sub-steps to bridge a straight-line distance `dist`:
    /// `ceil(dist / max_pixel_step)` clamped to `[1, max_substeps]`.
    pub fn steps_for(&self, dist: Real) -> usize {
        let cap = self.max_substeps.max(1);
        let raw = (dist / self.pixel_step()).ceil();
        if raw.is_nan() || raw < 1.0 {
            1
        } else if raw >= cap as Real {
            cap
        } else {
            raw as usize
        }
    }
}

/// Where the previous frame left the pen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunState {
    pub time: Real,
    pub pen: Point2<Real>,
}

/// One straight piece of the trace, ready for the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2<Real>,
    pub end: Point2<Real>,
}

/// Bridges the pen from the previous frame to the current one with enough
/// intermediate samples that no segment is longer than `max_pixel_step`,
/// up to `max_substeps` per frame.
///
/// The carried `(time, pen)` pair is either fully present (a run is active)
/// or absent; it is never partially updated.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveSampler {
    config: SamplerConfig,
    state: Option<RunState>,
}

impl AdaptiveSampler {
    pub const fn new(config: SamplerConfig) -> Self {
        AdaptiveSampler {
            config,
            state: None,
        }
    }

    pub const fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SamplerConfig) {
        self.config = config;
    }

    pub const fn state(&self) -> Option<RunState> {
        self.state
    }

    pub const fn is_running(&self) -> bool {
        self.state.is_some()
    }

    /// Forget the previous frame; the next [`advance`](Self::advance) seeds a
    /// new run without drawing.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Advance the run to `t_now`.
    ///
    /// `pen_at` evaluates the pen (in screen coordinates) at a given time. It is
    /// called once for `t_now` and once per intermediate sub-step.
    ///
    /// ## Algorithm
    /// ```text
    /// p_now = pen_at(t_now)
    /// steps = clamp(ceil(|p_now − p_prev| / max_pixel_step), 1, max_substeps)
    /// t_i   = t_prev + (t_now − t_prev)·i/steps,   i = 1..steps
    /// ```
    /// The last segment always ends at exactly `p_now`. Only the chord between
    /// the frame endpoints is measured, so a curve that bends sharply inside a
    /// frame may be under-sampled; `max_substeps` bounds the work either way.
    ///
    /// The first call after a reset only seeds the run and returns no segments.
    /// On error the run is reset and no segments are produced for this frame.
    pub fn advance<F>(&mut self, t_now: Real, mut pen_at: F) -> Result<Vec<Segment>, KinematicsError>
    where
        F: FnMut(Real) -> Result<Point2<Real>, KinematicsError>,
    {
        match self.bridge(t_now, &mut pen_at) {
            Ok((segments, next)) => {
                self.state = Some(next);
                Ok(segments)
            },
            Err(e) => {
                self.state = None;
                Err(e)
            },
        }
    }

    fn bridge<F>(&self, t_now: Real, pen_at: &mut F) -> Result<(Vec<Segment>, RunState), KinematicsError>
    where
        F: FnMut(Real) -> Result<Point2<Real>, KinematicsError>,
    {
        if !t_now.is_finite() {
            return Err(KinematicsError::NonFiniteInput(NonFinite::Time));
        }
        let p_now = pen_at(t_now)?;
        let next = RunState {
            time: t_now,
            pen: p_now,
        };

        let Some(RunState {
            time: t_prev,
            pen: p_prev,
        }) = self.state
        else {
            // first point of a run
            return Ok((Vec::new(), next));
        };

        let dist = (p_now - p_prev).norm();
        let steps = self.config.steps_for(dist);
        if dist > self.config.pixel_step() * steps as Real {
            log::debug!(
                "sampler clamped to {} sub-steps for a {:.1}px jump",
                steps,
                dist
            );
        }

        let mut segments = Vec::with_capacity(steps);
        let mut prev = p_prev;
        for i in 1..=steps {
            let p = if i == steps {
                p_now
            } else {
                let s = i as Real / steps as Real;
                pen_at(t_prev + (t_now - t_prev) * s)?
            };
            segments.push(Segment { start: prev, end: p });
            prev = p;
        }
        Ok((segments, next))
    }
}
