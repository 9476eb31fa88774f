//! `Stage`s and the ordered `Chain` they form.

use crate::errors::{KinematicsError, NonFinite, StageField};
use crate::float_types::{FRAC_PI_2, Real, tolerance};

/// One rolling-circle link of a kinematic chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    /// Radius of this stage's rolling circle (must be > 0)
    pub radius: Real,
    /// Distance from this circle's center to the pen; only read on the last stage
    pub pen_offset: Real,
    /// `true` rolls on the outside of the driving circle (epitrochoid),
    /// `false` rolls on the inside (hypotrochoid)
    pub rolls_outside: bool,
    /// Radians per unit time, sign is the direction
    pub angular_velocity: Real,
    /// Angle at time 0
    pub phase: Real,
}

impl Stage {
    /// Create a new [`Stage`] with zero phase.
    pub const fn new(
        radius: Real,
        pen_offset: Real,
        rolls_outside: bool,
        angular_velocity: Real,
    ) -> Self {
        Stage {
            radius,
            pen_offset,
            rolls_outside,
            angular_velocity,
            phase: 0.0,
        }
    }

    /// Builder-style phase setter.
    pub const fn with_phase(mut self, phase: Real) -> Self {
        self.phase = phase;
        self
    }

    /// Reverse the direction of rotation.
    pub fn flip_direction(&mut self) {
        self.angular_velocity = -self.angular_velocity;
    }

    /// Check the stage at position `index` of a chain. The pen offset is only
    /// looked at when `is_last` is set.
    ///
    /// Finite checks come first so a NaN radius is reported as non-finite
    /// rather than degenerate.
    pub fn validate(&self, index: usize, is_last: bool) -> Result<(), KinematicsError> {
        let fields = [
            (StageField::Radius, self.radius),
            (StageField::AngularVelocity, self.angular_velocity),
            (StageField::Phase, self.phase),
            (StageField::PenOffset, if is_last { self.pen_offset } else { 0.0 }),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(KinematicsError::NonFiniteInput(NonFinite::Stage { index, field }));
            }
        }
        if self.radius <= tolerance() {
            return Err(KinematicsError::DegenerateStage {
                index,
                radius: self.radius,
            });
        }
        Ok(())
    }
}

/// An ordered sequence of [`Stage`]s. Stage `i` rolls on stage `i - 1`,
/// stage 0 rolls on the fixed base circle.
///
/// The order is fixed once built; individual stages may be edited in place
/// between ticks through [`Chain::stage_mut`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    stages: Vec<Stage>,
}

impl Chain {
    pub const fn new() -> Self {
        Chain { stages: Vec::new() }
    }

    /// The nested mechanism of the classic demo.
    ///
    /// Stage `i` (0-based) gets radius `base_radius / radius_divisor^(i+1)`,
    /// speed `base_speed^i`, rolls outside and starts at phase `-π/2`.
    /// The last stage carries a pen offset of three quarters of its radius.
    ///
    /// # Parameters
    /// - `base_radius`: radius of the fixed base circle the chain is sized against
    /// - `count`: number of stages
    /// - `radius_divisor`: each stage is this many times smaller than the previous
    /// - `base_speed`: speeds grow as powers of this value, so the chain spans
    ///   several orders of magnitude of angular velocity
    pub fn nested_preset(
        base_radius: Real,
        count: usize,
        radius_divisor: Real,
        base_speed: Real,
    ) -> Self {
        let mut radius = base_radius;
        let mut stages = Vec::with_capacity(count);
        for i in 0..count {
            radius /= radius_divisor;
            let speed = base_speed.powi(i as i32);
            stages.push(Stage::new(radius, 0.0, true, speed).with_phase(-FRAC_PI_2));
        }
        if let Some(last) = stages.last_mut() {
            last.pen_offset = last.radius * 0.75;
        }
        Chain { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Mutable access to a single stage. The chain's length and order can not
    /// be changed through it.
    pub fn stage_mut(&mut self, index: usize) -> Option<&mut Stage> {
        self.stages.get_mut(index)
    }

    pub fn last(&self) -> Option<&Stage> {
        self.stages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stage> {
        self.stages.iter()
    }

    /// Validate every stage in order, reporting the first failure.
    pub fn validate(&self) -> Result<(), KinematicsError> {
        let last = self.stages.len().saturating_sub(1);
        self.stages
            .iter()
            .enumerate()
            .try_for_each(|(index, stage)| stage.validate(index, index == last))
    }
}

impl From<Vec<Stage>> for Chain {
    fn from(stages: Vec<Stage>) -> Self {
        Chain { stages }
    }
}

impl FromIterator<Stage> for Chain {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        Chain {
            stages: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}
