//! Nested trochoid kinematics: stage centers and pen position for a [`Chain`] at a given time.

use crate::errors::{KinematicsError, NonFinite};
use crate::float_types::Real;
use crate::stage::Chain;
use nalgebra::{Point2, Vector2};

/// Positions of every stage center and of the pen at one instant.
///
/// All points share the base circle's frame (origin at the base center) until
/// [`Mechanism::translated`] moves them into surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Mechanism {
    pub pen: Point2<Real>,
    pub centers: Vec<Point2<Real>>,
}

impl Mechanism {
    /// Shift every point by `offset`, e.g. the screen position of the base center.
    pub fn translated(mut self, offset: Vector2<Real>) -> Self {
        self.pen += offset;
        for c in &mut self.centers {
            *c += offset;
        }
        self
    }

    /// The arms of the mechanism for overlay drawing: each center to the next
    /// one, and the last center to the pen.
    pub fn arms(&self) -> impl Iterator<Item = (Point2<Real>, Point2<Real>)> + '_ {
        self.centers.iter().enumerate().map(move |(i, &from)| {
            let to = self.centers.get(i + 1).copied().unwrap_or(self.pen);
            (from, to)
        })
    }
}

/// **Mathematical Foundation: Nested Rolling Circles**
///
/// Computes the pen position and every stage center of a chain of circles,
/// each rolling without slip on the previous one (the first on a fixed base
/// circle of radius `base_radius` centred at the origin).
///
/// ## **Per-Stage Recurrence**
/// Starting from `p = (0, 0)` and driving radius `ρ = base_radius`, for stage `j`:
/// ```text
/// α = ω_j·t + φ_j                       instantaneous angle
/// κ = ρ + r_j   (outside)                path radius of the center
/// κ = ρ − r_j   (inside)
/// p += κ·(cos α, sin α)                  stage center
/// β = (κ / r_j)·α                        rolling spin angle
/// ```
/// The next stage rolls on this one, so `ρ ← r_j`. On the last stage the pen
/// offset `d` is applied:
/// ```text
/// outside: p += (−d·cos β, −d·sin β)
/// inside:  p += ( d·cos β, −d·sin β)
/// ```
/// The two offsets are mirror images of each other and are kept as written.
///
/// ### **Degenerate Configurations**
/// An inside stage larger than its driving circle gives a negative `κ`. That
/// simply flips the path orientation and is accepted. A stage radius at or
/// below [`tolerance`](crate::float_types::tolerance) makes `κ / r_j` blow up
/// and is rejected with [`KinematicsError::DegenerateStage`].
///
/// An empty chain leaves the pen at the base center with no stage centers.
///
/// # Parameters
/// - `base_radius`: radius of the fixed base circle
/// - `chain`: the stages, innermost first
/// - `time`: any finite time, negative values included
pub fn compute_pen_and_centers(
    base_radius: Real,
    chain: &Chain,
    time: Real,
) -> Result<Mechanism, KinematicsError> {
    let mut centers = Vec::with_capacity(chain.len());
    let pen = solve(base_radius, chain, time, Some(&mut centers))?;
    Ok(Mechanism { pen, centers })
}

/// The pen position alone, without collecting stage centers.
///
/// Same result as `compute_pen_and_centers(..).pen`; the sampler calls this
/// once per sub-step.
pub fn pen_at(base_radius: Real, chain: &Chain, time: Real) -> Result<Point2<Real>, KinematicsError> {
    solve(base_radius, chain, time, None)
}

fn solve(
    base_radius: Real,
    chain: &Chain,
    time: Real,
    mut centers: Option<&mut Vec<Point2<Real>>>,
) -> Result<Point2<Real>, KinematicsError> {
    if !time.is_finite() {
        return Err(KinematicsError::NonFiniteInput(NonFinite::Time));
    }
    if !base_radius.is_finite() {
        return Err(KinematicsError::NonFiniteInput(NonFinite::BaseRadius));
    }
    chain.validate()?;

    let mut acc = Point2::origin();
    let mut driving_radius = base_radius;
    let last = chain.len().saturating_sub(1);

    for (j, stage) in chain.iter().enumerate() {
        let alpha = stage.angular_velocity * time + stage.phase;
        let kappa = if stage.rolls_outside {
            driving_radius + stage.radius
        } else {
            driving_radius - stage.radius
        };

        acc += Vector2::new(kappa * alpha.cos(), kappa * alpha.sin());
        if !(acc.x.is_finite() && acc.y.is_finite()) {
            return Err(KinematicsError::NonFiniteOutput { index: j });
        }
        if let Some(centers) = centers.as_mut() {
            centers.push(acc);
        }

        if j == last {
            let beta = (kappa / stage.radius) * alpha;
            let d = stage.pen_offset;
            let offset = if stage.rolls_outside {
                Vector2::new(-d * beta.cos(), -d * beta.sin())
            } else {
                Vector2::new(d * beta.cos(), -d * beta.sin())
            };
            acc += offset;
            if !(acc.x.is_finite() && acc.y.is_finite()) {
                return Err(KinematicsError::NonFiniteOutput { index: j });
            }
        } else {
            // next stage rolls on this disc
            driving_radius = stage.radius;
        }
    }

    Ok(acc)
}
