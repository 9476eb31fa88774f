//! Kinematics errors

use crate::float_types::Real;
use std::fmt::Display;

/// Which input carried a NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonFinite {
    /// The simulation time
    Time,
    /// The fixed base circle radius
    BaseRadius,
    /// A field of the stage at `index`
    Stage { index: usize, field: StageField },
}

/// Names a numeric field of a [`Stage`](crate::stage::Stage).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageField {
    Radius,
    PenOffset,
    AngularVelocity,
    Phase,
}

impl Display for StageField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StageField::Radius => "radius",
            StageField::PenOffset => "pen_offset",
            StageField::AngularVelocity => "angular_velocity",
            StageField::Phase => "phase",
        };
        f.write_str(name)
    }
}

impl Display for NonFinite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NonFinite::Time => write!(f, "time"),
            NonFinite::BaseRadius => write!(f, "base radius"),
            NonFinite::Stage { index, field } => write!(f, "stage {} {}", index, field),
        }
    }
}

/// All the ways a chain can fail to produce a pen position
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    /// (DegenerateStage) The stage radius is at or below tolerance, so its spin angle is undefined
    #[error("(DegenerateStage) stage {index} has radius {radius}, which is at or below tolerance")]
    DegenerateStage { index: usize, radius: Real },
    /// (NonFiniteInput) An input is NaN or infinite
    #[error("(NonFiniteInput) {0} is NaN or infinite")]
    NonFiniteInput(NonFinite),
    /// (NonFiniteOutput) Evaluation overflowed while accumulating the stage at `index`
    #[error("(NonFiniteOutput) position overflowed at stage {index}")]
    NonFiniteOutput { index: usize },
}

impl KinematicsError {
    /// `true` for errors caused by NaN/infinite values rather than a bad chain shape.
    ///
    /// The driver treats these as the start of a new run instead of rejecting the chain.
    pub const fn is_non_finite(&self) -> bool {
        matches!(
            self,
            KinematicsError::NonFiniteInput(_) | KinematicsError::NonFiniteOutput { .. }
        )
    }
}
