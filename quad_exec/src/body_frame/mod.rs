//! Body frame module
//!
//! Holds the pose of the body (attitude and centre of gravity offsets) and
//! maps body-relative foot targets into the leg-local frame solved by the leg
//! model.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod transform;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use transform::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Which offsets are applied to a transformed foot target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The target is returned as solved.
    Body,

    /// The centre of gravity offsets are added back onto the target, so the
    /// foot follows the body as it shifts.
    Stance,
}

/// One axis of the body pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseAxis {
    Roll,
    Pitch,
    Yaw,
    Cgx,
    Cgy,
    Cgz,
}

/// Possible errors raised by the body frame.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum BodyFrameError {
    #[error("{axis:?} demand of {value} is outside the limits [{min}, {max}]")]
    OutOfRange {
        axis: PoseAxis,
        value: f64,
        min: f64,
        max: f64,
    },
}
