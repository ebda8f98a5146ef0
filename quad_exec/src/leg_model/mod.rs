//! Leg model module
//!
//! Geometry of a single three joint leg and the analytic inverse kinematics
//! which turns a leg-local foot target into joint angles.
//!
//! # Frames
//!
//! Leg-local targets are in millimeters and measured from the hip:
//! - `x` is positive towards the front of the body,
//! - `y` is positive downwards, so it is the hip height above the foot,
//! - `z` is lateral, mirrored between left and right legs.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod ik;
mod leg;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use ik::*;
pub use leg::*;
pub use params::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of legs on the robot.
pub const NUM_LEGS: usize = 4;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur while solving a leg.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LegModelError {
    #[error("Target for leg {0} is unreachable: {1}")]
    Unreachable(LegId, UnreachableCause),
}

/// The step of the solve at which a target was found to be outside the leg's
/// workspace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnreachableCause {
    /// The foot is closer to the abduction axis than the abduction offset.
    AbductionOffset,

    /// The hip to foot distance in the leg plane is outside the range the
    /// upper and lower leg can span.
    ///
    /// Units: millimeters
    Reach(f64),

    /// The solve produced a non-finite angle.
    NonFinite,
}

impl std::fmt::Display for UnreachableCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnreachableCause::AbductionOffset => 
                write!(f, "foot is inside the abduction offset"),
            UnreachableCause::Reach(r) => 
                write!(f, "hip to foot distance {:.2} mm cannot be spanned", r),
            UnreachableCause::NonFinite => 
                write!(f, "solution is not finite"),
        }
    }
}
