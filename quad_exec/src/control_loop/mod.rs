//! # Control loop module
//!
//! Owns the models of the robot and ties them together at a fixed tick
//! interval. Operator commands arrive through the command API, the tick then
//! runs either the gait or the choreographer, solves the legs and sends the
//! joint positions to the transport.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod commands;
mod orientation;
mod params;
mod scheduler;
mod speed;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use orientation::*;
pub use params::*;
pub use scheduler::*;
pub use speed::*;
pub use state::*;

use crate::body_frame::BodyFrameError;
use util::archive::ArchiveError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors raised by the control loop.
#[derive(Debug, thiserror::Error)]
pub enum ControlLoopError {
    #[error("Body pose rejected: {0}")]
    OutOfRange(#[from] BodyFrameError),

    #[error("Speed level {0} does not exist")]
    InvalidSpeedLevel(u8),

    #[error("The servos do not support {0} baud")]
    InvalidBaud(u32),

    #[error("Cannot {cmd}, {reason}")]
    NotAccepted {
        cmd: &'static str,
        reason: &'static str
    },

    #[error("Could not archive the tick: {0}")]
    Archive(ArchiveError),
}
