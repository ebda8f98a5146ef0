//! # Remote controller frames
//!
//! Mode coded frames sent to a controller on the network link, `#100M<mode>[V<value>][S<speed>]`.
//! Unlike the servo bus these carry the operator's intent rather than joint positions, the remote
//! controller runs its own gait.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use super::FRAME_TERMINATOR;
use crate::tc::{RotationDir, SpecialMove, TrajectoryShape};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Device id of the remote controller.
pub const REMOTE_ID: u8 = 100;

/// Offset added to a special move's code to get its mode number.
pub const SPECIAL_MOVE_MODE_OFFSET: u8 = 10;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The mode of a remote frame, which decides how the value is interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemoteMode {
    /// Walk direction in degrees, 0 to stop.
    Direction,
    /// Rotation direction code.
    Rotate,
    Roll,
    Pitch,
    Yaw,
    FrontalOffset,
    Height,
    LateralOffset,
    /// Trajectory shape code.
    GaitShape,
    /// A named special move, the frame has no value.
    SpecialMove(SpecialMove)
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A frame sent to the remote controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RemoteFrame {
    pub mode: RemoteMode,
    pub value: Option<i32>,
    pub speed: Option<u8>
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RemoteMode {
    /// The mode number on the wire.
    pub fn number(&self) -> u8 {
        match self {
            RemoteMode::Direction => 0,
            RemoteMode::Rotate => 1,
            RemoteMode::Roll => 2,
            RemoteMode::Pitch => 3,
            RemoteMode::Yaw => 4,
            RemoteMode::FrontalOffset => 5,
            RemoteMode::Height => 6,
            RemoteMode::LateralOffset => 7,
            RemoteMode::GaitShape => 8,
            RemoteMode::SpecialMove(m) => SPECIAL_MOVE_MODE_OFFSET + m.code()
        }
    }
}

impl RemoteFrame {
    /// A frame carrying a single value.
    pub fn value(mode: RemoteMode, value: i32) -> Self {
        Self {
            mode,
            value: Some(value),
            speed: None
        }
    }

    /// Walk at the given integer director angle and speed level, or stop if there is no angle.
    pub fn direction(angle_deg: Option<i32>, speed: u8) -> Self {
        match angle_deg {
            Some(a) => Self {
                mode: RemoteMode::Direction,
                value: Some(a),
                speed: Some(speed)
            },
            None => Self::value(RemoteMode::Direction, 0)
        }
    }

    pub fn rotate(dir: RotationDir) -> Self {
        Self::value(RemoteMode::Rotate, dir.code() as i32)
    }

    pub fn gait_shape(shape: TrajectoryShape) -> Self {
        Self::value(RemoteMode::GaitShape, shape.code() as i32)
    }

    pub fn special_move(special: SpecialMove) -> Self {
        Self {
            mode: RemoteMode::SpecialMove(special),
            value: None,
            speed: None
        }
    }
}

impl fmt::Display for RemoteFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}M{}", REMOTE_ID, self.mode.number())?;

        if let Some(v) = self.value {
            write!(f, "V{}", v)?;
        }
        if let Some(s) = self.speed {
            write!(f, "S{}", s)?;
        }

        write!(f, "{}", FRAME_TERMINATOR)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_remote_frames() {
        assert_eq!(RemoteFrame::direction(Some(315), 3).to_string(), "#100M0V315S3\r");
        assert_eq!(RemoteFrame::direction(None, 3).to_string(), "#100M0V0\r");
        assert_eq!(RemoteFrame::rotate(RotationDir::Ccw).to_string(), "#100M1V-1\r");
        assert_eq!(RemoteFrame::value(RemoteMode::Height, 120).to_string(), "#100M6V120\r");
        assert_eq!(RemoteFrame::value(RemoteMode::Roll, -15).to_string(), "#100M2V-15\r");
        assert_eq!(
            RemoteFrame::gait_shape(TrajectoryShape::Square).to_string(),
            "#100M8V2\r"
        );
        assert_eq!(RemoteFrame::special_move(SpecialMove::Paw).to_string(), "#100M13\r");
        assert_eq!(RemoteFrame::special_move(SpecialMove::JogOff).to_string(), "#100M18\r");
    }
}
