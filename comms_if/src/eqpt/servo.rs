//! # Servo bus frames
//!
//! Frames understood by the smart servos on the point-to-point serial bus. Each servo is addressed
//! by the two digit id `<leg><joint>`, and id 254 broadcasts to every servo on the bus.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use std::fmt;

use super::FRAME_TERMINATOR;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Servo id which addresses every servo at once.
pub const BROADCAST_ID: u8 = 254;

/// Number of joints on each leg.
pub const NUM_JOINTS_PER_LEG: usize = 3;

/// Gyre (positive rotation) direction of each joint, indexed `[leg - 1][joint - 1]`.
///
/// Left and right legs are mirrored so that positive commands mean the same motion on both sides.
const GYRE_DIRECTIONS: [[i8; NUM_JOINTS_PER_LEG]; 4] = [
    [1, -1, -1],
    [1, -1, -1],
    [-1, 1, 1],
    [-1, 1, 1],
];

/// Baud rates the servos can be switched to.
pub const SUPPORTED_BAUDS: [u32; 5] = [9600, 19200, 38400, 57600, 115200];

/// LED colour of the servos in normal operation.
pub const DEFAULT_LED_COLOUR: u8 = 2;

/// Position filter count sent during initialisation, before a speed level is selected.
const INIT_FILTER_POSITION_COUNT: u8 = 15;

/// Angular stiffness sent during initialisation.
const INIT_ANGULAR_STIFFNESS: i8 = -2;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A joint on a leg.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Joint {
    /// Rotates the whole leg outwards from the body.
    Abduction,
    /// Swings the upper leg forwards and backwards.
    Rotation,
    /// Bends the lower leg.
    Knee
}

/// A frame on the servo bus.
#[derive(Debug, Clone, PartialEq)]
pub enum ServoFrame {
    /// Move a joint to an absolute position, `#<l><j>D<tenths>`.
    Position(JointCommand),

    /// Set the positive rotation direction of a servo, `#<l><j>G<dir>`.
    GyreDirection {
        leg: u8,
        joint: Joint,
        dir: i8
    },

    /// Disable the servos' motion profile, `#254EM0`.
    MotionProfileOff,

    /// Set the position filter count of all servos, `#254FPC<n>`.
    FilterPositionCount(u8),

    /// Set the angular stiffness of all servos, `#254AS<n>`.
    AngularStiffness(i8),

    /// Set the LED colour of all servos, `#254LED<n>`.
    Led(u8),

    /// Hold all servos where they are, `#254H`.
    Halt,

    /// Make all servos limp, `#254L`.
    Limp,

    /// Reset all servos, `#254RESET`.
    Reset,

    /// Store the current positions as the servos' zero offsets, `#254CO`.
    CalibrateOffsets,

    /// Switch the baud rate of all servos, `#254CB<baud>`.
    ChangeBaud(u32),

    /// Ask a servo for its position, `#<l><j>QD`.
    QueryPosition {
        leg: u8,
        joint: Joint
    }
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A position demand for one joint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointCommand {
    /// Leg number, 1 to 4.
    pub leg: u8,

    /// The joint on the leg.
    pub joint: Joint,

    /// Actuator angle after offset and clamping.
    ///
    /// Units: tenths of a degree
    pub tenths: i32
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Joint {
    /// All joints in bus order.
    pub const ALL: [Joint; NUM_JOINTS_PER_LEG] = [Joint::Abduction, Joint::Rotation, Joint::Knee];

    /// The joint digit of the servo id.
    pub fn number(&self) -> u8 {
        match self {
            Joint::Abduction => 1,
            Joint::Rotation => 2,
            Joint::Knee => 3
        }
    }

    /// Zero based index of the joint on its leg.
    pub fn index(&self) -> usize {
        self.number() as usize - 1
    }
}

impl JointCommand {
    /// Get the servo id of the commanded joint.
    pub fn servo_id(&self) -> u8 {
        self.leg * 10 + self.joint.number()
    }
}

impl ServoFrame {
    /// The frames which configure the bus before walking starts.
    pub fn init_sequence() -> Vec<ServoFrame> {
        let mut frames = vec![ServoFrame::Led(DEFAULT_LED_COLOUR)];

        for (leg_idx, dirs) in GYRE_DIRECTIONS.iter().enumerate() {
            for (joint, dir) in Joint::ALL.iter().zip(dirs.iter()) {
                frames.push(ServoFrame::GyreDirection {
                    leg: leg_idx as u8 + 1,
                    joint: *joint,
                    dir: *dir
                });
            }
        }

        frames.push(ServoFrame::MotionProfileOff);
        frames.push(ServoFrame::FilterPositionCount(INIT_FILTER_POSITION_COUNT));
        frames.push(ServoFrame::AngularStiffness(INIT_ANGULAR_STIFFNESS));

        frames
    }

    /// Zero the servo offsets, then ask every servo for its position so the
    /// calibration can be checked.
    pub fn calibration_sequence() -> Vec<ServoFrame> {
        let mut frames = vec![ServoFrame::CalibrateOffsets];

        for leg in 1..=4 {
            for joint in Joint::ALL.iter() {
                frames.push(ServoFrame::QueryPosition { leg, joint: *joint });
            }
        }

        frames
    }
}

impl From<JointCommand> for ServoFrame {
    fn from(cmd: JointCommand) -> Self {
        ServoFrame::Position(cmd)
    }
}

impl fmt::Display for ServoFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServoFrame::Position(cmd) => 
                write!(f, "#{}D{}", cmd.servo_id(), cmd.tenths)?,
            ServoFrame::GyreDirection { leg, joint, dir } =>
                write!(f, "#{}{}G{}", leg, joint.number(), dir)?,
            ServoFrame::MotionProfileOff => write!(f, "#{}EM0", BROADCAST_ID)?,
            ServoFrame::FilterPositionCount(n) => write!(f, "#{}FPC{}", BROADCAST_ID, n)?,
            ServoFrame::AngularStiffness(n) => write!(f, "#{}AS{}", BROADCAST_ID, n)?,
            ServoFrame::Led(n) => write!(f, "#{}LED{}", BROADCAST_ID, n)?,
            ServoFrame::Halt => write!(f, "#{}H", BROADCAST_ID)?,
            ServoFrame::Limp => write!(f, "#{}L", BROADCAST_ID)?,
            ServoFrame::Reset => write!(f, "#{}RESET", BROADCAST_ID)?,
            ServoFrame::CalibrateOffsets => write!(f, "#{}CO", BROADCAST_ID)?,
            ServoFrame::ChangeBaud(b) => write!(f, "#{}CB{}", BROADCAST_ID, b)?,
            ServoFrame::QueryPosition { leg, joint } =>
                write!(f, "#{}{}QD", leg, joint.number())?,
        }

        write!(f, "{}", FRAME_TERMINATOR)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
