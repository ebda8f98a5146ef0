//! # Telecommand module
//!
//! This module provides telecommand functionality to the communications
//! interface. A telecommand is one call on the quadruped's command API, it can
//! arrive as JSON (from a script) or as a console line such as `dir 90`.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod motion;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use structopt::{StructOpt, clap::AppSettings};
use thiserror::Error;

// Internal
pub use motion::*;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Program name inserted in front of console lines before they are parsed.
const CONSOLE_BIN_NAME: &str = "quad";

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A telecommand, i.e. an instruction sent to the quadruped by an operator or script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
#[serde(rename_all = "snake_case")]
#[structopt(name = "quad", global_setting = AppSettings::AllowNegativeNumbers)]
pub enum Tc {
    /// Walk towards the given director angle in degrees, or stop if no angle is given.
    ///
    /// 360 is straight ahead, 90 right, 180 backwards and 270 left.
    #[structopt(name = "dir")]
    Direction {
        angle_deg: Option<f64>
    },

    /// Walk in the direction given by four forward/back/right/left key states.
    ///
    /// Forward is +1, back is -1, right is -1 and left is +1, released keys are 0.
    #[structopt(name = "orient")]
    Orient {
        fwd: i8,
        back: i8,
        right: i8,
        left: i8
    },

    /// Rotate on the spot.
    #[structopt(name = "rotate")]
    Rotate {
        dir: RotationDir
    },

    /// Set the body roll in degrees.
    #[structopt(name = "roll")]
    Roll {
        deg: f64
    },

    /// Set the body pitch in degrees.
    #[structopt(name = "pitch")]
    Pitch {
        deg: f64
    },

    /// Set the body yaw in degrees.
    #[structopt(name = "yaw")]
    Yaw {
        deg: f64
    },

    /// Set the body height in millimeters.
    #[structopt(name = "height")]
    Height {
        mm: f64
    },

    /// Shift the body forwards or backwards over the feet, in millimeters.
    #[structopt(name = "frontal")]
    FrontalOffset {
        mm: f64
    },

    /// Shift the body sideways over the feet, in millimeters.
    #[structopt(name = "lateral")]
    LateralOffset {
        mm: f64
    },

    /// Select the walking gait.
    #[structopt(name = "gait")]
    Gait {
        gait: GaitType
    },

    /// Select the foot trajectory shape.
    #[structopt(name = "shape")]
    Shape {
        shape: TrajectoryShape
    },

    /// Select the walking speed level, 1 (slowest) to 4 (fastest, dynamic gait).
    #[structopt(name = "speed")]
    Speed {
        level: u8
    },

    /// Perform a named pose or gesture.
    #[structopt(name = "move")]
    SpecialMove {
        special: SpecialMove
    },

    /// Turn jog mode (stepping in place when no direction is set) on or off.
    #[structopt(name = "jog")]
    Jog {
        state: Switch
    },

    /// Set the colour of the servo LEDs.
    #[structopt(name = "led")]
    Led {
        colour: u8
    },

    /// Halt all servos in their current position.
    #[structopt(name = "halt")]
    Halt,

    /// Make all servos limp.
    #[structopt(name = "limp")]
    Limp,

    /// Reset all servos.
    #[structopt(name = "reset")]
    Reset,

    /// Emergency stop: reset all servos, then hold them once they restart.
    #[structopt(name = "estop")]
    EmergencyStop,

    /// Zero the servo offsets in the current posture and query every servo.
    #[structopt(name = "calibrate")]
    Calibrate,

    /// Switch the servo bus to a new baud rate. The link is closed afterwards.
    #[structopt(name = "baud")]
    Baud {
        baud: u32
    },

    /// Send a command to the link as typed, for example `254LED3`.
    #[structopt(name = "cmd")]
    Raw {
        cmd: String
    }
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("{0}")]
    InvalidLine(String),

    #[error("The console line is empty")]
    EmptyLine
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Tc {

    /// Parse a new TC from a JSON packet.
    ///
    /// The packet is externally tagged with the snake case TC name, for example
    /// `{"rotate": {"dir": "cw"}}` or `"halt"`.
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)
    }

    /// Serialise the TC to a JSON packet accepted by `from_json`.
    pub fn to_json(&self) -> Result<String, TcParseError> {
        serde_json::to_string(self).map_err(TcParseError::InvalidJson)
    }

    /// Parse a new TC from a console line, for example `rotate cw`.
    ///
    /// Help requests (`help`, `dir --help`) are returned as `InvalidLine`
    /// containing the help text.
    pub fn from_line(line: &str) -> Result<Self, TcParseError> {
        let words: Vec<&str> = line.split_whitespace().collect();

        if words.is_empty() {
            return Err(TcParseError::EmptyLine);
        }

        Tc::from_iter_safe(std::iter::once(CONSOLE_BIN_NAME).chain(words))
            .map_err(|e| TcParseError::InvalidLine(e.message))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
