//! # Motion telecommand parameters
//!
//! Small enumerations shared by the telecommands, the gait engine and the wire
//! formats. Each one parses from the lowercase word used on the console.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use std::str::FromStr;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Direction of a rotation on the spot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDir {
    /// Counter clockwise when viewed from above
    Ccw,
    /// No rotation
    Stop,
    /// Clockwise when viewed from above
    Cw
}

/// The gait used while walking.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaitType {
    /// Trotting gait, diagonal leg pairs swing together.
    Dynamic,
    /// Statically stable gait, one leg in the air at a time.
    Static
}

/// Shape of the path a foot follows through the air.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryShape {
    Circular,
    Square
}

/// Named poses and gestures, plus the jog mode toggles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialMove {
    Up,
    Sit,
    Lay,
    Paw,
    Wiggle,
    Tinkle,
    Stretch,
    JogOn,
    JogOff
}

/// A generic on/off switch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Switch {
    On,
    Off
}

/// Error returned when a console word does not name a variant.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("\"{value}\" is not a valid {kind} (expected one of: {expected})")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    expected: &'static str
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RotationDir {
    /// The signed code used on the wire, `-1` for CCW, `0` for stop and `1` for CW.
    pub fn code(&self) -> i8 {
        match self {
            RotationDir::Ccw => -1,
            RotationDir::Stop => 0,
            RotationDir::Cw => 1
        }
    }

    /// Signed multiplier for the per-tick rotation step.
    pub fn sign(&self) -> f64 {
        self.code() as f64
    }
}

impl GaitType {
    /// The gait divisor, the number of stance ticks per swing tick on each leg.
    pub fn beta(&self) -> usize {
        match self {
            GaitType::Dynamic => 1,
            GaitType::Static => 3
        }
    }
}

impl TrajectoryShape {
    /// The code used on the wire.
    pub fn code(&self) -> u8 {
        match self {
            TrajectoryShape::Circular => 1,
            TrajectoryShape::Square => 2
        }
    }
}

impl SpecialMove {
    /// The index of the move, used to build the remote mode number `10 + n`.
    pub fn code(&self) -> u8 {
        match self {
            SpecialMove::Up => 0,
            SpecialMove::Sit => 1,
            SpecialMove::Lay => 2,
            SpecialMove::Paw => 3,
            SpecialMove::Wiggle => 4,
            SpecialMove::Tinkle => 5,
            SpecialMove::Stretch => 6,
            SpecialMove::JogOn => 7,
            SpecialMove::JogOff => 8
        }
    }

    /// Whether this move only toggles jog mode rather than naming a pose.
    pub fn is_jog(&self) -> bool {
        matches!(self, SpecialMove::JogOn | SpecialMove::JogOff)
    }
}

impl Default for GaitType {
    fn default() -> Self {
        GaitType::Dynamic
    }
}

impl Default for SpecialMove {
    fn default() -> Self {
        SpecialMove::Up
    }
}

impl FromStr for RotationDir {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ccw" => Ok(RotationDir::Ccw),
            "stop" => Ok(RotationDir::Stop),
            "cw" => Ok(RotationDir::Cw),
            _ => Err(ParseEnumError::new("rotation direction", s, "cw, ccw, stop"))
        }
    }
}

impl FromStr for GaitType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dynamic" => Ok(GaitType::Dynamic),
            "static" => Ok(GaitType::Static),
            _ => Err(ParseEnumError::new("gait type", s, "dynamic, static"))
        }
    }
}

impl FromStr for TrajectoryShape {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "circular" => Ok(TrajectoryShape::Circular),
            "square" => Ok(TrajectoryShape::Square),
            _ => Err(ParseEnumError::new("trajectory shape", s, "circular, square"))
        }
    }
}

impl FromStr for SpecialMove {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "up" => Ok(SpecialMove::Up),
            "sit" => Ok(SpecialMove::Sit),
            "lay" => Ok(SpecialMove::Lay),
            "paw" => Ok(SpecialMove::Paw),
            "wiggle" => Ok(SpecialMove::Wiggle),
            "tinkle" => Ok(SpecialMove::Tinkle),
            "stretch" => Ok(SpecialMove::Stretch),
            "jog_on" => Ok(SpecialMove::JogOn),
            "jog_off" => Ok(SpecialMove::JogOff),
            _ => Err(ParseEnumError::new(
                "special move",
                s,
                "up, sit, lay, paw, wiggle, tinkle, stretch, jog_on, jog_off"
            ))
        }
    }
}

impl FromStr for Switch {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" => Ok(Switch::On),
            "off" => Ok(Switch::Off),
            _ => Err(ParseEnumError::new("switch state", s, "on, off"))
        }
    }
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_console_words() {
        assert_eq!("CW".parse::<RotationDir>(), Ok(RotationDir::Cw));
        assert_eq!("static".parse::<GaitType>(), Ok(GaitType::Static));
        assert_eq!("square".parse::<TrajectoryShape>(), Ok(TrajectoryShape::Square));
        assert_eq!("jog-on".parse::<SpecialMove>(), Ok(SpecialMove::JogOn));
        assert!("sideways".parse::<RotationDir>().is_err());
    }

    #[test]
    fn test_codes() {
        assert_eq!(RotationDir::Ccw.code(), -1);
        assert_eq!(GaitType::Dynamic.beta(), 1);
        assert_eq!(GaitType::Static.beta(), 3);
        assert_eq!(SpecialMove::Stretch.code(), 6);
        assert_eq!(TrajectoryShape::Circular.code(), 1);
    }
}
