//! Leg identifiers and joint angle triples

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use std::fmt;

use comms_if::eqpt::servo::Joint;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Identifier of one of the four legs.
///
/// | Leg | Position    | fore | side |
/// |-----|-------------|------|------|
/// | 1   | back right  | +1   | +1   |
/// | 2   | front right | -1   | +1   |
/// | 3   | back left   | +1   | -1   |
/// | 4   | front left  | -1   | -1   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LegId(u8);

/// Solved joint angles of one leg.
///
/// Units: radians
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct JointAngles {
    pub abduction: f64,
    pub rotation: f64,
    pub knee: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LegId {
    /// All legs in bus order.
    pub const ALL: [LegId; 4] = [LegId(1), LegId(2), LegId(3), LegId(4)];

    /// Get a leg from its number, 1 to 4.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1..=4 => Some(LegId(number)),
            _ => None
        }
    }

    /// The leg number, 1 to 4.
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Zero based index of the leg.
    pub fn index(&self) -> usize {
        self.0 as usize - 1
    }

    /// Whether the leg is on the right of the body.
    pub fn is_right(&self) -> bool {
        self.0 <= 2
    }

    /// Whether the leg is at the front of the body.
    pub fn is_front(&self) -> bool {
        self.0 % 2 == 0
    }

    /// Fore/aft quadrant sign, `+1` for back legs and `-1` for front legs.
    pub fn fore(&self) -> f64 {
        if self.is_front() { -1.0 } else { 1.0 }
    }

    /// Lateral quadrant sign, `+1` for right legs and `-1` for left legs.
    pub fn side(&self) -> f64 {
        if self.is_right() { 1.0 } else { -1.0 }
    }
}

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl JointAngles {
    /// Get the angle of a single joint.
    pub fn get(&self, joint: Joint) -> f64 {
        match joint {
            Joint::Abduction => self.abduction,
            Joint::Rotation => self.rotation,
            Joint::Knee => self.knee,
        }
    }

    /// Whether all three angles are finite.
    pub fn is_finite(&self) -> bool {
        self.abduction.is_finite() && self.rotation.is_finite() && self.knee.is_finite()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_quadrant_signs() {
        let signs: Vec<(f64, f64)> = LegId::ALL.iter()
            .map(|l| (l.fore(), l.side()))
            .collect();

        assert_eq!(signs, vec![(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)]);
        assert!(LegId::from_number(0).is_none());
        assert!(LegId::from_number(5).is_none());
        assert_eq!(LegId::from_number(3).map(|l| l.index()), Some(2));
    }
}
