//! Motion commands

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use comms_if::tc::RotationDir;
use util::maths::get_ang_dist_2pi;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const FORWARD_DEG: f64 = 360.0;
const BACKWARD_DEG: f64 = 180.0;
const RIGHT_DEG: f64 = 90.0;
const LEFT_DEG: f64 = 270.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The walking intent of the operator.
///
/// Gait control keeps a requested copy, written by the command API, and a
/// committed copy which only changes when a leg reaches the point in its
/// cycle where the new command can be adopted smoothly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionCommand {
    /// Walking direction, 360 (or 0) is forwards and 90 is right.
    ///
    /// When jogging a director of 0 means stepping on the spot.
    ///
    /// Units: degrees
    pub director_deg: f64,

    pub moving: bool,

    pub rotation: RotationDir,

    pub jog: bool,
}

/// The quadrant of the body a director angle points into.
///
/// `fore_aft` is `1` forwards and `-1` backwards, `side` is `1` right and
/// `-1` left. Zero means the angle is in neither half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadrant {
    pub fore_aft: i8,
    pub side: i8,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for MotionCommand {
    fn default() -> Self {
        Self {
            director_deg: 0.0,
            moving: false,
            rotation: RotationDir::Stop,
            jog: false
        }
    }
}

impl MotionCommand {
    /// Walk towards `angle_deg`, or stop if there is no angle.
    ///
    /// Stopping while jogging keeps the legs stepping on the spot.
    pub fn set_direction(&mut self, angle_deg: Option<f64>) {
        match angle_deg {
            Some(a) => {
                self.director_deg = a;
                self.moving = true;
            },
            None => {
                self.director_deg = 0.0;
                self.moving = self.jog;
            }
        }
    }

    /// Whether neither walking nor rotation is commanded.
    pub fn is_idle(&self) -> bool {
        !self.moving && self.rotation == RotationDir::Stop
    }

    /// The quadrant of the director angle, using windows of
    /// `half_angle_deg` either side of the four cardinal directions.
    pub fn quadrant(&self, half_angle_deg: f64) -> Quadrant {
        let near = |target: f64| {
            get_ang_dist_2pi(self.director_deg.to_radians(), target.to_radians()).abs()
                < half_angle_deg.to_radians()
        };

        let fore_aft = if near(FORWARD_DEG) {
            1
        }
        else if near(BACKWARD_DEG) {
            -1
        }
        else {
            0
        };

        let side = if near(RIGHT_DEG) {
            1
        }
        else if near(LEFT_DEG) {
            -1
        }
        else {
            0
        };

        Quadrant { fore_aft, side }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_set_direction() {
        let mut c = MotionCommand::default();

        c.set_direction(Some(90.0));
        assert!(c.moving);
        assert_eq!(c.director_deg, 90.0);

        c.set_direction(None);
        assert!(c.is_idle());
        assert_eq!(c.director_deg, 0.0);

        c.jog = true;
        c.set_direction(None);
        assert!(c.moving);
        assert_eq!(c.director_deg, 0.0);
    }

    #[test]
    fn test_quadrant() {
        let q = |d: f64| {
            let c = MotionCommand { director_deg: d, ..MotionCommand::default() };
            let q = c.quadrant(60.0);
            (q.fore_aft, q.side)
        };

        assert_eq!(q(360.0), (1, 0));
        assert_eq!(q(0.0), (1, 0));
        assert_eq!(q(45.0), (1, 1));
        assert_eq!(q(90.0), (0, 1));
        assert_eq!(q(135.0), (-1, 1));
        assert_eq!(q(180.0), (-1, 0));
        assert_eq!(q(225.0), (-1, -1));
        assert_eq!(q(270.0), (0, -1));
        assert_eq!(q(315.0), (1, -1));
    }
}
