//! Joint actuation mapping
//!
//! Converts solved joint angles into servo position commands, applying each
//! joint's zero offset and travel limits.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use serde::Deserialize;

use comms_if::eqpt::servo::{Joint, JointCommand, NUM_JOINTS_PER_LEG};
use util::maths::clamp;
use crate::leg_model::{JointAngles, LegId, NUM_LEGS};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of joint commands sent per tick.
pub const NUM_JOINTS: usize = NUM_LEGS * NUM_JOINTS_PER_LEG;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Joint map parameters, indexed by joint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Params {
    /// Units: tenths of a degree
    pub offsets_tenths: [f64; NUM_JOINTS_PER_LEG],

    /// Units: tenths of a degree
    pub min_tenths: [f64; NUM_JOINTS_PER_LEG],

    /// Units: tenths of a degree
    pub max_tenths: [f64; NUM_JOINTS_PER_LEG],
}

#[derive(Debug, Clone, Default)]
pub struct JointMap {
    params: Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointMap {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Map one joint angle to its servo command value.
    ///
    /// Units: `angle_rad` in radians, output in tenths of a degree
    pub fn tenths(&self, joint: Joint, angle_rad: f64) -> i32 {
        let j = joint.index();
        let raw = angle_rad.to_degrees() * 10.0 - self.params.offsets_tenths[j];

        clamp(raw, self.params.min_tenths[j], self.params.max_tenths[j]).trunc() as i32
    }

    /// Map the angles of every leg to joint commands, ordered by leg then
    /// joint.
    pub fn map(&self, angles: &[JointAngles; NUM_LEGS]) -> [JointCommand; NUM_JOINTS] {
        let mut cmds = [JointCommand {
            leg: 1,
            joint: Joint::Abduction,
            tenths: 0
        }; NUM_JOINTS];

        for leg in LegId::ALL.iter() {
            for joint in Joint::ALL.iter() {
                cmds[leg.index() * NUM_JOINTS_PER_LEG + joint.index()] = JointCommand {
                    leg: leg.number(),
                    joint: *joint,
                    tenths: self.tenths(*joint, angles[leg.index()].get(*joint))
                };
            }
        }

        trace!("Joint commands: {:?}", cmds.iter().map(|c| c.tenths).collect::<Vec<_>>());

        cmds
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn map() -> JointMap {
        JointMap::new(crate::params::QuadParams::builtin().unwrap().joint_map)
    }

    #[test]
    fn test_offset_and_truncation() {
        let m = map();

        assert_eq!(m.tenths(Joint::Abduction, 12.34f64.to_radians()), 123);
        assert_eq!(m.tenths(Joint::Abduction, (-12.34f64).to_radians()), -123);
        assert_eq!(m.tenths(Joint::Rotation, 80.05f64.to_radians()), 55);
        assert_eq!(m.tenths(Joint::Knee, 90.05f64.to_radians()), 745);
    }

    #[test]
    fn test_limits() {
        let m = map();

        assert_eq!(m.tenths(Joint::Abduction, 1.0), 450);
        assert_eq!(m.tenths(Joint::Abduction, -1.0), -450);
        assert_eq!(m.tenths(Joint::Rotation, 0.0), -600);
        assert_eq!(m.tenths(Joint::Knee, 0.0), 0);
        assert_eq!(m.tenths(Joint::Knee, 4.0), 1800);
    }

    #[test]
    fn test_bus_order() {
        let m = map();
        let angles = [JointAngles::default(); NUM_LEGS];
        let cmds = m.map(&angles);

        let ids: Vec<u8> = cmds.iter().map(|c| c.servo_id()).collect();
        assert_eq!(ids, vec![11, 12, 13, 21, 22, 23, 31, 32, 33, 41, 42, 43]);
    }
}
