//! Foot trajectories and body balance of the stepping cycle

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector3;
use std::f64::consts::PI;

use super::GaitCtrl;
use crate::body_frame::BodyFrame;
use crate::leg_model::LegId;
use comms_if::tc::TrajectoryShape;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GaitCtrl {
    /// Sway the body sideways over the stance feet of the static gait.
    ///
    /// The sway starts once a move or rotation has been committed and stays
    /// on until the gait stops.
    pub(crate) fn balance(&mut self, body: &mut BodyFrame) {
        if !self.balancing && (self.committed.moving || self.rot_angle != 0.0) {
            self.balancing = true;
        }

        if self.balancing {
            // Centred on the tick where the first leg touches down
            let phase = PI * (self.cont as f64 - 3.0) / (self.steps as f64 / 2.0);
            body.pose.cgz = (-self.params.balance_distance_mm * phase.sin()).trunc();
        }
    }

    /// Compute the foot target of a leg at phase index `i` of its cycle.
    ///
    /// Returns the body-relative foot position and whether the leg has
    /// settled at rest.
    pub(crate) fn trajectory(&mut self, leg: LegId, i: usize, body: &BodyFrame)
        -> (Vector3<f64>, bool)
    {
        let cmd = self.committed;
        let gait = self.params.gait(self.gait);
        let points = self.params.points;

        let mut a = self.params.foot_elevation_mm;
        let mut b = if cmd.moving { gait.step_distance_mm } else { 0.0 };
        if cmd.jog && cmd.director_deg == 0.0 {
            a = self.params.jog_foot_elevation_mm;
            b = 0.0;
        }

        let state = &mut self.legs[leg.index()];
        if i == 0 {
            state.rest = state.pending_rest;
        }
        let (rx, rz) = state.rest;

        // Span of the step, the walking component plus the rotation of the
        // rest point about the body centre
        let dir = cmd.director_deg.to_radians();
        let (xy, zy) = body.yaw_offset(leg, rx, rz, self.rot_angle);
        let span_x = b * dir.cos() + xy - rx;
        let span_z = -b * dir.sin() + zy - rz;

        let beta = self.gait.beta() as f64;
        let step_x = span_x / (2.0 * beta);
        let step_z = span_z / (2.0 * beta);

        let (x, mut y, z) = if i < points {
            // Swing
            let (sy, sx, sz) = match self.shape {
                TrajectoryShape::Circular => {
                    let c = (i + 1) as f64 * PI / points as f64;
                    (a * c.sin(), span_x * c.cos(), span_z * c.cos())
                },
                TrajectoryShape::Square => match i {
                    0 => (a, span_x, span_z),
                    1 => (a, 0.0, 0.0),
                    2 => (a, -span_x, -span_z),
                    _ => (0.0, -span_x, -span_z)
                }
            };

            let (x, z) = (sx + rx, sz + rz);

            if i == points - 1 {
                state.acc = (x, z);
                (x, self.params.touchdown_height_mm, z)
            }
            else {
                (x, sy, z)
            }
        }
        else {
            // Stance
            state.acc.0 += step_x;
            state.acc.1 += step_z;
            (state.acc.0, 0.0, state.acc.1)
        };

        let tol = self.params.settle_tolerance_mm;
        let settled = (state.acc.0 - rx).abs() < tol
            && (state.acc.1 - rz).abs() < tol
            && !cmd.moving
            && self.rot_angle == 0.0;

        if settled {
            y = 0.0;
        }

        (Vector3::new(x, y, z), settled)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::QuadParams;
    use approx::assert_abs_diff_eq;

    fn setup() -> (GaitCtrl, BodyFrame) {
        let p = QuadParams::builtin().unwrap();
        (
            GaitCtrl::new(p.gait_ctrl),
            BodyFrame::new(p.body_frame, p.leg_model.l1_mm)
        )
    }

    fn walking(g: &mut GaitCtrl) {
        g.committed.moving = true;
        g.committed.director_deg = 360.0;
    }

    #[test]
    fn test_circular_swing() {
        let (mut g, b) = setup();
        walking(&mut g);
        let leg = LegId::ALL[1];

        let heights: Vec<f64> = (0..4)
            .map(|i| g.trajectory(leg, i, &b).0.y)
            .collect();

        assert_abs_diff_eq!(heights[0], 45.0 * (PI / 4.0).sin(), epsilon = 1e-9);
        assert_abs_diff_eq!(heights[1], 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(heights[3], 15.0, epsilon = 1e-9);

        // Touchdown behind the rest point, then stance pushes forwards
        assert_abs_diff_eq!(g.legs[1].acc.0, -20.0, epsilon = 1e-9);
        let (foot, settled) = g.trajectory(leg, 4, &b);
        assert_abs_diff_eq!(foot.x, -10.0, epsilon = 1e-9);
        assert_eq!(foot.y, 0.0);
        assert!(!settled);
    }

    #[test]
    fn test_square_swing() {
        let (mut g, b) = setup();
        walking(&mut g);
        g.shape = TrajectoryShape::Square;
        let leg = LegId::ALL[0];

        let feet: Vec<Vector3<f64>> = (0..4)
            .map(|i| g.trajectory(leg, i, &b).0)
            .collect();

        assert_abs_diff_eq!(feet[0].x, 20.0, epsilon = 1e-9);
        assert_eq!(feet[0].y, 45.0);
        assert_abs_diff_eq!(feet[1].x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(feet[2].x, -20.0, epsilon = 1e-9);
        assert_eq!(feet[3].y, 15.0);
    }

    #[test]
    fn test_jog_steps_on_the_spot() {
        let (mut g, b) = setup();
        g.committed.jog = true;
        g.committed.moving = true;
        g.committed.director_deg = 0.0;

        let (foot, settled) = g.trajectory(LegId::ALL[2], 1, &b);
        assert_abs_diff_eq!(foot.y, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(foot.x, 0.0, epsilon = 1e-9);
        assert!(!settled);
    }

    #[test]
    fn test_idle_leg_is_settled() {
        let (mut g, b) = setup();
        let (foot, settled) = g.trajectory(LegId::ALL[3], 2, &b);

        assert!(settled);
        assert_eq!(foot.y, 0.0);
    }
}
