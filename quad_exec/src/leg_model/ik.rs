//! Inverse and forward kinematics of a leg

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector3;
use std::f64::consts::FRAC_PI_2;

// Internal
use super::{JointAngles, LegId, LegModelError, Params, UnreachableCause};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematic model of the legs.
#[derive(Debug, Clone, Default)]
pub struct LegModel {
    params: Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LegModel {
    /// Create a new model from the leg geometry.
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Get the leg geometry.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Solve the joint angles which place the foot of `leg` at `target`.
    ///
    /// # Inputs
    /// - `leg`: The leg to solve for, used to mirror the lateral axis.
    /// - `target`: Leg-local foot position in millimeters.
    ///
    /// # Outputs
    /// - On success the joint angles in radians.
    /// - `LegModelError::Unreachable` if the target is outside the leg's
    ///   workspace. No partial solution is returned.
    pub fn solve(&self, leg: LegId, target: &Vector3<f64>)
        -> Result<JointAngles, LegModelError>
    {
        let p = &self.params;
        let unreachable = |cause| Err(LegModelError::Unreachable(leg, cause));

        // Abduction, solved in the plane normal to the body's long axis
        let yf = target.y - p.foot_radius_mm;
        let dz = leg.side() * target.z;
        let beta = ((p.l1_mm + dz) / yf).atan();
        let h = yf / beta.cos();

        let abd_ratio = p.l1_mm / h;
        if !(-1.0..=1.0).contains(&abd_ratio) {
            return unreachable(UnreachableCause::AbductionOffset);
        }
        let gamma = abd_ratio.acos();
        let abduction = beta + gamma - FRAC_PI_2;

        // Rotation and knee, solved in the leg plane
        let yz = h * gamma.sin();
        let theta = (target.x / yz).atan();
        let reach = yz / theta.cos();

        if !reach.is_finite()
            || reach < p.min_reach_mm()
            || reach > p.max_reach_mm()
        {
            return unreachable(UnreachableCause::Reach(reach));
        }

        let (l2, l3) = (p.l2_mm, p.l3_mm);
        let knee_ratio = (l2.powi(2) + l3.powi(2) - reach.powi(2)) / (2.0 * l2 * l3);
        let rot_ratio = (l2.powi(2) + reach.powi(2) - l3.powi(2)) / (2.0 * l2 * reach);
        if !(-1.0..=1.0).contains(&knee_ratio) || !(-1.0..=1.0).contains(&rot_ratio) {
            return unreachable(UnreachableCause::Reach(reach));
        }

        let angles = JointAngles {
            abduction,
            rotation: rot_ratio.acos() + theta,
            knee: knee_ratio.acos(),
        };

        if !angles.is_finite() {
            return unreachable(UnreachableCause::NonFinite);
        }

        trace!(
            "Leg {} solved ({:.2}, {:.2}, {:.2}) -> {:?}",
            leg, target.x, target.y, target.z, angles
        );

        Ok(angles)
    }

    /// Reconstruct the leg-local foot position from joint angles.
    ///
    /// This is the exact inverse of `solve` for any target `solve` accepts.
    pub fn forward(&self, leg: LegId, angles: &JointAngles) -> Vector3<f64> {
        let p = &self.params;
        let (l2, l3) = (p.l2_mm, p.l3_mm);

        // Leg plane, from the knee angle back to the hip to foot distance
        let reach = (l2.powi(2) + l3.powi(2) - 2.0 * l2 * l3 * angles.knee.cos()).sqrt();
        let theta = angles.rotation
            - ((l2.powi(2) + reach.powi(2) - l3.powi(2)) / (2.0 * l2 * reach)).acos();
        let yz = reach * theta.cos();
        let x = reach * theta.sin();

        // Abduction plane
        let h = (yz.powi(2) + p.l1_mm.powi(2)).sqrt();
        let gamma = yz.atan2(p.l1_mm);
        let beta = angles.abduction + FRAC_PI_2 - gamma;
        let yf = h * beta.cos();
        let dz = h * beta.sin() - p.l1_mm;

        Vector3::new(x, yf + p.foot_radius_mm, leg.side() * dz)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn model() -> LegModel {
        LegModel::new(crate::params::QuadParams::builtin().unwrap().leg_model)
    }

    #[test]
    fn test_neutral_stance() {
        let m = model();

        // Foot straight below the hip at the standard height, the abduction
        // joint is at zero and the leg plane is vertical.
        for leg in LegId::ALL.iter() {
            let a = m.solve(*leg, &Vector3::new(0.0, 140.0, 0.0)).unwrap();
            assert_abs_diff_eq!(a.abduction, 0.0, epsilon = 1e-9);
            assert!(a.knee > 0.0 && a.knee < std::f64::consts::PI);
        }
    }

    /// For reachable targets FK of the IK solution reproduces the target.
    #[test]
    fn test_forward_reconstructs_target() {
        let m = model();
        let targets = [
            Vector3::new(0.0, 140.0, 0.0),
            Vector3::new(40.0, 140.0, 0.0),
            Vector3::new(-30.0, 150.0, -15.0),
            Vector3::new(20.0, 100.0, 25.0),
            Vector3::new(-85.0, 95.0, -20.0),
            Vector3::new(10.0, 70.0, 10.0),
        ];

        for leg in LegId::ALL.iter() {
            for t in targets.iter() {
                let a = m.solve(*leg, t).unwrap();
                assert!(a.is_finite());

                let r = m.forward(*leg, &a);
                assert_abs_diff_eq!(r.x, t.x, epsilon = 1e-6);
                assert_abs_diff_eq!(r.y, t.y, epsilon = 1e-6);
                assert_abs_diff_eq!(r.z, t.z, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_unreachable_targets() {
        let m = model();
        let leg = LegId::ALL[0];

        // Too far below the hip
        match m.solve(leg, &Vector3::new(0.0, 300.0, 0.0)) {
            Err(LegModelError::Unreachable(l, UnreachableCause::Reach(r))) => {
                assert_eq!(l, leg);
                assert!(r > m.params().max_reach_mm());
            },
            r => panic!("Expected an unreachable reach, got {:?}", r)
        }

        // Too far forwards
        assert!(m.solve(leg, &Vector3::new(250.0, 140.0, 0.0)).is_err());

        // Foot inside the abduction offset
        assert!(m.solve(leg, &Vector3::new(0.0, 20.0, -60.0)).is_err());
    }

    #[test]
    fn test_mirrored_sides() {
        let m = model();
        let t = Vector3::new(10.0, 130.0, 12.0);
        let mirrored = Vector3::new(10.0, 130.0, -12.0);

        let right = m.solve(LegId::ALL[0], &t).unwrap();
        let left = m.solve(LegId::ALL[2], &mirrored).unwrap();

        assert_abs_diff_eq!(right.abduction, left.abduction, epsilon = 1e-12);
        assert_abs_diff_eq!(right.rotation, left.rotation, epsilon = 1e-12);
        assert_abs_diff_eq!(right.knee, left.knee, epsilon = 1e-12);
    }
}
