//! Body pose and the body to leg frame transform

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use super::{BodyFrameError, Mode, Params, PoseAxis};
use crate::leg_model::LegId;
use util::maths::in_range;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Pose of the body over the feet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Pose {
    /// Units: radians
    pub roll: f64,

    /// Units: radians
    pub pitch: f64,

    /// Units: radians
    pub yaw: f64,

    /// Forward offset of the centre of gravity.
    ///
    /// Units: millimeters
    pub cgx: f64,

    /// Height of the hips above the ground.
    ///
    /// Units: millimeters
    pub cgy: f64,

    /// Lateral offset of the centre of gravity.
    ///
    /// Units: millimeters
    pub cgz: f64,
}

/// The body frame, owning the current pose.
///
/// `pose` is public so that the gait and choreography can write it directly.
/// Operator demands go through the `set_*` functions which enforce the
/// limits.
#[derive(Debug, Clone, Default)]
pub struct BodyFrame {
    params: Params,

    /// Abduction offset of the legs, needed to place the hips.
    l1_mm: f64,

    pub pose: Pose,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BodyFrame {
    /// Create a new body frame in the neutral pose at standard height.
    pub fn new(params: Params, l1_mm: f64) -> Self {
        let pose = Pose {
            cgy: params.std_height_mm,
            ..Pose::default()
        };

        Self {
            params,
            l1_mm,
            pose
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Standard standing height.
    pub fn std_height_mm(&self) -> f64 {
        self.params.std_height_mm
    }

    // ---- POSE DEMANDS ----

    pub fn set_roll_deg(&mut self, deg: f64) -> Result<(), BodyFrameError> {
        check(PoseAxis::Roll, deg, self.params.limits.roll_deg)?;
        self.pose.roll = deg.to_radians();
        Ok(())
    }

    pub fn set_pitch_deg(&mut self, deg: f64) -> Result<(), BodyFrameError> {
        check(PoseAxis::Pitch, deg, self.params.limits.pitch_deg)?;
        self.pose.pitch = deg.to_radians();
        Ok(())
    }

    pub fn set_yaw_deg(&mut self, deg: f64) -> Result<(), BodyFrameError> {
        check(PoseAxis::Yaw, deg, self.params.limits.yaw_deg)?;
        self.pose.yaw = deg.to_radians();
        Ok(())
    }

    pub fn set_height_mm(&mut self, mm: f64) -> Result<(), BodyFrameError> {
        check(PoseAxis::Cgy, mm, self.params.limits.cgy_mm)?;
        self.pose.cgy = mm;
        Ok(())
    }

    /// Shift the body forwards (positive) or backwards over the feet.
    pub fn set_frontal_offset_mm(&mut self, mm: f64) -> Result<(), BodyFrameError> {
        check(PoseAxis::Cgx, mm, self.params.limits.cgx_mm)?;
        self.pose.cgx = mm;
        Ok(())
    }

    /// Shift the body sideways over the feet.
    pub fn set_lateral_offset_mm(&mut self, mm: f64) -> Result<(), BodyFrameError> {
        check(PoseAxis::Cgz, mm, self.params.limits.cgz_mm)?;
        self.pose.cgz = mm;
        Ok(())
    }

    // ---- TRANSFORMS ----

    /// Rotate a foot position, given relative to the leg's nominal stance
    /// point, about the vertical axis through the body centre.
    ///
    /// Returns the rotated `(x, z)` position relative to the same stance
    /// point. This is used both for body yaw and for the per step rotation of
    /// a turning gait.
    ///
    /// Units: millimeters, `angle_rad` in radians
    pub fn yaw_offset(&self, leg: LegId, x: f64, z: f64, angle_rad: f64) -> (f64, f64) {
        let (w, l, l1) = (
            self.params.half_width_mm,
            self.params.half_length_mm,
            self.l1_mm
        );
        let (fore, side) = (leg.fore(), leg.side());

        let a = ((l + fore * x) / (w + l1 + side * z)).atan();
        let r = (w + l1 + side * z) / a.cos();
        let a_rot = a - fore * side * angle_rad;

        let zy = side * (r * a_rot.cos() - w - l1);
        let xy = fore * (r * a_rot.sin() - l);

        (xy, zy)
    }

    /// Transform a body-relative foot target into the leg-local frame.
    ///
    /// # Inputs
    /// - `leg`: The leg to transform for.
    /// - `foot`: Desired foot position relative to the leg's rest point, with
    ///   `y` being the lift of the foot above the ground.
    /// - `mode`: Whether to add the centre of gravity offsets back on.
    ///
    /// # Outputs
    /// - The leg-local foot target passed to `LegModel::solve`.
    pub fn get_leg_pos(&self, leg: LegId, foot: &Vector3<f64>, mode: Mode) -> Vector3<f64> {
        let p = &self.pose;
        let (w, l, l1) = (
            self.params.half_width_mm,
            self.params.half_length_mm,
            self.l1_mm
        );
        let (fore, side) = (leg.fore(), leg.side());

        // Yaw
        let (xy, zy) = self.yaw_offset(leg, foot.x + p.cgx, foot.z + p.cgz, p.yaw);

        // Pitch
        let yb = p.cgy
            - fore * l * p.pitch.sin()
            - side * w * p.roll.sin()
            - foot.y;
        let xb = fore * l * (1.0 - p.pitch.cos()) + xy;
        let ax = (xb / yb).atan();
        let hx = yb / ax.cos();
        let yb = hx * (p.pitch + ax).cos();
        let x = hx * (p.pitch + ax).sin();

        // Roll
        let zb = side * (w * (1.0 - p.roll.cos()) + l1) + zy;
        let az = (zb / yb).atan();
        let yh = yb / az.cos();
        let y = yh * (p.roll + az).cos();
        let z = yh * (p.roll + az).sin() - side * l1;

        match mode {
            Mode::Body => Vector3::new(x, y, z),
            Mode::Stance => Vector3::new(x + p.cgx, y, z + p.cgz)
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check(axis: PoseAxis, value: f64, limits: (f64, f64)) -> Result<(), BodyFrameError> {
    if value.is_finite() && in_range(value, limits) {
        Ok(())
    }
    else {
        debug!("{:?} demand {} rejected", axis, value);
        Err(BodyFrameError::OutOfRange {
            axis,
            value,
            min: limits.0,
            max: limits.1
        })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
