//! Parameters structure for gait control

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use comms_if::tc::GaitType;
use crate::leg_model::NUM_LEGS;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for gait control.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Params {

    // ---- CYCLE ----

    /// Number of ticks each foot spends in the air per step.
    pub points: usize,

    /// Values of the step counter at which a requested gait change is
    /// applied while walking.
    pub gait_change_phases: Vec<usize>,

    // ---- TRAJECTORY ----

    /// Units: millimeters
    pub foot_elevation_mm: f64,

    /// Units: millimeters
    pub jog_foot_elevation_mm: f64,

    /// Foot height on the last swing tick.
    ///
    /// Units: millimeters
    pub touchdown_height_mm: f64,

    /// Units: millimeters
    pub balance_distance_mm: f64,

    /// Units: radians
    pub rotation_step_rad: f64,

    /// Units: degrees
    pub quadrant_half_angle_deg: f64,

    /// Units: millimeters
    pub settle_tolerance_mm: f64,

    /// Rest position `[x, z]` of the feet, mirrored into each leg's quadrant.
    ///
    /// Units: millimeters
    pub rest_offset_mm: [f64; 2],

    // ---- GAITS ----

    pub dynamic: GaitParams,

    #[serde(rename = "static")]
    pub static_gait: GaitParams,
}

/// Parameters specific to one gait.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GaitParams {
    /// Units: millimeters
    pub step_distance_mm: f64,

    /// Forward offset of the centre of gravity held while walking.
    ///
    /// Units: millimeters
    pub cgx_mm: f64,

    /// Phase offset of each leg, in multiples of `points`.
    pub leg_order: [usize; NUM_LEGS],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    pub fn gait(&self, gait: GaitType) -> &GaitParams {
        match gait {
            GaitType::Dynamic => &self.dynamic,
            GaitType::Static => &self.static_gait
        }
    }

    /// Length of a full stepping cycle of the given gait in ticks.
    pub fn steps(&self, gait: GaitType) -> usize {
        (1 + gait.beta()) * self.points
    }
}
