//! Parameters structure for the leg model

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Leg geometry parameters, shared by all legs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Params {
    /// Lateral offset between the abduction axis and the plane the upper and
    /// lower leg move in.
    ///
    /// Units: millimeters
    pub l1_mm: f64,

    /// Length of the upper leg, hip to knee.
    ///
    /// Units: millimeters
    pub l2_mm: f64,

    /// Length of the lower leg, knee to the centre of the foot.
    ///
    /// Units: millimeters
    pub l3_mm: f64,

    /// Radius of the foot.
    ///
    /// Units: millimeters
    pub foot_radius_mm: f64,
}

impl Params {
    /// Shortest hip to foot distance the upper and lower leg can span.
    pub fn min_reach_mm(&self) -> f64 {
        (self.l2_mm - self.l3_mm).abs()
    }

    /// Longest hip to foot distance the upper and lower leg can span.
    pub fn max_reach_mm(&self) -> f64 {
        self.l2_mm + self.l3_mm
    }
}
