//! Parameters structure for the body frame

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Body frame parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Params {

    // ---- GEOMETRY ----

    /// Half of the lateral distance between the left and right abduction
    /// axes.
    ///
    /// Units: millimeters
    pub half_width_mm: f64,

    /// Half of the longitudinal distance between the front and back hips.
    ///
    /// Units: millimeters
    pub half_length_mm: f64,

    /// Standing height of the hips above the ground.
    ///
    /// Units: millimeters
    pub std_height_mm: f64,

    // ---- LIMITS ----

    pub limits: Limits,
}

/// Inclusive `(min, max)` limits on the commanded body pose.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Limits {
    /// Units: millimeters
    pub cgx_mm: (f64, f64),

    /// Units: millimeters
    pub cgy_mm: (f64, f64),

    /// Units: millimeters
    pub cgz_mm: (f64, f64),

    /// Units: degrees
    pub roll_deg: (f64, f64),

    /// Units: degrees
    pub pitch_deg: (f64, f64),

    /// Units: degrees
    pub yaw_deg: (f64, f64),
}
