//! Parameters structure for the control loop

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use comms_if::tc::GaitType;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the control loop.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Params {
    /// Walking speed level selected at startup.
    pub initial_level: u8,

    /// Settings of each walking speed level, the first entry is level 1.
    pub levels: Vec<LevelParams>,

    /// Settings used while standing still.
    pub stopped: ModeParams,

    /// Settings used while a special move is played.
    pub special_move: ModeParams,
}

/// Settings of one walking speed level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LevelParams {
    /// Units: milliseconds
    pub interval_ms: u64,

    pub gait: GaitType,

    pub filter_count: u8,
}

/// Settings of a pseudo speed level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeParams {
    /// Units: milliseconds
    pub interval_ms: u64,

    pub filter_count: u8,
}
