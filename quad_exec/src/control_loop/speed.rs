//! Speed policy
//!
//! The operator picks a walking speed level. While standing or playing a
//! special move the loop runs at a pseudo level instead, with a slower tick
//! and heavier servo filtering.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::time::Duration;

use super::{ControlLoopError, Params};
use comms_if::tc::GaitType;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The speed the loop is running at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedMode {
    /// A walking speed level, starting at 1.
    Level(u8),

    Stopped,

    SpecialMove,
}

/// What a speed mode sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedSetting {
    pub interval: Duration,

    /// Gait to request, `None` leaves the gait as it is.
    pub gait: Option<GaitType>,

    /// Position filter count sent to the servos.
    pub filter_count: u8,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Number of walking speed levels.
    pub fn num_levels(&self) -> u8 {
        self.levels.len() as u8
    }

    /// Get the setting of a speed mode.
    ///
    /// `walking_level` is the level selected by the operator, its gait is
    /// used while stopped.
    pub fn setting(&self, mode: SpeedMode, walking_level: u8)
        -> Result<SpeedSetting, ControlLoopError>
    {
        let level = |l: u8| match l {
            0 => None,
            l => self.levels.get(l as usize - 1)
        };

        match mode {
            SpeedMode::Level(l) => {
                let p = level(l).ok_or(ControlLoopError::InvalidSpeedLevel(l))?;
                Ok(SpeedSetting {
                    interval: Duration::from_millis(p.interval_ms),
                    gait: Some(p.gait),
                    filter_count: p.filter_count
                })
            },
            SpeedMode::Stopped => {
                let walking = level(walking_level)
                    .ok_or(ControlLoopError::InvalidSpeedLevel(walking_level))?;
                Ok(SpeedSetting {
                    interval: Duration::from_millis(self.stopped.interval_ms),
                    gait: Some(walking.gait),
                    filter_count: self.stopped.filter_count
                })
            },
            SpeedMode::SpecialMove => Ok(SpeedSetting {
                interval: Duration::from_millis(self.special_move.interval_ms),
                gait: None,
                filter_count: self.special_move.filter_count
            })
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
