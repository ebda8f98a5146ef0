//! # Quadruped Executable Parameters
//!
//! Parameters of every module of the control loop, and of the executable
//! itself.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use thiserror::Error;

use util::params::{self, LoadError};
use crate::{body_frame, control_loop, gait_ctrl, joint_map, leg_model};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of all control loop modules.
#[derive(Debug, Clone)]
pub struct QuadParams {
    pub leg_model: leg_model::Params,
    pub body_frame: body_frame::Params,
    pub gait_ctrl: gait_ctrl::Params,
    pub joint_map: joint_map::Params,
    pub control_loop: control_loop::Params,
}

/// Parameters of the executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadExecParams {
    /// Link the frames are sent on
    pub link: LinkKind,

    /// Serial device of the servo bus
    pub serial_device: String,

    pub serial_baud: u32,

    /// Network endpoint of the remote controller, `host:port`
    pub remote_endpoint: String,

    /// Number of frames which may wait to be written before new frames are dropped
    pub queue_depth: usize,

    /// Period between polls of the control loop, much shorter than a tick
    pub poll_period_ms: u64,

    /// Archive the joint commands of every tick
    pub archive: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised while loading the executable parameters.
#[derive(Debug, Error)]
pub enum ExecParamsError {
    #[error("Could not load the parameter file: {0}")]
    Load(#[from] LoadError),

    #[error("The link queue must hold at least one frame")]
    ZeroQueueDepth,

    #[error("The poll period must be at least 1 ms")]
    ZeroPollPeriod,
}

/// Possible links to the robot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Servo bus on a serial port
    Serial,

    /// Remote controller over TCP
    Network,

    /// Servo frames printed to stdout
    Stdout,

    /// Nothing connected
    Off
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl QuadParams {
    /// Load the parameters from the files in `$QUAD_SW_ROOT/params`.
    pub fn load() -> Result<Self, LoadError> {
        Ok(Self {
            leg_model: params::load("leg_model.toml")?,
            body_frame: params::load("body_frame.toml")?,
            gait_ctrl: params::load("gait_ctrl.toml")?,
            joint_map: params::load("joint_map.toml")?,
            control_loop: params::load("control_loop.toml")?,
        })
    }

    /// The parameters the workspace is built with.
    pub fn builtin() -> Result<Self, LoadError> {
        Ok(Self {
            leg_model: params::load_str(include_str!("../../params/leg_model.toml"))?,
            body_frame: params::load_str(include_str!("../../params/body_frame.toml"))?,
            gait_ctrl: params::load_str(include_str!("../../params/gait_ctrl.toml"))?,
            joint_map: params::load_str(include_str!("../../params/joint_map.toml"))?,
            control_loop: params::load_str(include_str!("../../params/control_loop.toml"))?,
        })
    }
}

impl QuadExecParams {
    /// Load the parameters from `$QUAD_SW_ROOT/params/quad_exec.toml`.
    pub fn load() -> Result<Self, ExecParamsError> {
        params::load::<Self>("quad_exec.toml")?.validated()
    }

    /// Parse the parameters from a TOML string.
    pub fn load_str(params_str: &str) -> Result<Self, ExecParamsError> {
        params::load_str::<Self>(params_str)?.validated()
    }

    fn validated(self) -> Result<Self, ExecParamsError> {
        if self.queue_depth == 0 {
            return Err(ExecParamsError::ZeroQueueDepth);
        }
        if self.poll_period_ms == 0 {
            return Err(ExecParamsError::ZeroPollPeriod);
        }

        Ok(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builtin_params() {
        let p = QuadParams::builtin().unwrap();

        assert_eq!(p.leg_model.l2_mm, 93.4);
        assert_eq!(p.body_frame.limits.cgy_mm, (60.0, 160.0));
        assert_eq!(p.gait_ctrl.points, 4);
        assert_eq!(p.joint_map.offsets_tenths, [0.0, 745.0, 155.0]);
        assert_eq!(p.control_loop.initial_level, 4);

        let e = QuadExecParams::load_str(
            include_str!("../../params/quad_exec.toml")
        ).unwrap();
        assert_eq!(e.serial_baud, 115200);
        assert_eq!(e.queue_depth, 64);
    }

    #[test]
    fn test_exec_params_rejected() {
        let base = include_str!("../../params/quad_exec.toml");

        let no_queue = base.replace("queue_depth = 64", "queue_depth = 0");
        assert!(matches!(
            QuadExecParams::load_str(&no_queue),
            Err(ExecParamsError::ZeroQueueDepth)
        ));

        let no_poll = base.replace("poll_period_ms = 5", "poll_period_ms = 0");
        assert!(matches!(
            QuadExecParams::load_str(&no_poll),
            Err(ExecParamsError::ZeroPollPeriod)
        ));

        let bad_link = base.replace("link = \"stdout\"", "link = \"usb\"");
        assert!(matches!(
            QuadExecParams::load_str(&bad_link),
            Err(ExecParamsError::Load(LoadError::DeserialiseError(_)))
        ));
    }
}
