//! # Quadruped library.
//!
//! This library allows other crates in the workspace, and the integration
//! tests and benchmarks, to access items defined inside the quadruped crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Body frame - body pose and the transform from body to leg coordinates
pub mod body_frame;

/// Special move choreographer - keyframed poses and gestures
pub mod choreo;

/// Console - reads telecommands typed by the operator
pub mod console;

/// Control loop - ticks the models at a fixed interval and provides the command API
pub mod control_loop;

/// Gait control - the stepping cycle of the four legs
pub mod gait_ctrl;

/// Joint map - converts joint angles into servo commands
pub mod joint_map;

/// Leg model - inverse and forward kinematics of a leg
pub mod leg_model;

/// Parameters of the modules and the executable
pub mod params;

/// Telecommand processor - applies TCs to the control loop
mod tc_processor;

/// Transport - sends frames to the servo bus or a remote controller
pub mod transport;
