//! # Quadruped utility library
//!
//! Shared plumbing for the quadruped executables: the session directory and
//! its epoch, logging into it, CSV archives of module data, TOML parameter
//! loading, timed telecommand scripts and the module state trait.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod archive;
pub mod host;
pub mod logger;
pub mod maths;
pub mod module;
pub mod params;
pub mod session;
pub mod script_interpreter;
pub mod time;
