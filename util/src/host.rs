//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable pointing at the root of the software
/// checkout, the directory containing `params/` and `sessions/`.
pub const SW_ROOT_ENV_VAR: &str = "QUAD_SW_ROOT";

/// Get the software root directory from the environment.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

/// A short description of the platform this executable was built for.
pub fn get_platform() -> String {
    format!(
        "{} ({}, {})",
        env::consts::OS,
        env::consts::ARCH,
        env::consts::FAMILY
    )
}
