//! # Communications interface crate.
//!
//! Provides the telecommands accepted by the quadruped executable and the
//! frames it emits to the servo bus or a remote controller.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Telecommand definitions, parsable from JSON scripts or the console
pub mod tc;

/// Frame definitions for equipment (the servo bus and remote network controller)
pub mod eqpt;
