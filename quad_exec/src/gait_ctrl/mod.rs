//! Gait control module
//!
//! Generates the stepping cycle of the legs. Each tick advances a global
//! counter, and each leg reads the counter at its own phase offset to decide
//! whether its foot is swinging through the air or pushing the body along in
//! stance.
//!
//! Commands are latched: a new direction, rotation or stop only takes effect
//! when a suitable leg reaches the start of its swing, so that the feet never
//! jump.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod state;
mod trajectory;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use cmd::*;
pub use params::*;
pub use state::*;
