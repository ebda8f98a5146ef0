//! # Equipment Interface
//!
//! This module defines the frames which are sent to equipment. Both formats are ASCII, start with
//! `#<id>` and are terminated by a carriage return.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod remote;
pub mod servo;

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::fmt;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// Frame terminator shared by every equipment frame.
pub const FRAME_TERMINATOR: char = '\r';

/// Start of every equipment frame.
pub const FRAME_START: char = '#';

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// An operator typed command passed to the equipment unchanged other than its framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame(String);

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl RawFrame {
    /// Frame a raw command such as `254LED3` or `#12QD`.
    ///
    /// The command is upper cased and the start and terminator added if missing. Returns `None`
    /// if nothing is left of the command once framing is removed.
    pub fn new(cmd: &str) -> Option<Self> {
        let body = cmd.trim()
            .trim_start_matches(FRAME_START)
            .trim_end_matches(FRAME_TERMINATOR)
            .trim();

        match body.is_empty() {
            true => None,
            false => Some(RawFrame(body.to_uppercase()))
        }
    }
}

impl fmt::Display for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", FRAME_START, self.0, FRAME_TERMINATOR)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_raw_frames() {
        assert_eq!(RawFrame::new("254led3").unwrap().to_string(), "#254LED3\r");
        assert_eq!(RawFrame::new(" #12QD\r").unwrap().to_string(), "#12QD\r");
        assert!(RawFrame::new("").is_none());
        assert!(RawFrame::new("  # ").is_none());
    }
}
