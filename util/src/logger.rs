//! # Logging
//!
//! Records are written to the console and to the session's log file. Console
//! lines are coloured by level, file lines are left plain so they can be read
//! back or grepped. Debug and trace lines also name the module which logged
//! them, without the crate name in front.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info, Level};
use fern;
use colored::{ColoredString, Colorize};
use std::fmt::Display;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Dependencies which are too chatty below info, the console line editor and
/// the serial driver.
const QUIET_TARGETS: [&str; 2] = ["rustyline", "serialport"];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Info records must be logged, but the level was set to `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Could not open the session log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger is already set: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Start logging to the console and to the log file of `session`.
///
/// `min_level` must include info records. Only the first call succeeds, any
/// later one returns `FernInitError`.
pub fn logger_init(
    min_level: LevelFilter,
    session: &session::Session
) -> Result<(), LoggerInitError> {

    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    let console = fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!(
            "{}",
            format_line(
                session::get_elapsed_seconds(),
                &level_colour(record.level()),
                record.level(),
                record.target(),
                message
            )
        )))
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!(
            "{}",
            format_line(
                session::get_elapsed_seconds(),
                &level_tag(record.level()),
                record.level(),
                record.target(),
                message
            )
        )))
        .chain(log_file);

    let mut dispatch = fern::Dispatch::new().level(min_level);
    for target in QUIET_TARGETS.iter() {
        dispatch = dispatch.level_for(*target, LevelFilter::Info);
    }

    dispatch
        .chain(console)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Build one log line, `[elapsed label] message`, with the module inserted
/// before the message for debug and trace records.
fn format_line(
    elapsed_s: f64,
    label: &dyn Display,
    level: Level,
    target: &str,
    message: &dyn Display
) -> String {
    match level > Level::Info {
        true => format!(
            "[{:10.6} {}] {}: {}", elapsed_s, label, module_path(target), message
        ),
        false => format!("[{:10.6} {}] {}", elapsed_s, label, message)
    }
}

/// The module part of a record target, `quad_lib::gait_ctrl::state` becomes
/// `gait_ctrl::state`. Crate roots are kept as they are.
fn module_path(target: &str) -> &str {
    match target.split_once("::") {
        Some((_, module)) => module,
        None => target
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRC",
        Level::Debug => "DBG",
        Level::Info  => "INF",
        Level::Warn  => "WRN",
        Level::Error => "ERR"
    }
}

fn level_colour(level: Level) -> ColoredString {
    let tag = level_tag(level);

    match level {
        Level::Trace => tag.dimmed().italic(),
        Level::Debug => tag.dimmed(),
        Level::Info  => tag.normal(),
        Level::Warn  => tag.yellow(),
        Level::Error => tag.red().bold()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_module_path() {
        assert_eq!(module_path("quad_lib::gait_ctrl::state"), "gait_ctrl::state");
        assert_eq!(module_path("util::script_interpreter"), "script_interpreter");
        assert_eq!(module_path("quad_exec"), "quad_exec");
    }

    #[test]
    fn test_format_line() {
        let debug = format_line(
            1.5,
            &level_tag(Level::Debug),
            Level::Debug,
            "quad_lib::control_loop::commands",
            &"Speed changed"
        );
        assert_eq!(debug, "[  1.500000 DBG] control_loop::commands: Speed changed");

        let warn = format_line(
            12.25,
            &level_tag(Level::Warn),
            Level::Warn,
            "quad_lib::control_loop::state",
            &format_args!("{} legs unreachable", 2)
        );
        assert_eq!(warn, "[ 12.250000 WRN] 2 legs unreachable");
    }
}
