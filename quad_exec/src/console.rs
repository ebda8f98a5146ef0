//! # Console
//!
//! Reads telecommands typed by the operator, for example `dir 90` or
//! `move sit`. Lines are read and parsed on a background thread so the control
//! loop never waits on the terminal.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use log::{info, warn};
use rustyline::{error::ReadlineError, DefaultEditor};

use comms_if::tc::Tc;
use util::script_interpreter::PendingTcs;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const PROMPT: &str = "quad $ ";

/// Line which closes the console.
const EXIT_LINE: &str = "exit";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An interactive source of telecommands.
pub struct Console {
    rx: Receiver<Tc>,
    bg_jh: Option<JoinHandle<()>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Console {
    /// Start reading lines from the terminal.
    pub fn start() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel();

        let bg_jh = thread::Builder::new()
            .name("console".into())
            .spawn(move || bg_thread(tx))?;

        Ok(Self {
            rx,
            bg_jh: Some(bg_jh)
        })
    }

    /// Get the TCs entered since the last call.
    ///
    /// Once the operator has closed the console and every TC has been taken
    /// `PendingTcs::EndOfScript` is returned.
    pub fn get_pending_tcs(&mut self) -> PendingTcs {
        let mut tcs = Vec::new();

        loop {
            match self.rx.try_recv() {
                Ok(tc) => tcs.push(tc),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if tcs.is_empty() {
                        self.join();
                        return PendingTcs::EndOfScript;
                    }
                    break;
                }
            }
        }

        match tcs.is_empty() {
            true => PendingTcs::None,
            false => PendingTcs::Some(tcs)
        }
    }

    fn join(&mut self) {
        if let Some(jh) = self.bg_jh.take() {
            if jh.join().is_err() {
                warn!("Console thread panicked");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Background thread, parses each line into a TC until the operator exits.
fn bg_thread(tx: Sender<Tc>) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            warn!("Could not open the console: {}", e);
            return;
        }
    };

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                warn!("Console read error: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == EXIT_LINE {
            break;
        }

        rl.add_history_entry(line).ok();

        match Tc::from_line(line) {
            Ok(tc) => {
                if tx.send(tc).is_err() {
                    break;
                }
            },
            // Includes requested help text
            Err(e) => println!("{}", e)
        }
    }

    info!("Console closed");
}
