//! Main quadruped executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Open the link to the robot
//!     - Main loop:
//!         - Telecommand acquisition, from a script or the console
//!         - Control loop processing, which ticks when due:
//!             - Gait or special move choreography
//!             - Body transform and leg inverse kinematics
//!             - Joint mapping and sending to the link
//!
//! With a single argument the telecommands are read from that script,
//! otherwise they are typed into the console.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};
use color_eyre::{Report, eyre::{WrapErr, eyre}};

// Internal
use quad_lib::{
    console::Console,
    control_loop::{ControlLoop, InitData, InputData},
    params::{LinkKind, QuadExecParams, QuadParams},
    transport::{LinkTransport, NullTransport, Protocol, Transport}
};
use util::{
    host,
    module::State,
    logger::{logger_init, LevelFilter},
    session::Session,
    script_interpreter::{ScriptInterpreter, PendingTcs}
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    let session = Session::new(
        "quad_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("mechDOG Quadruped Executable\n");
    info!("Running on: {}", host::get_platform());
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params = QuadExecParams::load()
        .wrap_err("Could not load exec params")?;

    let quad_params = QuadParams::load()
        .wrap_err("Could not load module params")?;

    info!("Parameters loaded");

    // ---- INITIALISE TC SOURCE ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let mut tc_source = if args.len() == 2 {
        info!("Loading script from \"{}\"", &args[1]);

        let si = ScriptInterpreter::new(&args[1])
            .wrap_err("Failed to load script")?;

        info!(
            "Loaded script lasts {:.02} s and contains {} TCs\n",
            si.get_duration(),
            si.get_num_tcs()
        );

        TcSource::Script(si)
    }
    else if args.len() == 1 {
        info!("No script provided, TCs will be read from the console\n");

        TcSource::Console(
            Console::start().wrap_err("Failed to start the console")?
        )
    }
    else {
        return Err(eyre!(
            "Expected either zero or one argument, found {}", args.len() - 1)
        );
    };

    // ---- INITIALISE LINK ----

    let depth = exec_params.queue_depth;
    let transport: Box<dyn Transport> = match exec_params.link {
        LinkKind::Serial => Box::new(
            LinkTransport::serial(&exec_params.serial_device, exec_params.serial_baud, depth)
                .wrap_err("Failed to open the servo link")?
        ),
        LinkKind::Network => Box::new(
            LinkTransport::network(&exec_params.remote_endpoint, depth)
                .wrap_err("Failed to connect to the remote controller")?
        ),
        LinkKind::Stdout => Box::new(
            LinkTransport::stdout(Protocol::Servo, depth)
                .wrap_err("Failed to start the stdout link")?
        ),
        LinkKind::Off => Box::new(NullTransport)
    };

    info!("Link initialised ({:?})", exec_params.link);

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut control_loop = ControlLoop::new(quad_params)
        .wrap_err("Failed to create the ControlLoop")?;
    control_loop.init(
        InitData {
            transport,
            archive: exec_params.archive
        },
        &session
    ).wrap_err("Failed to initialise the ControlLoop")?;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    let poll_period = Duration::from_millis(exec_params.poll_period_ms);

    info!("Beginning main loop\n");

    loop {

        let cycle_start_instant = Instant::now();

        // ---- TELECOMMAND PROCESSING ----

        let pending = match tc_source {
            TcSource::Script(ref mut si) => si.get_pending_tcs(),
            TcSource::Console(ref mut c) => c.get_pending_tcs()
        };

        let tcs = match pending {
            PendingTcs::None => Vec::new(),
            PendingTcs::Some(tcs) => tcs,
            PendingTcs::EndOfScript => {
                info!("End of TCs reached, stopping");
                break
            }
        };

        // ---- CONTROL LOOP PROCESSING ----

        control_loop.proc_or_warn(&InputData {
            now: cycle_start_instant,
            tcs
        });

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match poll_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Poll overran by {:.06} s",
                cycle_dur.as_secs_f64() - poll_period.as_secs_f64()
            )
        }
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    Ok(())
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Various sources for the telecommands incoming to the exec.
enum TcSource {
    Script(ScriptInterpreter),
    Console(Console)
}
