//! Implementations for the ControlLoop state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

// Internal
use super::{ControlLoopError, Params, Scheduler, SpeedMode};
use crate::{
    body_frame::{BodyFrame, Mode},
    choreo::Choreo,
    gait_ctrl::GaitCtrl,
    joint_map::{JointMap, NUM_JOINTS},
    leg_model::{LegId, LegModel},
    params::QuadParams,
    tc_processor,
    transport::{NullTransport, Protocol, Transport}
};
use comms_if::{
    eqpt::{remote::RemoteFrame, servo::{JointCommand, ServoFrame}},
    tc::{SpecialMove, Tc}
};
use util::{
    archive::{Archived, Archiver, ArchiveError},
    module::State,
    session::{self, Session}
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Control loop module state.
pub struct ControlLoop {
    pub(crate) params: Params,

    pub(crate) leg_model: LegModel,
    pub(crate) body: BodyFrame,
    pub(crate) gait: GaitCtrl,
    pub(crate) choreo: Choreo,
    pub(crate) joint_map: JointMap,

    pub(crate) transport: Box<dyn Transport>,
    pub(crate) scheduler: Scheduler,

    /// Walking speed level selected by the operator.
    pub(crate) level: u8,

    /// Speed the loop is actually running at.
    pub(crate) speed: SpeedMode,

    /// Set by any command, forces the next tick to run even when stopped.
    pub(crate) move_flag: bool,

    pub(crate) report: TickReport,
    last_cmds: Option<[JointCommand; NUM_JOINTS]>,
    arch_joints: Archiver,

    /// Time of the latest poll, commands schedule deferred actions from it.
    pub(crate) now: Instant,

    /// Actions waiting for their due time, in the order they were scheduled.
    deferred: VecDeque<(Instant, Deferred)>,
}

/// An action run some time after the command which scheduled it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Deferred {
    Servo(ServoFrame),

    /// Close the link, replacing it with nothing.
    Disconnect,
}

/// Data required to initialise the control loop.
pub struct InitData {
    /// Link the frames are sent on.
    pub transport: Box<dyn Transport>,

    /// Whether to archive the joint commands of every tick.
    pub archive: bool,
}

/// Input data to the control loop.
#[derive(Debug, Clone)]
pub struct InputData {
    /// Time of this poll.
    pub now: Instant,

    /// Telecommands to execute before ticking.
    pub tcs: Vec<Tc>,
}

/// Status report of the last tick which ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// Number of ticks run since startup.
    pub tick: u64,

    /// Gait step counter after the tick.
    pub cont: usize,

    pub current_move: SpecialMove,

    /// Next keyframe of the current move.
    pub keyframe: usize,

    pub stopped: bool,

    /// Number of legs whose target could not be reached.
    pub unreachable: usize,
}

/// One row of the joints archive.
#[derive(Serialize)]
struct JointsRecord {
    time_s: f64,
    tick: u64,
    cont: usize,
    current_move: SpecialMove,
    keyframe: usize,
    stopped: bool,
    unreachable: usize,
    j11: i32, j12: i32, j13: i32,
    j21: i32, j22: i32, j23: i32,
    j31: i32, j32: i32, j33: i32,
    j41: i32, j42: i32, j43: i32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ControlLoop {
    /// Create a new control loop, standing at the initial speed level with
    /// nothing connected.
    pub fn new(params: QuadParams) -> Result<Self, ControlLoopError> {
        let level = params.control_loop.initial_level;
        let body = BodyFrame::new(params.body_frame, params.leg_model.l1_mm);

        let mut cl = Self {
            leg_model: LegModel::new(params.leg_model),
            body,
            gait: GaitCtrl::new(params.gait_ctrl),
            choreo: Choreo::new(),
            joint_map: JointMap::new(params.joint_map),
            transport: Box::new(NullTransport),
            scheduler: Scheduler::new(Duration::default()),
            level,
            speed: SpeedMode::Level(level),
            move_flag: true,
            report: TickReport::default(),
            last_cmds: None,
            arch_joints: Archiver::default(),
            now: Instant::now(),
            deferred: VecDeque::new(),
            params: params.control_loop,
        };

        cl.body.pose.cgx = cl.gait.default_cgx();
        cl.change_speed(SpeedMode::Level(level))?;
        cl.report.stopped = cl.is_stopped();

        Ok(cl)
    }

    /// Create a new control loop and connect it to `transport`.
    pub fn with_transport(params: QuadParams, transport: Box<dyn Transport>)
        -> Result<Self, ControlLoopError>
    {
        let mut cl = Self::new(params)?;
        cl.connect(transport);
        Ok(cl)
    }

    /// Replace the transport, configuring the servos if it is a servo link.
    pub fn connect(&mut self, transport: Box<dyn Transport>) {
        self.transport = transport;

        match self.transport.protocol() {
            Some(Protocol::Servo) => {
                for frame in ServoFrame::init_sequence() {
                    self.transport.send(&frame.to_string());
                }
                info!("Servo bus configured");
            },
            Some(Protocol::Remote) => info!("Remote controller connected"),
            None => info!("No link connected, frames will be discarded")
        }
    }

    // ---- ACCESSORS ----

    /// Whether the robot is at rest, standing or holding a special move pose.
    pub fn is_stopped(&self) -> bool {
        match self.choreo.is_active() {
            true => self.choreo.is_stopped(),
            false => self.gait.is_stopped()
        }
    }

    pub fn body(&self) -> &BodyFrame {
        &self.body
    }

    pub fn gait(&self) -> &GaitCtrl {
        &self.gait
    }

    pub fn choreo(&self) -> &Choreo {
        &self.choreo
    }

    pub fn leg_model(&self) -> &LegModel {
        &self.leg_model
    }

    pub fn speed(&self) -> SpeedMode {
        self.speed
    }

    /// Walking speed level selected by the operator.
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn interval(&self) -> Duration {
        self.scheduler.interval()
    }

    pub fn report(&self) -> &TickReport {
        &self.report
    }

    // ---- CYCLE ----

    /// Run a tick if one is due at `now`.
    ///
    /// Returns the joint commands of the tick, or `None` if no tick ran.
    pub fn tick(&mut self, now: Instant) -> Option<[JointCommand; NUM_JOINTS]> {
        self.now = now;
        self.run_deferred(now);

        if !self.scheduler.poll(now) {
            return None;
        }
        if !self.move_flag && self.is_stopped() {
            return None;
        }
        self.move_flag = false;

        let feet = match self.choreo.is_active() {
            false => {
                let feet = self.gait.step(&mut self.body);

                if self.gait.is_stopped() {
                    self.choreo.latch();
                    if self.choreo.is_active() {
                        self.change_speed_or_warn(SpeedMode::SpecialMove);
                    }
                }

                feet
            },
            true => {
                let feet = self.choreo.step(&mut self.body, &mut self.gait.legs);

                if !self.choreo.is_active() {
                    self.change_speed_or_warn(SpeedMode::Stopped);
                }

                feet
            }
        };

        let mut unreachable = 0;
        for leg in LegId::ALL.iter() {
            let n = leg.index();
            let target = self.body.get_leg_pos(*leg, &feet[n], Mode::Body);

            match self.leg_model.solve(*leg, &target) {
                Ok(a) => self.gait.legs[n].angles = a,
                Err(e) => {
                    warn!("{}, keeping the previous angles", e);
                    unreachable += 1;
                }
            }
        }

        let cmds = self.joint_map.map(&self.gait.legs.map(|l| l.angles));

        if self.transport.protocol() == Some(Protocol::Servo) {
            for cmd in cmds.iter() {
                self.transport.send(&ServoFrame::from(*cmd).to_string());
            }
        }

        let (current_move, keyframe) = self.choreo.state();
        self.report = TickReport {
            tick: self.report.tick + 1,
            cont: self.gait.cont(),
            current_move,
            keyframe,
            stopped: self.is_stopped(),
            unreachable
        };
        self.last_cmds = Some(cmds);

        trace!("Tick report: {:?}", self.report);

        Some(cmds)
    }

    // ---- SPEED ----

    /// Switch the loop to a new speed mode.
    pub(crate) fn change_speed(&mut self, mode: SpeedMode) -> Result<(), ControlLoopError> {
        let setting = self.params.setting(mode, self.level)?;

        self.speed = mode;
        self.scheduler.set_interval(setting.interval);
        if let Some(g) = setting.gait {
            self.gait.request_gait(g);
        }
        self.send_servo(ServoFrame::FilterPositionCount(setting.filter_count));

        debug!(
            "Speed changed to {:?}: {} ms ticks, filter count {}",
            mode, setting.interval.as_millis(), setting.filter_count
        );

        Ok(())
    }

    fn change_speed_or_warn(&mut self, mode: SpeedMode) {
        if let Err(e) = self.change_speed(mode) {
            warn!("Could not change speed to {:?}: {}", mode, e);
        }
    }

    // ---- DEFERRED ----

    /// Schedule `action` to run `delay` after the latest poll.
    pub(crate) fn defer(&mut self, delay: Duration, action: Deferred) {
        self.deferred.push_back((self.now + delay, action));
    }

    fn run_deferred(&mut self, now: Instant) {
        while let Some((due, _)) = self.deferred.front() {
            if *due > now {
                break;
            }

            match self.deferred.pop_front() {
                Some((_, Deferred::Servo(frame))) => self.send_servo(frame),
                Some((_, Deferred::Disconnect)) => {
                    self.connect(Box::new(NullTransport));
                    self.deferred.clear();
                    warn!("Link closed, reopen it at the new baud rate");
                },
                None => break
            }
        }
    }

    // ---- FRAMES ----

    pub(crate) fn send_servo(&mut self, frame: ServoFrame) {
        if self.transport.protocol() == Some(Protocol::Servo) {
            self.transport.send(&frame.to_string());
        }
    }

    pub(crate) fn send_remote(&mut self, frame: RemoteFrame) {
        if self.transport.protocol() == Some(Protocol::Remote) {
            self.transport.send(&frame.to_string());
        }
    }
}

impl State for ControlLoop {
    type InitData = InitData;
    type InitError = ControlLoopError;

    type InputData = InputData;
    type OutputData = Option<[JointCommand; NUM_JOINTS]>;
    type StatusReport = TickReport;
    type ProcError = ControlLoopError;

    /// Connect the transport and start archiving if requested.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        if init_data.archive {
            self.arch_joints = Archiver::from_path(session, "control_loop/joints.csv")
                .map_err(ControlLoopError::Archive)?;
        }

        self.connect(init_data.transport);

        Ok(())
    }

    /// Execute the input telecommands and run a tick if one is due.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.now = input_data.now;

        for tc in input_data.tcs.iter() {
            tc_processor::exec(self, tc);
        }

        let output = self.tick(input_data.now);

        if output.is_some() && self.arch_joints.is_initialised() {
            self.write().map_err(ControlLoopError::Archive)?;
        }

        Ok((output, self.report))
    }
}

impl Archived for ControlLoop {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let c = match self.last_cmds {
            Some(c) => c,
            None => return Ok(())
        };
        let r = &self.report;

        let record = JointsRecord {
            time_s: session::get_elapsed_seconds(),
            tick: r.tick,
            cont: r.cont,
            current_move: r.current_move,
            keyframe: r.keyframe,
            stopped: r.stopped,
            unreachable: r.unreachable,
            j11: c[0].tenths, j12: c[1].tenths, j13: c[2].tenths,
            j21: c[3].tenths, j22: c[4].tenths, j23: c[5].tenths,
            j31: c[6].tenths, j32: c[7].tenths, j33: c[8].tenths,
            j41: c[9].tenths, j42: c[10].tenths, j43: c[11].tenths,
        };

        self.arch_joints.serialise(record)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::transport::RecordingTransport;

    #[test]
    fn test_unreachable_keeps_angles() {
        let mut cl = ControlLoop::new(QuadParams::builtin().unwrap()).unwrap();
        let t0 = Instant::now();

        let first = cl.tick(t0).unwrap();
        assert_eq!(cl.report().unreachable, 0);

        // Far below the reach of every leg
        cl.body.pose.cgy = 400.0;
        cl.move_flag = true;
        let cmds = cl.tick(t0 + Duration::from_secs(1)).unwrap();

        assert_eq!(cl.report().unreachable, 4);
        assert_eq!(cl.report().tick, 2);
        assert_eq!(cmds, first);
    }

    #[test]
    fn test_special_move_speed() {
        let rec = RecordingTransport::new(Some(Protocol::Servo));
        let mut cl = ControlLoop::with_transport(
            QuadParams::builtin().unwrap(),
            Box::new(rec.clone())
        ).unwrap();
        let mut t = Instant::now();

        cl.trigger_special_move(SpecialMove::Lay).unwrap();
        rec.clear();
        cl.tick(t);
        assert_eq!(cl.speed(), SpeedMode::SpecialMove);
        assert_eq!(cl.interval(), Duration::from_millis(180));
        assert!(rec.frames().contains(&"#254FPC14\r".to_string()));

        // Cancel the hold and play out back to standing
        for _ in 0..3 {
            t += Duration::from_secs(1);
            cl.tick(t);
        }
        cl.trigger_special_move(SpecialMove::Up).unwrap();
        for _ in 0..4 {
            t += Duration::from_secs(1);
            cl.tick(t);
        }

        assert!(!cl.choreo().is_active());
        assert!(cl.is_stopped());
        assert_eq!(cl.speed(), SpeedMode::Stopped);
    }

    /// Solve every leg of the current feet in the given mode.
    fn solve_feet(cl: &ControlLoop, mode: Mode) -> Option<[JointCommand; NUM_JOINTS]> {
        let mut angles = cl.gait.legs.map(|l| l.angles);

        for leg in LegId::ALL.iter() {
            let acc = cl.gait.legs[leg.index()].acc;
            let foot = nalgebra::Vector3::new(acc.0, 0.0, acc.1);
            let target = cl.body.get_leg_pos(*leg, &foot, mode);
            angles[leg.index()] = cl.leg_model.solve(*leg, &target).ok()?;
        }

        Some(cl.joint_map.map(&angles))
    }

    #[test]
    fn test_wiggle_solved_in_body_mode() {
        let mut cl = ControlLoop::new(QuadParams::builtin().unwrap()).unwrap();
        let mut t = Instant::now();

        cl.trigger_special_move(SpecialMove::Wiggle).unwrap();

        // Latch on the first tick, then keyframes 0 and 1
        let mut cmds = None;
        for _ in 0..3 {
            t += Duration::from_secs(1);
            cmds = cl.tick(t);
        }
        assert_eq!(cl.choreo().state(), (SpecialMove::Wiggle, 2));
        assert_eq!(cl.report().unreachable, 0);
        assert_eq!(cl.body().pose.cgx, -20.0);

        let cmds = cmds.unwrap();
        assert_eq!(Some(cmds), solve_feet(&cl, Mode::Body));
        assert_ne!(Some(cmds), solve_feet(&cl, Mode::Stance));

        // The yawed keyframe after it
        t += Duration::from_secs(1);
        let cmds = cl.tick(t).unwrap();
        assert_eq!(Some(cmds), solve_feet(&cl, Mode::Body));
    }
}
