//! Operator command API of the control loop
//!
//! Every command is forwarded to a remote controller if one is connected, and
//! applied to the local models when the robot's state allows it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info, warn};
use std::time::Duration;

use super::{orientation, ControlLoop, ControlLoopError, Deferred, SpeedMode};
use crate::body_frame::{BodyFrame, BodyFrameError};
use crate::transport::Protocol;
use comms_if::{
    eqpt::{
        RawFrame,
        remote::{RemoteFrame, RemoteMode},
        servo::{ServoFrame, DEFAULT_LED_COLOUR, SUPPORTED_BAUDS}
    },
    tc::{GaitType, RotationDir, SpecialMove, TrajectoryShape}
};
use util::maths::in_range;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Speed level selected along with the static gait.
const STATIC_GAIT_LEVEL: u8 = 3;

/// Speed level selected along with the dynamic gait.
const DYNAMIC_GAIT_LEVEL: u8 = 4;

const SPECIAL_MOVE_PLAYING: &str = "a special move is playing";

const ROBOT_MOVING: &str = "the robot is moving";

const NO_LINK: &str = "no link is connected";

const NO_SERVO_LINK: &str = "no servo link is connected";

/// Time for the servos to restart after an emergency reset before they are halted.
const ESTOP_HALT_DELAY: Duration = Duration::from_millis(500);

/// Time after an emergency reset at which the LED colour is restored.
const ESTOP_LED_DELAY: Duration = Duration::from_millis(3000);

/// Time between a baud rate change and the reset which applies it.
const BAUD_RESET_DELAY: Duration = Duration::from_millis(1000);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ControlLoop {

    // ---- WALKING ----

    /// Walk towards `angle_deg`, or stop if `None`.
    ///
    /// Stopping while jogging keeps the legs stepping on the spot.
    pub fn set_direction(&mut self, angle_deg: Option<f64>) -> Result<(), ControlLoopError> {
        if let Some(a) = angle_deg {
            if !in_range(a, (0.0, 360.0)) {
                return Err(ControlLoopError::NotAccepted {
                    cmd: "walk",
                    reason: "the director angle must be between 0 and 360 degrees"
                });
            }
        }

        self.send_remote(RemoteFrame::direction(angle_deg.map(|a| a as i32), self.level));

        self.move_flag = true;
        self.gait.request_direction(angle_deg);
        self.update_walking_speed()
    }

    /// Walk in the direction of a set of forward, back, right and left key
    /// states. See [`orientation`].
    pub fn set_orientation(&mut self, fbrl: [i8; 4]) -> Result<(), ControlLoopError> {
        match orientation(fbrl) {
            0 => self.set_direction(None),
            a => self.set_direction(Some(a as f64))
        }
    }

    pub fn set_rotation(&mut self, dir: RotationDir) -> Result<(), ControlLoopError> {
        self.send_remote(RemoteFrame::rotate(dir));

        self.move_flag = true;
        self.gait.request_rotation(dir);

        if !self.is_stopped()
            && self.choreo.current() == SpecialMove::Up
            && dir != RotationDir::Stop
            && self.speed != SpeedMode::Level(self.level)
        {
            self.change_speed(SpeedMode::Level(self.level))?;
        }

        Ok(())
    }

    /// Select the walking gait, along with the speed level it walks at.
    pub fn set_gait_type(&mut self, gait: GaitType) -> Result<(), ControlLoopError> {
        self.set_speed(match gait {
            GaitType::Static => STATIC_GAIT_LEVEL,
            GaitType::Dynamic => DYNAMIC_GAIT_LEVEL
        })
    }

    pub fn set_trajectory_shape(&mut self, shape: TrajectoryShape) {
        self.send_remote(RemoteFrame::gait_shape(shape));

        self.move_flag = true;
        self.gait.set_shape(shape);
    }

    /// Select a walking speed level and switch to it.
    pub fn set_speed(&mut self, level: u8) -> Result<(), ControlLoopError> {
        if level == 0 || level > self.params.num_levels() {
            return Err(ControlLoopError::InvalidSpeedLevel(level));
        }

        self.level = level;
        self.change_speed(SpeedMode::Level(level))?;

        self.send_remote(RemoteFrame::direction(Some(self.director_deg()), level));

        Ok(())
    }

    // ---- BODY POSE ----

    pub fn set_roll(&mut self, deg: f64) -> Result<(), ControlLoopError> {
        self.set_posture(
            "set the roll",
            RemoteFrame::value(RemoteMode::Roll, deg as i32),
            |b| b.set_roll_deg(deg)
        )
    }

    pub fn set_pitch(&mut self, deg: f64) -> Result<(), ControlLoopError> {
        self.set_posture(
            "set the pitch",
            RemoteFrame::value(RemoteMode::Pitch, deg as i32),
            |b| b.set_pitch_deg(deg)
        )
    }

    pub fn set_yaw(&mut self, deg: f64) -> Result<(), ControlLoopError> {
        self.set_posture(
            "set the yaw",
            RemoteFrame::value(RemoteMode::Yaw, deg as i32),
            |b| b.set_yaw_deg(deg)
        )
    }

    pub fn set_height(&mut self, mm: f64) -> Result<(), ControlLoopError> {
        self.set_posture(
            "set the height",
            RemoteFrame::value(RemoteMode::Height, mm as i32),
            |b| b.set_height_mm(mm)
        )
    }

    /// Shift the body forwards over the feet. Only accepted while stopped.
    pub fn set_frontal_offset(&mut self, mm: f64) -> Result<(), ControlLoopError> {
        self.set_offset(
            "set the frontal offset",
            RemoteFrame::value(RemoteMode::FrontalOffset, mm as i32),
            |b| b.set_frontal_offset_mm(mm)
        )
    }

    /// Shift the body sideways over the feet. Only accepted while stopped.
    pub fn set_lateral_offset(&mut self, mm: f64) -> Result<(), ControlLoopError> {
        self.set_offset(
            "set the lateral offset",
            RemoteFrame::value(RemoteMode::LateralOffset, mm as i32),
            |b| b.set_lateral_offset_mm(mm)
        )
    }

    // ---- SPECIAL MOVES ----

    /// Request a special move. The robot stops walking before it starts.
    ///
    /// The jog moves switch jog mode instead.
    pub fn trigger_special_move(&mut self, special: SpecialMove) -> Result<(), ControlLoopError> {
        self.send_remote(RemoteFrame::special_move(special));

        match special {
            SpecialMove::JogOn => self.switch_jog(true),
            SpecialMove::JogOff => self.switch_jog(false),
            _ => {
                if self.choreo.request(special) {
                    self.move_flag = true;
                    self.gait.request_stop();
                    debug!("Special move {:?} requested", special);
                }
                Ok(())
            }
        }
    }

    /// Turn jog mode on or off.
    pub fn set_jog(&mut self, on: bool) -> Result<(), ControlLoopError> {
        self.trigger_special_move(match on {
            true => SpecialMove::JogOn,
            false => SpecialMove::JogOff
        })
    }

    // ---- MAINTENANCE ----

    pub fn set_led(&mut self, colour: u8) {
        self.send_servo(ServoFrame::Led(colour));
    }

    /// Hold all servos in their current position.
    pub fn halt(&mut self) {
        self.send_servo(ServoFrame::Halt);
    }

    pub fn limp(&mut self) {
        self.send_servo(ServoFrame::Limp);
    }

    pub fn reset(&mut self) {
        self.send_servo(ServoFrame::Reset);
    }

    /// Reset every servo. Once they have restarted they are halted, and the
    /// LED colour is restored a while later.
    pub fn emergency_stop(&mut self) {
        if self.transport.protocol() != Some(Protocol::Servo) {
            warn!("Emergency stop requested with no servo link connected");
            return;
        }

        warn!("Emergency stop, the servos will reset");
        self.send_servo(ServoFrame::Reset);
        self.defer(ESTOP_HALT_DELAY, Deferred::Servo(ServoFrame::Halt));
        self.defer(ESTOP_LED_DELAY, Deferred::Servo(ServoFrame::Led(DEFAULT_LED_COLOUR)));
    }

    /// Zero the servo offsets in the current posture, then query every servo.
    ///
    /// The robot should be limp and held in the calibration posture.
    pub fn calibrate(&mut self) {
        if self.transport.protocol() != Some(Protocol::Servo) {
            warn!("Calibration requested with no servo link connected");
            return;
        }

        for frame in ServoFrame::calibration_sequence() {
            self.send_servo(frame);
        }
        info!("Calibration sent, position replies are not read back");
    }

    /// Switch the servos to a new baud rate.
    ///
    /// The servos are reset to apply it and the link is then closed, as it
    /// would no longer match.
    pub fn set_baud(&mut self, baud: u32) -> Result<(), ControlLoopError> {
        if !SUPPORTED_BAUDS.contains(&baud) {
            return Err(ControlLoopError::InvalidBaud(baud));
        }

        if self.transport.protocol() != Some(Protocol::Servo) {
            return Err(ControlLoopError::NotAccepted {
                cmd: "change the baud rate",
                reason: NO_SERVO_LINK
            });
        }

        self.send_servo(ServoFrame::ChangeBaud(baud));
        self.defer(BAUD_RESET_DELAY, Deferred::Servo(ServoFrame::Reset));
        self.defer(BAUD_RESET_DELAY, Deferred::Disconnect);
        info!("Servo baud rate changing to {}", baud);

        Ok(())
    }

    /// Send a typed command to whichever link is connected.
    pub fn send_raw(&mut self, cmd: &str) -> Result<(), ControlLoopError> {
        let frame = RawFrame::new(cmd).ok_or(ControlLoopError::NotAccepted {
            cmd: "send the command",
            reason: "it is empty"
        })?;

        match self.transport.protocol() {
            Some(_) => {
                self.transport.send(&frame.to_string());
                Ok(())
            },
            None => Err(ControlLoopError::NotAccepted {
                cmd: "send the command",
                reason: NO_LINK
            })
        }
    }

    // ---- HELPERS ----

    /// The requested director angle as sent to a remote controller, 0 when
    /// not walking.
    fn director_deg(&self) -> i32 {
        let req = self.gait.requested();
        match req.moving {
            true => req.director_deg as i32,
            false => 0
        }
    }

    /// Apply the speed the latest walking request needs.
    fn update_walking_speed(&mut self) -> Result<(), ControlLoopError> {
        if self.is_stopped() && !self.gait.requested().moving {
            self.change_speed(SpeedMode::Stopped)
        }
        else if self.speed != SpeedMode::Level(self.level) {
            self.change_speed(SpeedMode::Level(self.level))
        }
        else {
            Ok(())
        }
    }

    fn switch_jog(&mut self, on: bool) -> Result<(), ControlLoopError> {
        if self.gait.requested().jog == on {
            return Ok(());
        }

        self.choreo.request(SpecialMove::Up);
        self.gait.set_jog(on);
        self.move_flag = true;
        debug!("Jog mode {}", if on { "on" } else { "off" });

        self.update_walking_speed()
    }

    /// Apply an attitude or height demand, accepted whenever no special move is
    /// playing.
    fn set_posture<F>(&mut self, cmd: &'static str, frame: RemoteFrame, set: F)
        -> Result<(), ControlLoopError>
    where
        F: FnOnce(&mut BodyFrame) -> Result<(), BodyFrameError>
    {
        self.send_remote(frame);
        self.move_flag = true;

        let result = match self.choreo.current() {
            SpecialMove::Up => set(&mut self.body).map_err(ControlLoopError::from),
            _ => Err(ControlLoopError::NotAccepted { cmd, reason: SPECIAL_MOVE_PLAYING })
        };

        if self.is_stopped() && self.speed != SpeedMode::Stopped {
            self.change_speed(SpeedMode::Stopped)?;
        }

        result
    }

    /// Apply a centre of gravity offset, accepted only while standing still.
    fn set_offset<F>(&mut self, cmd: &'static str, frame: RemoteFrame, set: F)
        -> Result<(), ControlLoopError>
    where
        F: FnOnce(&mut BodyFrame) -> Result<(), BodyFrameError>
    {
        self.send_remote(frame);
        self.move_flag = true;

        if self.choreo.current() != SpecialMove::Up {
            return Err(ControlLoopError::NotAccepted { cmd, reason: SPECIAL_MOVE_PLAYING });
        }
        if !self.is_stopped() {
            return Err(ControlLoopError::NotAccepted { cmd, reason: ROBOT_MOVING });
        }

        let result = set(&mut self.body).map_err(ControlLoopError::from);

        if self.speed != SpeedMode::Stopped {
            self.change_speed(SpeedMode::Stopped)?;
        }

        result
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::QuadParams;
    use crate::transport::{Protocol, RecordingTransport};
    use std::time::{Duration, Instant};

    fn setup(protocol: Option<Protocol>) -> (ControlLoop, RecordingTransport) {
        let rec = RecordingTransport::new(protocol);
        let cl = ControlLoop::with_transport(
            QuadParams::builtin().unwrap(),
            Box::new(rec.clone())
        ).unwrap();
        rec.clear();
        (cl, rec)
    }

    /// Run `n` ticks, each one well after the previous.
    fn run(cl: &mut ControlLoop, t: &mut Instant, n: usize) {
        for _ in 0..n {
            *t += Duration::from_millis(200);
            cl.tick(*t);
        }
    }

    #[test]
    fn test_out_of_range_is_dropped() {
        let (mut cl, _) = setup(None);
        let before = cl.body().pose;

        assert!(matches!(cl.set_roll(25.0), Err(ControlLoopError::OutOfRange(_))));
        assert!(matches!(cl.set_height(200.0), Err(ControlLoopError::OutOfRange(_))));
        assert_eq!(cl.body().pose, before);

        cl.set_pitch(-10.0).unwrap();
        assert!((cl.body().pose.pitch + 10f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_posture_rejected_during_special_move() {
        let (mut cl, _) = setup(None);
        let mut t = Instant::now();

        cl.trigger_special_move(SpecialMove::Sit).unwrap();
        run(&mut cl, &mut t, 1);
        assert!(cl.choreo().is_active());
        assert_eq!(cl.speed(), SpeedMode::SpecialMove);

        let height = cl.body().pose.cgy;
        assert!(matches!(
            cl.set_height(120.0),
            Err(ControlLoopError::NotAccepted { .. })
        ));
        assert_eq!(cl.body().pose.cgy, height);
    }

    #[test]
    fn test_offsets_only_while_stopped() {
        let (mut cl, _) = setup(None);
        let mut t = Instant::now();

        cl.set_frontal_offset(-20.0).unwrap();
        assert_eq!(cl.body().pose.cgx, -20.0);
        assert_eq!(cl.speed(), SpeedMode::Stopped);

        cl.set_direction(Some(90.0)).unwrap();
        run(&mut cl, &mut t, 2);
        assert!(!cl.is_stopped());

        match cl.set_lateral_offset(10.0) {
            Err(ControlLoopError::NotAccepted { reason, .. }) => assert_eq!(reason, ROBOT_MOVING),
            r => panic!("Expected the offset to be rejected, got {:?}", r)
        }
        assert_eq!(cl.body().pose.cgz, 0.0);
    }

    #[test]
    fn test_speed_changes() {
        let (mut cl, rec) = setup(Some(Protocol::Servo));

        cl.set_gait_type(GaitType::Static).unwrap();
        assert_eq!(cl.level(), 3);
        assert_eq!(cl.speed(), SpeedMode::Level(3));
        assert_eq!(cl.interval(), Duration::from_millis(50));

        cl.set_speed(1).unwrap();
        assert_eq!(cl.interval(), Duration::from_millis(70));
        assert_eq!(rec.frames(), vec!["#254FPC3\r", "#254FPC4\r"]);

        assert!(matches!(cl.set_speed(5), Err(ControlLoopError::InvalidSpeedLevel(5))));
        assert_eq!(cl.level(), 1);

        // Standing still at a static level stays in the static gait
        cl.set_direction(None).unwrap();
        assert_eq!(cl.speed(), SpeedMode::Stopped);
        assert_eq!(cl.interval(), Duration::from_millis(60));
    }

    #[test]
    fn test_walking_from_stopped_restores_level() {
        let (mut cl, _) = setup(None);

        cl.set_direction(None).unwrap();
        assert_eq!(cl.speed(), SpeedMode::Stopped);

        cl.set_direction(Some(360.0)).unwrap();
        assert_eq!(cl.speed(), SpeedMode::Level(4));

        assert!(cl.set_direction(Some(400.0)).is_err());
    }

    #[test]
    fn test_remote_frames() {
        let (mut cl, rec) = setup(Some(Protocol::Remote));

        cl.set_direction(Some(315.0)).unwrap();
        cl.set_rotation(RotationDir::Ccw).unwrap();
        cl.trigger_special_move(SpecialMove::Paw).unwrap();
        cl.set_height(120.0).unwrap();
        cl.set_trajectory_shape(TrajectoryShape::Square);
        cl.halt();

        assert_eq!(
            rec.frames(),
            vec!["#100M0V315S4\r", "#100M1V-1\r", "#100M13\r", "#100M6V120\r", "#100M8V2\r"]
        );

        // Joint positions are not sent to a remote controller
        let mut t = Instant::now();
        rec.clear();
        run(&mut cl, &mut t, 3);
        assert!(rec.frames().is_empty());
    }

    #[test]
    fn test_speed_reaches_remote() {
        let (mut cl, rec) = setup(Some(Protocol::Remote));

        cl.set_speed(2).unwrap();
        cl.set_gait_type(GaitType::Static).unwrap();
        assert_eq!(rec.frames(), vec!["#100M0V0S2\r", "#100M0V0S3\r"]);

        // While walking the frame carries the direction
        rec.clear();
        cl.set_direction(Some(90.0)).unwrap();
        cl.set_speed(1).unwrap();
        assert_eq!(rec.frames(), vec!["#100M0V90S3\r", "#100M0V90S1\r"]);

        rec.clear();
        assert!(cl.set_speed(0).is_err());
        assert!(rec.frames().is_empty());
    }

    #[test]
    fn test_emergency_stop() {
        let (mut cl, rec) = setup(Some(Protocol::Servo));
        let t = Instant::now();
        cl.tick(t);

        rec.clear();
        cl.emergency_stop();
        assert_eq!(rec.frames(), vec!["#254RESET\r"]);

        let broadcast = |rec: &RecordingTransport| -> Vec<String> {
            rec.frames().into_iter().filter(|f| f.starts_with("#254")).collect()
        };

        cl.tick(t + Duration::from_millis(400));
        assert_eq!(broadcast(&rec), vec!["#254RESET\r"]);

        cl.tick(t + Duration::from_millis(600));
        assert_eq!(broadcast(&rec), vec!["#254RESET\r", "#254H\r"]);

        cl.tick(t + Duration::from_millis(3100));
        assert_eq!(broadcast(&rec), vec!["#254RESET\r", "#254H\r", "#254LED2\r"]);

        // Nothing is sent without a servo link
        let (mut cl, rec) = setup(Some(Protocol::Remote));
        cl.emergency_stop();
        cl.tick(Instant::now() + Duration::from_secs(5));
        assert!(rec.frames().is_empty());
    }

    #[test]
    fn test_baud_change_closes_link() {
        let (mut cl, rec) = setup(Some(Protocol::Servo));
        let t = Instant::now();
        cl.tick(t);

        assert!(matches!(cl.set_baud(12345), Err(ControlLoopError::InvalidBaud(12345))));

        rec.clear();
        cl.set_baud(38400).unwrap();
        assert_eq!(rec.frames(), vec!["#254CB38400\r"]);
        assert!(cl.transport.protocol().is_some());

        cl.tick(t + Duration::from_millis(1100));
        assert_eq!(rec.frames().last().unwrap(), "#254RESET\r");
        assert!(cl.transport.protocol().is_none());

        assert!(matches!(cl.set_baud(9600), Err(ControlLoopError::NotAccepted { .. })));
    }

    #[test]
    fn test_calibrate_and_raw() {
        let (mut cl, rec) = setup(Some(Protocol::Servo));

        cl.calibrate();
        let frames = rec.frames();
        assert_eq!(frames.len(), 13);
        assert_eq!(frames[0], "#254CO\r");
        assert_eq!(frames[12], "#43QD\r");

        // Raw commands go to a remote too
        let (mut cl, rec) = setup(Some(Protocol::Remote));
        cl.send_raw("100m13").unwrap();
        assert_eq!(rec.frames(), vec!["#100M13\r"]);
        assert!(cl.send_raw(" ").is_err());

        let (mut cl, _) = setup(None);
        assert!(cl.send_raw("254H").is_err());
    }

    #[test]
    fn test_jog() {
        let (mut cl, _) = setup(None);

        cl.set_jog(true).unwrap();
        let req = *cl.gait().requested();
        assert!(req.jog && req.moving);
        assert_eq!(req.director_deg, 0.0);
        assert_eq!(cl.speed(), SpeedMode::Level(4));

        // Stopping while jogging keeps stepping
        cl.set_direction(None).unwrap();
        assert!(cl.gait().requested().moving);

        cl.set_jog(false).unwrap();
        assert!(!cl.gait().requested().jog);
        assert!(!cl.gait().requested().moving);
        assert_eq!(cl.choreo().requested(), SpecialMove::Up);
    }

    #[test]
    fn test_orientation_keys() {
        let (mut cl, _) = setup(None);

        cl.set_orientation([1, 0, -1, 0]).unwrap();
        assert_eq!(cl.gait().requested().director_deg, 45.0);
        assert!(cl.gait().requested().moving);

        cl.set_orientation([0, 0, 0, 0]).unwrap();
        assert!(!cl.gait().requested().moving);
    }
}
