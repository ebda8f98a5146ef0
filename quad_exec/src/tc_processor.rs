//! # Telecommand processor module
//!
//! The telecommand processor applies TCs from any source to the control loop.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};

// Internal
use comms_if::tc::{Switch, Tc};
use crate::control_loop::ControlLoop;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Rejected commands are logged and otherwise ignored.
pub(crate) fn exec(cl: &mut ControlLoop, tc: &Tc) {
    debug!("Executing {:?}", tc);

    let result = match *tc {
        Tc::Direction { angle_deg } => cl.set_direction(angle_deg),
        Tc::Orient { fwd, back, right, left } => cl.set_orientation([fwd, back, right, left]),
        Tc::Rotate { dir } => cl.set_rotation(dir),
        Tc::Roll { deg } => cl.set_roll(deg),
        Tc::Pitch { deg } => cl.set_pitch(deg),
        Tc::Yaw { deg } => cl.set_yaw(deg),
        Tc::Height { mm } => cl.set_height(mm),
        Tc::FrontalOffset { mm } => cl.set_frontal_offset(mm),
        Tc::LateralOffset { mm } => cl.set_lateral_offset(mm),
        Tc::Gait { gait } => cl.set_gait_type(gait),
        Tc::Shape { shape } => {
            cl.set_trajectory_shape(shape);
            Ok(())
        },
        Tc::Speed { level } => cl.set_speed(level),
        Tc::SpecialMove { special } => cl.trigger_special_move(special),
        Tc::Jog { state } => cl.set_jog(state == Switch::On),
        Tc::Led { colour } => {
            cl.set_led(colour);
            Ok(())
        },
        Tc::Halt => {
            cl.halt();
            Ok(())
        },
        Tc::Limp => {
            cl.limp();
            Ok(())
        },
        Tc::Reset => {
            cl.reset();
            Ok(())
        },
        Tc::EmergencyStop => {
            cl.emergency_stop();
            Ok(())
        },
        Tc::Calibrate => {
            cl.calibrate();
            Ok(())
        },
        Tc::Baud { baud } => cl.set_baud(baud),
        Tc::Raw { ref cmd } => cl.send_raw(cmd)
    };

    if let Err(e) = result {
        warn!("TC rejected: {}", e);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::QuadParams;
    use crate::transport::{Protocol, RecordingTransport};
    use comms_if::tc::{RotationDir, SpecialMove};

    #[test]
    fn test_exec() {
        let mut cl = ControlLoop::new(QuadParams::builtin().unwrap()).unwrap();

        exec(&mut cl, &Tc::from_line("rotate cw").unwrap());
        assert_eq!(cl.gait().requested().rotation, RotationDir::Cw);

        exec(&mut cl, &Tc::from_line("orient 0 -1 0 1").unwrap());
        assert_eq!(cl.gait().requested().director_deg, 225.0);

        // Rejected, the pose is unchanged
        exec(&mut cl, &Tc::Yaw { deg: 45.0 });
        assert_eq!(cl.body().pose.yaw, 0.0);

        exec(&mut cl, &Tc::from_json(r#"{"special_move": {"special": "lay"}}"#).unwrap());
        assert_eq!(cl.choreo().requested(), SpecialMove::Lay);
        assert!(!cl.gait().requested().moving);
    }

    #[test]
    fn test_exec_maintenance() {
        let rec = RecordingTransport::new(Some(Protocol::Servo));
        let mut cl = ControlLoop::with_transport(
            QuadParams::builtin().unwrap(),
            Box::new(rec.clone())
        ).unwrap();
        rec.clear();

        exec(&mut cl, &Tc::from_line("cmd 254led4").unwrap());
        exec(&mut cl, &Tc::from_line("calibrate").unwrap());
        assert_eq!(rec.frames()[0], "#254LED4\r");
        assert_eq!(rec.frames()[1], "#254CO\r");

        // Unsupported rates are rejected without touching the bus
        rec.clear();
        exec(&mut cl, &Tc::Baud { baud: 1234 });
        assert!(rec.frames().is_empty());
    }
}
