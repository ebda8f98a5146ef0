//! End to end runs of the control loop

use std::time::{Duration, Instant};

use comms_if::tc::{SpecialMove, Tc};
use quad_lib::{
    control_loop::{ControlLoop, InitData, InputData},
    params::QuadParams,
    transport::{Protocol, RecordingTransport},
};
use util::{module::State, session::Session};

/// Longer than any tick interval, so every tick is due.
const TICK_GAP: Duration = Duration::from_millis(500);

fn control_loop() -> ControlLoop {
    ControlLoop::new(QuadParams::builtin().unwrap()).unwrap()
}

#[test]
fn test_walk_then_stop_returns_to_rest() {
    let mut cl = control_loop();
    let mut now = Instant::now();

    cl.set_direction(Some(0.0)).unwrap();
    for _ in 0..cl.gait().steps() {
        now += TICK_GAP;
        cl.tick(now);
    }
    assert!(!cl.is_stopped());
    assert!(cl.gait().committed().moving);

    cl.set_direction(None).unwrap();

    let mut ticks = 0;
    while !cl.is_stopped() {
        now += TICK_GAP;
        cl.tick(now);
        ticks += 1;
        assert!(ticks < 100, "gait did not stop");
    }

    assert!(!cl.gait().is_update_pending());
    for leg in cl.gait().legs.iter() {
        assert!((leg.acc.0 - leg.rest.0).abs() <= 1.0, "{:?}", leg);
        assert!((leg.acc.1 - leg.rest.1).abs() <= 1.0, "{:?}", leg);
    }

    // Nothing more runs once stopped
    now += TICK_GAP;
    assert!(cl.tick(now).is_none());
}

#[test]
fn test_sit_exits_before_lay_starts() {
    let mut cl = control_loop();
    let mut now = Instant::now();
    let mut visited = Vec::new();

    cl.trigger_special_move(SpecialMove::Sit).unwrap();

    for n in 0..60 {
        // Lay is requested before Sit reaches its hold at keyframe 5
        if n == 2 {
            cl.trigger_special_move(SpecialMove::Lay).unwrap();
        }

        now += TICK_GAP;
        if cl.tick(now).is_some() {
            let r = cl.report();
            visited.push((r.current_move, r.keyframe));
        }
    }

    let position = |state: (SpecialMove, usize)| visited.iter().position(|s| *s == state);

    let sit_exit = position((SpecialMove::Sit, 6)).expect("Sit did not exit");
    let sit_end = position((SpecialMove::Sit, 11)).expect("Sit did not finish");
    let lay_start = visited.iter()
        .position(|(m, _)| *m == SpecialMove::Lay)
        .expect("Lay did not start");

    assert!(sit_exit < sit_end && sit_end < lay_start, "{:?}", visited);

    // Lay settles into its hold and the loop stops ticking
    assert_eq!(cl.choreo().current(), SpecialMove::Lay);
    assert!(cl.is_stopped());
}

#[test]
fn test_module_interface() {
    let root = std::env::temp_dir().join(format!("quad_sw_test_{}", std::process::id()));
    let session = Session::new_in(&root, "quad_exec", "sessions").unwrap();

    let rec = RecordingTransport::new(Some(Protocol::Servo));
    let mut cl = control_loop();
    cl.init(
        InitData {
            transport: Box::new(rec.clone()),
            archive: true
        },
        &session
    ).unwrap();

    // Servo configuration is sent on init
    let frames = rec.frames();
    assert_eq!(frames.len(), 16);
    assert_eq!(frames[0], "#254LED2\r");
    assert_eq!(frames[15], "#254AS-2\r");

    let now = Instant::now();
    let (cmds, report) = cl.proc(&InputData {
        now,
        tcs: vec![Tc::Direction { angle_deg: Some(360.0) }]
    }).unwrap();

    let cmds = cmds.expect("first poll should tick");
    assert_eq!(report.tick, 1);
    assert_eq!(cmds[0].servo_id(), 11);
    assert_eq!(cmds[11].servo_id(), 43);

    // One joint frame per joint, in bus order
    let frames = rec.frames();
    assert_eq!(frames.len(), 28);
    assert_eq!(frames[16], format!("#11D{}\r", cmds[0].tenths));
    assert!(frames[27].starts_with("#43D"));

    // Polled again straight away: not due
    let (cmds, _) = cl.proc(&InputData { now, tcs: vec![] }).unwrap();
    assert!(cmds.is_none());

    let archive = std::fs::read_to_string(
        session.arch_root.join("control_loop/joints.csv")
    ).unwrap();
    let mut lines = archive.lines();
    assert!(lines.next().unwrap().starts_with("time_s,tick,cont,current_move"));
    assert_eq!(lines.count(), 1);

    std::fs::remove_dir_all(root).ok();
}
