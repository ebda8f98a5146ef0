//! Keyframe tables of the special moves
//!
//! Leg indices are zero based, `0` is the back right leg and `3` the front
//! left one.

use super::keyframe::*;
use comms_if::tc::SpecialMove;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the keyframes of a move, or `None` if the move has no choreography.
pub fn keyframes(special: SpecialMove) -> Option<&'static [Keyframe]> {
    match special {
        SpecialMove::Sit => Some(SIT),
        SpecialMove::Lay => Some(LAY),
        SpecialMove::Paw => Some(PAW),
        SpecialMove::Wiggle => Some(WIGGLE),
        SpecialMove::Tinkle => Some(TINKLE),
        SpecialMove::Stretch => Some(STRETCH),
        SpecialMove::Up
        | SpecialMove::JogOn
        | SpecialMove::JogOff => None
    }
}

// ---------------------------------------------------------------------------
// TABLES
// ---------------------------------------------------------------------------

const PAW_RAISE: Height = Height::Fixed(60.0);
const DOWN: Height = Height::Fixed(0.0);

/// Sit back on the hind legs, shuffling the front feet inwards.
const SIT: &[Keyframe] = &[
    // 0
    advance(Frame { cgy: Some(Height::Fixed(120.0)), ..NEUTRAL }),
    // 1
    advance(Frame { pitch: Some(30.0), cgx: Some(-40.0), ..EMPTY }),
    // 2
    advance(Frame {
        lift: lift(&[3], PAW_RAISE),
        feet: &[FootOverride { leg: 3, x: None, z: Some(Coord::Mm(20.0)) }],
        ..EMPTY
    }),
    // 3
    advance(Frame { lift: lift(&[3], DOWN), ..EMPTY }),
    // 4
    advance(Frame {
        lift: lift(&[1], PAW_RAISE),
        feet: &[FootOverride { leg: 1, x: None, z: Some(Coord::Mm(-20.0)) }],
        ..EMPTY
    }),
    // 5
    hold(
        Frame { lift: lift(&[1], DOWN), ..EMPTY },
        Hold { settles: true, repeat: None, cancel: EMPTY, exit: 6 }
    ),
    // 6
    advance(Frame {
        lift: lift(&[3], PAW_RAISE),
        feet: &[FootOverride { leg: 3, x: None, z: Some(Coord::Rest) }],
        ..EMPTY
    }),
    // 7
    advance(Frame { lift: lift(&[3], DOWN), ..EMPTY }),
    // 8
    advance(Frame {
        lift: lift(&[1], PAW_RAISE),
        feet: &[FootOverride { leg: 1, x: None, z: Some(Coord::Rest) }],
        ..EMPTY
    }),
    // 9
    advance(Frame { lift: lift(&[1], DOWN), ..EMPTY }),
    // 10
    advance(Frame { pitch: Some(0.0), cgx: Some(0.0), ..EMPTY }),
    // 11
    terminal(Frame { cgy: Some(STD), ..EMPTY }),
];

/// Lower the body to the ground.
const LAY: &[Keyframe] = &[
    advance(Frame { cgy: Some(STD), ..NEUTRAL }),
    hold(
        Frame { cgy: Some(Height::Fixed(60.0)), ..NEUTRAL },
        Hold {
            settles: true,
            repeat: None,
            cancel: Frame { cgy: Some(STD), ..EMPTY },
            exit: 2
        }
    ),
    // Time to stabilise
    advance(EMPTY),
    terminal(EMPTY),
];

/// Offer the front right paw.
const PAW: &[Keyframe] = &[
    advance(Frame {
        cgx: Some(-10.0),
        cgy: Some(Height::Fixed(135.0)),
        cgz: Some(20.0),
        pitch: Some(15.0),
        lift: lift(&[1], Height::Fixed(50.0)),
        ..NEUTRAL
    }),
    hold(
        Frame {
            lift: lift(&[1], STD),
            feet: &[FootOverride {
                leg: 1,
                x: Some(Coord::Mm(-85.0)),
                z: Some(Coord::Mm(-20.0))
            }],
            ..EMPTY
        },
        Hold {
            settles: true,
            repeat: None,
            cancel: Frame {
                lift: lift(&[1], Height::Fixed(50.0)),
                feet: &[FootOverride { leg: 1, x: Some(Coord::Mm(-20.0)), z: None }],
                ..EMPTY
            },
            exit: 2
        }
    ),
    advance(Frame {
        pitch: Some(0.0),
        cgx: Some(0.0),
        cgz: Some(0.0),
        lift: lift(&[1], DOWN),
        feet: &[FootOverride { leg: 1, x: Some(Coord::Rest), z: Some(Coord::Rest) }],
        ..EMPTY
    }),
    advance(EMPTY),
    terminal(EMPTY),
];

/// Yaw the hips from side to side until another move is requested.
const WIGGLE: &[Keyframe] = &[
    advance(Frame {
        cgx: Some(-20.0),
        pitch: Some(-13.0),
        cgy: Some(Height::Fixed(135.0)),
        ..NEUTRAL
    }),
    advance(Frame { yaw: Some(10.0), ..EMPTY }),
    hold(
        Frame { yaw: Some(-10.0), ..EMPTY },
        Hold {
            settles: false,
            repeat: Some(1),
            cancel: Frame { yaw: Some(0.0), ..EMPTY },
            exit: 3
        }
    ),
    advance(Frame { pitch: Some(0.0), ..EMPTY }),
    advance(Frame { cgx: Some(0.0), cgz: Some(0.0), cgy: Some(STD), ..EMPTY }),
    advance(EMPTY),
    terminal(EMPTY),
];

/// Lean away from the back right leg and raise it sideways.
const TINKLE: &[Keyframe] = &[
    advance(Frame {
        cgx: Some(30.0),
        cgy: Some(STD),
        cgz: Some(30.0),
        ..NEUTRAL
    }),
    advance(Frame {
        lift: lift(&[0], Height::Standard(-70.0)),
        feet: &[FootOverride { leg: 0, x: Some(Coord::Mm(0.0)), z: Some(Coord::Mm(30.0)) }],
        ..EMPTY
    }),
    hold(
        Frame {
            lift: lift(&[0], Height::Standard(-70.0)),
            feet: &[FootOverride { leg: 0, x: None, z: Some(Coord::Mm(120.0)) }],
            ..EMPTY
        },
        Hold {
            settles: true,
            repeat: None,
            cancel: Frame {
                feet: &[FootOverride { leg: 0, x: None, z: Some(Coord::Mm(20.0)) }],
                ..EMPTY
            },
            exit: 3
        }
    ),
    advance(Frame {
        cgy: Some(STD),
        lift: lift(&[0], DOWN),
        feet: &[FootOverride { leg: 0, x: Some(Coord::Rest), z: Some(Coord::Rest) }],
        ..EMPTY
    }),
    advance(Frame { cgx: Some(0.0), cgz: Some(0.0), cgy: Some(STD), ..EMPTY }),
    advance(EMPTY),
    terminal(EMPTY),
];

/// Lower the shoulders and stretch backwards.
const STRETCH: &[Keyframe] = &[
    advance(Frame { cgy: Some(STD), ..NEUTRAL }),
    advance(Frame { cgx: Some(-20.0), cgy: Some(Height::Fixed(110.0)), ..EMPTY }),
    advance(Frame {
        cgx: Some(-50.0),
        pitch: Some(-14.0),
        cgy: Some(Height::Fixed(120.0)),
        yaw: Some(0.0),
        roll: Some(0.0),
        ..EMPTY
    }),
    hold(
        Frame { yaw: Some(0.0), roll: Some(0.0), ..EMPTY },
        Hold {
            settles: true,
            repeat: None,
            cancel: Frame { pitch: Some(0.0), cgx: Some(-20.0), ..EMPTY },
            exit: 4
        }
    ),
    advance(Frame {
        cgx: Some(0.0),
        cgz: Some(0.0),
        yaw: Some(0.0),
        cgy: Some(STD),
        ..EMPTY
    }),
    terminal(EMPTY),
];

#[cfg(test)]
mod test {
    use super::*;

    /// Every move ends in a terminal keyframe and every jump stays in the
    /// table.
    #[test]
    fn test_tables_are_well_formed() {
        let moves = [
            SpecialMove::Sit,
            SpecialMove::Lay,
            SpecialMove::Paw,
            SpecialMove::Wiggle,
            SpecialMove::Tinkle,
            SpecialMove::Stretch,
        ];

        for m in moves.iter() {
            let kfs = keyframes(*m).unwrap();
            let last = kfs.len() - 1;

            assert_eq!(kfs[last].step, Step::Terminal, "{:?}", m);
            assert_eq!(
                kfs.iter().filter(|k| matches!(k.step, Step::Hold(_))).count(), 1,
                "{:?}", m
            );

            for (i, k) in kfs.iter().enumerate() {
                if let Step::Hold(h) = k.step {
                    assert!(h.exit > i && h.exit <= last);
                    assert!(h.repeat.map_or(true, |r| r < i));
                }
                if let Some(l) = k.frame.lift {
                    assert!(l.legs.iter().all(|n| *n < 4));
                }
                assert!(k.frame.feet.iter().all(|f| f.leg < 4));
            }
        }

        assert!(keyframes(SpecialMove::Up).is_none());
        assert!(keyframes(SpecialMove::JogOn).is_none());
    }
}
