//! Special move choreography
//!
//! Special moves are scripted sequences of body poses and foot placements,
//! played back one keyframe per tick. Most moves ramp into a pose, hold it
//! until another move is requested, then ramp back out to standing.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod keyframe;
mod moves;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use nalgebra::Vector3;

// Internal
use crate::body_frame::BodyFrame;
use crate::gait_ctrl::LegState;
use crate::leg_model::NUM_LEGS;
use comms_if::tc::SpecialMove;
use keyframe::{Coord, Frame, Lift, Step};
pub use moves::keyframes;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Special move choreographer.
#[derive(Debug, Clone)]
pub struct Choreo {
    current: SpecialMove,
    requested: SpecialMove,
    index: usize,
    stopped: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Choreo {
    fn default() -> Self {
        Self {
            current: SpecialMove::Up,
            requested: SpecialMove::Up,
            index: 0,
            stopped: true
        }
    }
}

impl Choreo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The move being played and the keyframe it will play next.
    pub fn state(&self) -> (SpecialMove, usize) {
        (self.current, self.index)
    }

    pub fn current(&self) -> SpecialMove {
        self.current
    }

    pub fn requested(&self) -> SpecialMove {
        self.requested
    }

    /// Whether the current move is played by the choreographer, rather than
    /// the robot walking.
    pub fn is_active(&self) -> bool {
        keyframes(self.current).is_some()
    }

    /// Whether the current move is holding a settled pose.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Request a move. It starts once the gait has stopped, or once the
    /// current move has finished.
    ///
    /// Returns `false` if the move was already requested.
    pub fn request(&mut self, special: SpecialMove) -> bool {
        if self.requested == special {
            return false;
        }
        self.requested = special;
        true
    }

    /// Make the requested move current. Called when the gait stops.
    ///
    /// A choreographed move is no longer stopped once latched, so the loop
    /// keeps ticking until it settles.
    pub fn latch(&mut self) {
        if self.current != self.requested {
            debug!("Special move {:?} latched", self.requested);
        }
        self.current = self.requested;
        self.index = 0;

        if self.is_active() {
            self.stopped = false;
        }
    }

    /// Play the next keyframe of the current move.
    ///
    /// Writes the body pose and the feet's stance positions, and returns the
    /// body-relative foot target of every leg.
    pub fn step(
        &mut self,
        body: &mut BodyFrame,
        legs: &mut [LegState; NUM_LEGS]
    ) -> [Vector3<f64>; NUM_LEGS] {
        let std_height = body.std_height_mm();

        let kfs = match keyframes(self.current) {
            Some(k) => k,
            None => {
                self.current = SpecialMove::Up;
                self.requested = SpecialMove::Up;
                self.index = 0;
                return feet(legs, None, std_height);
            }
        };

        let index = self.index.min(kfs.len() - 1);
        let kf = &kfs[index];
        trace!("{:?} keyframe {}", self.current, index);

        if index == 0 {
            self.stopped = false;
        }

        apply(&kf.frame, body, legs);
        let mut lift = kf.frame.lift;

        match kf.step {
            Step::Advance => self.index = index + 1,
            Step::Hold(hold) => {
                if self.requested != self.current {
                    apply(&hold.cancel, body, legs);
                    if hold.cancel.lift.is_some() {
                        lift = hold.cancel.lift;
                    }
                    self.index = hold.exit;
                    self.stopped = false;
                    debug!(
                        "{:?} hold cancelled for {:?}", 
                        self.current, self.requested
                    );
                }
                else {
                    self.stopped = hold.settles;
                    if let Some(r) = hold.repeat {
                        self.index = r;
                    }
                }
            },
            Step::Terminal => {
                debug!("{:?} finished, next {:?}", self.current, self.requested);
                self.current = self.requested;
                self.index = 0;
                if self.current == SpecialMove::Up {
                    self.stopped = true;
                }
            }
        }

        feet(legs, lift, std_height)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn apply(frame: &Frame, body: &mut BodyFrame, legs: &mut [LegState; NUM_LEGS]) {
    let std_height = body.std_height_mm();
    let pose = &mut body.pose;

    if let Some(v) = frame.cgx { pose.cgx = v; }
    if let Some(h) = frame.cgy { pose.cgy = h.resolve(std_height); }
    if let Some(v) = frame.cgz { pose.cgz = v; }
    if let Some(v) = frame.roll { pose.roll = v.to_radians(); }
    if let Some(v) = frame.pitch { pose.pitch = v.to_radians(); }
    if let Some(v) = frame.yaw { pose.yaw = v.to_radians(); }

    for o in frame.feet.iter() {
        let leg = &mut legs[o.leg];
        if let Some(x) = o.x {
            leg.acc.0 = match x {
                Coord::Mm(v) => v,
                Coord::Rest => leg.rest.0
            };
        }
        if let Some(z) = o.z {
            leg.acc.1 = match z {
                Coord::Mm(v) => v,
                Coord::Rest => leg.rest.1
            };
        }
    }
}

fn feet(
    legs: &[LegState; NUM_LEGS],
    lift: Option<Lift>,
    std_height: f64
) -> [Vector3<f64>; NUM_LEGS] {
    let mut feet = [Vector3::zeros(); NUM_LEGS];

    for (n, leg) in legs.iter().enumerate() {
        let y = match lift {
            Some(l) if l.contains(n) => l.height.resolve(std_height),
            _ => 0.0
        };
        feet[n] = Vector3::new(leg.acc.0, y, leg.acc.1);
    }

    feet
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
