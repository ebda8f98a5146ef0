//! Implementations for the GaitCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use super::{MotionCommand, Params, Quadrant};
use crate::body_frame::BodyFrame;
use crate::leg_model::{JointAngles, LegId, NUM_LEGS};
use comms_if::tc::{GaitType, RotationDir, TrajectoryShape};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Runtime state of one leg, persisted across ticks.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LegState {
    /// Current rest position `(x, z)` of the foot.
    ///
    /// Units: millimeters
    pub rest: (f64, f64),

    /// Rest position to adopt at the start of the next swing.
    ///
    /// Units: millimeters
    pub pending_rest: (f64, f64),

    /// Foot position `(x, z)` while in stance, integrated every tick.
    ///
    /// Units: millimeters
    pub acc: (f64, f64),

    /// Last valid joint angle solution of the leg.
    pub angles: JointAngles,
}

/// Gait control module state
#[derive(Debug, Clone)]
pub struct GaitCtrl {
    pub(crate) params: Params,

    pub(crate) gait: GaitType,
    requested_gait: GaitType,

    pub(crate) shape: TrajectoryShape,

    requested: MotionCommand,
    pub(crate) committed: MotionCommand,

    /// Rotation step of the committed command.
    ///
    /// Units: radians
    pub(crate) rot_angle: f64,

    requested_rest_mm: [f64; 2],

    update_pending: bool,

    pub(crate) cont: usize,
    pub(crate) steps: usize,

    pub(crate) balancing: bool,
    stopped: bool,

    pub legs: [LegState; NUM_LEGS],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LegState {
    fn at_rest(rest: (f64, f64)) -> Self {
        Self {
            rest,
            pending_rest: rest,
            acc: rest,
            angles: JointAngles::default()
        }
    }
}

impl GaitCtrl {
    /// Create a new gait controller, stopped with all feet at rest in the
    /// dynamic gait.
    pub fn new(params: Params) -> Self {
        let gait = GaitType::Dynamic;
        let rest_mm = params.rest_offset_mm;
        let legs = LegId::ALL.map(|l| LegState::at_rest(rest_of(l, rest_mm)));

        Self {
            steps: params.steps(gait),
            params,
            gait,
            requested_gait: gait,
            shape: TrajectoryShape::Circular,
            requested: MotionCommand::default(),
            committed: MotionCommand::default(),
            rot_angle: 0.0,
            requested_rest_mm: rest_mm,
            update_pending: false,
            cont: 0,
            balancing: false,
            stopped: true,
            legs
        }
    }

    // ---- ACCESSORS ----

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Value of the step counter, always in `[0, steps)`.
    pub fn cont(&self) -> usize {
        self.cont
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn gait(&self) -> GaitType {
        self.gait
    }

    pub fn requested(&self) -> &MotionCommand {
        &self.requested
    }

    pub fn committed(&self) -> &MotionCommand {
        &self.committed
    }

    pub fn is_update_pending(&self) -> bool {
        self.update_pending
    }

    /// Forward centre of gravity offset of the current gait.
    pub fn default_cgx(&self) -> f64 {
        self.params.gait(self.gait).cgx_mm
    }

    // ---- REQUESTS ----

    /// Request walking towards `angle_deg`, or a stop.
    pub fn request_direction(&mut self, angle_deg: Option<f64>) {
        self.requested.set_direction(angle_deg);
        self.update_pending = true;
    }

    pub fn request_rotation(&mut self, dir: RotationDir) {
        self.requested.rotation = dir;
        self.update_pending = true;
    }

    /// Request a full stop of both walking and rotation.
    pub fn request_stop(&mut self) {
        self.requested.moving = false;
        self.requested.rotation = RotationDir::Stop;
        self.update_pending = true;
    }

    /// Turn jog mode on or off, and reset the direction to stepping on the
    /// spot (or stopping).
    pub fn set_jog(&mut self, on: bool) {
        self.requested.jog = on;
        self.request_direction(None);
    }

    /// Request a gait change, applied at the next gait change phase.
    pub fn request_gait(&mut self, gait: GaitType) {
        self.requested_gait = gait;
    }

    pub fn set_shape(&mut self, shape: TrajectoryShape) {
        self.shape = shape;
    }

    /// Request a new rest position for the feet. Each leg adopts it at the
    /// start of its next swing once the request has been committed.
    pub fn request_rest_offset(&mut self, rest_mm: [f64; 2]) {
        self.requested_rest_mm = rest_mm;
        self.update_pending = true;
    }

    // ---- CYCLE ----

    /// Advance the stepping cycle by one tick.
    ///
    /// Writes the gait's centre of gravity offsets into the body pose and
    /// returns the body-relative foot target of every leg.
    pub fn step(&mut self, body: &mut BodyFrame) -> [Vector3<f64>; NUM_LEGS] {
        let posture_change = self.requested.is_idle() && self.stopped;

        if self.gait == GaitType::Static {
            self.balance(body);
        }

        // Gait changes are applied at the phases where both gaits have the
        // same legs in the air, or at any time while stopped
        if (self.params.gait_change_phases.contains(&self.cont) || self.stopped)
            && self.gait != self.requested_gait
        {
            self.gait = self.requested_gait;
            self.steps = self.params.steps(self.gait);
            body.pose.cgx = self.default_cgx();
            debug!("Gait changed to {:?} ({} steps)", self.gait, self.steps);
        }
        self.stopped = false;

        let quadrant = match self.update_pending {
            true => Some(self.requested.quadrant(self.params.quadrant_half_angle_deg)),
            false => None
        };

        let order = self.params.gait(self.gait).leg_order;
        let points = self.params.points;

        let mut feet = [Vector3::zeros(); NUM_LEGS];
        let mut settled = [false; NUM_LEGS];

        for leg in LegId::ALL.iter() {
            let n = leg.index();
            let i = (self.cont + order[n] * points) % self.steps;

            if let Some(q) = quadrant {
                if self.update_pending && i == 1 && self.should_commit(*leg, q) {
                    self.commit(*leg);
                }
            }

            if !posture_change {
                body.pose.cgx = self.default_cgx();
            }

            let (foot, s) = self.trajectory(*leg, i, body);
            feet[n] = foot;
            settled[n] = s;
        }

        if settled.iter().all(|s| *s) {
            let idle = self.requested.is_idle();

            match self.gait {
                GaitType::Static => {
                    if (body.pose.cgz == 0.0 || posture_change) 
                        && idle 
                        && !self.update_pending 
                    {
                        self.stopped = true;
                        self.balancing = false;
                    }
                },
                GaitType::Dynamic => {
                    if idle {
                        self.stopped = true;
                    }
                }
            }

            if self.stopped {
                debug!("Gait stopped at cont {}", self.cont);
            }
        }

        trace!("Gait cont {}/{}, feet {:?}", self.cont, self.steps, feet);

        self.cont += 1;
        if self.cont >= self.steps {
            self.cont = 0;
        }

        feet
    }

    /// Whether the leg reaching phase 1 may commit the requested command.
    fn should_commit(&self, leg: LegId, q: Quadrant) -> bool {
        let in_fore_aft = (q.fore_aft >= 0 && leg.is_front())
            || (q.fore_aft <= 0 && !leg.is_front());
        let in_side = (q.side >= 0 && leg.is_right())
            || (q.side <= 0 && !leg.is_right());

        let rotation = match self.requested.rotation {
            RotationDir::Cw => leg.is_right(),
            RotationDir::Ccw => !leg.is_right(),
            RotationDir::Stop => false
        };

        (in_fore_aft && in_side) || rotation || self.requested.is_idle()
    }

    /// Adopt the requested command.
    fn commit(&mut self, leg: LegId) {
        self.update_pending = false;

        self.committed = self.requested;
        self.committed.moving = self.requested.moving || self.requested.jog;
        self.rot_angle = self.requested.rotation.sign() * self.params.rotation_step_rad;

        let rest_mm = self.requested_rest_mm;
        for l in LegId::ALL.iter() {
            self.legs[l.index()].pending_rest = rest_of(*l, rest_mm);
        }

        debug!("Motion command committed at leg {}: {:?}", leg, self.committed);
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Mirror the rest offset into the leg's quadrant.
fn rest_of(leg: LegId, rest_mm: [f64; 2]) -> (f64, f64) {
    (leg.fore() * rest_mm[0], leg.side() * rest_mm[1])
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::QuadParams;

    fn setup() -> (GaitCtrl, BodyFrame) {
        let p = QuadParams::builtin().unwrap();
        let gait = GaitCtrl::new(p.gait_ctrl);
        let mut body = BodyFrame::new(p.body_frame, p.leg_model.l1_mm);
        body.pose.cgx = gait.default_cgx();
        (gait, body)
    }

    #[test]
    fn test_counter_stays_in_cycle() {
        let (mut g, mut b) = setup();
        g.request_direction(Some(45.0));

        for n in 0..100 {
            // Switch gait half way through to cover both cycle lengths
            if n == 37 {
                g.request_gait(GaitType::Static);
            }
            g.step(&mut b);
            assert!(g.cont() < g.steps());
            assert!(g.steps() == 8 || g.steps() == 16);
        }

        assert_eq!(g.gait(), GaitType::Static);
        assert_eq!(g.steps(), 16);
    }

    #[test]
    fn test_gait_change_waits_for_phase() {
        let (mut g, mut b) = setup();
        g.request_direction(Some(360.0));
        g.step(&mut b);
        assert!(!g.is_stopped());

        // cont is now 1, the change must wait for cont 3
        g.request_gait(GaitType::Static);
        g.step(&mut b);
        g.step(&mut b);
        assert_eq!(g.gait(), GaitType::Dynamic);
        g.step(&mut b);
        assert_eq!(g.gait(), GaitType::Static);
        assert_eq!(b.pose.cgx, 15.0);
        assert_eq!(g.cont(), 4);
    }

    #[test]
    fn test_direction_latches_on_front_leg() {
        let (mut g, mut b) = setup();
        g.request_direction(Some(360.0));

        // cont 0: no leg at phase 1
        g.step(&mut b);
        assert!(g.is_update_pending());
        assert!(!g.committed().moving);

        // cont 1: leg 2 (front right) is at phase 1
        g.step(&mut b);
        assert!(!g.is_update_pending());
        assert!(g.committed().moving);
        assert_eq!(g.committed().director_deg, 360.0);
    }

    #[test]
    fn test_diagonal_waits_for_matching_leg() {
        let (mut g, mut b) = setup();
        g.request_direction(Some(135.0));

        // Back right is only matched by leg 1, which reaches phase 1 at
        // cont 5. At cont 1 legs 2 and 3 are at phase 1 and do not match.
        g.step(&mut b);
        g.step(&mut b);
        assert!(g.is_update_pending());

        for _ in 0..3 {
            g.step(&mut b);
        }
        assert!(g.is_update_pending());

        g.step(&mut b);
        assert!(!g.is_update_pending());
        assert_eq!(g.committed().director_deg, 135.0);
    }

    #[test]
    fn test_rotation_step() {
        let (mut g, mut b) = setup();
        g.request_rotation(RotationDir::Ccw);

        for _ in 0..8 {
            g.step(&mut b);
        }

        assert!(g.rot_angle < 0.0);
        assert!(!g.is_stopped());

        g.request_rotation(RotationDir::Stop);
        for _ in 0..24 {
            g.step(&mut b);
        }
        assert_eq!(g.rot_angle, 0.0);
        assert!(g.is_stopped());
    }

    /// A rest change only reaches a leg at the start of its swing.
    #[test]
    fn test_rest_latched_at_phase_zero() {
        let (mut g, mut b) = setup();
        g.request_direction(Some(360.0));
        g.step(&mut b);

        g.request_rest_offset([10.0, 5.0]);

        // cont 1 commits at leg 2, leg 2 is then at phase 1 so keeps its old
        // rest until its phase wraps back to 0
        g.step(&mut b);
        assert_eq!(g.legs[1].pending_rest, (-10.0, 5.0));
        assert_eq!(g.legs[1].rest, (0.0, 0.0));

        // Legs 1 and 4 reach phase 0 at cont 4, leg 2 and 3 at cont 0
        g.step(&mut b);
        g.step(&mut b);
        g.step(&mut b);
        assert_eq!(g.legs[0].rest, (10.0, 5.0));
        assert_eq!(g.legs[3].rest, (-10.0, -5.0));
        assert_eq!(g.legs[1].rest, (0.0, 0.0));

        for _ in 0..4 {
            g.step(&mut b);
        }
        assert_eq!(g.legs[1].rest, (-10.0, 5.0));
        assert_eq!(g.legs[2].rest, (10.0, -5.0));
    }

    #[test]
    fn test_static_gait_balances() {
        let (mut g, mut b) = setup();
        g.request_gait(GaitType::Static);
        g.request_direction(Some(90.0));

        let mut max_cgz: f64 = 0.0;
        for _ in 0..32 {
            g.step(&mut b);
            max_cgz = max_cgz.max(b.pose.cgz.abs());
            assert_eq!(b.pose.cgz, b.pose.cgz.trunc());
        }

        assert_eq!(g.gait(), GaitType::Static);
        assert!(g.balancing);
        assert!(max_cgz > 20.0 && max_cgz <= 30.0);
    }
}
