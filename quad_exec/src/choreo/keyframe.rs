//! Keyframe types

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A set of changes applied to the body pose and feet.
///
/// Angles are in degrees and distances in millimeters. Fields that are `None`
/// keep their previous value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub cgx: Option<f64>,
    pub cgy: Option<Height>,
    pub cgz: Option<f64>,
    pub roll: Option<f64>,
    pub pitch: Option<f64>,
    pub yaw: Option<f64>,

    /// Legs raised off the ground during this frame. Feet not listed are on
    /// the ground.
    pub lift: Option<Lift>,

    /// Overrides of the feet's `(x, z)` positions, indexed by leg index.
    pub feet: &'static [FootOverride],
}

/// One step of a special move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub frame: Frame,
    pub step: Step,
}

/// What happens after a keyframe has been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Go to the next keyframe on the next tick.
    Advance,

    /// Hold the pose until a different move is requested.
    Hold(Hold),

    /// The move is finished, start the requested move.
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hold {
    /// Whether the robot is stopped while holding, so the loop only ticks
    /// again on a new command.
    pub settles: bool,

    /// Keyframe to loop back to while holding.
    pub repeat: Option<usize>,

    /// Applied over the hold frame when the hold is cancelled.
    pub cancel: Frame,

    /// Keyframe the move continues from once cancelled.
    pub exit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lift {
    pub legs: &'static [usize],
    pub height: Height,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootOverride {
    pub leg: usize,
    pub x: Option<Coord>,
    pub z: Option<Coord>,
}

/// A height, either absolute or relative to the standard standing height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Height {
    Fixed(f64),
    Standard(f64),
}

/// A foot coordinate, either absolute or the leg's rest position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    Mm(f64),
    Rest,
}

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// A frame which changes nothing.
pub const EMPTY: Frame = Frame {
    cgx: None,
    cgy: None,
    cgz: None,
    roll: None,
    pitch: None,
    yaw: None,
    lift: None,
    feet: &[],
};

/// Centre of gravity and attitude back to zero, height unchanged.
pub const NEUTRAL: Frame = Frame {
    cgx: Some(0.0),
    cgz: Some(0.0),
    roll: Some(0.0),
    pitch: Some(0.0),
    yaw: Some(0.0),
    ..EMPTY
};

/// Standard standing height.
pub const STD: Height = Height::Standard(0.0);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Height {
    /// Resolve to millimeters given the standard height.
    pub fn resolve(&self, std_height_mm: f64) -> f64 {
        match self {
            Height::Fixed(h) => *h,
            Height::Standard(offset) => std_height_mm + offset
        }
    }
}

impl Lift {
    pub fn contains(&self, leg: usize) -> bool {
        self.legs.contains(&leg)
    }
}

pub const fn advance(frame: Frame) -> Keyframe {
    Keyframe { frame, step: Step::Advance }
}

pub const fn terminal(frame: Frame) -> Keyframe {
    Keyframe { frame, step: Step::Terminal }
}

pub const fn hold(frame: Frame, hold: Hold) -> Keyframe {
    Keyframe { frame, step: Step::Hold(hold) }
}

pub const fn lift(legs: &'static [usize], height: Height) -> Option<Lift> {
    Some(Lift { legs, height })
}
