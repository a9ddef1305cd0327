//! Leg control module
//!
//! Holds one inverse kinematics solver per physical leg and converts foot
//! targets into servo angle demands.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod inverse_kinematics;
mod leg;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
pub use leg::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of legs on the robot.
pub const NUM_LEGS: usize = 4;

/// The number of joints (and servos) in each leg.
pub const NUM_JOINTS: usize = 3;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Identifies one of the four physical legs.
///
/// The declaration order is the order in which legs are processed on each
/// cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegId {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

/// One of the two diagonal leg pairs used by the trot gait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagonalPair {
    /// Front left and back right.
    A,
    /// Front right and back left.
    B,
}

/// Possible errors from the inverse kinematics of a single leg.
///
/// Both are transient: the leg keeps its last good angles and the next
/// target is tried on the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum IkError {
    #[error("Target is inside the hip offset (y^2 + z^2 = {0:.2} mm^2 is less than L1^2)")]
    HipUnreachable(f64),

    #[error("Target is out of reach of the femur and tibia (distance {0:.2} mm)")]
    LegPlaneUnreachable(f64),
}

/// Possible errors that can occur during LegCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum LegCtrlError {
    #[error("Could not load the LegCtrl parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("LegCtrl has not been initialised")]
    NotInitialised,

    #[error("Leg {0:?} is configured more than once")]
    DuplicateLeg(LegId),

    #[error("Leg {0:?} is missing from the configuration")]
    MissingLeg(LegId),

    #[error("Servo channel {0} is assigned to more than one joint")]
    DuplicateChannel(u8),

    #[error("Invalid leg geometry: {0}")]
    InvalidGeometry(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LegId {
    /// All legs in processing order.
    pub const ALL: [LegId; NUM_LEGS] = [
        LegId::FrontLeft,
        LegId::FrontRight,
        LegId::BackLeft,
        LegId::BackRight,
    ];

    /// Index of the leg in arrays ordered as [`LegId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_front(self) -> bool {
        matches!(self, LegId::FrontLeft | LegId::FrontRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, LegId::FrontLeft | LegId::BackLeft)
    }

    /// The diagonal pair this leg belongs to.
    pub fn diagonal_pair(self) -> DiagonalPair {
        match self {
            LegId::FrontLeft | LegId::BackRight => DiagonalPair::A,
            LegId::FrontRight | LegId::BackLeft => DiagonalPair::B,
        }
    }
}
