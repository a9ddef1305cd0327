//! Single leg state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{LegConfig, LegGeometry, LegId};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One leg of the robot: its fixed geometry, calibration and wiring plus the
/// last successfully solved servo angles.
#[derive(Debug, Clone)]
pub struct Leg {
    pub(crate) id: LegId,

    pub(crate) geometry: LegGeometry,

    pub(crate) config: LegConfig,

    pub(crate) mirroring: Mirroring,

    pub(crate) angles: JointAngles,
}

/// Servo angles of the three joints of a leg.
///
/// Units: degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct JointAngles {
    pub hip_deg: f64,
    pub femur_deg: f64,
    pub tibia_deg: f64,
}

/// Signs applied to solved joint deflections to account for the mirrored
/// mounting of the servos around the chassis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mirroring {
    /// `+1` on front legs, `-1` on rear legs.
    pub hip_sign: f64,

    /// `-1` on left legs, `+1` on right legs.
    pub femur_tibia_sign: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl From<LegId> for Mirroring {
    fn from(id: LegId) -> Self {
        Self {
            hip_sign: if id.is_front() { 1.0 } else { -1.0 },
            femur_tibia_sign: if id.is_left() { -1.0 } else { 1.0 },
        }
    }
}

impl JointAngles {
    pub fn as_array(&self) -> [f64; 3] {
        [self.hip_deg, self.femur_deg, self.tibia_deg]
    }
}

impl Leg {
    /// Create a new leg, starting with every servo at its calibration centre.
    pub fn new(geometry: LegGeometry, config: LegConfig) -> Self {
        Self {
            id: config.id,
            geometry,
            config,
            mirroring: Mirroring::from(config.id),
            angles: JointAngles {
                hip_deg: config.centre_deg[0],
                femur_deg: config.centre_deg[1],
                tibia_deg: config.centre_deg[2],
            },
        }
    }

    /// Solve the leg for the given foot target.
    ///
    /// Returns `true` and updates the servo angles if the target is
    /// reachable. Returns `false` and leaves the angles untouched otherwise.
    pub fn calculate(&mut self, x: f64, y: f64, z: f64) -> bool {
        self.solve(x, y, z).is_ok()
    }

    pub fn id(&self) -> LegId {
        self.id
    }

    pub fn geometry(&self) -> &LegGeometry {
        &self.geometry
    }

    pub fn hip_channel(&self) -> u8 {
        self.config.channels[0]
    }

    pub fn femur_channel(&self) -> u8 {
        self.config.channels[1]
    }

    pub fn tibia_channel(&self) -> u8 {
        self.config.channels[2]
    }

    pub fn channels(&self) -> [u8; 3] {
        self.config.channels
    }

    pub fn hip_angle_deg(&self) -> f64 {
        self.angles.hip_deg
    }

    pub fn femur_angle_deg(&self) -> f64 {
        self.angles.femur_deg
    }

    pub fn tibia_angle_deg(&self) -> f64 {
        self.angles.tibia_deg
    }

    /// The last successfully solved angles, or the calibration centres if no
    /// solve has succeeded yet.
    pub fn angles(&self) -> JointAngles {
        self.angles
    }

    /// Calibration centres ordered hip, femur, tibia.
    pub fn centres_deg(&self) -> [f64; 3] {
        self.config.centre_deg
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mirroring() {
        assert_eq!(
            Mirroring::from(LegId::FrontLeft),
            Mirroring { hip_sign: 1.0, femur_tibia_sign: -1.0 }
        );
        assert_eq!(
            Mirroring::from(LegId::FrontRight),
            Mirroring { hip_sign: 1.0, femur_tibia_sign: 1.0 }
        );
        assert_eq!(
            Mirroring::from(LegId::BackLeft),
            Mirroring { hip_sign: -1.0, femur_tibia_sign: -1.0 }
        );
        assert_eq!(
            Mirroring::from(LegId::BackRight),
            Mirroring { hip_sign: -1.0, femur_tibia_sign: 1.0 }
        );
    }

    #[test]
    fn test_new_leg_at_centres() {
        let leg = Leg::new(
            LegGeometry::default(),
            LegConfig {
                id: LegId::BackRight,
                centre_deg: [135.0, 75.0, 134.0],
                channels: [9, 10, 11],
            },
        );

        assert_eq!(leg.hip_angle_deg(), 135.0);
        assert_eq!(leg.femur_angle_deg(), 75.0);
        assert_eq!(leg.tibia_angle_deg(), 134.0);
        assert_eq!(leg.hip_channel(), 9);
        assert_eq!(leg.femur_channel(), 10);
        assert_eq!(leg.tibia_channel(), 11);
    }
}
