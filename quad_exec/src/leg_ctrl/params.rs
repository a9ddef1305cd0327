//! Parameters structure for LegCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use super::LegId;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Leg control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    /// Geometry shared by all legs.
    pub geometry: LegGeometry,

    /// Calibration and wiring of each physical leg.
    pub legs: Vec<LegConfig>,

    /// If true the result of each leg solution is written to the session
    /// archive.
    #[serde(default)]
    pub archive: bool,
}

/// Link lengths and mechanical offsets, identical for every leg.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LegGeometry {

    /// Lateral offset between the hip pivot and the femur pivot (L1).
    ///
    /// Units: millimeters
    pub l1_hip_mm: f64,

    /// Length of the femur (L2).
    ///
    /// Units: millimeters
    pub l2_femur_mm: f64,

    /// Length of the tibia (L3).
    ///
    /// Units: millimeters
    pub l3_tibia_mm: f64,

    /// Fixed offset of the tibia linkage relative to the femur.
    ///
    /// Units: degrees
    pub tibia_offset_deg: f64,

    /// How the hip servo angle is reported.
    #[serde(default)]
    pub hip_report: HipReport,
}

/// Calibration and wiring for one physical leg.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LegConfig {

    /// Which leg this is.
    pub id: LegId,

    /// Servo command matching the logical zero of each joint, ordered hip,
    /// femur, tibia.
    ///
    /// Units: degrees
    pub centre_deg: [f64; 3],

    /// Servo driver channel of each joint, ordered hip, femur, tibia.
    pub channels: [u8; 3],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Source of the reported hip servo angle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum HipReport {
    /// The hip servo is held at `centre + offset` on front legs and
    /// `centre - offset` on rear legs whatever the target. The existing servo
    /// calibration was taken this way, so this is the default.
    ///
    /// Units: degrees
    FixedOffset { offset_deg: f64 },

    /// The solved hip swing angle is applied about the centre.
    Solved,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LegGeometry {
    /// Maximum distance from the femur pivot to the foot.
    pub fn max_reach_mm(&self) -> f64 {
        self.l2_femur_mm + self.l3_tibia_mm
    }
}

impl Default for LegGeometry {
    fn default() -> Self {
        Self {
            l1_hip_mm: 39.3,
            l2_femur_mm: 109.5,
            l3_tibia_mm: 119.9,
            tibia_offset_deg: 5.88,
            hip_report: HipReport::default(),
        }
    }
}

impl Default for HipReport {
    fn default() -> Self {
        HipReport::FixedOffset { offset_deg: 4.0 }
    }
}
