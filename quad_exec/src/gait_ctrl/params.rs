//! Parameters structure for GaitCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::{GaitCtrlError, GaitPattern};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Gait control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    /// Home foot position, also the lateral offset (y) used by every gait.
    ///
    /// Units: millimeters,
    /// Frame: Leg local
    pub home_pos_mm: [f64; 3],

    /// Pattern walked after homing.
    pub pattern: GaitPattern,

    /// Profile used by the single leg and unison sweeps.
    pub sweep: Profile,

    /// Profile used by the trot.
    pub trot: Profile,
}

/// Shape of the foot trajectory over one gait cycle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Profile {

    /// Rearmost foot position.
    ///
    /// Units: millimeters
    pub x_min_mm: f64,

    /// Foremost foot position.
    ///
    /// Units: millimeters
    pub x_max_mm: f64,

    /// Leg extension with the foot on the ground.
    ///
    /// Units: millimeters
    pub z_base_mm: f64,

    /// Ground clearance at the middle of the swing.
    ///
    /// Units: millimeters
    pub step_height_mm: f64,

    /// Fore-aft distance travelled by the foot on each control cycle.
    ///
    /// Units: millimeters
    pub x_step_mm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check both profiles.
    pub fn validate(&self) -> Result<(), GaitCtrlError> {
        if !self.home_pos_mm.iter().all(|v| v.is_finite()) {
            return Err(GaitCtrlError::InvalidHome(self.home_pos_mm))
        }

        self.sweep.validate().map_err(|e| GaitCtrlError::InvalidProfile("sweep", e))?;
        self.trot.validate().map_err(|e| GaitCtrlError::InvalidProfile("trot", e))
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            home_pos_mm: [0.0, 39.3, 160.0],
            pattern: GaitPattern::Trot,
            sweep: Profile {
                x_min_mm: -80.0,
                x_max_mm: 80.0,
                z_base_mm: 180.0,
                step_height_mm: 60.0,
                x_step_mm: 2.0,
            },
            trot: Profile {
                x_min_mm: -40.0,
                x_max_mm: 40.0,
                z_base_mm: 180.0,
                step_height_mm: 40.0,
                x_step_mm: 4.0,
            },
        }
    }
}

impl Profile {
    fn validate(&self) -> Result<(), String> {
        let fields = [
            ("x_min_mm", self.x_min_mm),
            ("x_max_mm", self.x_max_mm),
            ("z_base_mm", self.z_base_mm),
            ("step_height_mm", self.step_height_mm),
            ("x_step_mm", self.x_step_mm),
        ];
        for (name, value) in fields.iter() {
            if !value.is_finite() {
                return Err(format!("{} must be finite, found {}", name, value))
            }
        }

        if !(self.x_step_mm > 0.0) {
            return Err(format!("x_step_mm must be positive, found {}", self.x_step_mm))
        }
        if !(self.x_max_mm > self.x_min_mm) {
            return Err(format!(
                "x_max_mm ({}) must be greater than x_min_mm ({})",
                self.x_max_mm, self.x_min_mm
            ))
        }
        if !(self.step_height_mm >= 0.0) {
            return Err(format!(
                "step_height_mm must not be negative, found {}", self.step_height_mm
            ))
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn profile() -> Profile {
        Profile {
            x_min_mm: -80.0,
            x_max_mm: 80.0,
            z_base_mm: 180.0,
            step_height_mm: 60.0,
            x_step_mm: 2.0,
        }
    }

    #[test]
    fn test_profile_validation() {
        assert!(profile().validate().is_ok());

        assert!(Profile { x_step_mm: 0.0, ..profile() }.validate().is_err());
        assert!(Profile { x_step_mm: f64::NAN, ..profile() }.validate().is_err());
        assert!(Profile { x_max_mm: -80.0, ..profile() }.validate().is_err());
        assert!(Profile { step_height_mm: -1.0, ..profile() }.validate().is_err());
        assert!(Profile { z_base_mm: f64::INFINITY, ..profile() }.validate().is_err());
    }

    #[test]
    fn test_non_finite_range_rejected() {
        assert!(Profile { x_min_mm: f64::NEG_INFINITY, ..profile() }.validate().is_err());
        assert!(Profile { x_max_mm: f64::INFINITY, ..profile() }.validate().is_err());
        assert!(Profile { x_min_mm: f64::NAN, ..profile() }.validate().is_err());
        assert!(Profile { step_height_mm: f64::INFINITY, ..profile() }.validate().is_err());
        assert!(Profile { x_step_mm: f64::INFINITY, ..profile() }.validate().is_err());
    }

    #[test]
    fn test_non_finite_home_rejected() {
        let p = Params { home_pos_mm: [0.0, f64::NAN, 160.0], ..Params::default() };
        assert!(matches!(p.validate(), Err(GaitCtrlError::InvalidHome(_))));
    }

    #[test]
    fn test_params_file() {
        let p: Params = util::params::from_str(
            include_str!("../../../params/gait_ctrl.toml")
        ).unwrap();

        assert!(p.validate().is_ok());
        assert_eq!(p.sweep, profile());
        assert_eq!(p.home_pos_mm, [0.0, 39.3, 160.0]);

        let d = Params::default();
        assert_eq!(p.trot, d.trot);
        assert_eq!(p.pattern, d.pattern);
    }

    #[test]
    fn test_invalid_params_named() {
        let p = Params {
            home_pos_mm: [0.0, 39.3, 160.0],
            pattern: GaitPattern::Trot,
            sweep: profile(),
            trot: Profile { x_step_mm: -1.0, ..profile() },
        };

        assert!(matches!(p.validate(), Err(GaitCtrlError::InvalidProfile("trot", _))));
    }
}
