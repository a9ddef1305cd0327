//! Foot trajectory sampling
//!
//! A swing phase moves the foot from `x_min` to `x_max` along a half-sine
//! arc, lifting it by `step_height` at the midpoint. A stance phase moves the
//! planted foot back from `x_max` to `x_min` at `z_base`. Both phases have
//! the same number of samples, `x_step` apart.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::f64::consts::PI;

use super::Profile;
use crate::FootTarget;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance used when counting samples so that a range which is an exact
/// multiple of the step does not gain a sample from rounding.
const SAMPLE_COUNT_EPS: f64 = 1e-9;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Foot lifted and moving forward.
    Swing,
    /// Foot planted and moving back relative to the body.
    Stance,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Number of samples in each phase.
///
/// Samples start at one end of the range and stop before reaching the other,
/// so consecutive phases join without repeating a point.
pub fn samples_per_phase(profile: &Profile) -> usize {
    let range_mm = profile.x_max_mm - profile.x_min_mm;

    ((range_mm / profile.x_step_mm - SAMPLE_COUNT_EPS).ceil() as usize).max(1)
}

/// Leg extension during the swing at fore-aft position `x_mm`.
pub fn swing_z(profile: &Profile, x_mm: f64) -> f64 {
    let progress = (x_mm - profile.x_min_mm) / (profile.x_max_mm - profile.x_min_mm);
    let lift_mm = (progress * PI).sin() * profile.step_height_mm;

    profile.z_base_mm - lift_mm
}

/// The `k`th foot target of the given phase, at lateral offset `y_mm`.
pub fn sample(profile: &Profile, phase: Phase, k: usize, y_mm: f64) -> FootTarget {
    let dx_mm = k as f64 * profile.x_step_mm;

    match phase {
        Phase::Swing => {
            let x_mm = profile.x_min_mm + dx_mm;
            FootTarget::new(x_mm, y_mm, swing_z(profile, x_mm))
        }
        Phase::Stance => FootTarget::new(profile.x_max_mm - dx_mm, y_mm, profile.z_base_mm),
    }
}
