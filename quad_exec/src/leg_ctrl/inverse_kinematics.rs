//! Leg inverse kinematics calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::f64::consts::FRAC_PI_2;

// Internal imports
use super::*;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Leg {
    /// Perform the inverse kinematics calculations.
    ///
    /// The problem is split in two. In the hip plane the lateral offset `y`
    /// and extension `z` give the hip swing angle. In the leg plane the
    /// extension `z` and fore-aft offset `x` form a triangle with the femur
    /// and tibia, which is solved with the law of cosines for the knee and
    /// the law of sines for the femur.
    ///
    /// The tibia servo drives the knee through a linkage coupled to the
    /// femur, so the reported tibia angle includes the femur angle and the
    /// fixed linkage offset.
    ///
    /// On error the current angles are left untouched.
    pub fn solve(&mut self, x: f64, y: f64, z: f64) -> Result<JointAngles, IkError> {
        let geom = &self.geometry;
        let [hip_centre_deg, femur_centre_deg, tibia_centre_deg] = self.config.centre_deg;

        // ---- HIP PLANE ----

        // Negated comparisons so that NaN targets are rejected
        let hip_plane_sq_mm2 = y.powi(2) + z.powi(2);
        if !(hip_plane_sq_mm2 >= geom.l1_hip_mm.powi(2)) {
            return Err(IkError::HipUnreachable(hip_plane_sq_mm2));
        }

        let hip_rad = y.atan2(z);

        let hip_deg = match geom.hip_report {
            HipReport::FixedOffset { offset_deg } => {
                hip_centre_deg + self.mirroring.hip_sign * offset_deg
            }
            HipReport::Solved => hip_centre_deg + self.mirroring.hip_sign * hip_rad.to_degrees(),
        };

        // ---- LEG PLANE ----

        let leg_ext_mm = z;
        let dist_mm = (leg_ext_mm.powi(2) + x.powi(2)).sqrt();
        if !(dist_mm <= geom.max_reach_mm()) || dist_mm <= f64::EPSILON {
            return Err(IkError::LegPlaneUnreachable(dist_mm));
        }

        let l2 = geom.l2_femur_mm;
        let l3 = geom.l3_tibia_mm;

        // Knee, rounding at full extension can push the cosine just past -1. Targets closer
        // than |L3 - L2| push it past +1 and solve as the fully folded knee.
        let cos_knee = ((dist_mm.powi(2) - l2.powi(2) - l3.powi(2)) / (-2.0 * l2 * l3))
            .clamp(-1.0, 1.0);
        let knee_rad = cos_knee.acos();

        // Femur
        let alpha_rad = x.atan2(leg_ext_mm);
        let beta_rad = (l3 * knee_rad.sin() / dist_mm).clamp(-1.0, 1.0).asin();
        let femur_rad = FRAC_PI_2 - (beta_rad - alpha_rad);
        let femur_deg = femur_rad.to_degrees();

        // Tibia, through the femur-coupled linkage
        let phi_deg = knee_rad.to_degrees() - geom.tibia_offset_deg;
        let tibia_deg = 90.0 - phi_deg + femur_deg;

        self.angles = JointAngles {
            hip_deg,
            femur_deg: femur_centre_deg + self.mirroring.femur_tibia_sign * femur_deg,
            tibia_deg: tibia_centre_deg + self.mirroring.femur_tibia_sign * tibia_deg,
        };

        Ok(self.angles)
    }
}
