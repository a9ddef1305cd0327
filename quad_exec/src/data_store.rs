//! # Data Store
//!
//! The data store holds the state of every module along with their latest inputs, outputs and
//! status reports, and runs a single control cycle: gait generation, leg solving and actuation.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{trace, warn};
use servo_ctrl::{ServoCtrl, ServoDriver};
use util::{archive::Archived, module::State};

use crate::{
    gait_ctrl::{self, GaitCmd, GaitCtrl},
    leg_ctrl::{self, LegCtrl, LegCtrlError, LegId},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct DataStore {
    // Gait control
    pub gait_ctrl: GaitCtrl,
    pub gait_ctrl_input: gait_ctrl::InputData,
    pub gait_ctrl_output: gait_ctrl::OutputData,
    pub gait_ctrl_status_rpt: gait_ctrl::StatusReport,

    // Leg control
    pub leg_ctrl: LegCtrl,
    pub leg_ctrl_output: leg_ctrl::OutputData,
    pub leg_ctrl_status_rpt: leg_ctrl::StatusReport,

    // Monitoring counters
    pub num_cycles: u64,
    pub num_ik_failures: u64,
    pub num_servo_errors: u64,
    pub num_consec_cycle_overruns: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DataStore {
    pub fn new(gait_ctrl: GaitCtrl, leg_ctrl: LegCtrl) -> Self {
        Self {
            gait_ctrl,
            gait_ctrl_input: gait_ctrl::InputData::default(),
            gait_ctrl_output: gait_ctrl::OutputData::default(),
            gait_ctrl_status_rpt: gait_ctrl::StatusReport::default(),
            leg_ctrl,
            leg_ctrl_output: leg_ctrl::OutputData::default(),
            leg_ctrl_status_rpt: leg_ctrl::StatusReport::default(),
            num_cycles: 0,
            num_ik_failures: 0,
            num_servo_errors: 0,
            num_consec_cycle_overruns: 0,
        }
    }

    /// Queue a command for GaitCtrl, executed on the next cycle.
    pub fn command(&mut self, cmd: GaitCmd) {
        self.gait_ctrl_input.cmd = Some(cmd);
    }

    /// Run one control cycle.
    ///
    /// Unreachable targets and servo errors are counted and logged but never stop the cycle, the
    /// affected joints keep their last commanded angles.
    pub fn cycle<D: ServoDriver>(
        &mut self,
        servo_ctrl: &mut ServoCtrl<D>
    ) -> Result<(), LegCtrlError> {

        // ---- GAIT ----

        let gait_input = self.gait_ctrl_input;
        self.gait_ctrl_input = gait_ctrl::InputData::default();

        match self.gait_ctrl.proc(&gait_input) {
            Ok((o, r)) => {
                self.gait_ctrl_output = o;
                self.gait_ctrl_status_rpt = r;
            },
            Err(e) => {
                warn!("Error during GaitCtrl processing: {}", e);
                self.gait_ctrl_output = gait_ctrl::OutputData::default();
            }
        }

        // ---- LEGS ----

        let leg_input = leg_ctrl::InputData {
            targets: self.gait_ctrl_output.targets
        };

        let (output, report) = self.leg_ctrl.proc(&leg_input)?;
        self.leg_ctrl_output = output;
        self.leg_ctrl_status_rpt = report;

        for i in 0..leg_ctrl::NUM_LEGS {
            if report.hip_unreachable[i] || report.leg_plane_unreachable[i] {
                self.num_ik_failures += 1;
            }
        }

        if let Err(e) = self.leg_ctrl.write() {
            warn!("Could not write LegCtrl archive: {}", e);
        }

        // ---- ACTUATION ----

        for (id, dems) in LegId::ALL.iter().zip(output.dems.iter()) {
            let dems = match dems {
                Some(d) => d,
                None => continue
            };

            for (channel, angle_deg) in dems.channels.iter().zip(dems.angles.as_array().iter()) {
                if let Err(e) = servo_ctrl.set_angle(*channel, *angle_deg) {
                    warn!("Could not set {:?} servo {} to {:.2} deg: {}", id, channel, angle_deg, e);
                    self.num_servo_errors += 1;
                }
            }
        }

        trace!("Cycle {} complete", self.num_cycles);

        self.num_cycles += 1;

        Ok(())
    }
}
