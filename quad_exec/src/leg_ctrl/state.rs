//! Implementations for the LegCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{trace, warn};
use serde::Serialize;
use std::collections::HashSet;

// Internal
use super::{
    IkError, JointAngles, Leg, LegCtrlError, LegId, Params,
    NUM_JOINTS, NUM_LEGS};
use crate::FootTarget;
use util::{
    params,
    module::State,
    archive::{Archived, Archiver},
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Leg control module state
///
/// Owns one [`Leg`] per physical leg, in [`LegId::ALL`] order.
#[derive(Default)]
pub struct LegCtrl {

    pub(crate) legs: Vec<Leg>,

    pub(crate) report: StatusReport,

    arch: Archiver,
    arch_records: Vec<ArchRecord>,

    num_cycles: u64,
}

/// Input data to Leg Control.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputData {
    /// The foot target for each leg on this cycle, or `None` if the leg
    /// shall not move.
    pub targets: [Option<FootTarget>; NUM_LEGS]
}

/// Servo demands for a single leg.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegDems {
    /// Servo channels ordered hip, femur, tibia.
    pub channels: [u8; NUM_JOINTS],

    /// Servo angles.
    pub angles: JointAngles,
}

/// Output of LegCtrl that the servo controller must execute.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OutputData {
    /// Demands for each leg that was solved on this cycle. Legs with no
    /// target or with an unreachable target are `None` and keep their last
    /// commanded angles.
    pub dems: [Option<LegDems>; NUM_LEGS]
}

/// Status report for LegCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    pub solved: [bool; NUM_LEGS],
    pub hip_unreachable: [bool; NUM_LEGS],
    pub leg_plane_unreachable: [bool; NUM_LEGS],
}

/// One archived leg solution.
#[derive(Clone, Copy, Serialize, Debug)]
struct ArchRecord {
    cycle: u64,
    leg: LegId,
    x_mm: f64,
    y_mm: f64,
    z_mm: f64,
    solved: bool,
    hip_deg: f64,
    femur_deg: f64,
    tibia_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for LegCtrl {
    type InitData = &'static str;
    type InitError = LegCtrlError;
    
    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = LegCtrlError;

    /// Initialise the LegCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: Option<&Session>) 
        -> Result<(), Self::InitError> 
    {
        // Load the parameters
        let params: Params = params::load(init_data)
            .map_err(LegCtrlError::ParamLoadError)?;

        let archive = params.archive;

        *self = Self::from_params(params)?;

        if let (true, Some(session)) = (archive, session) {
            match Archiver::from_path(session, "leg_ctrl/legs.csv") {
                Ok(a) => self.arch = a,
                Err(e) => warn!("Could not create the LegCtrl archive: {}", e)
            }
        }

        Ok(())
    }

    /// Perform cyclic processing of Leg Control.
    ///
    /// Each leg with a target is solved in turn. A leg whose target can't be
    /// reached is reported and skipped, it never stops the other legs from
    /// being processed.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> 
    {
        if self.legs.len() != NUM_LEGS {
            return Err(LegCtrlError::NotInitialised)
        }

        // Clear the status report
        self.report = StatusReport::default();

        let mut output = OutputData::default();

        for (i, leg) in self.legs.iter_mut().enumerate() {
            let target = match input_data.targets[i] {
                Some(t) => t,
                None => continue
            };

            let result = leg.solve(target.x, target.y, target.z);

            match result {
                Ok(angles) => {
                    trace!(
                        "{:?} ({:.1}, {:.1}, {:.1}) -> {:?}", 
                        leg.id(), target.x, target.y, target.z, angles
                    );

                    self.report.solved[i] = true;
                    output.dems[i] = Some(LegDems {
                        channels: leg.channels(),
                        angles
                    });
                },
                Err(e) => {
                    warn!(
                        "{:?} cannot reach ({:.1}, {:.1}, {:.1}): {}",
                        leg.id(), target.x, target.y, target.z, e
                    );

                    match e {
                        IkError::HipUnreachable(_) => self.report.hip_unreachable[i] = true,
                        IkError::LegPlaneUnreachable(_) => 
                            self.report.leg_plane_unreachable[i] = true
                    }
                }
            }

            if self.arch.is_active() {
                let angles = leg.angles();
                self.arch_records.push(ArchRecord {
                    cycle: self.num_cycles,
                    leg: leg.id(),
                    x_mm: target.x,
                    y_mm: target.y,
                    z_mm: target.z,
                    solved: result.is_ok(),
                    hip_deg: angles.hip_deg,
                    femur_deg: angles.femur_deg,
                    tibia_deg: angles.tibia_deg
                });
            }
        }

        self.num_cycles += 1;

        Ok((output, self.report))
    }
}

impl Archived for LegCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        for record in self.arch_records.drain(..) {
            self.arch.serialise(record)?;
        }

        Ok(())
    }
}

impl LegCtrl {

    /// Build the leg registry from parameters.
    ///
    /// Every leg must be configured exactly once and no servo channel may be
    /// shared between joints.
    pub fn from_params(params: Params) -> Result<Self, LegCtrlError> {
        let geom = params.geometry;

        if !(geom.l1_hip_mm >= 0.0 && geom.l2_femur_mm > 0.0 && geom.l3_tibia_mm > 0.0) {
            return Err(LegCtrlError::InvalidGeometry(format!(
                "link lengths must be positive, found L1 = {}, L2 = {}, L3 = {}",
                geom.l1_hip_mm, geom.l2_femur_mm, geom.l3_tibia_mm
            )))
        }

        let mut channels = HashSet::new();
        for cfg in params.legs.iter() {
            for ch in cfg.channels.iter() {
                if !channels.insert(*ch) {
                    return Err(LegCtrlError::DuplicateChannel(*ch))
                }
            }
        }

        let mut legs = Vec::with_capacity(NUM_LEGS);
        for id in LegId::ALL.iter() {
            let mut cfgs = params.legs.iter().filter(|c| c.id == *id);

            let cfg = cfgs.next().ok_or(LegCtrlError::MissingLeg(*id))?;
            if cfgs.next().is_some() {
                return Err(LegCtrlError::DuplicateLeg(*id))
            }

            legs.push(Leg::new(geom, *cfg));
        }

        Ok(Self {
            legs,
            ..Self::default()
        })
    }

    /// Get a leg from the registry.
    ///
    /// # Panics
    /// - If the module has not been initialised.
    pub fn leg(&self, id: LegId) -> &Leg {
        &self.legs[id.index()]
    }

    /// Current angles of every leg.
    pub fn angles(&self) -> [JointAngles; NUM_LEGS] {
        let mut angles = [JointAngles::default(); NUM_LEGS];
        for (a, leg) in angles.iter_mut().zip(self.legs.iter()) {
            *a = leg.angles();
        }
        angles
    }

    /// Demands holding every leg at its current angles.
    pub fn current_dems(&self) -> OutputData {
        let mut output = OutputData::default();
        for (d, leg) in output.dems.iter_mut().zip(self.legs.iter()) {
            *d = Some(LegDems {
                channels: leg.channels(),
                angles: leg.angles()
            });
        }
        output
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::leg_ctrl::{LegConfig, LegGeometry};

    fn test_params() -> Params {
        let legs = LegId::ALL
            .iter()
            .enumerate()
            .map(|(i, id)| LegConfig {
                id: *id,
                centre_deg: [135.0, 75.0, 134.0],
                channels: [3 * i as u8, 3 * i as u8 + 1, 3 * i as u8 + 2],
            })
            .collect();

        Params {
            geometry: LegGeometry::default(),
            legs,
            archive: false
        }
    }

    #[test]
    fn test_from_params() {
        let ctrl = LegCtrl::from_params(test_params()).unwrap();

        for id in LegId::ALL.iter() {
            assert_eq!(ctrl.leg(*id).id(), *id);
        }
        assert_eq!(ctrl.leg(LegId::BackLeft).channels(), [6, 7, 8]);
    }

    #[test]
    fn test_invalid_params() {
        let mut p = test_params();
        p.legs.pop();
        assert!(matches!(
            LegCtrl::from_params(p),
            Err(LegCtrlError::MissingLeg(LegId::BackRight))
        ));

        let mut p = test_params();
        p.legs[1].channels[2] = 0;
        assert!(matches!(
            LegCtrl::from_params(p),
            Err(LegCtrlError::DuplicateChannel(0))
        ));

        let mut p = test_params();
        let mut dup = p.legs[0];
        dup.channels = [12, 13, 14];
        p.legs.push(dup);
        assert!(matches!(
            LegCtrl::from_params(p),
            Err(LegCtrlError::DuplicateLeg(LegId::FrontLeft))
        ));

        let mut p = test_params();
        p.geometry.l2_femur_mm = 0.0;
        assert!(matches!(
            LegCtrl::from_params(p),
            Err(LegCtrlError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_proc_continues_past_failures() {
        let mut ctrl = LegCtrl::from_params(test_params()).unwrap();
        let home = FootTarget::new(0.0, 39.3, 160.0);

        let input = InputData {
            targets: [
                Some(home),
                Some(FootTarget::new(0.0, 0.0, 0.0)),
                Some(FootTarget::new(300.0, 39.3, 160.0)),
                None
            ]
        };

        let (output, report) = ctrl.proc(&input).unwrap();

        assert_eq!(report.solved, [true, false, false, false]);
        assert_eq!(report.hip_unreachable, [false, true, false, false]);
        assert_eq!(report.leg_plane_unreachable, [false, false, true, false]);

        let fl = output.dems[0].unwrap();
        assert_eq!(fl.channels, [0, 1, 2]);
        assert_eq!(fl.angles, ctrl.leg(LegId::FrontLeft).angles());
        assert!(output.dems[1..].iter().all(|d| d.is_none()));

        // Failed legs stay at their centres
        assert_eq!(ctrl.leg(LegId::FrontRight).angles().as_array(), [135.0, 75.0, 134.0]);
        assert_eq!(ctrl.leg(LegId::BackLeft).angles().as_array(), [135.0, 75.0, 134.0]);
    }

    #[test]
    fn test_proc_uninitialised() {
        let mut ctrl = LegCtrl::default();
        assert!(ctrl.proc(&InputData::default()).is_err());
    }

    #[test]
    fn test_current_dems() {
        let ctrl = LegCtrl::from_params(test_params()).unwrap();
        let dems = ctrl.current_dems();

        for (i, d) in dems.dems.iter().enumerate() {
            let d = d.unwrap();
            assert_eq!(d.channels, ctrl.legs[i].channels());
            assert_eq!(d.angles, ctrl.legs[i].angles());
        }
    }

    #[test]
    fn test_params_file() {
        let p: Params = util::params::from_str(
            include_str!("../../../params/leg_ctrl.toml")
        ).unwrap();

        assert_eq!(p.geometry, LegGeometry::default());
        assert!(LegCtrl::from_params(p).is_ok());
    }
}
