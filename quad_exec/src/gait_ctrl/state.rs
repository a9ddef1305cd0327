//! Implementations for the GaitCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::Serialize;

// Internal
use super::{
    trajectory::{self, Phase},
    GaitCmd, GaitCtrlError, GaitPattern, LegRole, Params, Profile};
use crate::{
    leg_ctrl::{LegId, NUM_LEGS},
    FootTarget};
use util::{
    params,
    module::State,
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gait control module state
#[derive(Default)]
pub struct GaitCtrl {

    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    pub(crate) current_cmd: Option<GaitCmd>,

    pub(crate) walk: Option<WalkState>,
}

/// Position within the gait cycle of the pattern being walked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkState {
    pub pattern: GaitPattern,

    /// 0 while the leading legs swing, 1 while they are in stance.
    pub half_cycle: usize,

    /// Index of the next sample within the current half cycle.
    pub sample: usize,

    /// Number of complete gait cycles walked since the walk started.
    pub num_cycles: u64,
}

/// Input data to Gait Control.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputData {
    /// The command to be executed, or `None` if there is no new command on
    /// this cycle.
    pub cmd: Option<GaitCmd>
}

/// Output of GaitCtrl, the foot targets for LegCtrl.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OutputData {
    /// Target for each leg, `None` if the leg shall hold its position.
    pub targets: [Option<FootTarget>; NUM_LEGS]
}

/// Status report for GaitCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// True if a gait is being walked.
    pub walking: bool,

    /// True if the home position was commanded on this cycle.
    pub homing: bool,

    /// True if a gait cycle was completed on this cycle.
    pub cycle_complete: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for GaitCtrl {
    type InitData = &'static str;
    type InitError = GaitCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = GaitCtrlError;

    /// Initialise the GaitCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: Option<&Session>)
        -> Result<(), Self::InitError>
    {
        let params: Params = params::load(init_data)
            .map_err(GaitCtrlError::ParamLoadError)?;

        *self = Self::from_params(params)?;

        Ok(())
    }

    /// Perform cyclic processing of Gait Control.
    ///
    /// Produces the foot targets for this cycle and advances through the
    /// gait.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Clear the status report
        self.report = StatusReport::default();

        let mut output = OutputData::default();

        // Check to see if there's a new command
        if let Some(cmd) = input_data.cmd {
            debug!("New GaitCtrl GaitCmd::{:?}", cmd);
            self.current_cmd = Some(cmd);

            match cmd {
                GaitCmd::Home => {
                    self.walk = None;
                    self.report.homing = true;

                    let home = self.home();
                    output.targets = [Some(home); NUM_LEGS];

                    return Ok((output, self.report))
                },
                GaitCmd::Walk(pattern) => {
                    info!("Walking {:?}", pattern);
                    self.walk = Some(WalkState {
                        pattern,
                        half_cycle: 0,
                        sample: 0,
                        num_cycles: 0
                    });
                },
                GaitCmd::Stop => {
                    if self.walk.is_some() {
                        info!("Stopping");
                    }
                    self.walk = None;
                }
            }
        }

        if let Some(walk) = self.walk {
            output.targets = self.walk_targets(&walk);
            self.report.walking = true;
            self.advance();
        }

        Ok((output, self.report))
    }
}

impl GaitCtrl {

    /// Create a new GaitCtrl, not walking.
    pub fn from_params(params: Params) -> Result<Self, GaitCtrlError> {
        params.validate()?;

        Ok(Self {
            params,
            report: StatusReport::default(),
            current_cmd: None,
            walk: None
        })
    }

    /// The pattern to walk as given in the parameters.
    pub fn default_pattern(&self) -> GaitPattern {
        self.params.pattern
    }

    /// The home foot target.
    pub fn home(&self) -> FootTarget {
        FootTarget::from(self.params.home_pos_mm)
    }

    /// Current position in the gait, or `None` if not walking.
    pub fn walk_state(&self) -> Option<WalkState> {
        self.walk
    }

    /// Profile used by a pattern.
    pub fn profile(&self, pattern: GaitPattern) -> &Profile {
        match pattern {
            GaitPattern::Trot => &self.params.trot,
            GaitPattern::SingleLeg(_) | GaitPattern::Unison => &self.params.sweep,
        }
    }

    /// Foot targets for the current sample of the walk.
    fn walk_targets(&self, walk: &WalkState) -> [Option<FootTarget>; NUM_LEGS] {
        let profile = self.profile(walk.pattern);
        let y_mm = self.params.home_pos_mm[1];

        let leading_phase = match walk.half_cycle {
            0 => Phase::Swing,
            _ => Phase::Stance,
        };
        let trailing_phase = match leading_phase {
            Phase::Swing => Phase::Stance,
            Phase::Stance => Phase::Swing,
        };

        let mut targets = [None; NUM_LEGS];

        for id in LegId::ALL.iter() {
            let phase = match walk.pattern.leg_role(*id) {
                Some(LegRole::Leading) => leading_phase,
                Some(LegRole::Trailing) => trailing_phase,
                None => continue,
            };

            targets[id.index()] = Some(trajectory::sample(profile, phase, walk.sample, y_mm));
        }

        targets
    }

    /// Move the walk on to the next sample.
    fn advance(&mut self) {
        let n = match self.walk {
            Some(w) => trajectory::samples_per_phase(self.profile(w.pattern)),
            None => return
        };

        if let Some(ref mut walk) = self.walk {
            walk.sample += 1;

            if walk.sample >= n {
                walk.sample = 0;
                walk.half_cycle = (walk.half_cycle + 1) % 2;

                if walk.half_cycle == 0 {
                    walk.num_cycles += 1;
                    self.report.cycle_complete = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> Params {
        util::params::from_str(include_str!("../../../params/gait_ctrl.toml")).unwrap()
    }

    fn walk_cmd(pattern: GaitPattern) -> InputData {
        InputData { cmd: Some(GaitCmd::Walk(pattern)) }
    }

    #[test]
    fn test_idle_emits_nothing() {
        let mut gait = GaitCtrl::from_params(params()).unwrap();

        let (output, report) = gait.proc(&InputData::default()).unwrap();
        assert_eq!(output, OutputData::default());
        assert!(!report.walking);
    }

    #[test]
    fn test_home() {
        let mut gait = GaitCtrl::from_params(params()).unwrap();
        gait.proc(&walk_cmd(GaitPattern::Unison)).unwrap();

        let (output, report) = gait.proc(&InputData { cmd: Some(GaitCmd::Home) }).unwrap();
        let home = FootTarget::new(0.0, 39.3, 160.0);

        assert!(report.homing);
        assert!(output.targets.iter().all(|t| *t == Some(home)));
        assert_eq!(gait.walk_state(), None);

        // Home is emitted once, then the legs hold
        let (output, _) = gait.proc(&InputData::default()).unwrap();
        assert_eq!(output, OutputData::default());
    }

    #[test]
    fn test_single_leg_sweep() {
        let mut gait = GaitCtrl::from_params(params()).unwrap();
        let pattern = GaitPattern::SingleLeg(LegId::FrontRight);
        let p = params().sweep;
        let n = trajectory::samples_per_phase(&p);

        let (output, _) = gait.proc(&walk_cmd(pattern)).unwrap();
        assert_eq!(output.targets[LegId::FrontRight.index()], Some(FootTarget::new(-80.0, 39.3, 180.0)));
        for id in [LegId::FrontLeft, LegId::BackLeft, LegId::BackRight].iter() {
            assert_eq!(output.targets[id.index()], None);
        }

        // Rest of the swing, then the whole stance
        let mut xs = vec![output.targets[1].unwrap().x];
        let mut num_complete = 0;
        for _ in 1..(2 * n) {
            let (output, report) = gait.proc(&InputData::default()).unwrap();
            xs.push(output.targets[1].unwrap().x);
            if report.cycle_complete {
                num_complete += 1;
            }
        }

        assert_eq!(num_complete, 1);
        assert!((xs[n - 1] - 78.0).abs() < 1e-9);
        assert_eq!(xs[n], 80.0);
        assert!((xs[2 * n - 1] - -78.0).abs() < 1e-9);

        // Cycle repeats
        let (output, _) = gait.proc(&InputData::default()).unwrap();
        assert_eq!(output.targets[1].unwrap().x, -80.0);
    }

    #[test]
    fn test_unison_all_legs_identical() {
        let mut gait = GaitCtrl::from_params(params()).unwrap();
        let mut input = walk_cmd(GaitPattern::Unison);

        for _ in 0..200 {
            let (output, _) = gait.proc(&input).unwrap();
            input = InputData::default();

            let first = output.targets[0].unwrap();
            assert!(output.targets.iter().all(|t| *t == Some(first)));
        }
    }

    #[test]
    fn test_trot_pairs_alternate() {
        let mut gait = GaitCtrl::from_params(params()).unwrap();
        let p = params().trot;
        let n = trajectory::samples_per_phase(&p);
        let mut input = walk_cmd(GaitPattern::Trot);

        let fl = LegId::FrontLeft.index();
        let fr = LegId::FrontRight.index();
        let bl = LegId::BackLeft.index();
        let br = LegId::BackRight.index();

        for tick in 0..(4 * n) {
            let (output, _) = gait.proc(&input).unwrap();
            input = InputData::default();

            let t: Vec<FootTarget> = output.targets.iter().map(|t| t.unwrap()).collect();

            // Diagonal partners move together
            assert_eq!(t[fl], t[br]);
            assert_eq!(t[fr], t[bl]);

            let k = tick % n;
            let first_half = (tick / n) % 2 == 0;
            let (swing, stance) = if first_half { (t[fl], t[fr]) } else { (t[fr], t[fl]) };

            assert_eq!(swing, trajectory::sample(&p, Phase::Swing, k, 39.3));
            assert_eq!(stance, trajectory::sample(&p, Phase::Stance, k, 39.3));
            assert_eq!(stance.z, p.z_base_mm);
        }

        assert_eq!(gait.walk_state().unwrap().num_cycles, 2);
    }

    #[test]
    fn test_stop_holds() {
        let mut gait = GaitCtrl::from_params(params()).unwrap();
        gait.proc(&walk_cmd(GaitPattern::Trot)).unwrap();

        let (output, report) = gait.proc(&InputData { cmd: Some(GaitCmd::Stop) }).unwrap();
        assert_eq!(output, OutputData::default());
        assert!(!report.walking);
        assert_eq!(gait.walk_state(), None);
    }

    #[test]
    fn test_walk_restarts_cycle() {
        let mut gait = GaitCtrl::from_params(params()).unwrap();
        gait.proc(&walk_cmd(GaitPattern::Unison)).unwrap();
        gait.proc(&InputData::default()).unwrap();

        let (output, _) = gait.proc(&walk_cmd(GaitPattern::Unison)).unwrap();
        assert_eq!(output.targets[0].unwrap().x, -80.0);
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let mut p = params();
        p.sweep.x_step_mm = 0.0;

        assert!(matches!(
            GaitCtrl::from_params(p),
            Err(GaitCtrlError::InvalidProfile("sweep", _))
        ));

        let mut p = params();
        p.trot.x_min_mm = f64::NEG_INFINITY;

        assert!(matches!(
            GaitCtrl::from_params(p),
            Err(GaitCtrlError::InvalidProfile("trot", _))
        ));
    }
}
