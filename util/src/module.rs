//! Control module interface
//!
//! Every control module in `quad_exec` (`leg_ctrl`, `gait_ctrl`) is a struct
//! implementing [`State`]. The data store owns the module states and calls
//! `proc` once per control cycle, feeding one module's output into the next.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// State of a cyclically processed control module.
pub trait State {
    /// Data required during initialisation, usually the parameter file name.
    type InitData;
    /// An error which can occur during initialisation.
    type InitError;

    /// Data consumed by one cycle.
    type InputData;
    /// Demands produced by one cycle.
    type OutputData;
    /// Report on the last cycle, reset at the start of every cycle.
    type StatusReport;
    /// An error which can occur during cyclic processing.
    type ProcError;

    /// Initialise the module, replacing any previous state.
    ///
    /// Archives are only opened when a `session` is given, tests and tools
    /// pass `None`.
    fn init(&mut self, init_data: Self::InitData, session: Option<&Session>)
        -> Result<(), Self::InitError>;

    /// Process one control cycle.
    ///
    /// Faults confined to a single cycle are reported in the status report,
    /// an `Err` means the module cannot run at all.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
