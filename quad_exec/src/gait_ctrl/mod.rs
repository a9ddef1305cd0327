//! Gait control module
//!
//! Generates a cyclic trajectory of foot targets for the legs. Each cycle of
//! a gait is made of two halves. In the first half the active legs swing
//! forward along a half-sine arc, in the second they are planted and pushed
//! back in a straight line. The trot gait runs the two diagonal leg pairs in
//! opposite halves.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod state;
pub mod trajectory;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during GaitCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum GaitCtrlError {
    #[error("Could not load the GaitCtrl parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid {0} gait profile: {1}")]
    InvalidProfile(&'static str, String),

    #[error("Home position must be finite, found {0:?}")]
    InvalidHome([f64; 3]),
}
