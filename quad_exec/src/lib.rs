//! # Quadruped library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items defined
//! inside the quadruped crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data store - owns all module states and runs one control cycle
pub mod data_store;

/// Executable parameters
pub mod exec_params;

/// Gait control module - generates foot targets for each leg on each cycle
pub mod gait_ctrl;

/// Leg control module - converts foot targets into servo angles for each leg
pub mod leg_ctrl;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// A demanded foot position in the leg-local frame.
///
/// Units: millimeters,
/// Frame: Leg local (x fore-aft, y lateral from the hip pivot, z leg extension)
pub type FootTarget = nalgebra::Vector3<f64>;
