//! [`ServoDriver`] implementation for running without a driver board attached.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use std::collections::HashMap;

use super::{ServoDriver, ServoError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of channels on the simulated board, matching a PCA9685.
const NUM_CHANNELS: u8 = 16;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A simulated servo driver board which stores the last pulse width sent to each channel.
#[derive(Debug, Default)]
pub struct SimServoDriver {
    pulses_us: HashMap<u8, u16>,

    num_commands: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimServoDriver {
    /// The last pulse width commanded on a channel, or `None` if it was never commanded.
    pub fn pulse_us(&self, channel: u8) -> Option<u16> {
        self.pulses_us.get(&channel).copied()
    }

    /// Total number of pulse commands accepted since creation.
    pub fn num_commands(&self) -> u64 {
        self.num_commands
    }
}

impl ServoDriver for SimServoDriver {
    fn set_pulse_width_us(&mut self, channel: u8, pulse_us: u16) -> Result<(), ServoError> {
        if channel >= NUM_CHANNELS {
            return Err(ServoError::InvalidChannel(channel))
        }

        trace!("[sim] channel {} <- {} us", channel, pulse_us);

        self.pulses_us.insert(channel, pulse_us);
        self.num_commands += 1;

        Ok(())
    }
}
