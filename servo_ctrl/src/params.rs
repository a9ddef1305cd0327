//! # Servo Controller Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use super::{ServoError, ANGLE_SCALE};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters describing the servo driver board and the servos attached to it.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    /// I2C address of the driver board
    pub board_address: u8,

    /// Frequency of the driver board's oscillator.
    ///
    /// Units: hertz
    pub oscillator_freq_hz: f64,

    /// Frequency of the PWM signal sent to the servos.
    ///
    /// Units: hertz
    pub pwm_freq_hz: f64,

    /// Pulse width commanding the servo to 0 degrees.
    ///
    /// Units: microseconds
    pub min_pulse_us: u16,

    /// Pulse width commanding the servo to `max_angle_deg`.
    ///
    /// Units: microseconds
    pub max_pulse_us: u16,

    /// Full travel of the servos.
    ///
    /// Units: degrees
    pub max_angle_deg: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            board_address: 0x40,
            oscillator_freq_hz: 27_000_000.0,
            pwm_freq_hz: 50.0,
            min_pulse_us: 500,
            max_pulse_us: 2500,
            max_angle_deg: 270.0,
        }
    }
}

impl Params {
    /// Check the angle and pulse ranges describe a usable mapping.
    pub fn validate(&self) -> Result<(), ServoError> {
        if !self.max_angle_deg.is_finite() || !((self.max_angle_deg * ANGLE_SCALE) as i64 > 0) {
            return Err(ServoError::InvalidParams(format!(
                "max_angle_deg must be positive and finite, found {}", self.max_angle_deg
            )))
        }
        if !(self.min_pulse_us < self.max_pulse_us) {
            return Err(ServoError::InvalidParams(format!(
                "min_pulse_us ({}) must be less than max_pulse_us ({})",
                self.min_pulse_us, self.max_pulse_us
            )))
        }
        if !(self.pwm_freq_hz > 0.0 && self.pwm_freq_hz.is_finite()) {
            return Err(ServoError::InvalidParams(format!(
                "pwm_freq_hz must be positive and finite, found {}", self.pwm_freq_hz
            )))
        }

        Ok(())
    }
}
