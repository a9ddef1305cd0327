//! # Servo Controller Library
//!
//! This library provides a unified servo control interface which can abstract over different types
//! of servo driver boards. Control modules command joint angles in degrees through [`ServoCtrl`],
//! which converts them into pulse widths for the underlying [`ServoDriver`].

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// [`ServoDriver`] implementation for the Adafruit PCA9685 16 channel servo driver board.
pub mod pca9685;

/// [`ServoDriver`] implementation which records demands without any hardware attached.
pub mod sim;

/// Parameters for the servo controller.
mod params;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use util::maths::lin_map_int;

pub use params::Params;
pub use sim::SimServoDriver;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Scaling applied to an angle before the integer pulse mapping, keeping two decimal places of
/// angular precision.
const ANGLE_SCALE: f64 = 100.0;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Trait to provide a unified API for accessing servo driver boards.
pub trait ServoDriver {

    /// Set the pulse width of a channel.
    ///
    /// ## Arguments
    /// - `channel` - The channel to command
    /// - `pulse_us` - The high time of the pulse in microseconds.
    fn set_pulse_width_us(&mut self, channel: u8, pulse_us: u16) -> Result<(), ServoError>;

}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Converts angle demands in degrees into pulse widths on a [`ServoDriver`].
pub struct ServoCtrl<D>
where
    D: ServoDriver
{
    driver: D,

    params: Params,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ServoError {
    #[error("An I2C error occured")]
    I2c,

    #[error("Channel {0} does not exist on the driver board")]
    InvalidChannel(u8),

    #[error("Servo angle must be a finite number")]
    InvalidAngle,

    #[error("Duty cycle must be between 0.0 and 1.0")]
    InvalidDutyCycle,

    #[error("Invalid servo parameters: {0}")]
    InvalidParams(String)
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<D> ServoCtrl<D> 
where 
    D: ServoDriver
{
    /// Create a new servo controller.
    ///
    /// ## Arguments
    /// - `driver` - An initialised [`ServoDriver`] board
    /// - `params` - The pulse and angle range of the servos managed by this controller
    ///
    /// Fails with [`ServoError::InvalidParams`] if the ranges can't be mapped onto each other.
    pub fn new(driver: D, params: Params) -> Result<Self, ServoError> {
        params.validate()?;

        Ok(Self {
            driver,
            params
        })
    }

    /// Command a channel to the given angle.
    ///
    /// The angle is clamped to `[0, max_angle_deg]` before being converted to a pulse width, so
    /// the demanded pulse always lies within `[min_pulse_us, max_pulse_us]`.
    pub fn set_angle(&mut self, channel: u8, angle_deg: f64) -> Result<(), ServoError> {
        let pulse_us = self.angle_to_pulse_us(angle_deg)?;

        trace!("Servo channel {}: {:.2} deg -> {} us", channel, angle_deg, pulse_us);

        self.driver.set_pulse_width_us(channel, pulse_us)
    }

    /// Convert an angle in degrees into a pulse width in microseconds.
    pub fn angle_to_pulse_us(&self, angle_deg: f64) -> Result<u16, ServoError> {
        if angle_deg.is_nan() {
            return Err(ServoError::InvalidAngle)
        }

        let angle_deg = angle_deg.clamp(0.0, self.params.max_angle_deg);

        // Truncation towards zero is intended here
        let scaled = (angle_deg * ANGLE_SCALE) as i64;

        let pulse_us = lin_map_int(
            (0, (self.params.max_angle_deg * ANGLE_SCALE) as i64),
            (self.params.min_pulse_us as i64, self.params.max_pulse_us as i64),
            scaled
        );

        Ok(pulse_us as u16)
    }

    /// Get a reference to the underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn servo_ctrl() -> ServoCtrl<SimServoDriver> {
        ServoCtrl::new(SimServoDriver::default(), Params::default()).unwrap()
    }

    #[test]
    fn test_angle_to_pulse() {
        let ctrl = servo_ctrl();

        assert_eq!(ctrl.angle_to_pulse_us(0.0), Ok(500));
        assert_eq!(ctrl.angle_to_pulse_us(135.0), Ok(1500));
        assert_eq!(ctrl.angle_to_pulse_us(270.0), Ok(2500));

        // 33.5 deg -> 3350 -> 3350 * 2000 / 27000 = 248 (truncated)
        assert_eq!(ctrl.angle_to_pulse_us(33.5), Ok(748));
    }

    #[test]
    fn test_angle_clamped() {
        let ctrl = servo_ctrl();

        for angle in [-1000.0, -0.01, 270.01, 1e9, f64::INFINITY, f64::NEG_INFINITY] {
            let pulse = ctrl.angle_to_pulse_us(angle).unwrap();
            assert!(pulse >= 500 && pulse <= 2500, "{} -> {}", angle, pulse);
        }

        assert_eq!(ctrl.angle_to_pulse_us(-5.0), Ok(500));
        assert_eq!(ctrl.angle_to_pulse_us(300.0), Ok(2500));
        assert_eq!(ctrl.angle_to_pulse_us(f64::NAN), Err(ServoError::InvalidAngle));
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let zero_range = Params { max_angle_deg: 0.0, ..Params::default() };
        assert!(matches!(
            ServoCtrl::new(SimServoDriver::default(), zero_range),
            Err(ServoError::InvalidParams(_))
        ));

        let inverted = Params { min_pulse_us: 2500, max_pulse_us: 500, ..Params::default() };
        assert!(matches!(
            ServoCtrl::new(SimServoDriver::default(), inverted),
            Err(ServoError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_pulse_within_custom_range() {
        let params = Params { min_pulse_us: 1000, max_pulse_us: 2000, max_angle_deg: 180.0, ..Params::default() };
        let ctrl = ServoCtrl::new(SimServoDriver::default(), params).unwrap();

        assert_eq!(ctrl.angle_to_pulse_us(-10.0), Ok(1000));
        assert_eq!(ctrl.angle_to_pulse_us(90.0), Ok(1500));
        assert_eq!(ctrl.angle_to_pulse_us(500.0), Ok(2000));
    }

    #[test]
    fn test_set_angle() {
        let mut ctrl = servo_ctrl();

        ctrl.set_angle(3, 135.0).unwrap();
        ctrl.set_angle(4, 400.0).unwrap();

        assert_eq!(ctrl.driver().pulse_us(3), Some(1500));
        assert_eq!(ctrl.driver().pulse_us(4), Some(2500));
        assert_eq!(ctrl.driver().pulse_us(5), None);
        assert!(ctrl.set_angle(3, f64::NAN).is_err());
        assert_eq!(ctrl.driver().pulse_us(3), Some(1500));
    }
}
