//! [`ServoDriver`] implementation for the PCA9685 driver

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use pwm_pca9685::{Address, Channel, Pca9685};
use embedded_hal::blocking::i2c::{Write, WriteRead};
use log::info;
use util::maths::lin_map;

use super::{Params, ServoDriver, ServoError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const MAX_PWM: u16 = 4096;

/// Smallest prescale value accepted by the chip.
const MIN_PRESCALE: f64 = 3.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A PCA9685 board configured to drive servos at a fixed PWM frequency.
pub struct Pca9685Driver<I2C> {
    pwm: Pca9685<I2C>,

    /// Period of the PWM signal.
    ///
    /// Units: microseconds
    period_us: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<I2C, E> Pca9685Driver<I2C>
where 
    I2C: Write<Error = E> + WriteRead<Error = E>
{
    /// Initialise the board on the given bus: set the prescale for the configured PWM frequency
    /// and enable the outputs.
    pub fn init(i2c: I2C, params: &Params) -> Result<Self, ServoError> {
        let mut pwm = Pca9685::new(i2c, Address::from(params.board_address))
            .map_err(map_err)?;

        let prescale = calc_prescale(params.oscillator_freq_hz, params.pwm_freq_hz)?;
        pwm.set_prescale(prescale).map_err(map_err)?;
        pwm.enable().map_err(map_err)?;

        info!(
            "PCA9685 at {:#04x} running at {} Hz (prescale {})", 
            params.board_address, 
            params.pwm_freq_hz,
            prescale
        );

        Ok(Self {
            pwm,
            period_us: 1e6 / params.pwm_freq_hz
        })
    }
}

impl<I2C, E> ServoDriver for Pca9685Driver<I2C>
where 
    I2C: Write<Error = E> + WriteRead<Error = E>
{
    fn set_pulse_width_us(
        &mut self, 
        channel: u8, 
        pulse_us: u16
    ) -> Result<(), ServoError> {

        let duty_cycle = pulse_us as f64 / self.period_us;

        // If the duty cycle is out of range return an error
        if duty_cycle < 0.0 || duty_cycle > 1.0 {
            return Err(ServoError::InvalidDutyCycle)
        }

        let off = pulse_to_ticks(self.period_us, pulse_us);

        self.pwm
            .set_channel_on_off(to_channel(channel)?, 0, off)
            .map_err(map_err)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Calculate the prescale register value for the desired PWM frequency.
fn calc_prescale(oscillator_freq_hz: f64, pwm_freq_hz: f64) -> Result<u8, ServoError> {
    let prescale = (oscillator_freq_hz / (MAX_PWM as f64 * pwm_freq_hz)).round() - 1.0;

    if !(MIN_PRESCALE..=u8::MAX as f64).contains(&prescale) {
        return Err(ServoError::InvalidDutyCycle)
    }

    Ok(prescale as u8)
}

/// Convert a pulse width into the tick at which the output is switched off.
fn pulse_to_ticks(period_us: f64, pulse_us: u16) -> u16 {
    lin_map((0.0, period_us), (0.0, MAX_PWM as f64), pulse_us as f64)
        .round()
        .min((MAX_PWM - 1) as f64) as u16
}

fn map_err<E>(e: pwm_pca9685::Error<E>) -> ServoError {
    match e {
        pwm_pca9685::Error::I2C(_) => ServoError::I2c,
        pwm_pca9685::Error::InvalidInputData => ServoError::InvalidDutyCycle
    }
}

fn to_channel(channel: u8) -> Result<Channel, ServoError> {
    Ok(match channel {
        0 => Channel::C0,
        1 => Channel::C1,
        2 => Channel::C2,
        3 => Channel::C3,
        4 => Channel::C4,
        5 => Channel::C5,
        6 => Channel::C6,
        7 => Channel::C7,
        8 => Channel::C8,
        9 => Channel::C9,
        10 => Channel::C10,
        11 => Channel::C11,
        12 => Channel::C12,
        13 => Channel::C13,
        14 => Channel::C14,
        15 => Channel::C15,
        c => return Err(ServoError::InvalidChannel(c))
    })
}
