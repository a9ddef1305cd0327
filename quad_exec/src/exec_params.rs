//! Parameters for the quadruped executable

use serde::Deserialize;

/// Parameters controlling the main loop of the executable.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecParams {
    /// Target period of one control cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Number of cycles the home pose is held for before walking starts.
    pub num_home_cycles: u64,

    /// Number of consecutive overruns after which execution stops, 0 disables the limit.
    pub max_consec_cycle_overruns: u64,

    /// I2C bus of the servo driver board.
    pub i2c_bus: u8,
}

impl ExecParams {
    /// Check the loop can actually be run with these parameters.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.cycle_period_s > 0.0) || !self.cycle_period_s.is_finite() {
            return Err(format!(
                "cycle_period_s must be positive and finite, found {}", 
                self.cycle_period_s
            ))
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_params_file() {
        let p: ExecParams = util::params::from_str(
            include_str!("../../params/quad_exec.toml")
        ).unwrap();

        assert!(p.validate().is_ok());
        assert_eq!(p.i2c_bus, 1);
        assert!(p.num_home_cycles > 0);
    }

    #[test]
    fn test_invalid_period() {
        let p = ExecParams {
            cycle_period_s: 0.0,
            num_home_cycles: 1,
            max_consec_cycle_overruns: 0,
            i2c_bus: 1
        };
        assert!(p.validate().is_err());

        let p = ExecParams { cycle_period_s: f64::NAN, ..p };
        assert!(p.validate().is_err());
    }
}
