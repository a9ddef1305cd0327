//! Main quadruped executable entry point.
//! 
//! # Architecture
//! 
//! The general execution methodology consists of:
//! 
//!     - Initialise all modules
//!     - Hold the home pose
//!     - Main loop:
//!         - Gait control processing
//!         - Leg control processing
//!         - Servo actuation
//! 
//! # Usage
//!
//!     quad_exec [NUM_WALK_CYCLES]
//!
//! Without an argument the quadruped walks until the process is killed.
//! 
//! # Modules
//! 
//! All modules (e.g. `leg_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!     

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};
use color_eyre::{Report, eyre::{WrapErr, eyre}};

// Internal
use quad_lib::{
    data_store::DataStore,
    exec_params::ExecParams,
    gait_ctrl::{GaitCmd, GaitCtrl},
    leg_ctrl::LegCtrl
};
use servo_ctrl::{ServoCtrl, ServoDriver};
use util::{
    host,
    module::State,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "quad_exec", 
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Orion Quadruped Executable\n");
    info!(
        "Software root: {:?}", 
        host::get_sw_root().wrap_err("Failed to get the software root")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: ExecParams = util::params::load(
        "quad_exec.toml"
    ).wrap_err("Could not load exec params")?;
    exec_params.validate().map_err(|e| eyre!("Invalid exec params: {}", e))?;

    let servo_params: servo_ctrl::Params = util::params::load(
        "servo_ctrl.toml"
    ).wrap_err("Could not load servo params")?;
    servo_params.validate().wrap_err("Invalid servo params")?;

    info!("Exec parameters loaded");

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // A single argument limits the number of walking cycles
    let max_walk_cycles = match args.len() {
        1 => None,
        2 => Some(
            args[1].parse::<u64>()
                .wrap_err_with(|| format!("Invalid number of cycles \"{}\"", args[1]))?
        ),
        _ => return Err(eyre!("Usage: quad_exec [NUM_WALK_CYCLES]"))
    };

    // ---- INITIALISE MODULES ----

    let mut leg_ctrl = LegCtrl::default();
    leg_ctrl.init("leg_ctrl.toml", Some(&session))
        .wrap_err("Failed to initialise LegCtrl")?;
    info!("LegCtrl init complete");

    let mut gait_ctrl = GaitCtrl::default();
    gait_ctrl.init("gait_ctrl.toml", Some(&session))
        .wrap_err("Failed to initialise GaitCtrl")?;
    info!("GaitCtrl init complete");

    let mut ds = DataStore::new(gait_ctrl, leg_ctrl);

    // ---- INITIALISE SERVOS ----

    #[cfg(all(target_arch = "arm", target_os = "linux"))]
    {
        use servo_ctrl::pca9685::Pca9685Driver;

        let i2c = rppal::i2c::I2c::with_bus(exec_params.i2c_bus)
            .wrap_err("Could not open the I2C bus")?;
        let driver = Pca9685Driver::init(i2c, &servo_params)
            .wrap_err("Could not initialise the PCA9685 board")?;
        let servos = ServoCtrl::new(driver, servo_params)
            .wrap_err("Could not initialise ServoCtrl")?;
        info!("ServoCtrl init complete, PCA9685 on I2C bus {}", exec_params.i2c_bus);

        run(&mut ds, servos, &exec_params, max_walk_cycles)?;
    }

    #[cfg(not(all(target_arch = "arm", target_os = "linux")))]
    {
        let driver = servo_ctrl::SimServoDriver::default();
        let servos = ServoCtrl::new(driver, servo_params)
            .wrap_err("Could not initialise ServoCtrl")?;
        info!("ServoCtrl init complete, no servo board on this target so simulating");

        run(&mut ds, servos, &exec_params, max_walk_cycles)?;
    }

    // ---- SHUTDOWN ----

    info!(
        "{} cycles run, {} unreachable targets, {} servo errors",
        ds.num_cycles,
        ds.num_ik_failures,
        ds.num_servo_errors
    );
    info!("End of execution");

    Ok(())
}

/// Home the legs then walk the configured pattern.
fn run<D: ServoDriver>(
    ds: &mut DataStore, 
    mut servo_ctrl: ServoCtrl<D>,
    exec_params: &ExecParams,
    max_walk_cycles: Option<u64>
) -> Result<(), Report> {

    // ---- HOME ----

    info!("Homing legs");
    ds.command(GaitCmd::Home);

    for _ in 0..exec_params.num_home_cycles {
        cycle(ds, &mut servo_ctrl, exec_params)?;
    }

    // ---- MAIN LOOP ----

    let pattern = ds.gait_ctrl.default_pattern();
    ds.command(GaitCmd::Walk(pattern));

    info!("Beginning main loop\n");

    let mut num_walk_cycles = 0u64;

    while max_walk_cycles.map_or(true, |max| num_walk_cycles < max) {
        cycle(ds, &mut servo_ctrl, exec_params)?;
        num_walk_cycles += 1;
    }

    // Stop and hold the final pose
    ds.command(GaitCmd::Stop);
    cycle(ds, &mut servo_ctrl, exec_params)?;

    Ok(())
}

/// Run one control cycle and sleep for the rest of the cycle period.
fn cycle<D: ServoDriver>(
    ds: &mut DataStore,
    servo_ctrl: &mut ServoCtrl<D>,
    exec_params: &ExecParams
) -> Result<(), Report> {
    let cycle_start_instant = Instant::now();

    ds.cycle(servo_ctrl).wrap_err("Control cycle failed")?;

    if ds.gait_ctrl_status_rpt.cycle_complete {
        debug!("Gait cycle complete");
    }

    // ---- CYCLE MANAGEMENT ----

    let cycle_dur = Instant::now() - cycle_start_instant;
    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);

    // Get sleep duration
    match cycle_period.checked_sub(cycle_dur) {
        Some(d) => {
            ds.num_consec_cycle_overruns = 0;
            thread::sleep(d);
        },
        None => {
            warn!(
                "Cycle overran by {:.06} s", 
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            );
            ds.num_consec_cycle_overruns += 1;

            // If number of overruns greater than the limit exit
            if exec_params.max_consec_cycle_overruns > 0 
                && ds.num_consec_cycle_overruns > exec_params.max_consec_cycle_overruns 
            {
                return Err(eyre!(
                    "More than {} consecutive cycle overruns", 
                    exec_params.max_consec_cycle_overruns
                ));
            }
        }
    }

    Ok(())
}
