//! # Robot Executable
//!
//! Runs one autonomous period against the simulated drivetrain.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Build the trajectory store and the autonomous mode selector
//!     - Select and enable the autonomous mode
//!     - Main loop, until the autonomous period is over:
//!         - Step the autonomous mode
//!         - Step the drivetrain simulation
//!         - Wait for the end of the cycle
//!     - Disable the mode and save the run report

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    thread,
    time::{Duration, Instant},
};

use auto_if::{Alliance, Clock, Drivetrain};
use color_eyre::{eyre::WrapErr, Result};
use log::{debug, info, warn};
use structopt::StructOpt;

use robot_lib::{
    auto::{
        choreo::ChoreoLoader, routines, tm::AutoTm, AutoCtx, AutoSelector, TrajectoryStore,
    },
    clock::{MonotonicClock, SteppedClock},
    params::RobotExecParams,
    sim_drivetrain::SimDrivetrain,
};
use util::{host, logger::logger_init, session::Session};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Runs an autonomous routine against the simulated drivetrain.
#[derive(Debug, StructOpt)]
#[structopt(name = "robot_exec")]
struct Args {
    /// Name of the autonomous mode to run, overrides the parameter file.
    #[structopt(short, long)]
    mode: Option<String>,

    /// Alliance to run for (red, blue or unknown), overrides the parameter file.
    #[structopt(short, long)]
    alliance: Option<Alliance>,

    /// Run as fast as possible rather than in real time.
    #[structopt(long)]
    fast: bool,

    /// List the available autonomous modes and exit.
    #[structopt(long)]
    list: bool,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("robot_exec", "sessions").wrap_err("Failed to create the session")?;

    // ---- LOAD PARAMETERS ----

    // Parameters are loaded first as they hold the log levels
    let params: RobotExecParams =
        util::params::load("robot_exec.toml").wrap_err("Could not load exec params")?;
    params.validate().wrap_err("Invalid exec params")?;

    // Initialise logger
    logger_init(&params.log, &session).wrap_err("Failed to initialise logging")?;

    info!("Scurvy Robot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", args);
    info!("Exec parameters loaded");

    // ---- AUTONOMOUS MODES ----

    let selector = routines::builtin_selector(params.just_leave, params.segment_failure_policy)
        .wrap_err("Failed to register the autonomous modes")?;

    if args.list {
        list_modes(&selector);
        session.exit();
        return Ok(());
    }

    let alliance = args.alliance.unwrap_or(params.alliance);
    let mode_name = args.mode.clone().or_else(|| params.auto_mode.clone());

    let mut mode = selector
        .select(mode_name.as_deref())
        .wrap_err("Could not select an autonomous mode")?;

    // ---- INITIALISE MODULES ----

    let deploy_dir = host::get_sw_root()
        .wrap_err("The software root environment variable is not set")?
        .join(&params.deploy_dir);
    info!("Trajectories will be loaded from {:?}", deploy_dir);

    let mut store = TrajectoryStore::new(Box::new(ChoreoLoader::new(&deploy_dir, params.field)));
    let mut drivetrain = SimDrivetrain::new(params.sim_drivetrain);

    let real_clock = MonotonicClock::new();
    let fast_clock = SteppedClock::new(0.0);
    let clock: &dyn Clock = if args.fast {
        info!("Running faster than real time");
        &fast_clock
    } else {
        &real_clock
    };

    let cycle_period = Duration::from_secs_f64(params.cycle_period_s);
    let cycles_per_second = (1.0 / params.cycle_period_s).round().max(1.0) as u64;

    let mut auto_tm = AutoTm::new(&mode, alliance);

    // ---- AUTONOMOUS PERIOD ----

    info!(
        "Starting {:.1} s autonomous period for the {} alliance\n",
        params.auto_duration_s, alliance
    );

    mode.on_enable(&mut AutoCtx {
        store: &mut store,
        drivetrain: &mut drivetrain,
        alliance: &alliance,
        clock,
    });

    let auto_start_s = clock.now_s();

    while clock.now_s() - auto_start_s < params.auto_duration_s {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        mode.tick(&mut AutoCtx {
            store: &mut store,
            drivetrain: &mut drivetrain,
            alliance: &alliance,
            clock,
        });

        drivetrain.update(params.cycle_period_s);

        auto_tm.num_cycles += 1;
        if auto_tm.num_cycles % cycles_per_second == 0 {
            debug!(
                "{} in {}, pose {}",
                mode.name(),
                mode.state_str(),
                drivetrain.current_pose()
            );
        }

        // ---- CYCLE MANAGEMENT ----

        if args.fast {
            fast_clock.advance(params.cycle_period_s);
            continue;
        }

        let cycle_dur = Instant::now() - cycle_start_instant;

        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                auto_tm.num_cycle_overruns += 1;
            }
        }
    }

    // ---- SHUTDOWN ----

    mode.on_disable(&mut AutoCtx {
        store: &mut store,
        drivetrain: &mut drivetrain,
        alliance: &alliance,
        clock,
    });

    auto_tm.finish(&mode, &store, drivetrain.current_pose(), drivetrain.stats());

    info!(
        "Autonomous period over after {} cycles, final pose {}",
        auto_tm.num_cycles,
        drivetrain.current_pose()
    );
    info!(
        "{} of {} trajectories loaded",
        auto_tm.num_traj_loaded, auto_tm.num_traj_load_attempts
    );

    session.save("auto_tm.json", auto_tm);

    info!("End of execution");
    session.exit();

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn list_modes(selector: &AutoSelector) {
    info!("Available autonomous modes:");

    for name in selector.names() {
        if selector.default_name() == Some(name) {
            info!("    {} (default)", name);
        } else {
            info!("    {}", name);
        }
    }
}
