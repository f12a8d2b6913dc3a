//! # Robot library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to access items defined
//! inside the robot crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Autonomy module - trajectory following routines run during the autonomous period
pub mod auto;

/// Clocks used to time the autonomous routines
pub mod clock;

/// Parameters of the robot executable
pub mod params;

/// Simulated drivetrain - lets the routines run without a robot
pub mod sim_drivetrain;
