//! # Autonomy Interfaces
//!
//! This crate defines the interfaces between the autonomy core and the collaborators it drives or
//! consumes: the drivetrain, the trajectories, and the platform (alliance and clock).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Drivetrain commanding interface
pub mod drivetrain;

/// Platform-provided information, such as the current alliance and the run clock
pub mod platform;

/// Planar pose definition
pub mod pose;

/// Trajectory and trajectory sample interface
pub mod traj;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use drivetrain::{DriveCmd, Drivetrain};
pub use platform::{Alliance, AllianceSource, Clock};
pub use pose::Pose2;
pub use traj::{TrajSample, Trajectory};
