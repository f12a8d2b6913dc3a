//! # Choreo trajectories
//!
//! Provides the trajectory type, file loader and field mirroring for trajectories generated by
//! the Choreo path planner.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod field;
mod loader;
mod traj;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use field::{FieldParams, FieldSymmetry};
pub use loader::{ChoreoLoader, TRAJ_FILE_EXTENSION};
pub use traj::{ChoreoError, ChoreoTrajectory};
