//! # Drivetrain interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{pose::Pose2, traj::TrajSample};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// The drivetrain of the robot, as seen by the autonomy system.
///
/// Commands are latched: the last command issued in a cycle is the one the drivetrain executes.
pub trait Drivetrain {
    /// Drive with robot-relative speeds.
    ///
    /// - `forward_ms` - speed along the robot's +X axis in meters/second
    /// - `left_ms` - speed along the robot's +Y axis in meters/second
    /// - `ccw_rads` - rotation rate, counter-clockwise positive, in radians/second
    fn drive(&mut self, forward_ms: f64, left_ms: f64, ccw_rads: f64);

    /// Bring the drivetrain to a stop.
    fn stop(&mut self);

    /// Stop and lock the wheels so the robot resists being pushed.
    fn brake(&mut self);

    /// Track the given trajectory sample for this cycle.
    fn follow_trajectory(&mut self, sample: &TrajSample);

    /// Overwrite the drivetrain's estimate of the robot pose.
    fn reset_pose(&mut self, pose: Pose2);

    /// The drivetrain's current estimate of the robot pose.
    fn current_pose(&self) -> Pose2;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command issued to a drivetrain, used to record what the drivetrain was asked to do.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum DriveCmd {
    /// Robot-relative speed command
    Drive {
        forward_ms: f64,
        left_ms: f64,
        ccw_rads: f64,
    },

    /// Track a trajectory sample
    Follow(TrajSample),

    /// Stop the drivetrain
    Stop,

    /// Stop and lock the wheels
    Brake,
}
