//! # Trajectory interface
//!
//! A trajectory is a precomputed, time-parameterised path. The autonomy core never builds
//! trajectories, it only asks them for their duration, their starting pose and a sample at a
//! given time since the start of the trajectory.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::pose::Pose2;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single time slice of a trajectory, the target state of the robot at `t_s`.
///
/// A sample is only valid for the control cycle it was produced in.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajSample {
    /// Time since the start of the trajectory
    pub t_s: f64,

    /// Target position in the field frame
    pub position_m: Vector2<f64>,

    /// Target heading
    pub heading_rad: f64,

    /// Target field-relative velocity
    pub vel_ms: Vector2<f64>,

    /// Target angular rate, counter-clockwise positive
    pub omega_rads: f64,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A queryable trajectory.
///
/// The `mirror` flag asks for the trajectory as seen by the red alliance. Implementors decide
/// what the mirror transform is, the caller only decides when to apply it.
pub trait Trajectory: std::fmt::Debug {
    /// Name the trajectory was loaded under.
    fn name(&self) -> &str;

    /// The pose at the start of the trajectory, or `None` if the trajectory has no samples.
    fn initial_pose(&self, mirror: bool) -> Option<Pose2>;

    /// Total duration of the trajectory in seconds.
    fn total_duration_s(&self) -> f64;

    /// Sample the trajectory `t_s` seconds after its start.
    ///
    /// Returns `None` if no sample can be produced for this time.
    fn sample_at(&self, t_s: f64, mirror: bool) -> Option<TrajSample>;
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TrajSample {
    /// The pose targeted by this sample.
    pub fn pose(&self) -> Pose2 {
        Pose2 {
            position_m: self.position_m,
            heading_rad: self.heading_rad,
        }
    }
}
