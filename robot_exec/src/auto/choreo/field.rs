//! # Field geometry and alliance mirroring
//!
//! Trajectories are always authored from the blue alliance's side of the field. When driving for
//! the red alliance the trajectory must be transformed onto the red side, which depends on how
//! the field is symmetric that season.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::f64::consts::PI;

use auto_if::{Pose2, TrajSample};
use nalgebra::Vector2;
use serde::Deserialize;
use util::maths::wrap_pi;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Dimensions and symmetry of the playing field.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct FieldParams {
    /// Length of the field along the field X axis (between the alliance walls)
    pub length_m: f64,

    /// Width of the field along the field Y axis
    pub width_m: f64,

    /// How the red side of the field relates to the blue side
    #[serde(default)]
    pub symmetry: FieldSymmetry,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum FieldSymmetry {
    /// The red side is the blue side rotated 180 degrees about the field centre.
    Rotational,

    /// The red side is the blue side reflected across the centre line (X = length / 2).
    Reflective,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for FieldSymmetry {
    fn default() -> Self {
        FieldSymmetry::Rotational
    }
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            length_m: 17.548,
            width_m: 8.052,
            symmetry: FieldSymmetry::Rotational,
        }
    }
}

impl FieldParams {
    /// Transform a field position onto the red alliance's side.
    pub fn flip_position(&self, position_m: Vector2<f64>) -> Vector2<f64> {
        match self.symmetry {
            FieldSymmetry::Rotational => {
                Vector2::new(self.length_m - position_m.x, self.width_m - position_m.y)
            }
            FieldSymmetry::Reflective => Vector2::new(self.length_m - position_m.x, position_m.y),
        }
    }

    /// Transform a field heading onto the red alliance's side.
    pub fn flip_heading(&self, heading_rad: f64) -> f64 {
        match self.symmetry {
            FieldSymmetry::Rotational => wrap_pi(heading_rad + PI),
            FieldSymmetry::Reflective => wrap_pi(PI - heading_rad),
        }
    }

    /// Transform a field-relative velocity onto the red alliance's side.
    pub fn flip_velocity(&self, vel_ms: Vector2<f64>) -> Vector2<f64> {
        match self.symmetry {
            FieldSymmetry::Rotational => -vel_ms,
            FieldSymmetry::Reflective => Vector2::new(-vel_ms.x, vel_ms.y),
        }
    }

    /// Transform an angular rate onto the red alliance's side.
    ///
    /// A rotation keeps the sense of turning, a reflection reverses it.
    pub fn flip_omega(&self, omega_rads: f64) -> f64 {
        match self.symmetry {
            FieldSymmetry::Rotational => omega_rads,
            FieldSymmetry::Reflective => -omega_rads,
        }
    }

    pub fn flip_pose(&self, pose: Pose2) -> Pose2 {
        Pose2 {
            position_m: self.flip_position(pose.position_m),
            heading_rad: self.flip_heading(pose.heading_rad),
        }
    }

    pub fn flip_sample(&self, sample: TrajSample) -> TrajSample {
        TrajSample {
            t_s: sample.t_s,
            position_m: self.flip_position(sample.position_m),
            heading_rad: self.flip_heading(sample.heading_rad),
            vel_ms: self.flip_velocity(sample.vel_ms),
            omega_rads: self.flip_omega(sample.omega_rads),
        }
    }
}
