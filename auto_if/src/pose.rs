//! # Planar pose

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The pose (position and heading) of the robot on the field.
///
/// Positions are given in the field frame, with the origin in the corner of the blue alliance
/// wall, +X pointing away from the blue wall and +Y to the left when looking along +X.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2 {
    /// Position in the field frame
    pub position_m: Vector2<f64>,

    /// Heading, the angle from the field +X axis, counter-clockwise positive.
    pub heading_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Pose2 {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad,
        }
    }

    pub fn x_m(&self) -> f64 {
        self.position_m.x
    }

    pub fn y_m(&self) -> f64 {
        self.position_m.y
    }
}

impl Display for Pose2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pose2(x: {:.3} m, y: {:.3} m, heading: {:.3} rad)",
            self.position_m.x, self.position_m.y, self.heading_rad
        )
    }
}
