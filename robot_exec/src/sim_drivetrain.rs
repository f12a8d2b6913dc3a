//! # Simulated drivetrain
//!
//! A kinematic model of a swerve drivetrain, used to run the autonomous routines off the robot.
//! The commanded velocity is applied immediately (there are no dynamics) and the pose is found by
//! integrating that velocity each cycle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use auto_if::{DriveCmd, Drivetrain, Pose2, TrajSample};
use log::trace;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use util::maths::{clamp, wrap_pi};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimDrivetrainParams {
    /// If true the robot is placed exactly on every trajectory sample it is asked to follow.
    pub ideal_tracking: bool,

    /// Maximum translational speed
    pub max_speed_ms: f64,

    /// Maximum rotation rate
    pub max_rate_rads: f64,
}

/// Count of each kind of command the drivetrain has been given.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveStats {
    pub num_drive: u64,
    pub num_follow: u64,
    pub num_stop: u64,
    pub num_brake: u64,
    pub num_pose_resets: u64,
}

pub struct SimDrivetrain {
    params: SimDrivetrainParams,

    pose: Pose2,

    /// Current field-relative velocity
    vel_ms: Vector2<f64>,

    /// Current rotation rate
    omega_rads: f64,

    last_cmd: Option<DriveCmd>,

    stats: DriveStats,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimDrivetrainParams {
    fn default() -> Self {
        Self {
            ideal_tracking: true,
            max_speed_ms: 4.5,
            max_rate_rads: 9.0,
        }
    }
}

impl SimDrivetrain {
    pub fn new(params: SimDrivetrainParams) -> Self {
        Self {
            params,
            pose: Pose2::default(),
            vel_ms: Vector2::zeros(),
            omega_rads: 0.0,
            last_cmd: None,
            stats: DriveStats::default(),
        }
    }

    /// Advance the simulation by `dt_s` seconds.
    pub fn update(&mut self, dt_s: f64) {
        self.pose.position_m += self.vel_ms * dt_s;
        self.pose.heading_rad = wrap_pi(self.pose.heading_rad + self.omega_rads * dt_s);
    }

    /// The last command given to the drivetrain, if any.
    pub fn last_cmd(&self) -> Option<DriveCmd> {
        self.last_cmd
    }

    pub fn stats(&self) -> DriveStats {
        self.stats
    }

    /// Limit and apply a field-relative velocity.
    fn set_velocity(&mut self, vel_ms: Vector2<f64>, omega_rads: f64) {
        let speed_ms = vel_ms.norm();

        self.vel_ms = if speed_ms > self.params.max_speed_ms {
            vel_ms * (self.params.max_speed_ms / speed_ms)
        } else {
            vel_ms
        };

        self.omega_rads = clamp(
            omega_rads,
            -self.params.max_rate_rads,
            self.params.max_rate_rads,
        );
    }
}

impl Drivetrain for SimDrivetrain {
    fn drive(&mut self, forward_ms: f64, left_ms: f64, ccw_rads: f64) {
        // Rotate the robot-relative demand into the field frame
        let (sin, cos) = self.pose.heading_rad.sin_cos();
        let vel_ms = Vector2::new(
            forward_ms * cos - left_ms * sin,
            forward_ms * sin + left_ms * cos,
        );

        self.set_velocity(vel_ms, ccw_rads);
        self.last_cmd = Some(DriveCmd::Drive {
            forward_ms,
            left_ms,
            ccw_rads,
        });
        self.stats.num_drive += 1;
    }

    fn stop(&mut self) {
        self.set_velocity(Vector2::zeros(), 0.0);
        self.last_cmd = Some(DriveCmd::Stop);
        self.stats.num_stop += 1;
    }

    fn brake(&mut self) {
        self.set_velocity(Vector2::zeros(), 0.0);
        self.last_cmd = Some(DriveCmd::Brake);
        self.stats.num_brake += 1;
    }

    fn follow_trajectory(&mut self, sample: &TrajSample) {
        if self.params.ideal_tracking {
            self.pose = sample.pose();
        }

        self.set_velocity(sample.vel_ms, sample.omega_rads);
        self.last_cmd = Some(DriveCmd::Follow(*sample));
        self.stats.num_follow += 1;

        trace!("Following sample at {:.3} s, pose {}", sample.t_s, self.pose);
    }

    fn reset_pose(&mut self, pose: Pose2) {
        self.pose = pose;
        self.stats.num_pose_resets += 1;
    }

    fn current_pose(&self) -> Pose2 {
        self.pose
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_drive_is_robot_relative() {
        let mut dt = SimDrivetrain::new(SimDrivetrainParams::default());
        dt.reset_pose(Pose2::new(1.0, 1.0, PI / 2.0));

        dt.drive(1.0, 0.0, 0.0);
        dt.update(2.0);

        let pose = dt.current_pose();
        assert!((pose.position_m - Vector2::new(1.0, 3.0)).norm() < EPS);

        dt.stop();
        dt.update(2.0);
        assert!((dt.current_pose().position_m - Vector2::new(1.0, 3.0)).norm() < EPS);
        assert_eq!(dt.last_cmd(), Some(DriveCmd::Stop));
    }

    #[test]
    fn test_limits() {
        let mut dt = SimDrivetrain::new(SimDrivetrainParams {
            max_speed_ms: 2.0,
            max_rate_rads: 1.0,
            ..Default::default()
        });

        dt.drive(3.0, 4.0, -5.0);
        dt.update(1.0);

        let pose = dt.current_pose();
        assert!((pose.position_m.norm() - 2.0).abs() < EPS);
        assert!((pose.heading_rad + 1.0).abs() < EPS);
    }

    #[test]
    fn test_follow_ideal_tracking() {
        let mut dt = SimDrivetrain::new(SimDrivetrainParams::default());
        let sample = TrajSample {
            t_s: 0.5,
            position_m: Vector2::new(2.0, 3.0),
            heading_rad: 0.5,
            vel_ms: Vector2::new(1.0, 0.0),
            omega_rads: 0.0,
        };

        dt.follow_trajectory(&sample);
        assert_eq!(dt.current_pose(), sample.pose());

        dt.update(0.5);
        assert!((dt.current_pose().position_m - Vector2::new(2.5, 3.0)).norm() < EPS);
    }

    #[test]
    fn test_stats() {
        let mut dt = SimDrivetrain::new(SimDrivetrainParams::default());

        dt.drive(1.0, 0.0, 0.0);
        dt.follow_trajectory(&TrajSample::default());
        dt.follow_trajectory(&TrajSample::default());
        dt.stop();
        dt.brake();
        dt.reset_pose(Pose2::default());

        assert_eq!(
            dt.stats(),
            DriveStats {
                num_drive: 1,
                num_follow: 2,
                num_stop: 1,
                num_brake: 1,
                num_pose_resets: 1,
            }
        );
        assert_eq!(dt.last_cmd(), Some(DriveCmd::Brake));
    }
}
