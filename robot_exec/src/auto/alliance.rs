//! # Alliance context
//!
//! Trajectories are authored for the blue alliance and mirrored when driving for red.

use auto_if::Alliance;

/// Whether trajectory geometry must be mirrored for the given alliance.
///
/// An unknown alliance is treated as blue, so a disconnected driver station never mirrors.
pub fn mirror_flag(alliance: Alliance) -> bool {
    alliance == Alliance::Red
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto::choreo::{ChoreoTrajectory, FieldParams};
    use auto_if::{TrajSample, Trajectory};
    use nalgebra::Vector2;

    #[test]
    fn test_mirror_flag() {
        assert!(mirror_flag(Alliance::Red));
        assert!(!mirror_flag(Alliance::Blue));
        assert!(!mirror_flag(Alliance::Unknown));
    }

    #[test]
    fn test_alliance_changes_sample() {
        let traj = ChoreoTrajectory::from_samples(
            "mirror",
            vec![
                TrajSample {
                    t_s: 0.0,
                    position_m: Vector2::new(1.0, 1.0),
                    ..Default::default()
                },
                TrajSample {
                    t_s: 2.0,
                    position_m: Vector2::new(3.0, 1.0),
                    vel_ms: Vector2::new(1.0, 0.0),
                    ..Default::default()
                },
            ],
            FieldParams::default(),
        )
        .unwrap();

        let unknown = traj.sample_at(1.0, mirror_flag(Alliance::Unknown)).unwrap();
        let blue = traj.sample_at(1.0, mirror_flag(Alliance::Blue)).unwrap();
        let red = traj.sample_at(1.0, mirror_flag(Alliance::Red)).unwrap();

        assert_eq!(unknown, blue);
        assert_ne!(red, blue);
        assert_eq!(red, FieldParams::default().flip_sample(blue));

        assert_eq!(
            traj.initial_pose(mirror_flag(Alliance::Unknown)),
            traj.initial_pose(mirror_flag(Alliance::Blue))
        );
        assert_ne!(
            traj.initial_pose(mirror_flag(Alliance::Red)),
            traj.initial_pose(mirror_flag(Alliance::Blue))
        );
    }
}
