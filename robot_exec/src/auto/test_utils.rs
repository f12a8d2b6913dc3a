//! Mocks shared by the autonomy tests.

use std::{cell::RefCell, collections::HashMap, path::PathBuf, rc::Rc};

use auto_if::{Alliance, DriveCmd, Drivetrain, Pose2, TrajSample, Trajectory};
use nalgebra::Vector2;

use super::{
    choreo::{ChoreoTrajectory, FieldParams},
    AutoCtx, TrajLoadError, TrajectoryLoader, TrajectoryStore,
};
use crate::clock::SteppedClock;

/// Loader serving straight-line trajectories of known durations, recording every load attempt.
pub(crate) struct CountingLoader {
    durations: HashMap<String, f64>,
    gaps: HashMap<String, f64>,
    attempts: Rc<RefCell<Vec<String>>>,
}

/// Trajectory which can't be sampled at one time inside its duration.
#[derive(Debug)]
pub(crate) struct GappyTrajectory {
    inner: ChoreoTrajectory,
    gap_s: f64,
}

/// Drivetrain which records every command it is given.
#[derive(Debug, Default)]
pub(crate) struct RecordingDrivetrain {
    pub cmds: Vec<DriveCmd>,
    pub pose: Pose2,
    pub pose_resets: Vec<Pose2>,
}

/// Everything needed to build an [`AutoCtx`] in a test.
pub(crate) struct Harness {
    pub store: TrajectoryStore,
    pub drivetrain: RecordingDrivetrain,
    pub alliance: Alliance,
    pub clock: SteppedClock,
    pub attempts: Rc<RefCell<Vec<String>>>,
}

impl CountingLoader {
    pub fn new(trajs: &[(&str, f64)]) -> Self {
        Self {
            durations: trajs.iter().map(|(n, d)| (n.to_string(), *d)).collect(),
            gaps: HashMap::new(),
            attempts: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Make the named trajectory give no sample at `gap_s`.
    pub fn with_gap(mut self, name: &str, gap_s: f64) -> Self {
        self.gaps.insert(name.to_string(), gap_s);
        self
    }

    pub fn attempts(&self) -> Rc<RefCell<Vec<String>>> {
        self.attempts.clone()
    }
}

impl TrajectoryLoader for CountingLoader {
    fn load(&self, name: &str) -> Result<Box<dyn Trajectory>, TrajLoadError> {
        self.attempts.borrow_mut().push(name.to_string());

        let duration_s = match self.durations.get(name) {
            Some(d) => *d,
            None => return Err(TrajLoadError::NotFound(PathBuf::from(name))),
        };

        let traj = ChoreoTrajectory::from_samples(
            name,
            vec![
                TrajSample {
                    t_s: 0.0,
                    position_m: Vector2::new(1.0, 1.0),
                    vel_ms: Vector2::new(1.0, 0.0),
                    ..Default::default()
                },
                TrajSample {
                    t_s: duration_s,
                    position_m: Vector2::new(1.0 + duration_s, 1.0),
                    vel_ms: Vector2::new(1.0, 0.0),
                    ..Default::default()
                },
            ],
            FieldParams::default(),
        )
        .map_err(|e| TrajLoadError::Malformed(name.to_string(), e.to_string()))?;

        match self.gaps.get(name) {
            Some(gap_s) => Ok(Box::new(GappyTrajectory {
                inner: traj,
                gap_s: *gap_s,
            })),
            None => Ok(Box::new(traj)),
        }
    }
}

impl Trajectory for GappyTrajectory {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn initial_pose(&self, mirror: bool) -> Option<Pose2> {
        self.inner.initial_pose(mirror)
    }

    fn total_duration_s(&self) -> f64 {
        self.inner.total_duration_s()
    }

    fn sample_at(&self, t_s: f64, mirror: bool) -> Option<TrajSample> {
        if t_s == self.gap_s {
            return None;
        }
        self.inner.sample_at(t_s, mirror)
    }
}

impl RecordingDrivetrain {
    pub fn last(&self) -> Option<DriveCmd> {
        self.cmds.last().copied()
    }

    /// Times of every sample followed so far.
    pub fn followed_times(&self) -> Vec<f64> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                DriveCmd::Follow(s) => Some(s.t_s),
                _ => None,
            })
            .collect()
    }

    pub fn num_follows(&self) -> usize {
        self.followed_times().len()
    }
}

impl Drivetrain for RecordingDrivetrain {
    fn drive(&mut self, forward_ms: f64, left_ms: f64, ccw_rads: f64) {
        self.cmds.push(DriveCmd::Drive {
            forward_ms,
            left_ms,
            ccw_rads,
        });
    }

    fn stop(&mut self) {
        self.cmds.push(DriveCmd::Stop);
    }

    fn brake(&mut self) {
        self.cmds.push(DriveCmd::Brake);
    }

    fn follow_trajectory(&mut self, sample: &TrajSample) {
        self.cmds.push(DriveCmd::Follow(*sample));
    }

    fn reset_pose(&mut self, pose: Pose2) {
        self.pose = pose;
        self.pose_resets.push(pose);
    }

    fn current_pose(&self) -> Pose2 {
        self.pose
    }
}

impl Harness {
    /// Create a harness whose store can load the given `(name, duration)` trajectories.
    ///
    /// The clock starts at zero and the alliance is blue.
    pub fn new(trajs: &[(&str, f64)]) -> Self {
        Self::with_loader(CountingLoader::new(trajs))
    }

    pub fn with_loader(loader: CountingLoader) -> Self {
        let attempts = loader.attempts();

        Self {
            store: TrajectoryStore::new(Box::new(loader)),
            drivetrain: RecordingDrivetrain::default(),
            alliance: Alliance::Blue,
            clock: SteppedClock::new(0.0),
            attempts,
        }
    }

    pub fn ctx(&mut self) -> AutoCtx<'_> {
        AutoCtx {
            store: &mut self.store,
            drivetrain: &mut self.drivetrain,
            alliance: &self.alliance,
            clock: &self.clock,
        }
    }

    pub fn attempted(&self) -> Vec<String> {
        self.attempts.borrow().clone()
    }
}
