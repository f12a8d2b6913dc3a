//! # Defines the autonomy run report

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use auto_if::{Alliance, Pose2};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AutoMode, TrajectoryStore};
use crate::sim_drivetrain::DriveStats;

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// Summary of one autonomous period, saved into the session at the end of the run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AutoTm {
    /// Name of the mode which was run
    pub mode: Option<String>,

    pub alliance: Alliance,

    pub start_time: Option<DateTime<Utc>>,

    pub end_time: Option<DateTime<Utc>>,

    pub num_cycles: u64,

    pub num_cycle_overruns: u64,

    /// State the mode was in when the period ended
    pub final_state: Option<String>,

    /// Whether the mode had finished before the period ended
    pub finished: bool,

    pub final_pose: Option<Pose2>,

    pub num_traj_load_attempts: usize,

    pub num_traj_loaded: usize,

    pub drive_stats: DriveStats,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl AutoTm {
    /// Start a report for a run of `mode`.
    pub fn new(mode: &AutoMode, alliance: Alliance) -> Self {
        Self {
            mode: Some(mode.name().to_string()),
            alliance,
            start_time: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Fill in the end of run information.
    pub fn finish(
        &mut self,
        mode: &AutoMode,
        store: &TrajectoryStore,
        final_pose: Pose2,
        drive_stats: DriveStats,
    ) {
        self.end_time = Some(Utc::now());
        self.final_state = Some(mode.state_str());
        self.finished = mode.is_finished();
        self.final_pose = Some(final_pose);
        self.num_traj_load_attempts = store.num_load_attempts();
        self.num_traj_loaded = store.num_loaded();
        self.drive_stats = drive_stats;
    }
}
