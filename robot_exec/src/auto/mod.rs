//! # Autonomy Module
//!
//! This module provides the autonomous routines of the robot. Every routine is a small state
//! machine which is stepped once per control cycle by the executable, between an `on_enable` at
//! the start of the autonomous period and an `on_disable` at its end.
//!
//! Routines don't own any of the things they command. Everything they need for a cycle is passed
//! in through an [`AutoCtx`], which keeps the trajectory cache, the drivetrain and the alliance
//! explicit dependencies of each step.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Alliance to mirror flag resolution
pub mod alliance;

/// Autonomous mode wrapper and mode selection
pub mod auto_mode;

/// Choreo trajectory files
pub mod choreo;

/// Logic shared by every trajectory-following state
mod follow;

/// Timed drive-forward routine
pub mod just_leave;

/// Built-in autonomous routines
pub mod routines;

/// Single trajectory runner state machine
pub mod runner;

/// Multi-trajectory sequencer state machine
pub mod sequencer;

/// Trajectory cache
pub mod traj_store;

/// Autonomy telemetry
pub mod tm;

#[cfg(test)]
pub(crate) mod test_utils;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use auto_if::{AllianceSource, Clock, Drivetrain};

pub use alliance::mirror_flag;
pub use auto_mode::{AutoMode, AutoSelector, Routine, SelectorError};
pub use runner::{RunnerHooks, RunnerState, TrajRunner};
pub use sequencer::{
    Plan, RunSegment, SegmentFailurePolicy, SeqState, SequenceDef, TrajSequencer,
};
pub use traj_store::{TrajLoadError, TrajectoryHandle, TrajectoryLoader, TrajectoryStore};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Everything an autonomous routine may use during a single cycle.
pub struct AutoCtx<'a> {
    /// The shared trajectory cache
    pub store: &'a mut TrajectoryStore,

    /// The drivetrain to command
    pub drivetrain: &'a mut dyn Drivetrain,

    /// Where to read the current alliance from
    pub alliance: &'a dyn AllianceSource,

    /// Clock used to time trajectories
    pub clock: &'a dyn Clock,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// What a state machine should do after stepping one of its states.
#[derive(Debug)]
pub(crate) enum StepAction<S> {
    /// Remain in the current state, the cycle is over.
    Stay,

    /// Switch to the given state and step it in this same cycle.
    Next(S),

    /// Switch to the given state but don't step it until the next cycle.
    NextCycle(S),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<'a> AutoCtx<'a> {
    /// Whether trajectories should be mirrored right now.
    ///
    /// The alliance is read each time this is called.
    pub fn mirror(&self) -> bool {
        mirror_flag(self.alliance.alliance())
    }

    pub fn now_s(&self) -> f64 {
        self.clock.now_s()
    }
}
