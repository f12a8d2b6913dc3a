//! # Trajectory sequencer
//!
//! Runs a plan of trajectory segments one after another, with an optional action between each
//! segment and the next (for example running an intake or a shooter). The plan is requested from
//! the sequence definition every time the sequencer is enabled.
//!
//! Segments are loaded as they are reached. What happens when a segment's trajectory can't be
//! loaded is decided by the [`SegmentFailurePolicy`] of the definition.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{fmt, rc::Rc};

use auto_if::Trajectory;
use log::{debug, info, warn};
use serde::Deserialize;

use super::{
    follow::{follow_step, reset_to_initial_pose, FollowStatus},
    AutoCtx, StepAction, TrajectoryStore,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// One step of a plan, a trajectory to follow and an action to run once it's finished.
pub struct RunSegment {
    pub traj_name: String,

    pub action: Option<Box<dyn FnMut()>>,
}

/// Describes a sequenced autonomous routine.
pub struct SequenceDef {
    /// Builds the plan to run, called once per enable.
    pub provide_segments: Box<dyn FnMut() -> Plan>,

    /// Called once at enable, after the pose has been reset.
    pub on_start: Option<Box<dyn FnMut()>>,

    /// Called every following cycle with the segment index, the segment's trajectory name, and
    /// the elapsed and total times of the segment.
    pub during_run: Option<Box<dyn FnMut(usize, &str, f64, f64)>>,

    /// Called once when the sequence is complete.
    pub on_end: Option<Box<dyn FnMut()>>,

    pub failure_policy: SegmentFailurePolicy,
}

pub struct TrajSequencer {
    def: SequenceDef,

    /// The plan for the current run
    plan: Plan,

    /// Trajectory of the segment being started or followed
    traj: Option<Rc<dyn Trajectory>>,

    state: SeqState,

    end_hook_called: bool,
}

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// An ordered list of segments, followed from first to last.
pub type Plan = Vec<RunSegment>;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SeqState {
    /// About to start following the given segment.
    Start(usize),

    /// Following a segment which was started at clock time `start_s`.
    Follow { segment: usize, start_s: f64 },

    /// The given segment has been followed and its action must run.
    RunAction(usize),

    AllComplete,
}

/// What to do when a segment's trajectory can't be loaded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum SegmentFailurePolicy {
    /// Stop the robot and end the sequence, no later segment is loaded.
    AbortSequence,

    /// Skip the segment and its action, and carry on with the next segment which loads.
    SkipSegment,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RunSegment {
    /// A segment with no action.
    pub fn new(traj_name: &str) -> Self {
        Self {
            traj_name: traj_name.to_string(),
            action: None,
        }
    }

    /// A segment which runs `action` once its trajectory has been followed.
    pub fn with_action<F>(traj_name: &str, action: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self {
            traj_name: traj_name.to_string(),
            action: Some(Box::new(action)),
        }
    }
}

impl fmt::Debug for RunSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunSegment")
            .field("traj_name", &self.traj_name)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

impl Default for SegmentFailurePolicy {
    fn default() -> Self {
        SegmentFailurePolicy::AbortSequence
    }
}

impl SequenceDef {
    /// A definition with no hooks and the default failure policy.
    pub fn new<F>(provide_segments: F) -> Self
    where
        F: FnMut() -> Plan + 'static,
    {
        Self {
            provide_segments: Box::new(provide_segments),
            on_start: None,
            during_run: None,
            on_end: None,
            failure_policy: SegmentFailurePolicy::default(),
        }
    }
}

impl TrajSequencer {
    pub fn new(def: SequenceDef) -> Self {
        Self {
            def,
            plan: Vec::new(),
            traj: None,
            state: SeqState::AllComplete,
            end_hook_called: false,
        }
    }

    pub fn state(&self) -> SeqState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SeqState::AllComplete
    }

    /// Index of the segment currently in progress, if any.
    pub fn current_segment(&self) -> Option<usize> {
        match self.state {
            SeqState::Start(i) | SeqState::RunAction(i) => Some(i),
            SeqState::Follow { segment, .. } => Some(segment),
            SeqState::AllComplete => None,
        }
    }

    /// Number of segments in the current plan.
    pub fn num_segments(&self) -> usize {
        self.plan.len()
    }

    /// Prepare a new run.
    ///
    /// A new plan is requested from the definition, the first segment is loaded, the drivetrain's
    /// pose is reset to the start of that segment, and the start hook is called.
    pub fn on_enable(&mut self, ctx: &mut AutoCtx) {
        self.plan = (self.def.provide_segments)();
        self.end_hook_called = false;

        info!(
            "Starting sequence of {} segment(s): [{}]",
            self.plan.len(),
            self.plan
                .iter()
                .map(|s| s.traj_name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        match self.load_segment(ctx.store, 0) {
            Some((i, traj)) => {
                reset_to_initial_pose(traj.as_ref(), ctx);
                self.traj = Some(traj);
                self.state = SeqState::Start(i);
            }
            None => {
                self.traj = None;
                self.state = SeqState::Start(0);
            }
        }

        if let Some(ref mut on_start) = self.def.on_start {
            on_start();
        }
    }

    /// Step the sequencer for one control cycle.
    pub fn tick(&mut self, ctx: &mut AutoCtx) {
        loop {
            let action = match self.state {
                SeqState::Start(i) => self.step_start(i, ctx),
                SeqState::Follow { segment, start_s } => self.step_follow(segment, start_s, ctx),
                SeqState::RunAction(i) => self.step_run_action(i, ctx),
                SeqState::AllComplete => self.step_all_complete(ctx),
            };

            match action {
                StepAction::Stay => break,
                StepAction::Next(state) => {
                    debug!("TrajSequencer {} -> {}", self.state, state);
                    self.state = state;
                }
                StepAction::NextCycle(state) => {
                    debug!("TrajSequencer {} -> {} (next cycle)", self.state, state);
                    self.state = state;
                    break;
                }
            }
        }
    }

    fn step_start(&mut self, segment: usize, ctx: &mut AutoCtx) -> StepAction<SeqState> {
        match self.traj {
            Some(_) => {
                info!(
                    "Starting segment {} (\"{}\")",
                    segment, self.plan[segment].traj_name
                );
                StepAction::Next(SeqState::Follow {
                    segment,
                    start_s: ctx.now_s(),
                })
            }
            None => {
                ctx.drivetrain.stop();
                StepAction::Next(SeqState::AllComplete)
            }
        }
    }

    fn step_follow(
        &mut self,
        segment: usize,
        start_s: f64,
        ctx: &mut AutoCtx,
    ) -> StepAction<SeqState> {
        let traj = match self.traj {
            Some(ref t) => t.clone(),
            None => return StepAction::Next(SeqState::AllComplete),
        };
        let traj_name = self.plan[segment].traj_name.as_str();
        let during_run = &mut self.def.during_run;

        let status = follow_step(traj.as_ref(), start_s, ctx, |elapsed_s, total_s| {
            if let Some(f) = during_run {
                f(segment, traj_name, elapsed_s, total_s);
            }
        });

        match status {
            FollowStatus::Following => StepAction::Stay,
            FollowStatus::Finished => StepAction::Next(SeqState::RunAction(segment)),
        }
    }

    fn step_run_action(&mut self, segment: usize, ctx: &mut AutoCtx) -> StepAction<SeqState> {
        ctx.drivetrain.stop();

        if let Some(ref mut action) = self.plan[segment].action {
            info!("Running action for segment {}", segment);
            action();
        }

        match self.load_segment(ctx.store, segment + 1) {
            Some((next, traj)) => {
                self.traj = Some(traj);
                StepAction::NextCycle(SeqState::Start(next))
            }
            None => {
                self.traj = None;
                StepAction::Next(SeqState::AllComplete)
            }
        }
    }

    fn step_all_complete(&mut self, ctx: &mut AutoCtx) -> StepAction<SeqState> {
        ctx.drivetrain.stop();

        if !self.end_hook_called {
            self.end_hook_called = true;
            info!("Sequence complete");

            if let Some(ref mut on_end) = self.def.on_end {
                on_end();
            }
        }

        StepAction::Stay
    }

    /// Load the first segment at or after `from` which can be followed.
    ///
    /// Returns `None` if the plan has run out, or if a segment failed to load and the policy is
    /// to abort.
    fn load_segment(
        &self,
        store: &mut TrajectoryStore,
        from: usize,
    ) -> Option<(usize, Rc<dyn Trajectory>)> {
        for (i, segment) in self.plan.iter().enumerate().skip(from) {
            let traj: Option<Rc<dyn Trajectory>> = store.resolve(&segment.traj_name).into();

            match (traj, self.def.failure_policy) {
                (Some(t), _) => return Some((i, t)),
                (None, SegmentFailurePolicy::AbortSequence) => {
                    warn!(
                        "Trajectory for segment {} (\"{}\") is unavailable, ending the sequence",
                        i, segment.traj_name
                    );
                    return None;
                }
                (None, SegmentFailurePolicy::SkipSegment) => {
                    warn!(
                        "Trajectory for segment {} (\"{}\") is unavailable, skipping it",
                        i, segment.traj_name
                    );
                }
            }
        }

        None
    }
}

impl fmt::Display for SeqState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqState::Start(i) => write!(f, "Start({})", i),
            SeqState::Follow { segment, .. } => write!(f, "Follow({})", segment),
            SeqState::RunAction(i) => write!(f, "RunAction({})", i),
            SeqState::AllComplete => write!(f, "AllComplete"),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
