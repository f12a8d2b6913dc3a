//! # Single trajectory runner
//!
//! Follows one named trajectory from start to finish, then holds the robot stopped. The runner
//! goes through three states:
//!
//! - `Start` - The trajectory is checked and the run timer started. If there is no trajectory
//!   (no name was configured, or it failed to load) the robot is stopped and the run completes.
//! - `Follow` - Each cycle the trajectory is sampled at the elapsed time and the sample is sent to
//!   the drivetrain, until the trajectory's duration has elapsed.
//! - `Complete` - The robot is stopped every cycle. The end hook is called on the first cycle.
//!
//! The state machine is reset by [`TrajRunner::on_enable`], so one runner may be used for many
//! autonomous periods.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{fmt, rc::Rc};

use auto_if::Trajectory;
use log::{debug, error, info};

use super::{
    follow::{follow_step, reset_to_initial_pose, FollowStatus},
    AutoCtx, StepAction,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Optional callbacks invoked by a [`TrajRunner`] over the course of a run.
#[derive(Default)]
pub struct RunnerHooks {
    /// Called once at enable, after the pose has been reset.
    pub on_start: Option<Box<dyn FnMut()>>,

    /// Called every following cycle with the elapsed and total times, before sampling.
    pub during_run: Option<Box<dyn FnMut(f64, f64)>>,

    /// Called once when the run completes, whether the trajectory was followed or not.
    pub on_end: Option<Box<dyn FnMut()>>,
}

pub struct TrajRunner {
    /// Name of the trajectory to follow
    traj_name: Option<String>,

    hooks: RunnerHooks,

    /// The trajectory resolved at enable, `None` if it couldn't be resolved
    traj: Option<Rc<dyn Trajectory>>,

    state: RunnerState,

    end_hook_called: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RunnerState {
    Start,

    /// Following the trajectory, which was started at clock time `start_s`.
    Follow {
        start_s: f64,
    },

    Complete,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TrajRunner {
    /// Create a runner for the named trajectory.
    ///
    /// A runner without a name is allowed, but will only ever stop the robot. An empty name is
    /// the same as no name.
    pub fn new(traj_name: Option<&str>, hooks: RunnerHooks) -> Self {
        Self {
            traj_name: traj_name.filter(|n| !n.is_empty()).map(String::from),
            hooks,
            traj: None,
            state: RunnerState::Start,
            end_hook_called: false,
        }
    }

    pub fn traj_name(&self) -> Option<&str> {
        self.traj_name.as_deref()
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == RunnerState::Complete
    }

    /// Prepare a new run.
    ///
    /// The trajectory is resolved through the store, the drivetrain pose is reset to the start of
    /// the trajectory, and the start hook is called.
    pub fn on_enable(&mut self, ctx: &mut AutoCtx) {
        self.state = RunnerState::Start;
        self.end_hook_called = false;

        self.traj = match self.traj_name {
            Some(ref name) => ctx.store.resolve(name).into(),
            None => {
                error!("Trajectory runner has no trajectory name set, the robot will not move");
                None
            }
        };

        if let Some(ref traj) = self.traj {
            reset_to_initial_pose(traj.as_ref(), ctx);
        }

        if let Some(ref mut on_start) = self.hooks.on_start {
            on_start();
        }
    }

    /// Step the runner for one control cycle.
    pub fn tick(&mut self, ctx: &mut AutoCtx) {
        loop {
            let action = match self.state {
                RunnerState::Start => self.step_start(ctx),
                RunnerState::Follow { start_s } => self.step_follow(start_s, ctx),
                RunnerState::Complete => self.step_complete(ctx),
            };

            match action {
                StepAction::Stay => break,
                StepAction::Next(state) => {
                    debug!("TrajRunner {} -> {}", self.state, state);
                    self.state = state;
                }
                StepAction::NextCycle(state) => {
                    debug!("TrajRunner {} -> {} (next cycle)", self.state, state);
                    self.state = state;
                    break;
                }
            }
        }
    }

    fn step_start(&mut self, ctx: &mut AutoCtx) -> StepAction<RunnerState> {
        match self.traj {
            Some(_) => StepAction::Next(RunnerState::Follow {
                start_s: ctx.now_s(),
            }),
            None => {
                ctx.drivetrain.stop();
                StepAction::Next(RunnerState::Complete)
            }
        }
    }

    fn step_follow(&mut self, start_s: f64, ctx: &mut AutoCtx) -> StepAction<RunnerState> {
        let traj = match self.traj {
            Some(ref t) => t.clone(),
            None => return StepAction::Next(RunnerState::Complete),
        };
        let during_run = &mut self.hooks.during_run;

        let status = follow_step(traj.as_ref(), start_s, ctx, |elapsed_s, total_s| {
            if let Some(f) = during_run {
                f(elapsed_s, total_s);
            }
        });

        match status {
            FollowStatus::Following => StepAction::Stay,
            FollowStatus::Finished => StepAction::Next(RunnerState::Complete),
        }
    }

    fn step_complete(&mut self, ctx: &mut AutoCtx) -> StepAction<RunnerState> {
        ctx.drivetrain.stop();

        if !self.end_hook_called {
            self.end_hook_called = true;

            match self.traj {
                Some(ref t) => info!("Trajectory \"{}\" complete", t.name()),
                None => info!("Trajectory run complete without following a trajectory"),
            }

            if let Some(ref mut on_end) = self.hooks.on_end {
                on_end();
            }
        }

        StepAction::Stay
    }
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerState::Start => write!(f, "Start"),
            RunnerState::Follow { .. } => write!(f, "Follow"),
            RunnerState::Complete => write!(f, "Complete"),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto::test_utils::{CountingLoader, Harness};
    use auto_if::{Alliance, DriveCmd, Drivetrain};
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Start,
        During(f64, f64),
        End,
    }

    fn recording_hooks() -> (RunnerHooks, Rc<RefCell<Vec<Event>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));

        let e = events.clone();
        let on_start: Box<dyn FnMut()> = Box::new(move || e.borrow_mut().push(Event::Start));
        let e = events.clone();
        let during_run: Box<dyn FnMut(f64, f64)> =
            Box::new(move |el, tot| e.borrow_mut().push(Event::During(el, tot)));
        let e = events.clone();
        let on_end: Box<dyn FnMut()> = Box::new(move || e.borrow_mut().push(Event::End));

        let hooks = RunnerHooks {
            on_start: Some(on_start),
            during_run: Some(during_run),
            on_end: Some(on_end),
        };

        (hooks, events)
    }

    #[test]
    fn test_hook_ordering() {
        let mut h = Harness::new(&[("A", 2.0)]);
        let (hooks, events) = recording_hooks();
        let mut runner = TrajRunner::new(Some("A"), hooks);

        runner.on_enable(&mut h.ctx());
        assert_eq!(*events.borrow(), vec![Event::Start]);

        for t in [0.0, 1.0, 2.0].iter() {
            h.clock.set(*t);
            runner.tick(&mut h.ctx());
        }

        assert_eq!(
            *events.borrow(),
            vec![
                Event::Start,
                Event::During(0.0, 2.0),
                Event::During(1.0, 2.0),
                Event::End
            ]
        );
        assert!(runner.is_complete());
        assert_eq!(h.drivetrain.followed_times(), vec![0.0, 1.0]);

        // Completion is sticky, the end hook is never repeated and the robot stays stopped
        for t in [3.0, 4.0, 5.0].iter() {
            h.clock.set(*t);
            runner.tick(&mut h.ctx());
            assert_eq!(h.drivetrain.last(), Some(DriveCmd::Stop));
        }
        assert_eq!(events.borrow().len(), 4);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let mut h = Harness::new(&[("A", 2.0)]);
        let mut runner = TrajRunner::new(Some("A"), RunnerHooks::default());

        h.clock.set(10.0);
        runner.on_enable(&mut h.ctx());
        runner.tick(&mut h.ctx());
        assert!(matches!(runner.state(), RunnerState::Follow { .. }));

        h.clock.set(12.0);
        runner.tick(&mut h.ctx());
        assert!(runner.is_complete());
        assert_eq!(h.drivetrain.last(), Some(DriveCmd::Stop));
        assert_eq!(h.drivetrain.num_follows(), 1);
    }

    #[test]
    fn test_load_failure_stops() {
        let mut h = Harness::new(&[]);
        let (hooks, events) = recording_hooks();
        let mut runner = TrajRunner::new(Some("missing"), hooks);

        runner.on_enable(&mut h.ctx());
        runner.tick(&mut h.ctx());

        assert!(runner.is_complete());
        assert_eq!(h.drivetrain.num_follows(), 0);
        assert_eq!(h.drivetrain.last(), Some(DriveCmd::Stop));
        assert!(h.drivetrain.pose_resets.is_empty());
        assert_eq!(*events.borrow(), vec![Event::Start, Event::End]);

        // Re-enabling doesn't retry the load
        runner.on_enable(&mut h.ctx());
        runner.tick(&mut h.ctx());
        assert_eq!(h.attempted(), vec![String::from("missing")]);
    }

    #[test]
    fn test_no_name_stops() {
        let mut h = Harness::new(&[("A", 1.0)]);
        let mut runner = TrajRunner::new(None, RunnerHooks::default());

        runner.on_enable(&mut h.ctx());
        runner.tick(&mut h.ctx());

        assert!(runner.is_complete());
        assert_eq!(h.drivetrain.cmds, vec![DriveCmd::Stop, DriveCmd::Stop]);
        assert!(h.attempted().is_empty());
    }

    #[test]
    fn test_empty_name_stops() {
        let mut h = Harness::new(&[("A", 1.0)]);
        let mut runner = TrajRunner::new(Some(""), RunnerHooks::default());
        assert_eq!(runner.traj_name(), None);

        runner.on_enable(&mut h.ctx());
        runner.tick(&mut h.ctx());

        assert!(runner.is_complete());
        assert_eq!(h.drivetrain.last(), Some(DriveCmd::Stop));
        assert!(h.attempted().is_empty());
    }

    #[test]
    fn test_missing_sample_stops_for_one_cycle() {
        let mut h = Harness::with_loader(CountingLoader::new(&[("A", 3.0)]).with_gap("A", 1.0));
        let mut runner = TrajRunner::new(Some("A"), RunnerHooks::default());

        runner.on_enable(&mut h.ctx());

        h.clock.set(0.0);
        runner.tick(&mut h.ctx());
        assert_eq!(runner.state(), RunnerState::Follow { start_s: 0.0 });
        assert!(matches!(h.drivetrain.last(), Some(DriveCmd::Follow(_))));

        // No sample: stop this cycle, but keep following
        h.clock.set(1.0);
        runner.tick(&mut h.ctx());
        assert_eq!(runner.state(), RunnerState::Follow { start_s: 0.0 });
        assert_eq!(h.drivetrain.last(), Some(DriveCmd::Stop));

        h.clock.set(2.0);
        runner.tick(&mut h.ctx());
        assert_eq!(runner.state(), RunnerState::Follow { start_s: 0.0 });
        assert_eq!(h.drivetrain.followed_times(), vec![0.0, 2.0]);

        h.clock.set(3.0);
        runner.tick(&mut h.ctx());
        assert!(runner.is_complete());
        assert_eq!(h.drivetrain.last(), Some(DriveCmd::Stop));
    }

    #[test]
    fn test_pose_reset_is_mirrored() {
        let mut h = Harness::new(&[("A", 1.0)]);
        let mut runner = TrajRunner::new(Some("A"), RunnerHooks::default());

        runner.on_enable(&mut h.ctx());
        let blue = h.drivetrain.current_pose();

        h.alliance = Alliance::Red;
        runner.on_enable(&mut h.ctx());
        let red = h.drivetrain.current_pose();

        assert_eq!(h.drivetrain.pose_resets.len(), 2);
        assert_eq!(blue, auto_if::Pose2::new(1.0, 1.0, 0.0));
        assert_ne!(red, blue);

        // Samples follow the alliance too
        runner.tick(&mut h.ctx());
        match h.drivetrain.last() {
            Some(DriveCmd::Follow(s)) => assert!(s.position_m.x > 10.0),
            c => panic!("Expected a follow command, got {:?}", c),
        }
    }

    #[test]
    fn test_reenable_restarts() {
        let mut h = Harness::new(&[("A", 1.0)]);
        let (hooks, events) = recording_hooks();
        let mut runner = TrajRunner::new(Some("A"), hooks);

        runner.on_enable(&mut h.ctx());
        runner.tick(&mut h.ctx());
        h.clock.set(1.0);
        runner.tick(&mut h.ctx());
        assert!(runner.is_complete());

        h.clock.set(5.0);
        runner.on_enable(&mut h.ctx());
        assert_eq!(runner.state(), RunnerState::Start);
        runner.tick(&mut h.ctx());
        assert_eq!(runner.state(), RunnerState::Follow { start_s: 5.0 });

        h.clock.set(6.0);
        runner.tick(&mut h.ctx());

        let ends = events.borrow().iter().filter(|e| **e == Event::End).count();
        assert_eq!(ends, 2);
        assert_eq!(h.attempted().len(), 1);
    }
}
