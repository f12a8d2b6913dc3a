//! # Built-in autonomous routines
//!
//! Trajectories are loaded by name from the deploy directory, so adding a routine here also means
//! deploying the `.traj` files it names.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, trace};

use super::{
    just_leave::{JustLeave, JustLeaveParams},
    AutoSelector, Plan, Routine, RunSegment, RunnerHooks, SegmentFailurePolicy, SelectorError,
    SequenceDef, TrajRunner, TrajSequencer,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

pub const SASSY_SWERVE_SLIDE: &str = "Some Sassy Swerve Slide";

pub const JUST_LEAVE: &str = "Just Leave";

pub const TWO_PIECE_CHOREO: &str = "Two Piece Choreo";

/// Trajectory followed by [`SASSY_SWERVE_SLIDE`].
pub const NEUTRAL_ZONE_TRAJ: &str = "DriveToNeutralZone";

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build a selector holding every built-in mode.
///
/// [`SASSY_SWERVE_SLIDE`] is the default.
pub fn builtin_selector(
    just_leave: JustLeaveParams,
    failure_policy: SegmentFailurePolicy,
) -> Result<AutoSelector, SelectorError> {
    let mut selector = AutoSelector::new();

    selector.register(SASSY_SWERVE_SLIDE, true, sassy_swerve_slide)?;
    selector.register(JUST_LEAVE, false, move || {
        Routine::Timed(JustLeave::new(just_leave))
    })?;
    selector.register(TWO_PIECE_CHOREO, false, move || {
        two_piece_choreo(failure_policy)
    })?;

    Ok(selector)
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Drive out of the starting area into the neutral zone.
fn sassy_swerve_slide() -> Routine {
    let hooks = RunnerHooks {
        on_start: Some(Box::new(|| info!("Sliding to the neutral zone"))),
        during_run: None,
        on_end: Some(Box::new(|| info!("Arrived in the neutral zone"))),
    };

    Routine::Trajectory(TrajRunner::new(Some(NEUTRAL_ZONE_TRAJ), hooks))
}

/// Collect and score two game pieces.
fn two_piece_choreo(failure_policy: SegmentFailurePolicy) -> Routine {
    let mut def = SequenceDef::new(two_piece_plan);

    def.during_run = Some(Box::new(
        |segment: usize, name: &str, elapsed_s: f64, total_s: f64| {
            trace!(
                "Segment {} ({}) {:.2}/{:.2} s",
                segment,
                name,
                elapsed_s,
                total_s
            )
        },
    ));
    def.failure_policy = failure_policy;

    Routine::Sequence(Box::new(TrajSequencer::new(def)))
}

fn two_piece_plan() -> Plan {
    vec![
        RunSegment::with_action("start_to_piece1", intake_piece),
        RunSegment::with_action("piece1_to_speaker", score_piece),
        RunSegment::with_action("speaker_to_piece2", intake_piece),
        RunSegment::with_action("piece2_to_speaker", score_piece),
    ]
}

fn intake_piece() {
    info!("Intaking game piece");
}

fn score_piece() {
    info!("Scoring game piece");
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto::{test_utils::Harness, SeqState};
    use auto_if::DriveCmd;

    fn selector() -> AutoSelector {
        builtin_selector(JustLeaveParams::default(), SegmentFailurePolicy::default()).unwrap()
    }

    #[test]
    fn test_builtin_modes() {
        let sel = selector();

        assert_eq!(
            sel.names(),
            vec![SASSY_SWERVE_SLIDE, JUST_LEAVE, TWO_PIECE_CHOREO]
        );
        assert_eq!(sel.default_name(), Some(SASSY_SWERVE_SLIDE));

        match sel.select(None).unwrap().routine() {
            Routine::Trajectory(r) => assert_eq!(r.traj_name(), Some(NEUTRAL_ZONE_TRAJ)),
            _ => panic!("Default mode should follow a single trajectory"),
        }
    }

    #[test]
    fn test_two_piece_runs_all_segments() {
        let mut h = Harness::new(&[
            ("start_to_piece1", 1.0),
            ("piece1_to_speaker", 1.0),
            ("speaker_to_piece2", 1.0),
            ("piece2_to_speaker", 1.0),
        ]);
        let mut mode = selector().select(Some(TWO_PIECE_CHOREO)).unwrap();

        mode.on_enable(&mut h.ctx());
        for t in 0..10 {
            h.clock.set(t as f64);
            mode.tick(&mut h.ctx());
        }

        assert!(mode.is_finished());
        assert_eq!(h.attempted().len(), 4);
        assert_eq!(h.drivetrain.num_follows(), 4);
        match mode.routine() {
            Routine::Sequence(s) => assert_eq!(s.state(), SeqState::AllComplete),
            _ => panic!("Two Piece Choreo should be a sequence"),
        }

        mode.on_disable(&mut h.ctx());
        assert_eq!(h.drivetrain.last(), Some(DriveCmd::Stop));
    }

    #[test]
    fn test_default_mode_without_trajectory() {
        let mut h = Harness::new(&[]);
        let mut mode = selector().select(Some("Not A Mode")).unwrap();
        assert_eq!(mode.name(), SASSY_SWERVE_SLIDE);

        mode.on_enable(&mut h.ctx());
        mode.tick(&mut h.ctx());

        assert!(mode.is_finished());
        assert_eq!(h.drivetrain.num_follows(), 0);
        assert_eq!(h.attempted(), vec![NEUTRAL_ZONE_TRAJ]);
    }
}
