//! # Trajectory following
//!
//! The follow step is the same whether one trajectory is being run or one segment of a
//! sequence, so both state machines go through these functions.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use auto_if::Trajectory;
use log::warn;

use super::{alliance::mirror_flag, AutoCtx};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum FollowStatus {
    /// The trajectory is still being followed
    Following,

    /// The trajectory's duration has elapsed, nothing was commanded this cycle
    Finished,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Perform one cycle of following `traj`, which was started at clock time `start_s`.
///
/// Reaching exactly the trajectory's duration counts as finished. Otherwise `during_run` is
/// called with the elapsed and total times, then the trajectory is sampled and the sample sent
/// to the drivetrain. If no sample can be produced the drivetrain is stopped for this cycle.
pub(crate) fn follow_step<F>(
    traj: &dyn Trajectory,
    start_s: f64,
    ctx: &mut AutoCtx,
    during_run: F,
) -> FollowStatus
where
    F: FnOnce(f64, f64),
{
    let elapsed_s = ctx.now_s() - start_s;
    let total_s = traj.total_duration_s();

    if elapsed_s >= total_s {
        return FollowStatus::Finished;
    }

    during_run(elapsed_s, total_s);

    match traj.sample_at(elapsed_s, ctx.mirror()) {
        Some(sample) => ctx.drivetrain.follow_trajectory(&sample),
        None => {
            warn!(
                "Trajectory \"{}\" gave no sample at {:.3} s of {:.3} s, stopping",
                traj.name(),
                elapsed_s,
                total_s
            );
            ctx.drivetrain.stop();
        }
    }

    FollowStatus::Following
}

/// Reset the drivetrain's pose estimate to the start of `traj`, if it has one.
///
/// Starting from the wrong side of the field is an easy mistake to make, so the new pose is
/// always reported.
pub(crate) fn reset_to_initial_pose(traj: &dyn Trajectory, ctx: &mut AutoCtx) {
    let alliance = ctx.alliance.alliance();

    if let Some(pose) = traj.initial_pose(mirror_flag(alliance)) {
        ctx.drivetrain.reset_pose(pose);
        warn!(
            "ATTENTION: Starting pose set to {}, make sure that the right alliance is selected \
            (currently {})",
            pose, alliance
        );
    }
}
