//! # Just Leave
//!
//! The fallback autonomous routine, used when no trajectory can be trusted. It waits to give the
//! other robots on the alliance time to run their own routines, then drives straight forward for
//! a fixed time to leave the starting area.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use log::{debug, info};
use serde::Deserialize;

use super::{AutoCtx, StepAction};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct JustLeaveParams {
    /// Time to wait before moving
    pub wait_s: f64,

    /// Time to spend driving forward
    pub drive_s: f64,

    /// Speed to drive forward at
    pub forward_speed_ms: f64,
}

pub struct JustLeave {
    params: JustLeaveParams,

    state: JustLeaveState,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum JustLeaveState {
    /// Holding still, the wait started at `start_s`.
    Wait { start_s: f64 },

    /// Driving forward, started at `start_s`.
    Go { start_s: f64 },

    Done,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for JustLeaveParams {
    fn default() -> Self {
        Self {
            wait_s: 5.0,
            drive_s: 3.0,
            forward_speed_ms: 1.0,
        }
    }
}

impl JustLeave {
    pub fn new(params: JustLeaveParams) -> Self {
        Self {
            params,
            state: JustLeaveState::Done,
        }
    }

    pub fn state(&self) -> JustLeaveState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == JustLeaveState::Done
    }

    pub fn on_enable(&mut self, ctx: &mut AutoCtx) {
        info!(
            "Leaving in {:.1} s, driving at {:.2} m/s for {:.1} s",
            self.params.wait_s, self.params.forward_speed_ms, self.params.drive_s
        );
        self.state = JustLeaveState::Wait {
            start_s: ctx.now_s(),
        };
    }

    pub fn tick(&mut self, ctx: &mut AutoCtx) {
        loop {
            let action = match self.state {
                JustLeaveState::Wait { start_s } => {
                    if ctx.now_s() - start_s >= self.params.wait_s {
                        StepAction::Next(JustLeaveState::Go {
                            start_s: ctx.now_s(),
                        })
                    } else {
                        ctx.drivetrain.stop();
                        StepAction::Stay
                    }
                }
                JustLeaveState::Go { start_s } => {
                    if ctx.now_s() - start_s >= self.params.drive_s {
                        StepAction::Next(JustLeaveState::Done)
                    } else {
                        ctx.drivetrain.drive(self.params.forward_speed_ms, 0.0, 0.0);
                        StepAction::Stay
                    }
                }
                JustLeaveState::Done => {
                    ctx.drivetrain.stop();
                    StepAction::Stay
                }
            };

            match action {
                StepAction::Stay => break,
                StepAction::Next(state) | StepAction::NextCycle(state) => {
                    debug!("JustLeave {} -> {}", self.state, state);
                    self.state = state;
                }
            }
        }
    }
}

impl fmt::Display for JustLeaveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JustLeaveState::Wait { .. } => write!(f, "Wait"),
            JustLeaveState::Go { .. } => write!(f, "Go"),
            JustLeaveState::Done => write!(f, "Done"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto::test_utils::Harness;
    use auto_if::DriveCmd;

    #[test]
    fn test_phases() {
        let mut h = Harness::new(&[]);
        let mut jl = JustLeave::new(JustLeaveParams::default());

        h.clock.set(100.0);
        jl.on_enable(&mut h.ctx());

        let mut tick_at = |h: &mut Harness, t: f64| {
            h.clock.set(100.0 + t);
            jl.tick(&mut h.ctx());
            h.drivetrain.last()
        };

        assert_eq!(tick_at(&mut h, 0.0), Some(DriveCmd::Stop));
        assert_eq!(tick_at(&mut h, 4.9), Some(DriveCmd::Stop));

        let go = Some(DriveCmd::Drive {
            forward_ms: 1.0,
            left_ms: 0.0,
            ccw_rads: 0.0,
        });
        assert_eq!(tick_at(&mut h, 5.0), go);
        assert_eq!(tick_at(&mut h, 7.9), go);
        assert_eq!(tick_at(&mut h, 8.0), Some(DriveCmd::Stop));
        assert_eq!(tick_at(&mut h, 20.0), Some(DriveCmd::Stop));

        assert!(jl.is_done());
        assert!(h.attempted().is_empty());
    }

    #[test]
    fn test_params_from_toml() {
        let params: JustLeaveParams = util::params::from_str("wait_s = 0.0\n").unwrap();

        assert_eq!(params.wait_s, 0.0);
        assert_eq!(params.drive_s, 3.0);
    }
}
