//! # Robot Executable Parameters
//!
//! This module provides parameters for the robot executable, loaded from `robot_exec.toml`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use auto_if::Alliance;
use serde::Deserialize;
use util::logger::LogParams;

use crate::{
    auto::{choreo::FieldParams, just_leave::JustLeaveParams, SegmentFailurePolicy},
    sim_drivetrain::SimDrivetrainParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RobotExecParams {
    /// Target period of one cycle
    pub cycle_period_s: f64,

    /// Length of the autonomous period
    pub auto_duration_s: f64,

    /// Alliance to run for
    #[serde(default)]
    pub alliance: Alliance,

    /// Name of the autonomous mode to run, or `None` for the default mode
    #[serde(default)]
    pub auto_mode: Option<String>,

    /// Directory holding the trajectory files, relative to the software root
    pub deploy_dir: String,

    /// What sequences do when a segment's trajectory is missing
    #[serde(default)]
    pub segment_failure_policy: SegmentFailurePolicy,

    #[serde(default)]
    pub field: FieldParams,

    #[serde(default)]
    pub sim_drivetrain: SimDrivetrainParams,

    #[serde(default)]
    pub just_leave: JustLeaveParams,

    #[serde(default)]
    pub log: LogParams,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("The cycle period must be a positive number of seconds, got {0}")]
    InvalidCyclePeriod(f64),

    #[error("The autonomous period must be a non-negative number of seconds, got {0}")]
    InvalidAutoDuration(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RobotExecParams {
    /// Check the timing parameters can drive the main loop.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.cycle_period_s.is_finite() && self.cycle_period_s > 0.0) {
            return Err(ParamsError::InvalidCyclePeriod(self.cycle_period_s));
        }

        if !(self.auto_duration_s.is_finite() && self.auto_duration_s >= 0.0) {
            return Err(ParamsError::InvalidAutoDuration(self.auto_duration_s));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto::choreo::FieldSymmetry;

    #[test]
    fn test_parse() {
        let params: RobotExecParams = util::params::from_str(
            r#"
            cycle_period_s = 0.02
            auto_duration_s = 15.0
            alliance = "Red"
            deploy_dir = "deploy/choreo"

            [field]
            length_m = 16.0
            width_m = 8.0
            symmetry = "Reflective"

            [just_leave]
            wait_s = 1.0

            [log.module_levels]
            "robot_lib::sim_drivetrain" = "info"
            "#,
        )
        .unwrap();

        assert_eq!(params.alliance, Alliance::Red);
        assert_eq!(params.auto_mode, None);
        assert_eq!(params.field.symmetry, FieldSymmetry::Reflective);
        assert_eq!(params.just_leave.wait_s, 1.0);
        assert_eq!(params.just_leave.drive_s, 3.0);
        assert_eq!(
            params.segment_failure_policy,
            SegmentFailurePolicy::AbortSequence
        );
        assert!(params.sim_drivetrain.ideal_tracking);
        assert_eq!(params.log.level, util::logger::LevelFilter::Debug);
        assert_eq!(params.log.module_levels.len(), 1);
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn test_validate_timing() {
        let parse = |cycle: &str, duration: &str| -> RobotExecParams {
            util::params::from_str(&format!(
                "cycle_period_s = {}\nauto_duration_s = {}\ndeploy_dir = \"deploy\"\n",
                cycle, duration
            ))
            .unwrap()
        };

        assert_eq!(
            parse("0.0", "15.0").validate(),
            Err(ParamsError::InvalidCyclePeriod(0.0))
        );
        assert_eq!(
            parse("-0.02", "15.0").validate(),
            Err(ParamsError::InvalidCyclePeriod(-0.02))
        );

        let mut params = parse("0.02", "15.0");
        params.cycle_period_s = f64::NAN;
        assert!(matches!(
            params.validate(),
            Err(ParamsError::InvalidCyclePeriod(_))
        ));

        assert_eq!(
            parse("0.02", "-1.0").validate(),
            Err(ParamsError::InvalidAutoDuration(-1.0))
        );
        assert_eq!(parse("0.02", "0.0").validate(), Ok(()));
    }

    #[test]
    fn test_missing_required() {
        assert!(util::params::from_str::<RobotExecParams>("cycle_period_s = 0.02").is_err());
    }
}
