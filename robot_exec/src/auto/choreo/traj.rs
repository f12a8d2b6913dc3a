//! # Choreo trajectory
//!
//! Trajectories are generated offline by Choreo and deployed as `.traj` JSON files. Only the
//! sample list is used, everything else in the file (waypoints, constraints, module forces,
//! events) is ignored.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use auto_if::{Pose2, TrajSample, Trajectory};
use log::warn;
use nalgebra::Vector2;
use serde::Deserialize;
use util::maths::{lerp, lerp_angle};

use super::FieldParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A trajectory made up of time-ordered samples, sampled by linear interpolation.
#[derive(Debug, Clone)]
pub struct ChoreoTrajectory {
    name: String,

    samples: Vec<TrajSample>,

    /// Field used to mirror the trajectory for the red alliance
    field: FieldParams,
}

/// Top level of a `.traj` file.
#[derive(Deserialize)]
struct TrajFile {
    #[serde(default)]
    name: Option<String>,

    trajectory: TrajFileBody,
}

#[derive(Deserialize)]
struct TrajFileBody {
    #[serde(default)]
    samples: Vec<TrajFileSample>,
}

/// A swerve sample as written by Choreo.
#[derive(Deserialize)]
struct TrajFileSample {
    t: f64,
    x: f64,
    y: f64,
    heading: f64,
    #[serde(default)]
    vx: f64,
    #[serde(default)]
    vy: f64,
    #[serde(default)]
    omega: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ChoreoError {
    #[error("Could not parse the trajectory file: {0}")]
    ParseError(serde_json::Error),

    #[error("Sample {0} contains a non-finite value")]
    NonFiniteSample(usize),

    #[error("Sample {0} is earlier than the sample before it")]
    SamplesOutOfOrder(usize),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ChoreoTrajectory {
    /// Parse a trajectory from the contents of a `.traj` file.
    ///
    /// `name` is the name the trajectory was requested under. If the file names itself
    /// differently a warning is issued, but the requested name is kept.
    pub fn from_json_str(name: &str, json: &str, field: FieldParams) -> Result<Self, ChoreoError> {
        let file: TrajFile = serde_json::from_str(json).map_err(ChoreoError::ParseError)?;

        if let Some(ref file_name) = file.name {
            if file_name != name {
                warn!(
                    "Trajectory file for \"{}\" names itself \"{}\"",
                    name,
                    file_name
                );
            }
        }

        let samples = file
            .trajectory
            .samples
            .into_iter()
            .map(|s| TrajSample {
                t_s: s.t,
                position_m: Vector2::new(s.x, s.y),
                heading_rad: s.heading,
                vel_ms: Vector2::new(s.vx, s.vy),
                omega_rads: s.omega,
            })
            .collect();

        Self::from_samples(name, samples, field)
    }

    /// Build a trajectory directly from samples, which must be in time order.
    pub fn from_samples(
        name: &str,
        samples: Vec<TrajSample>,
        field: FieldParams,
    ) -> Result<Self, ChoreoError> {
        for (i, s) in samples.iter().enumerate() {
            let finite = s.t_s.is_finite()
                && s.position_m.iter().all(|v| v.is_finite())
                && s.heading_rad.is_finite()
                && s.vel_ms.iter().all(|v| v.is_finite())
                && s.omega_rads.is_finite();

            if !finite {
                return Err(ChoreoError::NonFiniteSample(i));
            }

            if i > 0 && s.t_s < samples[i - 1].t_s {
                return Err(ChoreoError::SamplesOutOfOrder(i));
            }
        }

        Ok(Self {
            name: name.to_string(),
            samples,
            field,
        })
    }

    pub fn samples(&self) -> &[TrajSample] {
        &self.samples
    }

    fn mirrored(&self, sample: TrajSample, mirror: bool) -> TrajSample {
        if mirror {
            self.field.flip_sample(sample)
        } else {
            sample
        }
    }
}

impl Trajectory for ChoreoTrajectory {
    fn name(&self) -> &str {
        &self.name
    }

    fn initial_pose(&self, mirror: bool) -> Option<Pose2> {
        self.samples
            .first()
            .map(|s| self.mirrored(*s, mirror).pose())
    }

    fn total_duration_s(&self) -> f64 {
        self.samples.last().map(|s| s.t_s).unwrap_or(0.0)
    }

    fn sample_at(&self, t_s: f64, mirror: bool) -> Option<TrajSample> {
        if !t_s.is_finite() {
            return None;
        }

        let first = self.samples.first()?;
        let last = self.samples.last()?;

        let sample = if t_s <= first.t_s {
            *first
        } else if t_s >= last.t_s {
            *last
        } else {
            // Index of the first sample after t_s, which is in 1..len because of the checks above
            let i = self.samples.partition_point(|s| s.t_s <= t_s);
            interpolate(&self.samples[i - 1], &self.samples[i], t_s)
        };

        Some(self.mirrored(sample, mirror))
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Interpolate between two samples, where `a.t_s <= t_s < b.t_s`.
fn interpolate(a: &TrajSample, b: &TrajSample, t_s: f64) -> TrajSample {
    let frac = (t_s - a.t_s) / (b.t_s - a.t_s);

    TrajSample {
        t_s,
        position_m: a.position_m + (b.position_m - a.position_m) * frac,
        heading_rad: lerp_angle(a.heading_rad, b.heading_rad, frac),
        vel_ms: a.vel_ms + (b.vel_ms - a.vel_ms) * frac,
        omega_rads: lerp(a.omega_rads, b.omega_rads, frac),
    }
}
