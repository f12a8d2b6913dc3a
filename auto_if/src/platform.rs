//! # Platform information
//!
//! Information provided by the robot platform rather than by any mechanism: which alliance the
//! robot has been assigned to, and a monotonic clock used to time trajectories.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Source of the current alliance assignment.
///
/// The assignment can change between runs (and while disconnected reads as
/// [`Alliance::Unknown`]), so it must be queried every time it's needed rather than stored.
pub trait AllianceSource {
    fn alliance(&self) -> Alliance;
}

/// A monotonic clock, in seconds from an arbitrary epoch.
///
/// Run timers are built on top of this by recording the time they were restarted and subtracting
/// it from the current time.
pub trait Clock {
    fn now_s(&self) -> f64;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The alliance the robot is competing for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alliance {
    Red,
    Blue,

    /// No alliance has been assigned, for example because the driver station is disconnected.
    Unknown,
}

/// Error returned when parsing an [`Alliance`] from a string.
#[derive(Debug, thiserror::Error)]
#[error("Unknown alliance \"{0}\", expected one of red, blue, or unknown")]
pub struct AllianceParseError(String);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for Alliance {
    fn default() -> Self {
        Alliance::Unknown
    }
}

impl AllianceSource for Alliance {
    fn alliance(&self) -> Alliance {
        *self
    }
}

impl Display for Alliance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alliance::Red => write!(f, "red"),
            Alliance::Blue => write!(f, "blue"),
            Alliance::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Alliance {
    type Err = AllianceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Alliance::Red),
            "blue" => Ok(Alliance::Blue),
            "unknown" | "none" => Ok(Alliance::Unknown),
            _ => Err(AllianceParseError(s.to_string())),
        }
    }
}
