//! # Autonomous modes
//!
//! An [`AutoMode`] is a named routine which can be run in the autonomous period. The
//! [`AutoSelector`] holds every mode the robot knows about, and picks the one to run when the
//! autonomous period starts.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};

use super::{just_leave::JustLeave, AutoCtx, TrajRunner, TrajSequencer};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A named autonomous routine.
pub struct AutoMode {
    name: String,

    routine: Routine,
}

/// Catalogue of the autonomous modes which can be selected.
#[derive(Default)]
pub struct AutoSelector {
    entries: Vec<ModeEntry>,
}

struct ModeEntry {
    name: String,

    is_default: bool,

    build: Box<dyn Fn() -> Routine>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The state machine behind an [`AutoMode`].
pub enum Routine {
    /// Follow a single trajectory
    Trajectory(TrajRunner),

    // In a box to reduce the size of the enum
    Sequence(Box<TrajSequencer>),

    /// Timed routine which doesn't use trajectories
    Timed(JustLeave),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SelectorError {
    #[error("An autonomous mode named \"{0}\" is already registered")]
    DuplicateName(String),

    #[error("Cannot make \"{1}\" the default autonomous mode, \"{0}\" is already the default")]
    MultipleDefaults(String, String),

    #[error("No autonomous modes have been registered")]
    NoModes,

    #[error("No default autonomous mode has been registered")]
    NoDefault,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AutoMode {
    pub fn new(name: &str, routine: Routine) -> Self {
        Self {
            name: name.to_string(),
            routine,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    /// Start the autonomous period.
    pub fn on_enable(&mut self, ctx: &mut AutoCtx) {
        info!("Autonomous mode \"{}\" enabled", self.name);

        match self.routine {
            Routine::Trajectory(ref mut r) => r.on_enable(ctx),
            Routine::Sequence(ref mut s) => s.on_enable(ctx),
            Routine::Timed(ref mut t) => t.on_enable(ctx),
        }
    }

    /// Step the mode for one control cycle.
    pub fn tick(&mut self, ctx: &mut AutoCtx) {
        match self.routine {
            Routine::Trajectory(ref mut r) => r.tick(ctx),
            Routine::Sequence(ref mut s) => s.tick(ctx),
            Routine::Timed(ref mut t) => t.tick(ctx),
        }
    }

    /// End the autonomous period, stopping the robot whatever state the mode is in.
    pub fn on_disable(&mut self, ctx: &mut AutoCtx) {
        if self.is_finished() {
            info!("Autonomous mode \"{}\" disabled", self.name);
        } else {
            warn!(
                "Autonomous mode \"{}\" disabled before finishing (in {})",
                self.name,
                self.state_str()
            );
        }

        ctx.drivetrain.stop();
    }

    pub fn is_finished(&self) -> bool {
        match self.routine {
            Routine::Trajectory(ref r) => r.is_complete(),
            Routine::Sequence(ref s) => s.is_complete(),
            Routine::Timed(ref t) => t.is_done(),
        }
    }

    /// Name of the current state of the mode's state machine.
    pub fn state_str(&self) -> String {
        match self.routine {
            Routine::Trajectory(ref r) => r.state().to_string(),
            Routine::Sequence(ref s) => s.state().to_string(),
            Routine::Timed(ref t) => t.state().to_string(),
        }
    }
}

impl AutoSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new mode.
    ///
    /// `build` is called each time the mode is selected, so every run starts from a new routine.
    /// Names must be unique and at most one mode may be the default.
    pub fn register<F>(
        &mut self,
        name: &str,
        is_default: bool,
        build: F,
    ) -> Result<(), SelectorError>
    where
        F: Fn() -> Routine + 'static,
    {
        if self.entries.iter().any(|e| e.name == name) {
            return Err(SelectorError::DuplicateName(name.to_string()));
        }

        if is_default {
            if let Some(current) = self.default_name() {
                return Err(SelectorError::MultipleDefaults(
                    current.to_string(),
                    name.to_string(),
                ));
            }
        }

        self.entries.push(ModeEntry {
            name: name.to_string(),
            is_default,
            build: Box::new(build),
        });

        Ok(())
    }

    /// Names of all registered modes, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn default_name(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.is_default)
            .map(|e| e.name.as_str())
    }

    /// Build the mode with the given name.
    ///
    /// If no name is given the default mode is used. An unknown name also falls back to the
    /// default, with a warning.
    pub fn select(&self, name: Option<&str>) -> Result<AutoMode, SelectorError> {
        if self.entries.is_empty() {
            return Err(SelectorError::NoModes);
        }

        let requested = name.and_then(|n| self.entries.iter().find(|e| e.name == n));

        let entry = match (requested, name) {
            (Some(e), _) => e,
            (None, requested_name) => {
                let default = self
                    .entries
                    .iter()
                    .find(|e| e.is_default)
                    .ok_or(SelectorError::NoDefault)?;

                if let Some(n) = requested_name {
                    warn!(
                        "No autonomous mode named \"{}\", using the default \"{}\" instead. \
                        Available modes are: {}",
                        n,
                        default.name,
                        self.names().join(", ")
                    );
                }

                default
            }
        };

        info!("Selected autonomous mode \"{}\"", entry.name);

        Ok(AutoMode::new(&entry.name, (entry.build)()))
    }
}
