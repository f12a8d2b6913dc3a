//! Logger initialisation
//!
//! All executables log through the `log` facade. This module sets up a `fern` dispatcher which
//! writes coloured lines to stdout and plain lines to the session's log file. Every line is
//! stamped with the number of seconds since the session epoch.
//!
//! Levels are configured by a [`LogParams`] table, usually the `[log]` table of the executable's
//! parameter file. Warnings and errors are how the autonomy system reports a wrong alliance or a
//! missing trajectory, so no configuration may hide them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::{collections::BTreeMap, fmt};

use colored::{ColoredString, Colorize};
use log::{self, info};
use serde::Deserialize;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Logging levels for an execution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogParams {
    /// Level applied to every module without an override
    pub level: LevelFilter,

    /// Per-module overrides, keyed by log target (e.g. `robot_lib::sim_drivetrain`)
    pub module_levels: BTreeMap<String, LevelFilter>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Module `{0}` would hide warnings with level `{1}`")]
    InvalidModuleLevel(String, log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl Default for LogParams {
    fn default() -> Self {
        Self {
            level: LevelFilter::Debug,
            module_levels: BTreeMap::new(),
        }
    }
}

impl LogParams {
    /// Check the levels still let the driver see problems.
    ///
    /// The global level must be at least `Info`. Module overrides may be quieter, but never
    /// quieter than `Warn`.
    pub fn validate(&self) -> Result<(), LoggerInitError> {
        if self.level < log::Level::Info {
            return Err(LoggerInitError::InvalidMinLogLevel(self.level));
        }

        match self
            .module_levels
            .iter()
            .find(|(_, level)| **level < log::Level::Warn)
        {
            Some((module, level)) => Err(LoggerInitError::InvalidModuleLevel(
                module.clone(),
                *level,
            )),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// # Notes
///
/// - The session must have been created before calling this, as the log line timestamps are taken
///   from the session epoch.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(params: &LogParams, session: &session::Session) -> Result<(), LoggerInitError> {
    params.validate()?;

    let log_file =
        fern::log_file(session.log_file_path.clone()).map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new().level(params.level);
    for (module, level) in params.module_levels.iter() {
        dispatch = dispatch.level_for(module.clone(), *level);
    }

    dispatch
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| format_record(out, message, record, true))
                .chain(std::io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| format_record(out, message, record, false))
                .chain(log_file),
        )
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", params.level);
    for (module, level) in params.module_levels.iter() {
        info!("        {}: {:?}", module, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn format_record(
    out: fern::FormatCallback,
    message: &fmt::Arguments,
    record: &log::Record,
    coloured: bool,
) {
    let level = level_to_str(record.level(), coloured);

    // Module targets are only interesting when debugging
    if record.level() > log::Level::Info {
        out.finish(format_args!(
            "[{:10.6} {}] {}: {}",
            session::get_elapsed_seconds(),
            level,
            record.target(),
            message
        ))
    } else {
        out.finish(format_args!(
            "[{:10.6} {}] {}",
            session::get_elapsed_seconds(),
            level,
            message
        ))
    }
}

/// Get the string representation of a log level, with no escape codes unless `coloured`.
fn level_to_str(level: log::Level, coloured: bool) -> ColoredString {
    let tag = match level {
        log::Level::Trace => "TRC",
        log::Level::Debug => "DBG",
        log::Level::Info => "INF",
        log::Level::Warn => "WRN",
        log::Level::Error => "ERR",
    };

    if !coloured {
        return tag.normal();
    }

    match level {
        log::Level::Trace => tag.dimmed().italic(),
        log::Level::Debug => tag.dimmed(),
        log::Level::Info => tag.normal(),
        log::Level::Warn => tag.yellow(),
        log::Level::Error => tag.red().bold(),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
