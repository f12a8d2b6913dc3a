//! # Trajectory store
//!
//! The store loads named trajectories on first request and keeps the result, good or bad, for the
//! life of the store. The executable creates exactly one store and hands it to the autonomy
//! routines by reference, so every routine shares the same cache.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{collections::HashMap, path::PathBuf, rc::Rc};

use auto_if::Trajectory;
use log::{error, info, warn};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Loads trajectories from persistent storage.
pub trait TrajectoryLoader {
    fn load(&self, name: &str) -> Result<Box<dyn Trajectory>, TrajLoadError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Process-wide cache of trajectories, keyed by name.
pub struct TrajectoryStore {
    loader: Box<dyn TrajectoryLoader>,

    cache: HashMap<String, TrajectoryHandle>,

    /// Number of times the loader has been called.
    num_load_attempts: usize,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The resolution of a trajectory name.
///
/// Cloning a handle is cheap and clones share the same underlying trajectory.
#[derive(Debug, Clone)]
pub enum TrajectoryHandle {
    Loaded(Rc<dyn Trajectory>),

    /// Loading this trajectory failed, and will not be attempted again.
    LoadFailed,
}

/// Errors that can occur while loading a trajectory.
#[derive(Debug, thiserror::Error)]
pub enum TrajLoadError {
    #[error("Invalid trajectory name \"{0}\"")]
    InvalidName(String),

    #[error("Trajectory file {0:?} does not exist")]
    NotFound(PathBuf),

    #[error("Could not read trajectory file {0:?}: {1}")]
    ReadError(PathBuf, std::io::Error),

    #[error("Trajectory \"{0}\" is malformed: {1}")]
    Malformed(String, String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TrajectoryStore {
    pub fn new(loader: Box<dyn TrajectoryLoader>) -> Self {
        Self {
            loader,
            cache: HashMap::new(),
            num_load_attempts: 0,
        }
    }

    /// Resolve a trajectory name into a handle.
    ///
    /// The first request for a name calls the loader. Every later request for that name returns
    /// the cached handle, including when the first load failed.
    pub fn resolve(&mut self, name: &str) -> TrajectoryHandle {
        if let Some(handle) = self.cache.get(name) {
            return handle.clone();
        }

        self.num_load_attempts += 1;

        let handle = match self.loader.load(name) {
            Ok(traj) => {
                info!(
                    "Loaded trajectory \"{}\" ({:.2} s)",
                    name,
                    traj.total_duration_s()
                );
                TrajectoryHandle::Loaded(Rc::from(traj))
            }
            Err(e @ TrajLoadError::NotFound(_)) => {
                warn!(
                    "Could not load trajectory \"{}\": {}. Make sure it has been deployed.",
                    name, e
                );
                TrajectoryHandle::LoadFailed
            }
            Err(e) => {
                error!("Error loading trajectory \"{}\": {}", name, e);
                TrajectoryHandle::LoadFailed
            }
        };

        self.cache.insert(name.to_string(), handle.clone());

        handle
    }

    /// Returns true if this name has already been resolved, whatever the outcome.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Number of load attempts made by this store.
    pub fn num_load_attempts(&self) -> usize {
        self.num_load_attempts
    }

    /// Number of trajectories successfully loaded.
    pub fn num_loaded(&self) -> usize {
        self.cache.values().filter(|h| h.is_loaded()).count()
    }
}

impl TrajectoryHandle {
    pub fn is_loaded(&self) -> bool {
        matches!(self, TrajectoryHandle::Loaded(_))
    }

    /// Returns true if both handles refer to the same resolution.
    ///
    /// Two failed handles are considered the same, as there's only one way to fail.
    pub fn same_as(&self, other: &TrajectoryHandle) -> bool {
        match (self, other) {
            (TrajectoryHandle::Loaded(a), TrajectoryHandle::Loaded(b)) => {
                Rc::as_ptr(a) as *const u8 == Rc::as_ptr(b) as *const u8
            }
            (TrajectoryHandle::LoadFailed, TrajectoryHandle::LoadFailed) => true,
            _ => false,
        }
    }
}

impl From<TrajectoryHandle> for Option<Rc<dyn Trajectory>> {
    fn from(handle: TrajectoryHandle) -> Self {
        match handle {
            TrajectoryHandle::Loaded(t) => Some(t),
            TrajectoryHandle::LoadFailed => None,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
