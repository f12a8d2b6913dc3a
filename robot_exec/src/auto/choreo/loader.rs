//! # Choreo trajectory file loader

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use auto_if::Trajectory;
use log::debug;

use super::{ChoreoTrajectory, FieldParams};
use crate::auto::traj_store::{TrajLoadError, TrajectoryLoader};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Extension of trajectory files in the deploy directory.
pub const TRAJ_FILE_EXTENSION: &str = "traj";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Loads trajectories from `{deploy_dir}/{name}.traj`.
#[derive(Debug, Clone)]
pub struct ChoreoLoader {
    deploy_dir: PathBuf,

    field: FieldParams,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ChoreoLoader {
    pub fn new<P: AsRef<Path>>(deploy_dir: P, field: FieldParams) -> Self {
        Self {
            deploy_dir: deploy_dir.as_ref().to_path_buf(),
            field,
        }
    }

    /// Path to the file a trajectory of the given name is loaded from.
    pub fn traj_path(&self, name: &str) -> PathBuf {
        self.deploy_dir
            .join(format!("{}.{}", name, TRAJ_FILE_EXTENSION))
    }
}

impl TrajectoryLoader for ChoreoLoader {
    fn load(&self, name: &str) -> Result<Box<dyn Trajectory>, TrajLoadError> {
        // Names are plain file stems, anything that could escape the deploy directory is rejected
        if name.is_empty()
            || name.contains(|c: char| c == '/' || c == '\\')
            || name.starts_with('.')
        {
            return Err(TrajLoadError::InvalidName(name.to_string()));
        }

        let path = self.traj_path(name);
        debug!("Loading trajectory \"{}\" from {:?}", name, path);

        let json = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TrajLoadError::NotFound(path.clone()),
            _ => TrajLoadError::ReadError(path.clone(), e),
        })?;

        let traj = ChoreoTrajectory::from_json_str(name, &json, self.field)
            .map_err(|e| TrajLoadError::Malformed(name.to_string(), e.to_string()))?;

        Ok(Box::new(traj))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn temp_deploy_dir(test_name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "scurvy_choreo_loader_{}_{}",
            test_name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load() {
        let dir = temp_deploy_dir("load");
        fs::write(
            dir.join("leave.traj"),
            r#"{"name": "leave", "trajectory": {"samples": [
                {"t": 0.0, "x": 0.0, "y": 0.0, "heading": 0.0},
                {"t": 1.5, "x": 2.0, "y": 0.0, "heading": 0.0}
            ]}}"#,
        )
        .unwrap();
        fs::write(dir.join("broken.traj"), "{").unwrap();

        let loader = ChoreoLoader::new(&dir, FieldParams::default());

        let traj = loader.load("leave").unwrap();
        assert_eq!(traj.name(), "leave");
        assert_eq!(traj.total_duration_s(), 1.5);

        assert!(matches!(
            loader.load("missing"),
            Err(TrajLoadError::NotFound(_))
        ));
        assert!(matches!(
            loader.load("broken"),
            Err(TrajLoadError::Malformed(_, _))
        ));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_names() {
        let loader = ChoreoLoader::new(temp_deploy_dir("names"), FieldParams::default());

        for name in ["", "../leave", "sub/leave", ".hidden"].iter() {
            assert!(matches!(
                loader.load(name),
                Err(TrajLoadError::InvalidName(_))
            ));
        }
    }
}
