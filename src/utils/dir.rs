use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::Result;

/// Well-known locations inside the application data directory. Components receive their file
/// paths from here instead of assembling them from ambient globals.
#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The shared application document. One JSON object holding tasks, logs, mode and points.
    pub fn document_file(&self) -> PathBuf {
        self.data_dir.join("app_data.json")
    }

    /// The character state channel. A single word overwritten on every tracker tick.
    pub fn character_state_file(&self) -> PathBuf {
        self.data_dir.join("character_state.txt")
    }

    pub fn daily_notes_dir(&self) -> PathBuf {
        self.data_dir.join("daily_notes")
    }

    /// Character sprites and other static files served under `/assets`.
    pub fn assets_dir(&self) -> PathBuf {
        self.data_dir.join("assets")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let mut path =
                PathBuf::from(env::var("APPDATA").expect("APPDATA should be present on Windows"));
            path.push("touchgrass");
            path
        }
        #[cfg(not(windows))]
        {
            let mut path = env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| {
                        let mut path = PathBuf::from(home);
                        path.push(".local/state");
                        path
                    })
                })
                .expect("Couldn't find neither XDG_STATE_HOME nor HOME");
            path.push("touchgrass");
            path
        }
    };

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
