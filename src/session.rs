//! Session working copy
//!
//! The task lists live in memory for as long as a UI is open. The CLI runs
//! one command per process, so the current [`TaskStore`] is kept in a
//! session file between invocations. It uses the save file field names plus
//! the selection:
//!
//! ```text
//! { "Tasks": [...], "Completed Tasks": [...], "Selected": 0 }
//! ```
//!
//! Unlike save files, the session keeps the raw completed list and is
//! overwritten on every change.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::TaskStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "Tasks", default)]
    tasks: Vec<String>,

    #[serde(rename = "Completed Tasks", default)]
    completed_tasks: Vec<String>,

    #[serde(rename = "Selected", default)]
    selected: usize,
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct Session {
    path: PathBuf,
}

impl Session {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored task lists; a missing file is an empty store.
    ///
    /// A stale selection that no longer addresses a pending task falls back
    /// to 0.
    pub fn load(&self) -> Result<TaskStore> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no session file; starting empty");
                return Ok(TaskStore::new());
            }
            Err(err) => return Err(err.into()),
        };

        let file: SessionFile =
            serde_json::from_str(&contents).map_err(|err| Error::MalformedSaveFile {
                name: self.path.display().to_string(),
                reason: err.to_string(),
            })?;

        let mut store = TaskStore::from_parts(file.tasks, file.completed_tasks);
        if store.select(file.selected).is_err() {
            debug!(selected = file.selected, "discarding stale selection");
        }
        Ok(store)
    }

    /// Atomically replace the session file with `store`.
    pub fn store(&self, store: &TaskStore) -> Result<()> {
        let file = SessionFile {
            tasks: store.pending().to_vec(),
            completed_tasks: store.completed().to_vec(),
            selected: store.selected(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        // Temp file in the same directory so the rename stays atomic
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)?;
        temp.write_all(json.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|err| err.error)?;

        debug!(
            path = %self.path.display(),
            pending = store.pending().len(),
            completed = store.completed().len(),
            "session stored"
        );
        Ok(())
    }
}
