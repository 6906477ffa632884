//! Save file persistence
//!
//! Save files live in a single directory (default `To_Do_Saves/`) and are
//! never modified or deleted once written:
//!
//! ```text
//! To_Do_Saves/
//!   Date-05-Save-1.json     # first save on the 5th of a month
//!   Date-05-Save-2.json     # second save that day
//!   Date-12-Save-1.json
//! ```
//!
//! Each file holds `{"Tasks": [...], "Completed Tasks": [...]}` with 2-space
//! indentation. The sequence number is the smallest one whose file does not
//! exist yet, so a gap left by an externally removed file is reused.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use tempfile::Builder;
use tracing::{debug, info};

use crate::config::normalize_path;
use crate::error::{Error, Result};
use crate::store::{self, TaskStore};

/// Default save directory, relative to the working directory
pub const DEFAULT_SAVE_DIR: &str = "To_Do_Saves";

/// Prefix of in-flight temp files inside the save directory
const TEMP_PREFIX: &str = ".todo-save-";

/// On-disk shape of a save file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFile {
    #[serde(rename = "Tasks", default, deserialize_with = "nullable_list")]
    pub tasks: Vec<String>,

    #[serde(rename = "Completed Tasks", default, deserialize_with = "nullable_list")]
    pub completed_tasks: Vec<String>,
}

impl SaveFile {
    /// Snapshot a store: pending as-is, completed deduplicated.
    pub fn from_store(store: &TaskStore) -> Self {
        Self {
            tasks: store.pending().to_vec(),
            completed_tasks: store.completed_unique(),
        }
    }

    pub fn into_store(self) -> TaskStore {
        TaskStore::from_parts(self.tasks, self.completed_tasks)
    }

    /// Serialize with 2-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse save file contents; `name` is only used for error messages.
    pub fn parse(name: &str, contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|err| Error::MalformedSaveFile {
            name: name.to_string(),
            reason: err.to_string(),
        })
    }
}

/// Result of [`PersistenceManager::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new save file was written
    Saved { name: String, path: PathBuf },
    /// The pending list was empty; no file was written
    NothingToSave,
}

/// Owns the save directory as a create-only store of save files.
#[derive(Debug, Clone)]
pub struct PersistenceManager {
    save_dir: PathBuf,
    excluded: Option<PathBuf>,
}

impl PersistenceManager {
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            excluded: None,
        }
    }

    /// Never list or load `path`, even if it sits in the save directory.
    pub fn excluding(mut self, path: impl AsRef<Path>) -> Self {
        self.excluded = Some(normalize_path(path.as_ref()));
        self
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Path of a save file by name
    pub fn save_path(&self, name: &str) -> PathBuf {
        self.save_dir.join(name)
    }

    /// Names of the files in the save directory, without repeats.
    ///
    /// Order follows the directory enumeration. A missing directory yields
    /// an empty list. Leftover temp files from an interrupted save and the
    /// excluded path are skipped.
    pub fn list_save_files(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.save_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %self.save_dir.display(), "save directory missing");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if self.excluded.as_deref() == Some(normalize_path(&entry.path()).as_path()) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with(TEMP_PREFIX) {
                continue;
            }
            names.push(name);
        }

        let names = store::dedup(&names);
        debug!(count = names.len(), "listed save files");
        Ok(names)
    }

    /// First `Date-DD-Save-N.json` name for `today` that does not exist yet.
    pub fn next_save_name(&self, today: NaiveDate) -> String {
        let mut seq = 1u32;
        loop {
            let name = save_file_name(today, seq);
            if !self.save_path(&name).exists() {
                return name;
            }
            seq += 1;
        }
    }

    /// Write a snapshot of `store` to a new save file.
    ///
    /// An empty pending list writes nothing and reports
    /// [`SaveOutcome::NothingToSave`]. The file is written to a temp file in
    /// the save directory first and only then given its final name, which
    /// must not exist yet, so a failed save leaves no file behind.
    pub fn save(&self, store: &TaskStore, today: NaiveDate) -> Result<SaveOutcome> {
        if store.pending().is_empty() {
            info!("no pending tasks; nothing to save");
            return Ok(SaveOutcome::NothingToSave);
        }

        fs::create_dir_all(&self.save_dir)?;
        let json = SaveFile::from_store(store).to_json()?;

        let mut temp = Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.save_dir)?;
        temp.write_all(json.as_bytes())?;
        temp.as_file().sync_all()?;

        loop {
            let name = self.next_save_name(today);
            let path = self.save_path(&name);
            match temp.persist_noclobber(&path) {
                Ok(_) => {
                    info!(file = %name, "saved tasks");
                    return Ok(SaveOutcome::Saved { name, path });
                }
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    // Name was taken between the scan and the rename; rescan.
                    debug!(file = %name, "save name taken, retrying");
                    temp = err.file;
                }
                Err(err) => return Err(err.error.into()),
            }
        }
    }

    /// Read the save file `name` into a fresh store.
    ///
    /// `name` must be one of [`list_save_files`](Self::list_save_files).
    pub fn load(&self, name: &str) -> Result<TaskStore> {
        let known = self.list_save_files()?;
        if !known.iter().any(|candidate| candidate == name) {
            return Err(Error::SaveNotFound(name.to_string()));
        }

        let contents = fs::read_to_string(self.save_path(name))?;
        let save = SaveFile::parse(name, &contents)?;
        debug!(
            file = name,
            tasks = save.tasks.len(),
            completed = save.completed_tasks.len(),
            "loaded save file"
        );
        Ok(save.into_store())
    }

    /// Load `name` and replace `store` with its contents.
    ///
    /// On error `store` is left as it was.
    pub fn load_into(&self, name: &str, store: &mut TaskStore) -> Result<()> {
        let loaded = self.load(name)?;
        store.replace(loaded);
        Ok(())
    }
}

/// `Date-DD-Save-N.json`, with `DD` the zero-padded day of month.
pub fn save_file_name(today: NaiveDate, seq: u32) -> String {
    format!("Date-{:02}-Save-{}.json", today.day(), seq)
}

fn nullable_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn manager() -> (tempfile::TempDir, PersistenceManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = PersistenceManager::new(dir.path().join(DEFAULT_SAVE_DIR));
        (dir, manager)
    }

    #[test]
    fn file_name_pads_day() {
        assert_eq!(save_file_name(day(5), 1), "Date-05-Save-1.json");
        assert_eq!(save_file_name(day(28), 13), "Date-28-Save-13.json");
    }

    #[test]
    fn next_name_fills_first_gap() {
        let (_dir, manager) = manager();
        fs::create_dir_all(manager.save_dir()).unwrap();
        fs::write(manager.save_path("Date-05-Save-1.json"), "{}").unwrap();
        fs::write(manager.save_path("Date-05-Save-3.json"), "{}").unwrap();

        assert_eq!(manager.next_save_name(day(5)), "Date-05-Save-2.json");
        assert_eq!(manager.next_save_name(day(6)), "Date-06-Save-1.json");
    }

    #[test]
    fn save_with_no_pending_writes_nothing() {
        let (_dir, manager) = manager();
        let mut store = TaskStore::new();
        store.add_task("done");
        store.complete_task(0).unwrap();
        store.delete_task(0).unwrap();

        let outcome = manager.save(&store, day(1)).unwrap();

        assert_eq!(outcome, SaveOutcome::NothingToSave);
        assert!(manager.list_save_files().unwrap().is_empty());
    }

    #[test]
    fn save_writes_indented_json_with_dedup() {
        let (_dir, manager) = manager();
        let mut store = TaskStore::new();
        store.add_task("a");
        store.add_task("b");
        store.complete_task(0).unwrap();
        store.complete_task(1).unwrap();
        store.complete_task(0).unwrap();

        let outcome = manager.save(&store, day(12)).unwrap();
        let SaveOutcome::Saved { name, path } = outcome else {
            panic!("expected a save file");
        };

        assert_eq!(name, "Date-12-Save-1.json");
        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(
            contents,
            "{\n  \"Tasks\": [\n    \"a\",\n    \"b\"\n  ],\n  \"Completed Tasks\": [\n    \"a\",\n    \"b\"\n  ]\n}"
        );
    }

    #[test]
    fn consecutive_saves_never_share_a_name() {
        let (_dir, manager) = manager();
        let mut store = TaskStore::new();
        store.add_task("a");

        let first = manager.save(&store, day(9)).unwrap();
        let second = manager.save(&store, day(9)).unwrap();

        assert_ne!(first, second);
        let mut names = manager.list_save_files().unwrap();
        names.sort();
        assert_eq!(names, ["Date-09-Save-1.json", "Date-09-Save-2.json"]);
    }

    #[test]
    fn list_skips_directories_and_handles_missing_dir() {
        let (_dir, manager) = manager();
        assert!(manager.list_save_files().unwrap().is_empty());

        fs::create_dir_all(manager.save_dir().join("nested")).unwrap();
        fs::write(manager.save_path("Date-01-Save-1.json"), "{}").unwrap();

        assert_eq!(manager.list_save_files().unwrap(), ["Date-01-Save-1.json"]);
    }

    #[test]
    fn list_skips_interrupted_temp_files() {
        let (_dir, manager) = manager();
        fs::create_dir_all(manager.save_dir()).unwrap();
        fs::write(manager.save_path(".todo-save-a1B2c3"), "{\"Tasks\": [").unwrap();
        fs::write(manager.save_path("Date-02-Save-1.json"), "{}").unwrap();

        assert_eq!(manager.list_save_files().unwrap(), ["Date-02-Save-1.json"]);
        assert!(matches!(
            manager.load(".todo-save-a1B2c3").unwrap_err(),
            Error::SaveNotFound(_)
        ));
    }

    #[test]
    fn excluded_path_is_never_listed() {
        let (_dir, manager) = manager();
        let session = manager.save_dir().join(".").join("session.json");
        let manager = manager.excluding(&session);
        fs::create_dir_all(manager.save_dir()).unwrap();
        fs::write(manager.save_path("session.json"), "{\"Tasks\": []}").unwrap();

        assert!(manager.list_save_files().unwrap().is_empty());
        assert!(matches!(
            manager.load("session.json").unwrap_err(),
            Error::SaveNotFound(_)
        ));
    }

    #[test]
    fn failed_save_leaves_no_file_and_store_untouched() {
        let (dir, manager) = manager();
        fs::write(manager.save_dir(), "not a directory").unwrap();
        let mut store = TaskStore::new();
        store.add_task("keep me");
        store.complete_task(0).unwrap();
        let before = store.clone();

        let err = manager.save(&store, day(4)).unwrap_err();

        assert!(matches!(err, Error::Io(_)), "{err}");
        assert_eq!(store, before);
        assert_eq!(
            fs::read_to_string(manager.save_dir()).unwrap(),
            "not a directory"
        );
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, [std::ffi::OsString::from(DEFAULT_SAVE_DIR)]);
    }

    #[test]
    fn load_round_trips_saved_store() {
        let (_dir, manager) = manager();
        let mut original = TaskStore::new();
        original.add_task("x");
        original.add_task("y");
        original.add_task("x");
        original.complete_task(2).unwrap();
        original.complete_task(1).unwrap();
        original.complete_task(0).unwrap();

        let SaveOutcome::Saved { name, .. } = manager.save(&original, day(3)).unwrap() else {
            panic!("expected a save file");
        };
        let loaded = manager.load(&name).unwrap();

        assert_eq!(loaded.pending(), original.pending());
        assert_eq!(loaded.completed(), original.completed_unique().as_slice());
    }

    #[test]
    fn load_unknown_file_is_not_found() {
        let (_dir, manager) = manager();
        let err = manager.load("Date-01-Save-1.json").unwrap_err();
        assert!(matches!(err, Error::SaveNotFound(name) if name == "Date-01-Save-1.json"));
    }

    #[test]
    fn load_rejects_paths_outside_listing() {
        let (dir, manager) = manager();
        fs::create_dir_all(manager.save_dir()).unwrap();
        fs::write(dir.path().join("outside.json"), "{\"Tasks\": [\"x\"]}").unwrap();

        let err = manager.load("../outside.json").unwrap_err();
        assert!(matches!(err, Error::SaveNotFound(_)));
    }

    #[test]
    fn load_tolerates_missing_and_null_fields() {
        let (_dir, manager) = manager();
        fs::create_dir_all(manager.save_dir()).unwrap();
        fs::write(manager.save_path("only-tasks.json"), r#"{"Tasks": ["a"]}"#).unwrap();
        fs::write(manager.save_path("nulls.json"), r#"{"Tasks": null, "Completed Tasks": null}"#)
            .unwrap();

        let store = manager.load("only-tasks.json").unwrap();
        assert_eq!(store.pending(), ["a"]);
        assert!(store.completed().is_empty());

        let store = manager.load("nulls.json").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_file_leaves_store_untouched() {
        let (_dir, manager) = manager();
        fs::create_dir_all(manager.save_dir()).unwrap();
        fs::write(manager.save_path("broken.json"), "{\"Tasks\": [1, 2]}").unwrap();
        fs::write(manager.save_path("truncated.json"), "{\"Tasks\": [").unwrap();

        let mut store = TaskStore::new();
        store.add_task("unsaved");
        let before = store.clone();

        for name in ["broken.json", "truncated.json"] {
            let err = manager.load_into(name, &mut store).unwrap_err();
            assert!(matches!(err, Error::MalformedSaveFile { .. }), "{name}: {err}");
            assert_eq!(store, before);
        }
    }

    #[test]
    fn load_into_replaces_instead_of_merging() {
        let (_dir, manager) = manager();
        let mut saved = TaskStore::new();
        saved.add_task("from file");
        let SaveOutcome::Saved { name, .. } = manager.save(&saved, day(20)).unwrap() else {
            panic!("expected a save file");
        };

        let mut store = TaskStore::new();
        store.add_task("in memory");
        store.complete_task(0).unwrap();

        manager.load_into(&name, &mut store).unwrap();

        assert_eq!(store.pending(), ["from file"]);
        assert!(store.completed().is_empty());
    }
}
