#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Date every test command uses for save file names
pub const TODAY: &str = "2024-03-12";

pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn save_dir(&self) -> PathBuf {
        self.dir.path().join("To_Do_Saves")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_file(&self, rel_path: &str) -> std::io::Result<String> {
        fs::read_to_string(self.dir.path().join(rel_path))
    }

    pub fn write_save(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file(&format!("To_Do_Saves/{name}"), contents)
    }

    /// `todo` command running inside this directory
    pub fn cmd(&self) -> Command {
        let mut cmd = todo_cmd();
        cmd.current_dir(self.path());
        cmd
    }

    /// Run a command with `--json` and parse its envelope
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .output()
            .expect("run todo");
        serde_json::from_slice(&output.stdout).expect("json envelope")
    }
}

pub fn todo_cmd() -> Command {
    let mut cmd = Command::cargo_bin("todo").expect("binary");
    cmd.env_remove("TODO_DIR")
        .env_remove("RUST_LOG")
        .env("TODO_TODAY", TODAY);
    cmd
}
