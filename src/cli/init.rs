//! todo init command implementation
//!
//! Writes a default `.todo.toml` into the base directory.

use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

use super::{base_dir, GlobalOptions};

#[derive(serde::Serialize)]
struct InitReport {
    config: PathBuf,
    save_dir: String,
    session_file: String,
}

pub fn run(global: &GlobalOptions) -> Result<()> {
    let base = base_dir(global)?;
    let config_path = base.join(CONFIG_FILE);
    if config_path.exists() {
        return Err(Error::InvalidArgument(format!(
            "{} already exists",
            config_path.display()
        )));
    }

    std::fs::create_dir_all(&base)?;
    let config = Config::default();
    config.save(&config_path)?;

    let mut human = HumanOutput::new("todo initialized");
    human.push_summary("Config", config_path.display().to_string());
    human.push_summary("Save directory", config.save_dir.clone());
    human.push_summary("Session file", config.session_file.clone());
    human.push_next_step("todo add <TEXT>");

    let report = InitReport {
        config: config_path,
        save_dir: config.save_dir,
        session_file: config.session_file,
    };
    emit_success(global.output(), "init", &report, Some(&human))
}
