//! todo save, saves and load command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::persistence::SaveOutcome;

use super::task::{push_lists, ListsOutput};
use super::{load_context, GlobalOptions};

#[derive(Serialize)]
struct SaveOutput {
    saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
}

#[derive(Serialize)]
struct SavesOutput {
    dir: PathBuf,
    files: Vec<String>,
}

#[derive(Serialize)]
struct LoadOutput {
    file: String,
    #[serde(flatten)]
    lists: ListsOutput,
}

pub fn run_save(global: &GlobalOptions) -> Result<()> {
    let ctx = load_context(global)?;
    let outcome = ctx.persistence.save(&ctx.store, global.today())?;

    let (human, output) = match outcome {
        SaveOutcome::Saved { name, path } => {
            let mut human = HumanOutput::new("Tasks saved");
            human.push_summary("File", name.clone());
            human.push_summary("Tasks", ctx.store.pending().len().to_string());
            human.push_summary("Completed", ctx.store.completed_unique().len().to_string());
            (
                human,
                SaveOutput {
                    saved: true,
                    file: Some(name),
                    path: Some(path),
                },
            )
        }
        SaveOutcome::NothingToSave => {
            let mut human = HumanOutput::new("No Task Entries");
            human.push_warning("pending list is empty; nothing was saved");
            human.push_next_step("todo add <TEXT>");
            (
                human,
                SaveOutput {
                    saved: false,
                    file: None,
                    path: None,
                },
            )
        }
    };

    emit_success(global.output(), "save", &output, Some(&human))
}

pub fn run_saves(global: &GlobalOptions) -> Result<()> {
    let ctx = load_context(global)?;
    let files = ctx.persistence.list_save_files()?;

    let mut human = HumanOutput::new("Save files");
    human.push_summary("Directory", ctx.persistence.save_dir().display().to_string());
    human.push_section("Files", files.clone());
    if files.is_empty() {
        human.push_next_step("todo save");
    }

    let output = SavesOutput {
        dir: ctx.persistence.save_dir().to_path_buf(),
        files,
    };
    emit_success(global.output(), "saves", &output, Some(&human))
}

pub fn run_load(global: &GlobalOptions, file: &str) -> Result<()> {
    let mut ctx = load_context(global)?;
    ctx.persistence.load_into(file, &mut ctx.store)?;
    ctx.commit()?;

    let mut human = HumanOutput::new("Tasks loaded");
    human.push_summary("File", file);
    push_lists(&mut human, &ctx.store);

    let output = LoadOutput {
        file: file.to_string(),
        lists: ListsOutput::from_store(&ctx.store),
    };
    emit_success(global.output(), "load", &output, Some(&human))
}
